//! HTML document tree (html5ever + rcdom).
//!
//! Parsing follows HTML5 tree construction and never fails: malformed markup
//! is recovered by the html5ever tree builder. Serialization re-escapes text
//! and attribute values, so entity-encoded and non-ASCII content round-trips
//! unchanged.
//!
//! Node helpers here work on rcdom `Handle`s directly:
//! - `elements_by_tag()` - snapshot of matching elements in document order
//! - `get_attr()` / `set_attr()` / `has_attr()` - attribute access
//! - `replace_node()` - swap a node in its parent at the same index

use std::cell::RefCell;
use std::rc::Rc;

use html5ever::serialize::{SerializeOpts, serialize};
use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::{Attribute, LocalName, Namespace, ParseOpts, QualName, parse_document};
use markup5ever_rcdom::{Handle, Node, NodeData, RcDom, SerializableHandle};

/// XHTML namespace, which html5ever assigns to every HTML element.
pub const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

// =============================================================================
// Document
// =============================================================================

/// A parsed HTML page, mutable in place until serialized.
pub struct Document {
    dom: RcDom,
}

impl Document {
    /// Parse UTF-8 HTML text.
    ///
    /// `<template>` contents are stored as ordinary children of the template
    /// element, so queries and serialization both see them.
    pub fn parse(html: &str) -> Self {
        let dom = parse_document(RcDom::default(), ParseOpts::default()).one(html);
        hoist_template_contents(&dom.document);
        Self { dom }
    }

    /// The document node (parent of doctype and `<html>`).
    pub fn root(&self) -> &Handle {
        &self.dom.document
    }

    /// First element with the given tag name, in document order.
    pub fn find_element(&self, tag: &str) -> Option<Handle> {
        elements_by_tag(self.root(), tag).into_iter().next()
    }

    /// Append a node as the last child of the document node.
    pub fn append_to_root(&self, node: Handle) {
        append_child(self.root(), node);
    }

    /// Serialize the whole tree back to HTML.
    pub fn to_html(&self) -> String {
        let mut out = Vec::new();
        let handle = SerializableHandle::from(self.dom.document.clone());
        // Writing into a Vec<u8> cannot fail.
        serialize(&mut out, &handle, SerializeOpts::default()).ok();
        match String::from_utf8(out) {
            Ok(html) => html,
            Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
        }
    }
}

// =============================================================================
// Node construction
// =============================================================================

fn html_name(tag: &str) -> QualName {
    QualName::new(None, Namespace::from(HTML_NAMESPACE), LocalName::from(tag))
}

fn attr_name(name: &str) -> QualName {
    QualName::new(None, Namespace::from(""), LocalName::from(name))
}

/// Create a detached HTML element.
pub fn new_element(tag: &str, attrs: Vec<Attribute>) -> Handle {
    Node::new(NodeData::Element {
        name: html_name(tag),
        attrs: RefCell::new(attrs),
        template_contents: RefCell::new(None),
        mathml_annotation_xml_integration_point: false,
    })
}

/// Create a detached text node.
pub fn new_text(text: &str) -> Handle {
    Node::new(NodeData::Text {
        contents: RefCell::new(StrTendril::from(text)),
    })
}

/// Build an attribute in the null namespace.
pub fn attribute(name: &str, value: &str) -> Attribute {
    Attribute {
        name: attr_name(name),
        value: StrTendril::from(value),
    }
}

// =============================================================================
// Queries
// =============================================================================

/// Local tag name of an element node.
pub fn tag_name(node: &Handle) -> Option<&str> {
    match &node.data {
        NodeData::Element { name, .. } => Some(&*name.local),
        _ => None,
    }
}

#[inline]
pub fn is_tag(node: &Handle, tag: &str) -> bool {
    tag_name(node) == Some(tag)
}

/// Collect every element named `tag` under `root`, in document order.
///
/// The result is a snapshot: callers may replace or detach the returned
/// nodes without affecting which nodes are visited. Walks with an explicit
/// stack, so nesting depth is bounded only by memory.
pub fn elements_by_tag(root: &Handle, tag: &str) -> Vec<Handle> {
    let mut found = Vec::new();
    let mut stack = vec![root.clone()];
    while let Some(node) = stack.pop() {
        if is_tag(&node, tag) {
            found.push(node.clone());
        }
        // Reversed so the first child is popped next
        stack.extend(node.children.borrow().iter().rev().cloned());
    }
    found
}

/// Attribute value, `None` when the attribute is absent.
pub fn get_attr(node: &Handle, name: &str) -> Option<String> {
    let NodeData::Element { attrs, .. } = &node.data else {
        return None;
    };
    attrs
        .borrow()
        .iter()
        .find(|attr| &*attr.name.local == name)
        .map(|attr| attr.value.to_string())
}

pub fn has_attr(node: &Handle, name: &str) -> bool {
    let NodeData::Element { attrs, .. } = &node.data else {
        return false;
    };
    attrs.borrow().iter().any(|attr| &*attr.name.local == name)
}

/// Snapshot of all attributes as `(name, value)` pairs.
pub fn attrs_of(node: &Handle) -> Vec<(String, String)> {
    let NodeData::Element { attrs, .. } = &node.data else {
        return Vec::new();
    };
    attrs
        .borrow()
        .iter()
        .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
        .collect()
}

/// Set an attribute, overwriting in place or appending when absent.
pub fn set_attr(node: &Handle, name: &str, value: &str) {
    let NodeData::Element { attrs, .. } = &node.data else {
        return;
    };
    let mut attrs = attrs.borrow_mut();
    match attrs.iter_mut().find(|attr| &*attr.name.local == name) {
        Some(attr) => attr.value = StrTendril::from(value),
        None => attrs.push(attribute(name, value)),
    }
}

/// Concatenated text of all descendant text nodes.
pub fn text_content(node: &Handle) -> String {
    let mut text = String::new();
    let mut stack = vec![node.clone()];
    while let Some(current) = stack.pop() {
        if let NodeData::Text { contents } = &current.data {
            text.push_str(&contents.borrow());
        }
        stack.extend(current.children.borrow().iter().rev().cloned());
    }
    text
}

// =============================================================================
// Mutation
// =============================================================================

/// Parent of a node, if it is attached.
pub fn parent_of(node: &Handle) -> Option<Handle> {
    let weak = node.parent.take()?;
    let parent = weak.upgrade();
    node.parent.set(Some(weak));
    parent
}

pub fn append_child(parent: &Handle, child: Handle) {
    child.parent.set(Some(Rc::downgrade(parent)));
    parent.children.borrow_mut().push(child);
}

/// Move all children of `from` to the end of `to`.
pub fn move_children(from: &Handle, to: &Handle) {
    let children = std::mem::take(&mut *from.children.borrow_mut());
    for child in children {
        append_child(to, child);
    }
}

/// Move every template's content fragment under the template element.
///
/// html5ever parks template children in `template_contents`, which the rcdom
/// serializer never writes.
fn hoist_template_contents(root: &Handle) {
    let mut stack = vec![root.clone()];
    while let Some(node) = stack.pop() {
        if let NodeData::Element {
            template_contents, ..
        } = &node.data
        {
            let contents = template_contents.borrow_mut().take();
            if let Some(contents) = contents {
                move_children(&contents, &node);
            }
        }
        stack.extend(node.children.borrow().iter().cloned());
    }
}

/// Put `new` where `old` is in its parent's child list.
///
/// Returns `false` (and leaves the tree unchanged) when `old` is detached.
pub fn replace_node(old: &Handle, new: Handle) -> bool {
    let Some(parent) = parent_of(old) else {
        return false;
    };
    let mut children = parent.children.borrow_mut();
    let Some(index) = children.iter().position(|child| Rc::ptr_eq(child, old)) else {
        return false;
    };

    new.parent.set(Some(Rc::downgrade(&parent)));
    old.parent.set(None);
    children[index] = new;
    true
}

// =============================================================================
// Tests
// =============================================================================
