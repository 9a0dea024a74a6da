//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Rewrite `<img>` elements in rendered HTML to lazy-loaded form
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: lazyload.toml)
    #[arg(short = 'C', long, global = true, default_value = "lazyload.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Rewrite a single HTML document
    #[command(visible_alias = "r")]
    Rewrite {
        /// Input HTML file, `-` or omitted for stdin
        #[arg(value_hint = clap::ValueHint::FilePath)]
        input: Option<PathBuf>,

        /// Write output to file instead of stdout
        #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
        output: Option<PathBuf>,

        #[command(flatten)]
        urls: UrlArgs,
    },

    /// Rewrite every HTML page of a built site in place
    #[command(visible_alias = "s")]
    Site {
        /// Root directory of the built site
        #[arg(value_hint = clap::ValueHint::DirPath)]
        dir: PathBuf,

        #[command(flatten)]
        urls: UrlArgs,

        /// Report what would change without writing files
        #[arg(short, long)]
        dry: bool,
    },

    /// Write a starter lazyload.toml
    #[command(visible_alias = "i")]
    Init {
        /// Overwrite an existing config file
        #[arg(short, long)]
        force: bool,
    },
}

/// URL overrides shared by Rewrite and Site commands
#[derive(clap::Args, Debug, Clone, Default)]
pub struct UrlArgs {
    /// Placeholder image URL (overrides `lazyload.placeholder_url`)
    #[arg(short, long, value_hint = clap::ValueHint::Url)]
    pub placeholder: Option<String>,

    /// Lazy-load client script URL (overrides `lazyload.script_url`)
    #[arg(short = 'S', long = "script-url", value_hint = clap::ValueHint::Url)]
    pub script_url: Option<String>,
}
