//! lazyload - lazy-load images in rendered HTML.

use anyhow::Result;
use clap::{ColorChoice, Parser};
use lazyload::{
    cli::{self, Cli, Commands},
    config::LazyloadConfig,
    logger,
};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    match &cli.command {
        Commands::Init { force } => cli::init::write_config(&cli.config, *force),
        Commands::Rewrite {
            input,
            output,
            urls,
        } => {
            let config = LazyloadConfig::load(&cli, urls)?;
            cli::rewrite::rewrite_document(input.as_deref(), output.as_deref(), &config)
        }
        Commands::Site { dir, urls, dry } => {
            let config = LazyloadConfig::load(&cli, urls)?;
            cli::site::rewrite_site(dir, &config, *dry).map(|_| ())
        }
    }
}
