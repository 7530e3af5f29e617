//! vasset - combine, minify and serve JS/CSS bundles.

use anyhow::Result;
use clap::{ColorChoice, Parser};
use vasset::{
    bundler::Bundler,
    cli::{self, Cli, Commands},
    config::BundleConfig,
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

    let config = if cli.needs_config() {
        BundleConfig::load(&cli)?
    } else {
        BundleConfig::default()
    };
    run(&cli.command, &config)
}

fn run(command: &Commands, config: &BundleConfig) -> Result<()> {
    match command {
        Commands::Serve { .. } => cli::serve::serve(config),
        Commands::Bundle {
            ty,
            position,
            print,
            files,
        } => {
            let bundler = Bundler::from_config(config)?;
            cli::bundle::run_bundle(&bundler, *ty, *position, *print, files)
        }
        Commands::Group { id } => {
            let bundler = Bundler::from_config(config)?;
            cli::group::show_group(&bundler, id)
        }
        Commands::Config => {
            println!("{}", BundleConfig::template());
            Ok(())
        }
    }
}
