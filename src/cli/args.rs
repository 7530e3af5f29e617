//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

use crate::asset::AssetType;
use crate::registry::Position;

/// Asset grouping cache: combine, minify and serve JS/CSS bundles
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: vasset.toml)
    #[arg(short = 'C', long, global = true, default_value = "vasset.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minify bundles (overrides `build.minify`)
    #[arg(short, long, global = true, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub minify: Option<bool>,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Serve bundles from the asset endpoint
    #[command(visible_alias = "s")]
    Serve {
        /// Network interface to bind (e.g., 127.0.0.1, 0.0.0.0)
        #[arg(short, long)]
        interface: Option<std::net::IpAddr>,

        /// Port number to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Create a group from files and print the URL pages would link to
    #[command(visible_alias = "b")]
    Bundle {
        /// Asset type (js, css)
        #[arg(short = 't', long = "type")]
        ty: AssetType,

        /// Script position (head, begin, end, css)
        #[arg(short, long, default_value = "end")]
        position: Position,

        /// Print the combined source instead of the URL
        #[arg(long)]
        print: bool,

        /// Source files, in concatenation order
        #[arg(required = true, value_hint = clap::ValueHint::FilePath)]
        files: Vec<PathBuf>,
    },

    /// Show the files of a stored group
    #[command(visible_alias = "g")]
    Group {
        /// Group id
        id: String,
    },

    /// Print a commented configuration template
    Config,
}

impl Cli {
    pub const fn is_serve(&self) -> bool {
        matches!(self.command, Commands::Serve { .. })
    }

    /// Commands that run without loading a config file.
    pub const fn needs_config(&self) -> bool {
        !matches!(self.command, Commands::Config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bundle() {
        let cli = Cli::try_parse_from(["vasset", "bundle", "-t", "css", "a.css", "b.css"]).unwrap();
        match cli.command {
            Commands::Bundle {
                ty,
                position,
                print,
                files,
            } => {
                assert_eq!(ty, AssetType::Css);
                assert_eq!(position, Position::End);
                assert!(!print);
                assert_eq!(files, [PathBuf::from("a.css"), PathBuf::from("b.css")]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_bundle_rejects_unknown_type() {
        assert!(Cli::try_parse_from(["vasset", "bundle", "-t", "png", "a.png"]).is_err());
        assert!(Cli::try_parse_from(["vasset", "bundle", "-t", "js"]).is_err());
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::try_parse_from(["vasset", "serve", "-p", "8080", "--minify", "false", "-v"])
            .unwrap();
        assert!(cli.is_serve());
        assert!(cli.verbose);
        assert_eq!(cli.minify, Some(false));
        assert!(matches!(cli.command, Commands::Serve { port: Some(8080), .. }));
        assert_eq!(cli.config, PathBuf::from("vasset.toml"));
    }

    #[test]
    fn test_config_needs_no_file() {
        let cli = Cli::try_parse_from(["vasset", "config"]).unwrap();
        assert!(!cli.needs_config());
    }
}
