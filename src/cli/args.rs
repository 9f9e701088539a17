//! Command line argument definitions.

use std::net::IpAddr;
use std::path::PathBuf;

use clap::{ArgAction, Args, ColorChoice, Parser, Subcommand, ValueEnum};

/// Front-end asset pipeline: compiles, bundles and serves web projects.
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Cli {
    /// Color output control
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Path to the configuration file
    #[arg(short = 'C', long, global = true, default_value = "aspen.toml")]
    pub config: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl Cli {
    /// Effective command. A bare invocation runs a clean production
    /// build, the traditional default for asset pipelines.
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Build {
            build_args: BuildArgs {
                clean: true,
                minify: None,
                verbose: false,
            },
        })
    }

    pub fn is_serve(&self) -> bool {
        matches!(self.command(), Commands::Serve { .. })
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Build the project into the dist directory
    #[command(visible_alias = "b")]
    Build {
        #[command(flatten)]
        build_args: BuildArgs,
    },

    /// Start the development server
    #[command(visible_alias = "s")]
    Serve {
        #[command(flatten)]
        serve_args: ServeArgs,
    },

    /// Remove the staging and dist directories
    Clean,

    /// Inject vendor references into pages and style entry points
    Inject,
}

#[derive(Args, Debug, Clone)]
pub struct BuildArgs {
    /// Remove staging and dist before building
    #[arg(short, long)]
    pub clean: bool,

    /// Minify bundled output (overrides config)
    #[arg(
        long,
        action = ArgAction::Set,
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    pub minify: Option<bool>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// What to serve
    #[arg(value_enum, default_value_t = ServeTarget::Dev)]
    pub target: ServeTarget,

    /// Interface to bind to (overrides config)
    #[arg(short, long)]
    pub interface: Option<IpAddr>,

    /// Port to bind to (overrides config)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Watch sources and reload browsers on change (overrides config)
    #[arg(
        short,
        long,
        action = ArgAction::Set,
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    pub watch: Option<bool>,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,
}

/// Which tree the development server exposes.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ServeTarget {
    /// Staging and sources with vendor packages (default)
    #[default]
    Dev,
    /// The built dist directory
    Dist,
    /// The test harness directory
    Test,
}

impl ServeTarget {
    pub fn label(self) -> &'static str {
        match self {
            Self::Dev => "dev",
            Self::Dist => "dist",
            Self::Test => "test",
        }
    }
}
