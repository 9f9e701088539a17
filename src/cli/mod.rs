//! Command line interface.
//!
//! `args` defines the clap surface; `build` and `serve` implement the
//! two long-running commands. `clean` and `inject` are thin enough to
//! dispatch straight to their tasks from `main`.

mod args;
pub mod build;
pub mod serve;

pub use args::{BuildArgs, Cli, Commands, ServeArgs, ServeTarget};
