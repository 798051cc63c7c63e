//! Presentation Layer
//!
//! This layer handles:
//! - CLI argument parsing (via clap)
//! - Output formatting (text/NDJSON)
//!
//! ## Structure
//!
//! - `cli` - Command line definition
//! - `output` - Text renderers and NDJSON events

pub mod cli;
pub mod output;

pub use cli::{
    AnalyseCommand, Cli, Commands, GraphArgs, InspectCommand, SourceArgs, VisualiseCommand,
};
