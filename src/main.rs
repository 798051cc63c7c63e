//! defactory CLI - resolves inheriting data-model definitions
//!
//! Usage: defactory <COMMAND>
//!
//! Commands:
//!   generate   Resolve definitions and write them as one module
//!   inspect    Show a definition file or look into a generated module
//!   visualise  Render the require graph
//!   analyse    Analyse the require graph

mod commands;

use anyhow::Result;
use clap::Parser;

use definition_factory::presentation::{Cli, Commands};

use commands::generate::GenerateArgs;
use commands::Session;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let session = Session::start(&cli)?;

    match cli.command {
        Commands::Generate {
            source_path,
            definitions,
            output_file,
            reset_definitions,
            format,
            variable,
        } => commands::generate::cmd_generate(
            &session,
            GenerateArgs {
                source_path,
                definitions,
                output_file,
                reset_definitions,
                format,
                variable,
            },
        ),
        Commands::Inspect { command } => commands::inspect::cmd_inspect(&session, command),
        Commands::Visualise { command } => commands::visualise::cmd_visualise(&session, command),
        Commands::Analyse { command } => commands::analyse::cmd_analyse(&session, command),
    }
}
