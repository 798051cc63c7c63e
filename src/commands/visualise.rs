//! Visualise command handler

use anyhow::{Context, Result};

use definition_factory::application::{load_graph, render_graph, source_root_for};
use definition_factory::infrastructure::fs::write_atomic;
use definition_factory::presentation::VisualiseCommand;

use super::Session;

pub fn cmd_visualise(session: &Session, command: VisualiseCommand) -> Result<()> {
    let args = command.args();
    let target = session.source_path(args.source_path.as_deref())?;
    let root = source_root_for(&target, session.configured_root());

    let graph = load_graph(session.source(), &root, session.extension(), &target)?;
    let rendered = render_graph(&graph, command.view())?;

    match &args.output_file {
        Some(path) => {
            write_atomic(path, rendered.as_bytes())
                .with_context(|| format!("failed to write {}", path.display()))?;
            if !session.json {
                println!(
                    "✓ {} models, {} requires written to {}",
                    graph.node_count(),
                    graph.edge_count(),
                    path.display()
                );
            }
        }
        None => print!("{}", rendered),
    }
    Ok(())
}
