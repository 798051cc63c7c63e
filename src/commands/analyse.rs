//! Analyse command handler

use anyhow::Result;

use definition_factory::application::{analyse, load_graph, source_root_for};
use definition_factory::presentation::output;
use definition_factory::presentation::AnalyseCommand;

use super::Session;

pub fn cmd_analyse(session: &Session, command: AnalyseCommand) -> Result<()> {
    let target = session.source_path(command.args().source_path.as_deref())?;
    let root = source_root_for(&target, session.configured_root());

    let graph = load_graph(session.source(), &root, session.extension(), &target)?;
    let report = analyse(&graph, command.kind());

    if session.json {
        let mut event = serde_json::to_value(&report)?;
        if let Some(fields) = event.as_object_mut() {
            fields.insert("event".to_string(), "data".into());
            fields.insert("command".to_string(), "analyse".into());
        }
        output::emit(event)?;
    } else {
        print!("{}", output::render_analysis_text(&report));
    }
    Ok(())
}
