//! Output Rendering
//!
//! Text for terminals and NDJSON events (one JSON object per line) for
//! scripts.

use std::fmt::Write as _;
use std::io::{self, Write};

use serde_json::json;

use crate::application::{AnalysisReport, GenerateResult, InspectedDefinition, ModuleInspection};
use crate::domain::value::Value;
use crate::domain::value_objects::{ConfigWarning, ResolutionWarning};
use crate::error::FactoryResult;

/// Write a single NDJSON event.
pub fn write_event(out: &mut impl Write, event: &serde_json::Value) -> io::Result<()> {
    serde_json::to_writer(&mut *out, event)?;
    out.write_all(b"\n")?;
    Ok(())
}

/// Convenience helper that writes to stdout.
pub fn emit(event: serde_json::Value) -> io::Result<()> {
    let mut out = io::stdout().lock();
    write_event(&mut out, &event)
}

pub fn warning_event(command: &str, warning: &ResolutionWarning) -> serde_json::Value {
    json!({
        "event": "warning",
        "command": command,
        "code": warning.code(),
        "path": warning.path().to_string(),
        "message": warning.to_string(),
    })
}

pub fn config_warning_event(warning: &ConfigWarning) -> serde_json::Value {
    json!({
        "event": "warning",
        "code": "unknown_config_key",
        "key": warning.key,
        "file": warning.file.display().to_string(),
        "line": warning.line,
        "suggestion": warning.suggestion,
    })
}

/// Events for a generate run: warnings, one error per failed model, then a
/// closing summary.
pub fn generate_events(result: &GenerateResult) -> Vec<serde_json::Value> {
    let mut events: Vec<serde_json::Value> = result
        .warnings
        .iter()
        .map(|warning| warning_event("generate", warning))
        .collect();
    events.extend(result.failures.iter().map(|failure| {
        json!({
            "event": "error",
            "command": "generate",
            "path": failure.path.display().to_string(),
            "message": failure.error.to_string(),
        })
    }));
    events.push(json!({
        "event": "complete",
        "command": "generate",
        "output": result.output.display().to_string(),
        "format": result.format.as_str(),
        "generated": result.generated,
        "definitions": result.module_size,
        "failed": result.failures.len(),
        "success": result.is_success(),
    }));
    events
}

pub fn render_generate_text(result: &GenerateResult) -> String {
    let mut out = String::new();
    for failure in &result.failures {
        let _ = writeln!(out, "✗ {}: {}", failure.path.display(), failure.error);
    }
    let _ = writeln!(
        out,
        "✓ {} of {} definitions written to {} ({}, {} in module)",
        result.generated.len(),
        result.total(),
        result.output.display(),
        result.format,
        result.module_size
    );
    out
}

/// YAML text of a value, as `inspect` prints it.
pub fn render_value_yaml(value: &Value) -> FactoryResult<String> {
    Ok(serde_yaml_ng::to_string(value)?)
}

pub fn render_definition_text(definition: &InspectedDefinition) -> FactoryResult<String> {
    let mut out = format!("# {} ({})\n", definition.name, definition.path.display());
    out.push_str(&render_value_yaml(&Value::Mapping(definition.body.clone()))?);
    Ok(out)
}

pub fn render_inspection_text(inspection: &ModuleInspection) -> FactoryResult<String> {
    match inspection {
        ModuleInspection::Names { names } => {
            let mut out = String::new();
            for name in names {
                out.push_str(name);
                out.push('\n');
            }
            Ok(out)
        }
        ModuleInspection::Definition { body, .. } => render_value_yaml(body),
        ModuleInspection::Attribute { value, .. } => match value {
            Value::Scalar(scalar) => Ok(format!("{}\n", scalar)),
            other => render_value_yaml(other),
        },
    }
}

pub fn render_analysis_text(report: &AnalysisReport) -> String {
    let mut out = String::new();
    match report {
        AnalysisReport::Graph {
            nodes,
            edges,
            density,
            is_dag,
            warnings,
        } => {
            let _ = writeln!(out, "Nodes:    {}", nodes);
            let _ = writeln!(out, "Edges:    {}", edges);
            let _ = writeln!(out, "Density:  {:.4}", density);
            let _ = writeln!(out, "Acyclic:  {}", if *is_dag { "yes" } else { "no" });
            for warning in warnings {
                let _ = writeln!(out, "⚠ {}", warning);
            }
        }
        AnalysisReport::Cycles { cycles, components } => {
            if cycles.is_empty() {
                out.push_str("No cycles.\n");
            }
            for cycle in cycles {
                let mut names = cycle.clone();
                if let Some(first) = cycle.first() {
                    names.push(first.clone());
                }
                let _ = writeln!(out, "cycle: {}", names.join(" -> "));
            }
            for component in components {
                let _ = writeln!(out, "component: {}", component.join(", "));
            }
        }
        AnalysisReport::Structure {
            leaves,
            roots,
            topological_order,
            longest_path,
        } => {
            let _ = writeln!(out, "Roots:  {}", roots.join(", "));
            let _ = writeln!(out, "Leaves: {}", leaves.join(", "));
            match topological_order {
                Some(order) => {
                    let _ = writeln!(out, "Order:  {}", order.join(" -> "));
                }
                None => out.push_str("Order:  (cyclic)\n"),
            }
            if let Some(path) = longest_path {
                let _ = writeln!(out, "Longest chain ({}): {}", path.len(), path.join(" -> "));
            }
        }
        AnalysisReport::Centrality {
            in_degree,
            out_degree,
            betweenness,
            pagerank,
        } => {
            push_ranking(&mut out, "In-degree", in_degree, |v| v.to_string());
            push_ranking(&mut out, "Out-degree", out_degree, |v| v.to_string());
            push_ranking(&mut out, "Betweenness", betweenness, |v| format!("{:.4}", v));
            push_ranking(&mut out, "PageRank", pagerank, |v| format!("{:.4}", v));
        }
        AnalysisReport::PathLength {
            component_size,
            average_shortest_path,
        } => {
            let _ = writeln!(out, "Largest component: {} models", component_size);
            let _ = writeln!(out, "Average shortest path: {:.4}", average_shortest_path);
        }
    }
    out
}

fn push_ranking<T>(
    out: &mut String,
    title: &str,
    ranking: &[(String, T)],
    show: impl Fn(&T) -> String,
) {
    let _ = writeln!(out, "{}:", title);
    for (name, value) in ranking {
        let _ = writeln!(out, "  {:<32} {}", name, show(value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::CanonicalPath;

    #[test]
    fn events_are_one_object_per_line() {
        let mut out = Vec::new();
        write_event(&mut out, &json!({"event": "a"})).unwrap();
        write_event(&mut out, &json!({"event": "b"})).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "{\"event\":\"a\"}\n{\"event\":\"b\"}\n");
    }

    #[test]
    fn warning_event_carries_code() {
        let warning = ResolutionWarning::CircularRequire {
            path: CanonicalPath::new("defs/a.yaml"),
            required_by: CanonicalPath::new("defs/b.yaml"),
        };

        let event = warning_event("generate", &warning);

        assert_eq!(event["code"], "circular_require");
        assert_eq!(event["path"], "defs/a.yaml");
    }

    #[test]
    fn cycles_render_closed() {
        let report = AnalysisReport::Cycles {
            cycles: vec![vec!["A".to_string(), "B".to_string()]],
            components: vec![],
        };

        insta::assert_snapshot!(render_analysis_text(&report).trim_end(), @"cycle: A -> B -> A");
    }

    #[test]
    fn scalar_attributes_print_bare() {
        let inspection = ModuleInspection::Attribute {
            definition: "Leaf".to_string(),
            attribute: "unit".to_string(),
            value: Value::string("W"),
        };

        assert_eq!(render_inspection_text(&inspection).unwrap(), "W\n");
    }
}
