use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::application::{AnalysisKind, GraphView};
use crate::infrastructure::codegen::OutputFormat;

/// defactory - resolves inheriting data-model definitions
#[derive(Parser, Debug)]
#[command(name = "defactory")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Emit NDJSON events instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file (default: ./defactory.toml, then the user config)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Write logs to FILE instead of stderr
    #[arg(long, global = true, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve definitions and write them as one module
    Generate {
        /// Source root that `require` references resolve against
        #[arg(long, value_name = "DIR")]
        source_path: Option<PathBuf>,

        /// Definitions to generate (default: every definition under the source root)
        #[arg(long, num_args = 1.., value_name = "FILE")]
        definitions: Vec<PathBuf>,

        /// Module to write (.py, .json, .yaml)
        #[arg(long, value_name = "FILE")]
        output_file: Option<PathBuf>,

        /// Rebuild the module instead of updating the definitions it holds
        #[arg(long)]
        reset_definitions: bool,

        /// Output format (default: from the output file extension)
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,

        /// Variable the Python module assigns
        #[arg(long)]
        variable: Option<String>,
    },

    /// Show a definition file or look into a generated module
    Inspect {
        #[command(subcommand)]
        command: InspectCommand,
    },

    /// Render the require graph
    #[command(alias = "visualize")]
    Visualise {
        #[command(subcommand)]
        command: VisualiseCommand,
    },

    /// Analyse the require graph
    #[command(alias = "analyze")]
    Analyse {
        #[command(subcommand)]
        command: AnalyseCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum InspectCommand {
    /// Print a definition file, optionally resolved
    YamlFile {
        path: PathBuf,

        /// Resolve `require` chains before printing
        #[arg(long)]
        resolve: bool,

        /// Source root for --resolve (default: config, else the file's directory)
        #[arg(long, value_name = "DIR")]
        source_path: Option<PathBuf>,
    },

    /// Look into a generated definitions module
    PythonDictionary {
        path: PathBuf,

        /// Definition to show (default: list the names)
        #[arg(long)]
        definition: Option<String>,

        /// Attribute of the definition; dotted paths reach into sections
        #[arg(long, requires = "definition")]
        attribute: Option<String>,

        /// Module format (default: from the file extension)
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },
}

#[derive(Args, Debug, Clone)]
pub struct GraphArgs {
    /// Definition file or directory (default: the configured source path)
    #[arg(long, value_name = "DIR")]
    pub source_path: Option<PathBuf>,

    /// Write to FILE instead of stdout
    #[arg(long, value_name = "FILE")]
    pub output_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum VisualiseCommand {
    /// Graphviz DOT
    Graph(GraphArgs),
    /// Graphviz DOT with node colours, tooltips and edge categories
    GraphX(GraphArgs),
    /// Node-link JSON
    GraphXx(GraphArgs),
    /// Graphviz DOT ranked by require depth
    HierarchicalGraph(GraphArgs),
}

impl VisualiseCommand {
    pub fn view(&self) -> GraphView {
        match self {
            VisualiseCommand::Graph(_) => GraphView::Graph,
            VisualiseCommand::GraphX(_) => GraphView::Attributed,
            VisualiseCommand::GraphXx(_) => GraphView::NodeLink,
            VisualiseCommand::HierarchicalGraph(_) => GraphView::Hierarchical,
        }
    }

    pub fn args(&self) -> &GraphArgs {
        match self {
            VisualiseCommand::Graph(args)
            | VisualiseCommand::GraphX(args)
            | VisualiseCommand::GraphXx(args)
            | VisualiseCommand::HierarchicalGraph(args) => args,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Definition file or directory (default: the configured source path)
    #[arg(long, value_name = "DIR")]
    pub source_path: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum AnalyseCommand {
    /// Size, density and whether the graph is acyclic
    Graph(SourceArgs),
    /// Require cycles and the components they form
    Cycles(SourceArgs),
    /// Roots, leaves, dependency order and the longest chain
    Structure(SourceArgs),
    /// Degree, betweenness and PageRank
    Centrality(SourceArgs),
    /// Average shortest path in the largest strongly connected component
    PathLength(SourceArgs),
}

impl AnalyseCommand {
    pub fn kind(&self) -> AnalysisKind {
        match self {
            AnalyseCommand::Graph(_) => AnalysisKind::Graph,
            AnalyseCommand::Cycles(_) => AnalysisKind::Cycles,
            AnalyseCommand::Structure(_) => AnalysisKind::Structure,
            AnalyseCommand::Centrality(_) => AnalysisKind::Centrality,
            AnalyseCommand::PathLength(_) => AnalysisKind::PathLength,
        }
    }

    pub fn args(&self) -> &SourceArgs {
        match self {
            AnalyseCommand::Graph(args)
            | AnalyseCommand::Cycles(args)
            | AnalyseCommand::Structure(args)
            | AnalyseCommand::Centrality(args)
            | AnalyseCommand::PathLength(args) => args,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn generate_accepts_several_definitions() {
        let cli = Cli::try_parse_from([
            "defactory",
            "generate",
            "--source-path",
            "defs",
            "--definitions",
            "defs/a.yaml",
            "defs/b.yaml",
            "--output-file",
            "out.py",
            "--reset-definitions",
        ])
        .unwrap();

        let Commands::Generate {
            definitions,
            reset_definitions,
            ..
        } = cli.command
        else {
            panic!("expected generate");
        };
        assert_eq!(definitions.len(), 2);
        assert!(reset_definitions);
    }

    #[test]
    fn visualise_subcommands_use_kebab_case() {
        let cli = Cli::try_parse_from(["defactory", "visualise", "graph-xx", "--source-path", "d"])
            .unwrap();

        let Commands::Visualise { command } = cli.command else {
            panic!("expected visualise");
        };
        assert_eq!(command.view(), GraphView::NodeLink);
    }

    #[test]
    fn analyse_path_length_parses() {
        let cli = Cli::try_parse_from(["defactory", "--json", "analyse", "path-length"]).unwrap();

        assert!(cli.json);
        let Commands::Analyse { command } = cli.command else {
            panic!("expected analyse");
        };
        assert_eq!(command.kind(), AnalysisKind::PathLength);
    }

    #[test]
    fn attribute_requires_definition() {
        let result = Cli::try_parse_from([
            "defactory",
            "inspect",
            "python-dictionary",
            "out.py",
            "--attribute",
            "label",
        ]);
        assert!(result.is_err());
    }
}
