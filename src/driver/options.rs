//! Command line argument handling with structopt

use crate::export::ExportFormat;
use std::path::{Path, PathBuf};
use structopt::StructOpt;

/// procsugar - desugar process definitions in a DSL syntax tree
#[derive(StructOpt, Debug, Clone)]
#[structopt(name = "procsugar")]
pub struct ProcsugarOptions {
    /// Treat calls to KEYWORD as process definitions (in addition to
    /// configured keywords)
    #[structopt(short = "k", long = "keyword", number_of_values = 1)]
    pub keywords: Vec<String>,

    /// Settings file (default: nearest procsugar.toml)
    #[structopt(short = "c", long = "config", parse(from_os_str))]
    pub config: Option<PathBuf>,

    /// Batch mode (ignore procsugar.toml and ~/.procsugar.toml)
    #[structopt(short = "B", long = "batch")]
    pub batch: bool,

    /// DSL source text, used to label diagnostics
    #[structopt(short = "s", long = "source", parse(from_os_str))]
    pub source: Option<PathBuf>,

    /// Interchange format of the input tree
    #[structopt(short = "f", long = "format", default_value = "json")]
    pub format: String,

    /// Format to export output in (pretty, json)
    #[structopt(short = "x", long = "export", default_value = "pretty")]
    pub export: ExportFormat,

    /// Output file to export to
    #[structopt(short = "o", long = "output", parse(from_os_str))]
    pub output: Option<PathBuf>,

    /// Print statistics to stderr before exiting
    #[structopt(short = "S", long = "statistics")]
    pub statistics: bool,

    /// Syntax tree to desugar ("-" for stdin)
    #[structopt(name = "TREE", parse(from_os_str))]
    pub tree: PathBuf,
}

impl ProcsugarOptions {
    pub fn from_args() -> Self {
        <Self as StructOpt>::from_args()
    }

    /// Options for processing `tree` with all defaults
    pub fn for_tree<P: AsRef<Path>>(tree: P) -> Self {
        ProcsugarOptions {
            keywords: vec![],
            config: None,
            batch: false,
            source: None,
            format: "json".to_string(),
            export: ExportFormat::Pretty,
            output: None,
            statistics: false,
            tree: tree.as_ref().to_path_buf(),
        }
    }

    pub fn with_keyword<S: Into<String>>(mut self, keyword: S) -> Self {
        self.keywords.push(keyword.into());
        self
    }

    pub fn with_config<P: AsRef<Path>>(mut self, config: P) -> Self {
        self.config = Some(config.as_ref().to_path_buf());
        self
    }

    pub fn with_source<P: AsRef<Path>>(mut self, source: P) -> Self {
        self.source = Some(source.as_ref().to_path_buf());
        self
    }

    pub fn with_export(mut self, export: ExportFormat) -> Self {
        self.export = export;
        self
    }

    pub fn with_output<P: AsRef<Path>>(mut self, output: P) -> Self {
        self.output = Some(output.as_ref().to_path_buf());
        self
    }

    pub fn batch(mut self) -> Self {
        self.batch = true;
        self
    }

    /// True if the tree is read from stdin
    pub fn reads_stdin(&self) -> bool {
        self.tree.as_os_str() == "-"
    }
}
