pub mod json;
pub mod pretty;

use crate::common::prettify::prettify;
use crate::common::sourcemap::SourceMap;
use crate::syntax::tree::Block;
use json::JsonExporter;
use std::fmt;
use std::io::Write;
use std::str::FromStr;

/// Supported renderings of a desugared tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Groovy-like surface syntax
    Pretty,
    /// The JSON interchange format
    Json,
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pretty" | "text" => Ok(ExportFormat::Pretty),
            "json" => Ok(ExportFormat::Json),
            _ => Err(format!("unknown export format {s}")),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Pretty => write!(f, "pretty"),
            ExportFormat::Json => write!(f, "json"),
        }
    }
}

/// Write the tree to `output` in the format specified
pub fn export_tree<W: Write>(
    format: ExportFormat,
    output: &mut W,
    source_map: &SourceMap,
    source: Option<&str>,
    body: &Block,
) -> Result<(), std::io::Error> {
    match format {
        ExportFormat::Pretty => write!(output, "{}", prettify(body)),
        ExportFormat::Json => JsonExporter::new(source_map).write(output, source, body),
    }
}
