//! Errors encountered during desugaring
use crate::common::sourcemap::{HasSmid, Smid, SourceMap};
use codespan_reporting::diagnostic::Diagnostic;
use thiserror::Error;

/// A tree shape the pass cannot make sense of. These indicate a
/// mismatch between the host parser's output and what the pass
/// expects and abort the pass.
#[derive(Eq, PartialEq, Debug, Clone, Error)]
pub enum DesugarError {
    #[error("malformed {1} definition: expected a single call argument naming the {1}")]
    MalformedDefinition(Smid, String),
}

impl HasSmid for DesugarError {
    fn smid(&self) -> Smid {
        match *self {
            DesugarError::MalformedDefinition(s, _) => s,
        }
    }
}

impl DesugarError {
    pub fn to_diagnostic(&self, source_map: &SourceMap) -> Diagnostic<usize> {
        source_map.diagnostic(self).with_notes(vec![
            "the syntax tree does not have the shape the desugaring pass expects".to_string(),
        ])
    }
}

/// Problems with a definition's script. Reported through the
/// diagnostic channel; the pass carries on with the next definition.
#[derive(Eq, PartialEq, Debug, Clone, Error)]
pub enum ScriptError {
    /// The last statement is neither a string nor a thunk
    #[error("process must terminate with a quoted script expression or explicit exec/script section")]
    NoScript(Smid),
    /// The definition block has no statements at all
    #[error("process must terminate with a quoted script expression or explicit exec/script section")]
    EmptyDefinition(Smid),
    /// The definition has no trailing block
    #[error("process {1} has no body")]
    MissingBody(Smid, String),
}

impl HasSmid for ScriptError {
    fn smid(&self) -> Smid {
        match *self {
            ScriptError::NoScript(s) => s,
            ScriptError::EmptyDefinition(s) => s,
            ScriptError::MissingBody(s, _) => s,
        }
    }
}

impl ScriptError {
    pub fn to_diagnostic(&self, source_map: &SourceMap) -> Diagnostic<usize> {
        source_map.diagnostic(self)
    }
}
