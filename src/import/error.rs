//! `ImportError` covers trees handed over in a shape the reader does
//! not understand
use codespan_reporting::diagnostic::Diagnostic;
use thiserror::Error;

/// Problems reading the JSON interchange format. Each carries the
/// JSON path of the offending node (e.g. `$.statements[2].expr`).
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("invalid json: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("expected {1} at {0}")]
    UnexpectedShape(String, &'static str),
    #[error("missing field '{1}' at {0}")]
    MissingField(String, &'static str),
    #[error("unknown {1} kind '{2}' at {0}")]
    UnknownKind(String, &'static str, String),
    #[error("unknown operator '{1}' at {0}")]
    UnknownOperator(String, String),
    #[error("unknown tree format {0}")]
    UnknownFormat(String),
}

impl ImportError {
    /// JSON path of the offending node, if known
    pub fn path(&self) -> Option<&str> {
        match self {
            ImportError::InvalidJson(_) | ImportError::UnknownFormat(_) => None,
            ImportError::UnexpectedShape(p, _) => Some(p),
            ImportError::MissingField(p, _) => Some(p),
            ImportError::UnknownKind(p, _, _) => Some(p),
            ImportError::UnknownOperator(p, _) => Some(p),
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic<usize> {
        let diag = Diagnostic::error().with_message(format!("{self}"));
        match self {
            ImportError::InvalidJson(e) => diag.with_notes(vec![format!(
                "at line {}, column {} of the tree document",
                e.line(),
                e.column()
            )]),
            ImportError::UnknownFormat(_) => diag,
            _ => diag.with_notes(vec![
                "the tree document does not follow the interchange format".to_string(),
            ]),
        }
    }
}
