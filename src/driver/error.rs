//! Overall high-level error type for procsugar
use crate::common::sourcemap::{HasSmid, Position, SourceMap};
use crate::desugar::error::DesugarError;
use crate::import::error::ImportError;
use codespan_reporting::diagnostic::Diagnostic;
use std::fmt::Display;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProcsugarError {
    #[error(transparent)]
    Desugar(#[from] DesugarError),
    #[error(transparent)]
    Import(#[from] ImportError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("invalid settings in {0}: {1}")]
    InvalidSettings(String, String),
    #[error("path {0} could not be read")]
    FileCouldNotBeRead(String),
}

fn default_diagnostic<E>(e: &E) -> Diagnostic<usize>
where
    E: Display,
{
    Diagnostic::error().with_message(format!("{}", e))
}

impl ProcsugarError {
    /// Convert to a diagnostic
    pub fn to_diagnostic(&self, source_map: &SourceMap) -> Diagnostic<usize> {
        match self {
            ProcsugarError::Desugar(e) => e.to_diagnostic(source_map),
            ProcsugarError::Import(e) => e.to_diagnostic(),
            e => default_diagnostic(e),
        }
    }

    /// Position in the DSL source the error refers to, if any
    pub fn position(&self, source_map: &SourceMap) -> Option<Position> {
        match self {
            ProcsugarError::Desugar(e) => source_map.position(e.smid()),
            _ => None,
        }
    }
}
