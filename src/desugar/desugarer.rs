//! Desugarer maintains state during desugar passes.
use super::desugarable::Desugarable;
use super::error::{DesugarError, ScriptError};
use super::settings::DesugarSettings;
use super::sink::DiagnosticSink;
use crate::common::sourcemap::{HasSmid, Smid, SourceMap};
use crate::syntax::scope::Scopes;
use crate::syntax::tree::Block;

/// What the pass did with one definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionRecord {
    /// Keyword the definition was made with (e.g. `process`)
    pub keyword: String,
    /// Name of the defined process
    pub name: String,
    /// Location of the definition call
    pub smid: Smid,
    /// Whether a script was found and deferred
    pub script_mode: bool,
}

/// State kept during desugaring pass
pub struct Desugarer<'smap> {
    /// Which calls are definitions
    settings: &'smap DesugarSettings,
    /// SourceMap
    source_map: &'smap mut SourceMap,
    /// Lexical scopes of the tree, extended as thunks are created
    scopes: &'smap mut Scopes,
    /// Where recoverable problems go
    sink: &'smap mut dyn DiagnosticSink,
    /// Definitions processed so far, in order
    definitions: Vec<DefinitionRecord>,
}

impl<'smap> Desugarer<'smap> {
    pub fn new(
        settings: &'smap DesugarSettings,
        source_map: &'smap mut SourceMap,
        scopes: &'smap mut Scopes,
        sink: &'smap mut dyn DiagnosticSink,
    ) -> Self {
        Desugarer {
            settings,
            source_map,
            scopes,
            sink,
            definitions: vec![],
        }
    }

    /// Desugar every definition in a tree
    pub fn translate(&mut self, block: &Block) -> Result<Block, DesugarError> {
        block.desugar(self)
    }

    pub fn settings(&self) -> &DesugarSettings {
        self.settings
    }

    pub fn scopes_mut(&mut self) -> &mut Scopes {
        self.scopes
    }

    /// Mint a location for a synthetic node derived from `smid`
    pub fn annotated_smid<T: AsRef<str>>(&mut self, smid: Smid, annotation: T) -> Smid {
        self.source_map.annotated(smid, annotation)
    }

    /// Send a problem to the diagnostic channel at its recorded
    /// position
    pub fn report(&mut self, error: &ScriptError) {
        let (line, column) = self
            .source_map
            .position(error.smid())
            .map(|p| (p.line, p.column))
            .unwrap_or((0, 0));
        self.sink.report(&error.to_string(), line, column);
    }

    /// Record the outcome for a definition
    pub fn record_definition(&mut self, record: DefinitionRecord) {
        self.definitions.push(record);
    }

    pub fn into_definitions(self) -> Vec<DefinitionRecord> {
        self.definitions
    }
}
