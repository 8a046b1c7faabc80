use crate::common::sourcemap::{Position, SourceMap};
use crate::desugar::sink::DiagnosticSink;
use crate::desugar::{DefinitionRecord, DesugarSettings, Desugarer, Reported};
use crate::driver::error::ProcsugarError;
use crate::import::{self, json::TreeDocument};
use crate::syntax::scope::Scopes;
use crate::syntax::tree::Block;
use codespan_reporting::diagnostic::Label;
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term::emit;
use codespan_reporting::term::termcolor::{ColorChoice, NoColor, StandardStream};
use codespan_reporting::{diagnostic::Diagnostic, files::Files};
use std::fs;
use std::io::{self, Read};
use std::ops::Range;
use std::path::Path;

/// A loader for trees and the DSL source they were parsed from. It
/// owns the source map and scopes for the tree and keeps the source
/// text for labelling diagnostics.
pub struct SourceLoader {
    /// Access to source file text
    files: SimpleFiles<String, String>,
    /// The DSL source, once loaded
    source_file: Option<usize>,
    /// SourceMap for positions recorded in the tree
    source_map: SourceMap,
    /// Scopes of the tree's blocks
    scopes: Scopes,
}

impl Default for SourceLoader {
    fn default() -> Self {
        SourceLoader {
            files: SimpleFiles::new(),
            source_file: None,
            source_map: SourceMap::new(),
            scopes: Scopes::new(),
        }
    }
}

impl SourceLoader {
    /// Create a fresh blank source loader
    pub fn new() -> Self {
        SourceLoader::default()
    }

    /// Read a tree in `format` from `path` ("-" for stdin)
    pub fn load_tree(&mut self, format: &str, path: &Path) -> Result<TreeDocument, ProcsugarError> {
        let text = if path.as_os_str() == "-" {
            self.read_stdin()?
        } else {
            self.read_fs_input(path)?
        };
        Ok(import::read_to_tree(
            format,
            &mut self.source_map,
            &mut self.scopes,
            &text,
        )?)
    }

    /// Load the DSL source text for labelling diagnostics
    pub fn load_source(&mut self, path: &Path) -> Result<usize, ProcsugarError> {
        let text = self.read_fs_input(path)?;
        let id = self.files.add(path.to_string_lossy().to_string(), text);
        self.source_file = Some(id);
        Ok(id)
    }

    /// Load the source named by a tree document, relative to the
    /// tree's directory, if it can be found. Failure is not an error.
    pub fn load_named_source(&mut self, tree_path: &Path, name: &str) -> Option<usize> {
        let path = match tree_path.parent() {
            Some(dir) => dir.join(name),
            None => Path::new(name).to_path_buf(),
        };
        if path.is_file() {
            self.load_source(&path).ok()
        } else {
            None
        }
    }

    pub fn has_source(&self) -> bool {
        self.source_file.is_some()
    }

    /// Run the desugaring pass over a loaded tree
    pub fn desugar(
        &mut self,
        settings: &DesugarSettings,
        body: &Block,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<(Block, Vec<DefinitionRecord>), ProcsugarError> {
        let mut desugarer = Desugarer::new(settings, &mut self.source_map, &mut self.scopes, sink);
        let block = desugarer.translate(body)?;
        Ok((block, desugarer.into_definitions()))
    }

    fn read_fs_input(&mut self, path: &Path) -> Result<String, ProcsugarError> {
        fs::read_to_string(path)
            .map_err(|_| ProcsugarError::FileCouldNotBeRead(path.to_string_lossy().to_string()))
    }

    /// Read tree from stdin
    fn read_stdin(&mut self) -> Result<String, ProcsugarError> {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    }

    pub fn source_map(&self) -> &SourceMap {
        &self.source_map
    }

    /// Byte range in the loaded source from `position` to the end of
    /// its line
    fn range(&self, position: Position) -> Option<(usize, Range<usize>)> {
        let file = self.source_file?;
        if position.line == 0 {
            return None;
        }
        let line_range = self.files.line_range(file, position.line - 1).ok()?;
        let source = self.files.source(file).ok()?;
        let line_text = source.get(line_range.clone())?.trim_end();
        let offset = line_text
            .char_indices()
            .nth(position.column.saturating_sub(1))
            .map(|(i, _)| i)
            .unwrap_or_else(|| line_text.len());
        Some((
            file,
            (line_range.start + offset)..(line_range.start + line_text.len()),
        ))
    }

    /// Attach a position to a diagnostic: a label against the source
    /// text if it is loaded, otherwise a note
    pub fn locate(&self, diag: Diagnostic<usize>, position: Position) -> Diagnostic<usize> {
        match self.range(position) {
            Some((file, range)) => diag.with_labels(vec![Label::primary(file, range)]),
            None if position.line > 0 => diag.with_notes(vec![format!("at {}", position)]),
            None => diag,
        }
    }

    /// Diagnostic for a problem reported by the desugaring pass
    pub fn reported_diagnostic(&self, reported: &Reported) -> Diagnostic<usize> {
        self.locate(
            Diagnostic::error().with_message(reported.message.clone()),
            Position::new(reported.line, reported.column),
        )
    }

    /// Diagnostic for a fatal error
    pub fn error_diagnostic(&self, error: &ProcsugarError) -> Diagnostic<usize> {
        let diag = error.to_diagnostic(&self.source_map);
        match error.position(&self.source_map) {
            Some(position) if self.has_source() => self.locate(diag, position),
            _ => diag,
        }
    }

    pub fn diagnose_to_stderr(&self, diag: &Diagnostic<usize>) {
        let writer = StandardStream::stderr(ColorChoice::Auto);
        let config = codespan_reporting::term::Config::default();
        let mut lock = writer.lock();
        if let Err(e) = emit(&mut lock, &config, &self.files, diag) {
            eprintln!("{}: {}", diag.message, e);
        }
    }

    pub fn diagnose_to_string(&self, diag: &Diagnostic<usize>) -> String {
        let mut s: Vec<u8> = Vec::new();
        {
            let mut writer = NoColor::new(&mut s);
            let config = codespan_reporting::term::Config::default();
            if emit(&mut writer, &config, &self.files, diag).is_err() {
                return diag.message.clone();
            }
        }
        String::from_utf8_lossy(&s).into_owned()
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    pub fn test_label_from_source_position() {
        let mut loader = SourceLoader::new();
        loader
            .load_source(&PathBuf::from("harness/002_bad_script.nf"))
            .unwrap();
        let reported = Reported {
            message: "process must terminate with a quoted script expression or explicit exec/script section".to_string(),
            line: 4,
            column: 3,
        };
        let diag = loader.reported_diagnostic(&reported);
        assert_eq!(diag.labels.len(), 1);

        let text = loader.diagnose_to_string(&diag);
        assert!(text.contains("harness/002_bad_script.nf:4:3"));
    }

    #[test]
    pub fn test_note_without_source() {
        let loader = SourceLoader::new();
        let reported = Reported {
            message: "process foo has no body".to_string(),
            line: 3,
            column: 1,
        };
        let diag = loader.reported_diagnostic(&reported);
        assert!(diag.labels.is_empty());
        assert_eq!(diag.notes, vec!["at 3:1".to_string()]);

        let unplaced = Reported {
            message: "m".to_string(),
            line: 0,
            column: 0,
        };
        assert!(loader.reported_diagnostic(&unplaced).notes.is_empty());
    }

    #[test]
    pub fn test_missing_tree_file() {
        let mut loader = SourceLoader::new();
        match loader.load_tree("json", &PathBuf::from("harness/no_such_tree.json")) {
            Err(ProcsugarError::FileCouldNotBeRead(p)) => assert!(p.ends_with("no_such_tree.json")),
            _ => panic!("expected read failure"),
        }
    }
}
