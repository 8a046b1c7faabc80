//! Load, desugar and export a tree according to the options
use crate::desugar::{Collector, DefinitionRecord};
use crate::driver::config;
use crate::driver::error::ProcsugarError;
use crate::driver::options::ProcsugarOptions;
use crate::driver::source::SourceLoader;
use crate::export::export_tree;
use codespan_reporting::diagnostic::Diagnostic;
use std::fs;
use std::io::{self, Write};
use std::time::Instant;

use super::statistics::Statistics;

/// What a successful run produced besides its output
pub struct Outcome {
    /// Recoverable problems found in the tree
    pub diagnostics: Vec<Diagnostic<usize>>,
    /// Definitions processed, in order
    pub definitions: Vec<DefinitionRecord>,
}

impl Outcome {
    /// 0 if the tree desugared cleanly, 1 if problems were reported
    pub fn exit_code(&self) -> i32 {
        if self.diagnostics.is_empty() {
            0
        } else {
            1
        }
    }
}

/// Use the loader to process the tree according to the options,
/// writing the desugared tree to `output`
pub fn prepare<W: Write>(
    opt: &ProcsugarOptions,
    loader: &mut SourceLoader,
    stats: &mut Statistics,
    output: &mut W,
) -> Result<Outcome, ProcsugarError> {
    let settings = config::settings(opt)?;

    if let Some(source) = &opt.source {
        loader.load_source(source)?;
    }

    let document = {
        let t = Instant::now();
        let document = loader.load_tree(&opt.format, &opt.tree)?;
        stats.timings_mut().record("import", t.elapsed());
        document
    };

    if !loader.has_source() && !opt.reads_stdin() {
        if let Some(name) = &document.source {
            loader.load_named_source(&opt.tree, name);
        }
    }

    let mut sink = Collector::new();
    let (body, definitions) = {
        let t = Instant::now();
        let result = loader.desugar(&settings, &document.body, &mut sink)?;
        stats.timings_mut().record("desugar", t.elapsed());
        result
    };

    {
        let t = Instant::now();
        export_tree(
            opt.export,
            output,
            loader.source_map(),
            document.source.as_deref(),
            &body,
        )?;
        stats.timings_mut().record("export", t.elapsed());
    }

    let diagnostics: Vec<_> = sink
        .reported()
        .iter()
        .map(|r| loader.reported_diagnostic(r))
        .collect();

    stats.set_definitions(definitions.clone());
    stats.set_diagnostics(diagnostics.len());

    Ok(Outcome {
        diagnostics,
        definitions,
    })
}

/// Process the tree, writing to the output file or stdout
pub fn run(
    opt: &ProcsugarOptions,
    loader: &mut SourceLoader,
    stats: &mut Statistics,
) -> Result<Outcome, ProcsugarError> {
    match &opt.output {
        Some(path) => {
            // the file is only touched once the tree has desugared
            let mut rendered: Vec<u8> = Vec::new();
            let outcome = prepare(opt, loader, stats, &mut rendered)?;
            fs::write(path, rendered)?;
            Ok(outcome)
        }
        None => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            prepare(opt, loader, stats, &mut out)
        }
    }
}
