//! Capture and report statistics about a run

use std::{fmt::Display, time::Duration};

use indexmap::IndexMap;

use crate::desugar::DefinitionRecord;

#[derive(Default, Debug)]
pub struct Timings {
    timings: IndexMap<String, Duration>,
}

impl Timings {
    pub fn record<T: AsRef<str>>(&mut self, name: T, elapsed: Duration) {
        self.timings.insert(name.as_ref().to_string(), elapsed);
    }

    pub fn get<T: AsRef<str>>(&self, name: T) -> Option<Duration> {
        self.timings.get(name.as_ref()).copied()
    }
}

impl Display for Timings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let width = self.timings.keys().map(|k| k.len()).max().unwrap_or(0) + 1;

        for (k, v) in &self.timings {
            writeln!(f, "{:width$}: {:14.9}s", k, v.as_secs_f64(), width = width)?;
        }
        Ok(())
    }
}

/// The statistics captured during a run
#[derive(Default, Debug)]
pub struct Statistics {
    definitions: Vec<DefinitionRecord>,
    diagnostics: usize,
    timings: Timings,
}

impl Statistics {
    pub fn set_definitions(&mut self, definitions: Vec<DefinitionRecord>) {
        self.definitions = definitions;
    }

    pub fn set_diagnostics(&mut self, count: usize) {
        self.diagnostics = count;
    }

    pub fn definitions(&self) -> &[DefinitionRecord] {
        &self.definitions
    }

    pub fn diagnostics(&self) -> usize {
        self.diagnostics
    }

    pub fn timings_mut(&mut self) -> &mut Timings {
        &mut self.timings
    }

    pub fn timings(&self) -> &Timings {
        &self.timings
    }
}

impl Display for Statistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Definitions    : {:10}", self.definitions.len())?;
        writeln!(f, "Diagnostics    : {:10}", self.diagnostics)?;
        writeln!(f)?;
        for d in &self.definitions {
            writeln!(
                f,
                "  {} {} ({})",
                d.keyword,
                d.name,
                if d.script_mode { "script" } else { "no script" }
            )?;
        }
        writeln!(f)?;
        writeln!(f, "{}", self.timings)
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::common::sourcemap::Smid;

    #[test]
    pub fn test_summary_lists_definitions() {
        let mut stats = Statistics::default();
        stats.set_definitions(vec![DefinitionRecord {
            keyword: "process".to_string(),
            name: "align".to_string(),
            smid: Smid::default(),
            script_mode: false,
        }]);
        stats.set_diagnostics(1);
        stats.timings_mut().record("desugar", Duration::from_millis(2));

        let text = format!("{}", stats);
        assert!(text.starts_with("Definitions    :          1\nDiagnostics    :          1\n"));
        assert!(text.contains("  process align (no script)\n"));
        assert!(text.contains("desugar :"));
    }
}
