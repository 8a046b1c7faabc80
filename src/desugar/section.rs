//! Classify the statements of a definition block into sections
//!
//! A label applies to its statement and to every following unlabelled
//! statement until the next label.
use crate::syntax::tree::Stmt;
use std::fmt;

/// The section a statement belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    /// Before any label, or under a label with no special meaning
    None,
    Input,
    Output,
    Share,
    /// `exec:` or `script:`
    Exec,
}

impl Section {
    /// Section introduced by an explicit label
    pub fn from_label(label: &str) -> Section {
        match label {
            "input" => Section::Input,
            "output" => Section::Output,
            "share" => Section::Share,
            "exec" | "script" => Section::Exec,
            _ => Section::None,
        }
    }

    /// Sections whose statements are declarations to rewrite
    pub fn is_declarative(&self) -> bool {
        matches!(self, Section::Input | Section::Output | Section::Share)
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Section::None => write!(f, "none"),
            Section::Input => write!(f, "input"),
            Section::Output => write!(f, "output"),
            Section::Share => write!(f, "share"),
            Section::Exec => write!(f, "exec"),
        }
    }
}

/// Effective section of each statement, in order
pub fn classify(stmts: &[Stmt]) -> Vec<Section> {
    stmts
        .iter()
        .scan(Section::None, |current, stmt| {
            if let Some(label) = stmt.label() {
                *current = Section::from_label(label);
            }
            Some(*current)
        })
        .collect()
}

/// A block's statements split by section
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Partition {
    /// Everything outside exec / script, with its section, in order
    pub retained: Vec<(Section, Stmt)>,
    /// Statements of exec / script sections, in order
    pub script: Vec<Stmt>,
}

/// Split statements into those that stay in the block and those that
/// make up the script
pub fn partition(stmts: Vec<Stmt>) -> Partition {
    let sections = classify(&stmts);
    stmts
        .into_iter()
        .zip(sections)
        .fold(Partition::default(), |mut acc, (stmt, section)| {
            if section == Section::Exec {
                acc.script.push(stmt);
            } else {
                acc.retained.push((section, stmt));
            }
            acc
        })
}
