use codespan_reporting::diagnostic::Diagnostic;
use std::fmt;
use std::fmt::Display;
use std::num::NonZeroU32;

/// A handle that points to a source location in a source map.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Smid(Option<NonZeroU32>);

impl Default for Smid {
    /// The default SMID is invalid.
    fn default() -> Self {
        Smid(None)
    }
}

impl Display for Smid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        match self.0 {
            Some(n) => write!(f, "[{}]", n),
            None => write!(f, "[?]"),
        }
    }
}

impl Smid {
    fn new(index: usize) -> Smid {
        Smid(NonZeroU32::new(index as u32 + 1))
    }

    fn index(self) -> Option<usize> {
        self.0.map(|n| (n.get() - 1) as usize)
    }
}

#[cfg(test)]
impl Smid {
    pub fn fake(index: usize) -> Smid {
        Smid::new(index)
    }
}

/// Anything that has a SMID identifying a source location.
pub trait HasSmid {
    fn smid(&self) -> Smid;
}

/// A line and column in the DSL source, both 1-based, as reported by
/// the host parser.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Position { line, column }
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Source information to associate with a syntax element
///
/// Synthetic nodes minted during desugaring have no position but may
/// carry an annotation describing where they came from.
pub struct SourceInfo {
    /// Line / column in the DSL source
    pub position: Option<Position>,
    /// Text annotation (e.g. "script mode")
    pub annotation: Option<String>,
}

/// Store all source info...
#[derive(Default)]
pub struct SourceMap {
    source: Vec<SourceInfo>,
}

impl SourceMap {
    /// Create a new, empty source map
    pub fn new() -> Self {
        SourceMap::default()
    }

    /// Add a new source position and get a SMID referencing it
    pub fn add(&mut self, position: Position) -> Smid {
        let smid = Smid::new(self.source.len());
        self.source.push(SourceInfo {
            position: Some(position),
            annotation: None,
        });
        smid
    }

    /// Add a notional location which has no concrete position
    pub fn add_synthetic<T: AsRef<str>>(&mut self, annotation: T) -> Smid {
        let smid = Smid::new(self.source.len());
        self.source.push(SourceInfo {
            position: None,
            annotation: Some(annotation.as_ref().to_string()),
        });
        smid
    }

    /// Create a new source location, identical save for a new or
    /// different annotation
    pub fn annotated<T: AsRef<str>>(&mut self, smid: Smid, annotation: T) -> Smid {
        let position = self.position(smid);
        let new_smid = Smid::new(self.source.len());
        self.source.push(SourceInfo {
            position,
            annotation: Some(annotation.as_ref().to_string()),
        });
        new_smid
    }

    /// Retrieve the SourceInfo for something that has a SMID
    pub fn source_info(&self, item: &dyn HasSmid) -> Option<&SourceInfo> {
        item.smid().index().and_then(|i| self.source.get(i))
    }

    /// Retrieve the position recorded for a SMID if there is one
    pub fn position(&self, smid: Smid) -> Option<Position> {
        smid.index()
            .and_then(|i| self.source.get(i))
            .and_then(|info| info.position)
    }

    /// Number of locations recorded
    pub fn len(&self) -> usize {
        self.source.len()
    }

    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }

    /// Create a default diagnostic for an error with a SMID
    ///
    /// The position is attached as a note; labelling against source
    /// text is the loader's business as the map holds no text.
    pub fn diagnostic<E>(&self, error: &E) -> Diagnostic<usize>
    where
        E: HasSmid + Display,
    {
        let diag = Diagnostic::error().with_message(format!("{}", error));

        match self.source_info(error) {
            Some(SourceInfo {
                position: Some(position),
                ..
            }) => diag.with_notes(vec![format!("at {}", position)]),
            Some(SourceInfo {
                annotation: Some(annotation),
                ..
            }) => diag.with_notes(vec![format!("in {}", annotation)]),
            _ => diag,
        }
    }
}
