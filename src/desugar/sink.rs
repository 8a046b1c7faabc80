//! The channel through which recoverable problems leave the pass

/// Receives `(message, line, column)` for each problem found. Line
/// and column are 1-based; 0 means the position is unknown.
pub trait DiagnosticSink {
    fn report(&mut self, message: &str, line: usize, column: usize);
}

/// One reported problem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reported {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

/// A sink that keeps everything it is sent, in order
#[derive(Debug, Default)]
pub struct Collector {
    reported: Vec<Reported>,
}

impl Collector {
    pub fn new() -> Self {
        Collector::default()
    }

    pub fn reported(&self) -> &[Reported] {
        &self.reported
    }

    pub fn is_empty(&self) -> bool {
        self.reported.is_empty()
    }

    pub fn len(&self) -> usize {
        self.reported.len()
    }

    pub fn into_reported(self) -> Vec<Reported> {
        self.reported
    }
}

impl DiagnosticSink for Collector {
    fn report(&mut self, message: &str, line: usize, column: usize) {
        self.reported.push(Reported {
            message: message.to_string(),
            line,
            column,
        });
    }
}

/// Closures can serve as sinks
impl<F> DiagnosticSink for F
where
    F: FnMut(&str, usize, usize),
{
    fn report(&mut self, message: &str, line: usize, column: usize) {
        self(message, line, column)
    }
}
