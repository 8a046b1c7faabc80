//! Desugaring of process definitions into their canonical call form.
//!
//! This:
//! - moves the process name into the argument list of the definition
//! - rewrites `input:`, `output:` and `share:` declarations into
//!   canonical calls, encoding forward references as names
//! - wraps the `exec:` / `script:` section (or a trailing string) in
//!   a thunk and records whether that succeeded as the script mode
//!   argument

pub mod declaration;
pub mod definition;
pub mod desugarable;
pub mod desugarer;
pub mod error;
pub mod script;
pub mod section;
pub mod settings;
pub mod sink;

pub use desugarable::Desugarable;
pub use desugarer::{DefinitionRecord, Desugarer};
pub use settings::DesugarSettings;
pub use sink::{Collector, DiagnosticSink, Reported};
