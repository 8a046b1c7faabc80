extern crate codespan_reporting;
extern crate indexmap;
extern crate pretty;
extern crate serde_json;
extern crate structopt;
extern crate thiserror;
#[macro_use]
extern crate lazy_static;

pub mod common;
pub mod desugar;
pub mod driver;
pub mod export;
pub mod import;
pub mod syntax;
