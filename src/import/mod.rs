//! Reading trees handed over by the host parser
use crate::common::sourcemap::SourceMap;
use crate::syntax::scope::Scopes;

use self::error::ImportError;
use self::json::TreeDocument;

pub mod error;
pub mod json;

/// Read a tree document in a supported interchange format
pub fn read_to_tree<'smap>(
    format: &str,
    source_map: &'smap mut SourceMap,
    scopes: &'smap mut Scopes,
    text: &str,
) -> Result<TreeDocument, ImportError> {
    match format {
        "json" => json::read_tree(source_map, scopes, text),
        _ => Err(ImportError::UnknownFormat(format.to_string())),
    }
}
