pub mod prettify;
pub mod sourcemap;
