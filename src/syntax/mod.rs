pub mod scope;
pub mod tree;
