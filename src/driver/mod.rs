pub mod config;
pub mod error;
pub mod options;
pub mod prepare;
pub mod source;
pub mod statistics;
