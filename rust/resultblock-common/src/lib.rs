//! Core definitions shared by all resultblock-* crates: the error type, the
//! `Result` alias and the argument/data verification helpers.

pub mod error;
pub mod result;

pub use result::Result;
