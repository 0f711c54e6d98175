//! Core conversion pipeline: delimiter normalization, matrix extraction,
//! the symbolic engine, and the top-level converter.

pub mod convert;
pub mod delim;
pub mod engine;
pub mod matrix;
