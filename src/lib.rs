//! Calctex - LaTeX math calculator
//!
//! Parses a LaTeX math expression (matrix environments included),
//! evaluates it symbolically, and renders the simplified result back as
//! LaTeX.
//!
//! Matrix environments are handled by a preprocessing pass: every matrix
//! span is extracted into a matrix value and replaced by a generated
//! placeholder symbol before the residual text reaches the expression
//! parser. After parsing, the placeholders are substituted with their
//! values and the whole expression is simplified and re-rendered. The
//! many LaTeX matrix delimiter spellings (`pmatrix`, `bmatrix`, the
//! `\left(\begin{matrix}` forms) are normalized to one canonical spelling
//! on the way in and restyled to the caller's choice on the way out.
//!
//! # Example
//!
//! ```
//! use calctex::evaluate_latex;
//!
//! let result = evaluate_latex("1+1").unwrap();
//! assert_eq!(result, "2");
//! ```

pub mod core;
pub mod utils;

pub use crate::core::convert::{convert, ConvertOptions};
pub use crate::core::delim::{BracketStyle, DelimiterPair, DelimiterRegistry, STANDARD_DELIMITERS};
pub use crate::core::matrix::{extract as extract_matrices, MatrixExtraction, PlaceholderTable};
pub use crate::utils::error::{CalcError, CalcResult};

/// Evaluate a LaTeX math expression with default options.
pub fn evaluate_latex(input: &str) -> CalcResult<String> {
    convert(input, &ConvertOptions::default())
}

/// Evaluate a LaTeX math expression with explicit options.
pub fn evaluate_latex_with_options(input: &str, options: &ConvertOptions) -> CalcResult<String> {
    convert(input, options)
}
