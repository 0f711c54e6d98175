//! Top-level conversion pipeline
//!
//! One conversion is a pure function of the input text and the options:
//! extract matrices, parse the residual, substitute the extracted values
//! back in, simplify, render, restyle the output delimiters. There are no
//! partial results; any error aborts the whole conversion.

use fxhash::FxHashMap;

use crate::core::delim::{BracketStyle, STANDARD_DELIMITERS};
use crate::core::engine::{self, Expr};
use crate::core::matrix;
use crate::utils::error::CalcResult;

/// Options for a conversion.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Print `input = output` instead of just `output`.
    pub equation_form: bool,
    /// Delimiter spelling used for matrices in the output.
    pub bracket_style: BracketStyle,
}

/// Evaluate a LaTeX math expression and render the simplified result.
pub fn convert(input: &str, options: &ConvertOptions) -> CalcResult<String> {
    let registry = &*STANDARD_DELIMITERS;

    let extraction = matrix::extract(input, registry)?;
    let expr = engine::parse(&extraction.residual)?;

    let bindings: FxHashMap<String, Expr> = extraction.matrices.into_iter().collect();
    let bound = engine::substitute(&expr, &bindings);
    let simplified = engine::simplify(&bound)?;
    let rendered = engine::render(&simplified);

    let style = options.bracket_style;
    let styled = registry.normalize(&rendered, style.open(), style.close());

    if options.equation_form {
        Ok(format!("{} = {}", input, styled))
    } else {
        Ok(styled)
    }
}
