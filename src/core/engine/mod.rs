//! Symbolic expression engine
//!
//! The three collaborators of the conversion pipeline: `parse` turns a LaTeX
//! fragment into an expression tree, `simplify` evaluates it as far as exact
//! arithmetic allows, and `render` prints it back as LaTeX. `substitute`
//! splices extracted matrix values in over their placeholder symbols.

pub mod ast;
pub mod parser;
pub mod render;
pub mod simplify;

pub use ast::{Expr, Matrix, Rational};
pub use parser::parse;
pub use render::render;
pub use simplify::{simplify, substitute};
