//! Matrix delimiter registry and normalization
//!
//! LaTeX spells matrix environments several ways: `pmatrix`, `bmatrix`, and
//! the `\left(\begin{matrix}` / `\left[\begin{matrix}` forms that renderers
//! like to emit. The normalizer rewrites every registered spelling to one
//! target pair by plain literal substitution. It is deliberately not
//! environment-aware: it does not check balance or pair identity, it only
//! replaces substrings, pair by pair, across the whole registry.

use lazy_static::lazy_static;

/// Canonical internal open delimiter used during preprocessing.
pub const CANONICAL_OPEN: &str = "\\begin{pmatrix}";

/// Canonical internal close delimiter used during preprocessing.
pub const CANONICAL_CLOSE: &str = "\\end{pmatrix}";

/// An ordered (open, close) pair of literal delimiter spellings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelimiterPair {
    pub open: &'static str,
    pub close: &'static str,
}

impl DelimiterPair {
    pub const fn new(open: &'static str, close: &'static str) -> Self {
        DelimiterPair { open, close }
    }
}

/// An immutable list of recognized matrix delimiter spellings.
///
/// The registry is passed explicitly into the normalizer and the extractor
/// rather than living as mutable module state, so a caller can restrict or
/// extend the recognized spellings per conversion.
#[derive(Debug, Clone)]
pub struct DelimiterRegistry {
    pairs: Vec<DelimiterPair>,
}

lazy_static! {
    /// The standard registry: the four spellings recognized by default.
    pub static ref STANDARD_DELIMITERS: DelimiterRegistry = DelimiterRegistry::new(vec![
        DelimiterPair::new("\\left(\\begin{matrix}", "\\end{matrix}\\right)"),
        DelimiterPair::new("\\left[\\begin{matrix}", "\\end{matrix}\\right]"),
        DelimiterPair::new("\\begin{pmatrix}", "\\end{pmatrix}"),
        DelimiterPair::new("\\begin{bmatrix}", "\\end{bmatrix}"),
    ]);
}

impl DelimiterRegistry {
    /// Create a registry from an explicit list of pairs.
    pub fn new(pairs: Vec<DelimiterPair>) -> Self {
        DelimiterRegistry { pairs }
    }

    /// The registered pairs, in registration order.
    pub fn pairs(&self) -> &[DelimiterPair] {
        &self.pairs
    }

    /// Rewrite every registered open spelling to `target_open` and every
    /// registered close spelling to `target_close`.
    ///
    /// Replacement is unconditional string substitution with no nesting or
    /// matching checks; normalizing an already-normalized string is a no-op.
    pub fn normalize(&self, text: &str, target_open: &str, target_close: &str) -> String {
        let mut out = text.to_string();
        for pair in &self.pairs {
            out = out.replace(pair.open, target_open);
            out = out.replace(pair.close, target_close);
        }
        out
    }
}

impl Default for DelimiterRegistry {
    fn default() -> Self {
        STANDARD_DELIMITERS.clone()
    }
}

/// Output matrix bracket style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BracketStyle {
    /// `\begin{pmatrix}` / `\end{pmatrix}` (the default)
    #[default]
    Round,
    /// `\begin{bmatrix}` / `\end{bmatrix}`
    Square,
}

impl BracketStyle {
    /// The open delimiter spelling for this style.
    pub fn open(&self) -> &'static str {
        match self {
            BracketStyle::Round => "\\begin{pmatrix}",
            BracketStyle::Square => "\\begin{bmatrix}",
        }
    }

    /// The close delimiter spelling for this style.
    pub fn close(&self) -> &'static str {
        match self {
            BracketStyle::Round => "\\end{pmatrix}",
            BracketStyle::Square => "\\end{bmatrix}",
        }
    }
}
