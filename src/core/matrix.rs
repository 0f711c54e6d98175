//! Matrix environment preprocessing
//!
//! The expression parser knows nothing about matrix environments, so they
//! are excised first: every matrix span is parsed into a matrix value and
//! replaced in the text by a generated placeholder control sequence. The
//! returned table maps placeholder names back to their values; it lives for
//! exactly one conversion.
//!
//! Pairing is positional: the first canonical open is matched with the first
//! canonical close. Nested matrices are not supported. Finding an open
//! without a close (or the reverse) is fatal for the whole conversion.

use indexmap::IndexMap;

use crate::core::delim::{DelimiterRegistry, CANONICAL_CLOSE, CANONICAL_OPEN};
use crate::core::engine::{self, Expr, Matrix};
use crate::utils::error::{CalcError, CalcResult};

/// Length of generated placeholder names.
pub const PLACEHOLDER_LEN: usize = 10;

/// Mapping from generated placeholder name to extracted matrix value,
/// in extraction order.
pub type PlaceholderTable = IndexMap<String, Expr>;

/// Result of matrix extraction: the residual text with placeholders spliced
/// in, and the table of extracted matrices.
#[derive(Debug)]
pub struct MatrixExtraction {
    pub residual: String,
    pub matrices: PlaceholderTable,
}

/// Generates placeholder names from a monotonically increasing counter,
/// encoded as fixed-length lowercase strings: `aaaaaaaaaa`, `aaaaaaaaab`, ...
/// Names are collision-free by construction, and the fixed ten-letter shape
/// keeps them out of the namespace of any plausible user symbol.
#[derive(Debug, Default)]
pub struct PlaceholderNames {
    next: u64,
}

impl PlaceholderNames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Produce the next name.
    pub fn next_name(&mut self) -> String {
        let mut n = self.next;
        self.next += 1;
        let mut name = [b'a'; PLACEHOLDER_LEN];
        let mut i = PLACEHOLDER_LEN;
        while i > 0 {
            i -= 1;
            name[i] = b'a' + (n % 26) as u8;
            n /= 26;
        }
        name.iter().map(|&b| b as char).collect()
    }
}

/// Extract every matrix environment from `text`.
///
/// The input is first normalized to the canonical delimiter pair, then
/// matrix spans are excised one at a time until none remain. On success the
/// residual contains no canonical delimiter.
pub fn extract(text: &str, registry: &DelimiterRegistry) -> CalcResult<MatrixExtraction> {
    let mut current = registry.normalize(text, CANONICAL_OPEN, CANONICAL_CLOSE);
    let mut matrices = PlaceholderTable::default();
    let mut names = PlaceholderNames::new();

    loop {
        let open = current.find(CANONICAL_OPEN);
        let close = current.find(CANONICAL_CLOSE);
        let (open, close) = match (open, close) {
            (None, None) => {
                return Ok(MatrixExtraction {
                    residual: current,
                    matrices,
                })
            }
            (Some(open), Some(close)) => (open, close),
            _ => return Err(CalcError::MismatchedDelimiters),
        };

        // a close with no open before it cannot be paired
        if close < open {
            return Err(CalcError::MismatchedDelimiters);
        }

        let body_start = open + CANONICAL_OPEN.len();
        let body = &current[body_start..close];
        let after = close + CANONICAL_CLOSE.len();

        let mut rebuilt = String::with_capacity(current.len());
        rebuilt.push_str(&current[..open]);
        match parse_matrix_body(body)? {
            Some(matrix) => {
                let name = names.next_name();
                rebuilt.push('\\');
                rebuilt.push_str(&name);
                // terminate the control word so trailing letters in the
                // source cannot extend the placeholder name
                rebuilt.push(' ');
                matrices.insert(name, Expr::Matrix(matrix));
            }
            // a zero-row environment contributes nothing
            None => {}
        }
        rebuilt.push_str(&current[after..]);
        current = rebuilt;
    }
}

/// Parse a matrix body into a rectangular grid. Rows split on `\\`, cells
/// on `&`, newlines stripped beforehand. Rows with no content are skipped,
/// which tolerates a trailing row separator; a body with no rows at all
/// yields `None`.
fn parse_matrix_body(body: &str) -> CalcResult<Option<Matrix>> {
    let body = body.replace('\n', "");
    let mut rows = Vec::new();
    for raw_row in body.split("\\\\") {
        let raw_row = raw_row.trim();
        if raw_row.is_empty() {
            continue;
        }
        let mut cells = Vec::new();
        for raw_cell in raw_row.split('&') {
            cells.push(engine::parse(raw_cell.trim())?);
        }
        rows.push(cells);
    }
    if rows.is_empty() {
        return Ok(None);
    }
    Ok(Some(Matrix::from_rows(rows)?))
}
