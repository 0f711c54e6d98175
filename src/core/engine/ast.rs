//! Expression tree for the symbolic engine
//!
//! Values are kept exact: numeric literals are rationals with 64-bit
//! numerator and denominator, and matrices are rectangular grids of
//! sub-expressions. Nothing in this module evaluates anything; folding
//! happens in `simplify`.

use std::fmt;

use crate::utils::error::{CalcError, CalcResult};

/// An exact rational number. Always normalized: positive denominator,
/// numerator and denominator coprime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rational {
    num: i64,
    den: i64,
}

impl Rational {
    pub const ZERO: Rational = Rational { num: 0, den: 1 };
    pub const ONE: Rational = Rational { num: 1, den: 1 };

    /// Create a rational, normalizing sign and common factors.
    pub fn new(num: i64, den: i64) -> CalcResult<Self> {
        if den == 0 {
            return Err(CalcError::eval("division by zero"));
        }
        Self::from_i128(num as i128, den as i128)
    }

    /// Create an integer-valued rational.
    pub fn integer(n: i64) -> Self {
        Rational { num: n, den: 1 }
    }

    fn from_i128(num: i128, den: i128) -> CalcResult<Self> {
        debug_assert!(den != 0);
        let sign = if den < 0 { -1 } else { 1 };
        let g = {
            let mut a = num.abs();
            let mut b = den.abs();
            while b != 0 {
                let t = a % b;
                a = b;
                b = t;
            }
            a.max(1)
        };
        let num = sign * num / g;
        let den = (den / g).abs();
        let num = i64::try_from(num).map_err(|_| CalcError::eval("numeric overflow"))?;
        let den = i64::try_from(den).map_err(|_| CalcError::eval("numeric overflow"))?;
        Ok(Rational { num, den })
    }

    pub fn numerator(&self) -> i64 {
        self.num
    }

    pub fn denominator(&self) -> i64 {
        self.den
    }

    pub fn is_zero(&self) -> bool {
        self.num == 0
    }

    pub fn is_one(&self) -> bool {
        self.num == 1 && self.den == 1
    }

    pub fn is_integer(&self) -> bool {
        self.den == 1
    }

    pub fn is_negative(&self) -> bool {
        self.num < 0
    }

    /// The integer value, if this rational is one.
    pub fn as_integer(&self) -> Option<i64> {
        if self.den == 1 {
            Some(self.num)
        } else {
            None
        }
    }

    /// Negation. Errors when the numerator is `i64::MIN`, whose negation
    /// does not fit.
    pub fn neg(&self) -> CalcResult<Self> {
        Self::from_i128(-(self.num as i128), self.den as i128)
    }

    pub fn checked_add(&self, other: &Rational) -> CalcResult<Self> {
        let num = self.num as i128 * other.den as i128 + other.num as i128 * self.den as i128;
        let den = self.den as i128 * other.den as i128;
        Self::from_i128(num, den)
    }

    pub fn checked_sub(&self, other: &Rational) -> CalcResult<Self> {
        self.checked_add(&other.neg()?)
    }

    pub fn checked_mul(&self, other: &Rational) -> CalcResult<Self> {
        let num = self.num as i128 * other.num as i128;
        let den = self.den as i128 * other.den as i128;
        Self::from_i128(num, den)
    }

    pub fn checked_div(&self, other: &Rational) -> CalcResult<Self> {
        if other.is_zero() {
            return Err(CalcError::eval("division by zero"));
        }
        let num = self.num as i128 * other.den as i128;
        let den = self.den as i128 * other.num as i128;
        Self::from_i128(num, den)
    }

    /// Raise to an integer power by repeated squaring.
    pub fn checked_pow(&self, exp: i64) -> CalcResult<Self> {
        let mut base = if exp < 0 {
            Rational::ONE.checked_div(self)?
        } else {
            *self
        };
        let mut remaining = exp.unsigned_abs();
        let mut result = Rational::ONE;
        while remaining > 0 {
            if remaining & 1 == 1 {
                result = result.checked_mul(&base)?;
            }
            remaining >>= 1;
            if remaining > 0 {
                base = base.checked_mul(&base)?;
            }
        }
        Ok(result)
    }

    /// The exact square root, if both numerator and denominator are
    /// perfect squares.
    pub fn exact_sqrt(&self) -> Option<Rational> {
        if self.num < 0 {
            return None;
        }
        let num = isqrt_exact(self.num)?;
        let den = isqrt_exact(self.den)?;
        Some(Rational { num, den })
    }
}

fn isqrt_exact(n: i64) -> Option<i64> {
    if n < 0 {
        return None;
    }
    let root = (n as f64).sqrt().round() as i64;
    for candidate in root.saturating_sub(1)..=root + 1 {
        if candidate >= 0 && candidate.checked_mul(candidate) == Some(n) {
            return Some(candidate);
        }
    }
    None
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.den == 1 {
            write!(f, "{}", self.num)
        } else {
            write!(f, "{}/{}", self.num, self.den)
        }
    }
}

/// A rectangular grid of sub-expressions, stored row-major.
///
/// Construction enforces that all rows have the same column count. The grid
/// itself is inert; matrix arithmetic lives in `simplify`.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<Expr>,
}

impl Matrix {
    /// Build a matrix from rows, rejecting ragged input.
    pub fn from_rows(rows: Vec<Vec<Expr>>) -> CalcResult<Self> {
        let row_count = rows.len();
        let cols = rows.first().map(|r| r.len()).unwrap_or(0);
        let mut data = Vec::with_capacity(row_count * cols);
        for row in rows {
            if row.len() != cols {
                return Err(CalcError::parse("matrix rows have unequal lengths"));
            }
            data.extend(row);
        }
        Ok(Matrix {
            rows: row_count,
            cols,
            data,
        })
    }

    /// Build a matrix cell by cell.
    pub fn from_fn<F>(rows: usize, cols: usize, mut f: F) -> CalcResult<Self>
    where
        F: FnMut(usize, usize) -> CalcResult<Expr>,
    {
        let mut data = Vec::with_capacity(rows * cols);
        for r in 0..rows {
            for c in 0..cols {
                data.push(f(r, c)?);
            }
        }
        Ok(Matrix { rows, cols, data })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn get(&self, row: usize, col: usize) -> &Expr {
        &self.data[row * self.cols + col]
    }

    /// Iterate over rows as slices.
    pub fn row_slices(&self) -> impl Iterator<Item = &[Expr]> {
        self.data.chunks(self.cols.max(1)).take(self.rows)
    }
}

/// A symbolic expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// An exact numeric literal
    Number(Rational),
    /// A free symbol; single-character names render bare, longer names
    /// render as control sequences
    Symbol(String),
    /// A sum of two or more terms
    Add(Vec<Expr>),
    /// A product of two or more factors
    Mul(Vec<Expr>),
    /// A quotient, rendered as `\frac`
    Div(Box<Expr>, Box<Expr>),
    /// A power
    Pow(Box<Expr>, Box<Expr>),
    /// A square root
    Sqrt(Box<Expr>),
    /// A matrix literal
    Matrix(Matrix),
}

impl Expr {
    pub fn integer(n: i64) -> Self {
        Expr::Number(Rational::integer(n))
    }

    pub fn symbol(name: impl Into<String>) -> Self {
        Expr::Symbol(name.into())
    }

    pub fn as_number(&self) -> Option<Rational> {
        match self {
            Expr::Number(r) => Some(*r),
            _ => None,
        }
    }

    pub fn is_zero(&self) -> bool {
        matches!(self, Expr::Number(r) if r.is_zero())
    }
}
