//! Expression simplification
//!
//! Bottom-up evaluation over the expression tree: exact numeric folding,
//! flattening of sums and products, like-term collection, and matrix
//! arithmetic (addition, scalar and matrix products, integer powers).
//! Anything that cannot be folded exactly is left symbolic.

use fxhash::FxHashMap;

use super::ast::{Expr, Matrix, Rational};
use crate::utils::error::{CalcError, CalcResult};

/// Replace every bound symbol with its value. Used to splice extracted
/// matrix values back in over their placeholder names before simplification
/// is forced.
pub fn substitute(expr: &Expr, bindings: &FxHashMap<String, Expr>) -> Expr {
    match expr {
        Expr::Symbol(name) => bindings
            .get(name)
            .cloned()
            .unwrap_or_else(|| expr.clone()),
        Expr::Number(_) => expr.clone(),
        Expr::Add(terms) => Expr::Add(terms.iter().map(|t| substitute(t, bindings)).collect()),
        Expr::Mul(factors) => Expr::Mul(factors.iter().map(|f| substitute(f, bindings)).collect()),
        Expr::Div(num, den) => Expr::Div(
            Box::new(substitute(num, bindings)),
            Box::new(substitute(den, bindings)),
        ),
        Expr::Pow(base, exp) => Expr::Pow(
            Box::new(substitute(base, bindings)),
            Box::new(substitute(exp, bindings)),
        ),
        Expr::Sqrt(arg) => Expr::Sqrt(Box::new(substitute(arg, bindings))),
        Expr::Matrix(m) => {
            let rows: Vec<Vec<Expr>> = m
                .row_slices()
                .map(|row| row.iter().map(|c| substitute(c, bindings)).collect())
                .collect();
            // shape is unchanged by substitution
            match Matrix::from_rows(rows) {
                Ok(m) => Expr::Matrix(m),
                Err(_) => expr.clone(),
            }
        }
    }
}

/// Simplify an expression as far as exact arithmetic allows.
pub fn simplify(expr: &Expr) -> CalcResult<Expr> {
    match expr {
        Expr::Number(_) | Expr::Symbol(_) => Ok(expr.clone()),
        Expr::Matrix(m) => {
            let rows: CalcResult<Vec<Vec<Expr>>> = m
                .row_slices()
                .map(|row| row.iter().map(simplify).collect())
                .collect();
            Ok(Expr::Matrix(Matrix::from_rows(rows?)?))
        }
        Expr::Add(terms) => {
            let mut flat = Vec::new();
            for term in terms {
                match simplify(term)? {
                    Expr::Add(inner) => flat.extend(inner),
                    other => flat.push(other),
                }
            }
            simplify_sum(flat)
        }
        Expr::Mul(factors) => {
            let mut flat = Vec::new();
            for factor in factors {
                match simplify(factor)? {
                    Expr::Mul(inner) => flat.extend(inner),
                    other => flat.push(other),
                }
            }
            simplify_product(flat)
        }
        Expr::Div(num, den) => simplify_quotient(simplify(num)?, simplify(den)?),
        Expr::Pow(base, exp) => simplify_power(simplify(base)?, simplify(exp)?),
        Expr::Sqrt(arg) => {
            let arg = simplify(arg)?;
            if let Expr::Number(r) = &arg {
                if let Some(root) = r.exact_sqrt() {
                    return Ok(Expr::Number(root));
                }
            }
            Ok(Expr::Sqrt(Box::new(arg)))
        }
    }
}

fn simplify_sum(terms: Vec<Expr>) -> CalcResult<Expr> {
    if terms.iter().any(|t| matches!(t, Expr::Matrix(_))) {
        return simplify_matrix_sum(terms);
    }

    let mut constant = Rational::ZERO;
    // like-term collection: rest of term -> accumulated coefficient
    let mut collected: Vec<(Expr, Rational)> = Vec::new();

    for term in terms {
        let (coeff, rest) = split_coefficient(term);
        match rest {
            None => constant = constant.checked_add(&coeff)?,
            Some(rest) => {
                if let Some(entry) = collected.iter_mut().find(|(e, _)| *e == rest) {
                    entry.1 = entry.1.checked_add(&coeff)?;
                } else {
                    collected.push((rest, coeff));
                }
            }
        }
    }

    let mut result = Vec::new();
    for (rest, coeff) in collected {
        if coeff.is_zero() {
            continue;
        }
        if coeff.is_one() {
            result.push(rest);
        } else {
            result.push(apply_coefficient(coeff, rest));
        }
    }
    if !constant.is_zero() || result.is_empty() {
        result.push(Expr::Number(constant));
    }

    if result.len() == 1 {
        Ok(result.remove(0))
    } else {
        Ok(Expr::Add(result))
    }
}

fn simplify_matrix_sum(terms: Vec<Expr>) -> CalcResult<Expr> {
    let mut sum: Option<Matrix> = None;
    for term in terms {
        let matrix = match term {
            Expr::Matrix(m) => m,
            _ => return Err(CalcError::eval("cannot add a matrix and a scalar")),
        };
        sum = Some(match sum {
            None => matrix,
            Some(acc) => matrix_add(&acc, &matrix)?,
        });
    }
    match sum {
        Some(m) => Ok(Expr::Matrix(m)),
        None => Ok(Expr::integer(0)),
    }
}

/// Split a simplified term into (numeric coefficient, symbolic rest).
/// A pure number has no rest.
fn split_coefficient(term: Expr) -> (Rational, Option<Expr>) {
    match term {
        Expr::Number(r) => (r, None),
        Expr::Mul(mut factors) => {
            if let Some(Expr::Number(r)) = factors.first() {
                let coeff = *r;
                factors.remove(0);
                if factors.is_empty() {
                    return (coeff, None);
                }
                let rest = if factors.len() == 1 {
                    factors.remove(0)
                } else {
                    Expr::Mul(factors)
                };
                (coeff, Some(rest))
            } else {
                (Rational::ONE, Some(Expr::Mul(factors)))
            }
        }
        other => (Rational::ONE, Some(other)),
    }
}

fn apply_coefficient(coeff: Rational, rest: Expr) -> Expr {
    match rest {
        Expr::Mul(mut factors) => {
            factors.insert(0, Expr::Number(coeff));
            Expr::Mul(factors)
        }
        other => Expr::Mul(vec![Expr::Number(coeff), other]),
    }
}

fn simplify_product(factors: Vec<Expr>) -> CalcResult<Expr> {
    let mut constant = Rational::ONE;
    let mut matrices: Vec<Matrix> = Vec::new();
    let mut symbolic: Vec<Expr> = Vec::new();

    for factor in factors {
        match factor {
            Expr::Number(r) => constant = constant.checked_mul(&r)?,
            Expr::Matrix(m) => matrices.push(m),
            other => symbolic.push(other),
        }
    }

    if !matrices.is_empty() {
        let mut product = matrices.remove(0);
        for rhs in &matrices {
            product = matrix_mul(&product, rhs)?;
        }
        if !constant.is_one() {
            product = matrix_scale(&constant, &product)?;
        }
        if symbolic.is_empty() {
            return Ok(Expr::Matrix(product));
        }
        symbolic.push(Expr::Matrix(product));
        return Ok(Expr::Mul(symbolic));
    }

    if constant.is_zero() {
        return Ok(Expr::integer(0));
    }

    // merge repeated bases into integer powers
    let mut bases: Vec<(Expr, i64)> = Vec::new();
    for factor in symbolic {
        let (base, count) = match factor {
            Expr::Pow(base, exp) => match exp.as_number().and_then(|r| r.as_integer()) {
                Some(n) => (*base, n),
                None => (Expr::Pow(base, exp), 1),
            },
            other => (other, 1),
        };
        if let Some(entry) = bases.iter_mut().find(|(b, _)| *b == base) {
            entry.1 += count;
        } else {
            bases.push((base, count));
        }
    }

    let mut result = Vec::new();
    if !constant.is_one() {
        result.push(Expr::Number(constant));
    }
    for (base, count) in bases {
        match count {
            0 => {}
            1 => result.push(base),
            n => result.push(Expr::Pow(Box::new(base), Box::new(Expr::integer(n)))),
        }
    }

    match result.len() {
        0 => Ok(Expr::integer(1)),
        1 => Ok(result.remove(0)),
        _ => Ok(Expr::Mul(result)),
    }
}

fn simplify_quotient(num: Expr, den: Expr) -> CalcResult<Expr> {
    match (&num, &den) {
        (Expr::Number(a), Expr::Number(b)) => Ok(Expr::Number(a.checked_div(b)?)),
        (Expr::Matrix(m), Expr::Number(b)) => {
            if b.is_zero() {
                return Err(CalcError::eval("division by zero"));
            }
            let inverse = Rational::ONE.checked_div(b)?;
            Ok(Expr::Matrix(matrix_scale(&inverse, m)?))
        }
        (_, Expr::Number(b)) if b.is_one() => Ok(num),
        (Expr::Number(a), _) if a.is_zero() => Ok(Expr::integer(0)),
        _ => Ok(Expr::Div(Box::new(num), Box::new(den))),
    }
}

fn simplify_power(base: Expr, exp: Expr) -> CalcResult<Expr> {
    let int_exp = exp.as_number().and_then(|r| r.as_integer());

    if let Expr::Matrix(m) = &base {
        return match int_exp {
            Some(n) if n >= 0 => Ok(Expr::Matrix(matrix_pow(m, n)?)),
            Some(_) => Err(CalcError::eval("matrix inverse is not supported")),
            None => Err(CalcError::eval("matrix power must be an integer")),
        };
    }

    match int_exp {
        Some(0) => Ok(Expr::integer(1)),
        Some(1) => Ok(base),
        Some(n) => match &base {
            Expr::Number(r) => Ok(Expr::Number(r.checked_pow(n)?)),
            _ => Ok(Expr::Pow(Box::new(base), Box::new(exp))),
        },
        None => {
            if let (Expr::Number(r), Some(e)) = (&base, exp.as_number()) {
                // x^(1/2) folds exactly like \sqrt{x}
                if e == Rational::new(1, 2)? {
                    if let Some(root) = r.exact_sqrt() {
                        return Ok(Expr::Number(root));
                    }
                }
            }
            Ok(Expr::Pow(Box::new(base), Box::new(exp)))
        }
    }
}

fn matrix_add(a: &Matrix, b: &Matrix) -> CalcResult<Matrix> {
    if a.shape() != b.shape() {
        return Err(CalcError::eval(format!(
            "matrix shapes do not match: {}x{} vs {}x{}",
            a.rows(),
            a.cols(),
            b.rows(),
            b.cols()
        )));
    }
    Matrix::from_fn(a.rows(), a.cols(), |r, c| {
        simplify(&Expr::Add(vec![a.get(r, c).clone(), b.get(r, c).clone()]))
    })
}

fn matrix_mul(a: &Matrix, b: &Matrix) -> CalcResult<Matrix> {
    if a.cols() != b.rows() {
        return Err(CalcError::eval(format!(
            "matrix shapes do not match for multiplication: {}x{} vs {}x{}",
            a.rows(),
            a.cols(),
            b.rows(),
            b.cols()
        )));
    }
    Matrix::from_fn(a.rows(), b.cols(), |r, c| {
        let products = (0..a.cols())
            .map(|k| Expr::Mul(vec![a.get(r, k).clone(), b.get(k, c).clone()]))
            .collect();
        simplify(&Expr::Add(products))
    })
}

fn matrix_scale(scalar: &Rational, m: &Matrix) -> CalcResult<Matrix> {
    Matrix::from_fn(m.rows(), m.cols(), |r, c| {
        simplify(&Expr::Mul(vec![
            Expr::Number(*scalar),
            m.get(r, c).clone(),
        ]))
    })
}

// exp must be non-negative; repeated squaring keeps huge exponents cheap
fn matrix_pow(m: &Matrix, exp: i64) -> CalcResult<Matrix> {
    if m.rows() != m.cols() {
        return Err(CalcError::eval("matrix power requires a square matrix"));
    }
    let mut result = Matrix::from_fn(m.rows(), m.cols(), |r, c| {
        Ok(Expr::integer(if r == c { 1 } else { 0 }))
    })?;
    let mut base = m.clone();
    let mut remaining = exp as u64;
    while remaining > 0 {
        if remaining & 1 == 1 {
            result = matrix_mul(&result, &base)?;
        }
        remaining >>= 1;
        if remaining > 0 {
            base = matrix_mul(&base, &base)?;
        }
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::engine::parser::parse;

    fn simplified(input: &str) -> Expr {
        simplify(&parse(input).unwrap()).unwrap()
    }

    #[test]
    fn test_numeric_folding() {
        assert_eq!(simplified("1+1"), Expr::integer(2));
        assert_eq!(simplified("2*3+4"), Expr::integer(10));
        assert_eq!(simplified("2^{10}"), Expr::integer(1024));
        assert_eq!(simplified("\\sqrt{9}"), Expr::integer(3));
        assert_eq!(
            simplified("\\frac{1}{2}+\\frac{1}{4}"),
            Expr::Number(Rational::new(3, 4).unwrap())
        );
    }

    #[test]
    fn test_like_term_collection() {
        assert_eq!(
            simplified("x+x"),
            Expr::Mul(vec![Expr::integer(2), Expr::symbol("x")])
        );
        assert_eq!(simplified("x-x"), Expr::integer(0));
        assert_eq!(
            simplified("2x+3x"),
            Expr::Mul(vec![Expr::integer(5), Expr::symbol("x")])
        );
    }

    #[test]
    fn test_identity_elimination() {
        assert_eq!(simplified("x+0"), Expr::symbol("x"));
        assert_eq!(simplified("1x"), Expr::symbol("x"));
        assert_eq!(simplified("0x"), Expr::integer(0));
    }

    #[test]
    fn test_repeated_bases_merge() {
        assert_eq!(
            simplified("x x"),
            Expr::Pow(Box::new(Expr::symbol("x")), Box::new(Expr::integer(2)))
        );
        assert_eq!(
            simplified("x^2 x^3"),
            Expr::Pow(Box::new(Expr::symbol("x")), Box::new(Expr::integer(5)))
        );
    }

    #[test]
    fn test_unfoldable_stays_symbolic() {
        let e = simplified("\\sqrt{2}");
        assert_eq!(e, Expr::Sqrt(Box::new(Expr::integer(2))));
    }

    #[test]
    fn test_division_by_zero_is_an_error() {
        assert!(simplify(&parse("1/0").unwrap()).is_err());
    }

    #[test]
    fn test_matrix_addition() {
        let a = Matrix::from_rows(vec![
            vec![Expr::integer(1), Expr::integer(2)],
            vec![Expr::integer(3), Expr::integer(4)],
        ])
        .unwrap();
        let b = Matrix::from_rows(vec![
            vec![Expr::integer(1), Expr::integer(0)],
            vec![Expr::integer(0), Expr::integer(1)],
        ])
        .unwrap();
        let sum = simplify(&Expr::Add(vec![Expr::Matrix(a), Expr::Matrix(b)])).unwrap();
        let expected = Matrix::from_rows(vec![
            vec![Expr::integer(2), Expr::integer(2)],
            vec![Expr::integer(3), Expr::integer(5)],
        ])
        .unwrap();
        assert_eq!(sum, Expr::Matrix(expected));
    }

    #[test]
    fn test_matrix_shape_mismatch() {
        let a = Matrix::from_rows(vec![vec![Expr::integer(1), Expr::integer(2)]]).unwrap();
        let b = Matrix::from_rows(vec![vec![Expr::integer(1)]]).unwrap();
        assert!(simplify(&Expr::Add(vec![Expr::Matrix(a), Expr::Matrix(b)])).is_err());
    }

    #[test]
    fn test_matrix_scalar_product() {
        let m = Matrix::from_rows(vec![vec![Expr::integer(1), Expr::integer(-2)]]).unwrap();
        let scaled = simplify(&Expr::Mul(vec![Expr::integer(3), Expr::Matrix(m)])).unwrap();
        let expected =
            Matrix::from_rows(vec![vec![Expr::integer(3), Expr::integer(-6)]]).unwrap();
        assert_eq!(scaled, Expr::Matrix(expected));
    }

    #[test]
    fn test_matrix_product() {
        let a = Matrix::from_rows(vec![
            vec![Expr::integer(1), Expr::integer(2)],
            vec![Expr::integer(3), Expr::integer(4)],
        ])
        .unwrap();
        let b = Matrix::from_rows(vec![
            vec![Expr::integer(0), Expr::integer(1)],
            vec![Expr::integer(1), Expr::integer(0)],
        ])
        .unwrap();
        let product =
            simplify(&Expr::Mul(vec![Expr::Matrix(a), Expr::Matrix(b)])).unwrap();
        let expected = Matrix::from_rows(vec![
            vec![Expr::integer(2), Expr::integer(1)],
            vec![Expr::integer(4), Expr::integer(3)],
        ])
        .unwrap();
        assert_eq!(product, Expr::Matrix(expected));
    }

    #[test]
    fn test_matrix_power() {
        let m = Matrix::from_rows(vec![
            vec![Expr::integer(1), Expr::integer(1)],
            vec![Expr::integer(0), Expr::integer(1)],
        ])
        .unwrap();
        let squared = simplify(&Expr::Pow(
            Box::new(Expr::Matrix(m)),
            Box::new(Expr::integer(2)),
        ))
        .unwrap();
        let expected = Matrix::from_rows(vec![
            vec![Expr::integer(1), Expr::integer(2)],
            vec![Expr::integer(0), Expr::integer(1)],
        ])
        .unwrap();
        assert_eq!(squared, Expr::Matrix(expected));
    }

    #[test]
    fn test_huge_power_of_one_terminates() {
        assert_eq!(simplified("1^{1000000000000}"), Expr::integer(1));
    }

    #[test]
    fn test_overflowing_power_is_an_error() {
        assert!(simplify(&parse("2^{1000}").unwrap()).is_err());
    }

    #[test]
    fn test_identity_matrix_huge_power() {
        let identity = Matrix::from_rows(vec![
            vec![Expr::integer(1), Expr::integer(0)],
            vec![Expr::integer(0), Expr::integer(1)],
        ])
        .unwrap();
        let raised = simplify(&Expr::Pow(
            Box::new(Expr::Matrix(identity.clone())),
            Box::new(Expr::integer(1_000_000_000_000)),
        ))
        .unwrap();
        assert_eq!(raised, Expr::Matrix(identity));
    }

    #[test]
    fn test_substitute_binds_placeholders() {
        let mut bindings = FxHashMap::default();
        let m = Matrix::from_rows(vec![vec![Expr::integer(7)]]).unwrap();
        bindings.insert("aaaaaaaaaa".to_string(), Expr::Matrix(m.clone()));
        let expr = parse("2\\aaaaaaaaaa").unwrap();
        let bound = substitute(&expr, &bindings);
        let result = simplify(&bound).unwrap();
        let expected = Matrix::from_rows(vec![vec![Expr::integer(14)]]).unwrap();
        assert_eq!(result, Expr::Matrix(expected));
    }

    #[test]
    fn test_substitute_leaves_free_symbols() {
        let bindings = FxHashMap::default();
        let expr = parse("x+1").unwrap();
        assert_eq!(substitute(&expr, &bindings), expr);
    }
}
