//! LaTeX rendering of expressions
//!
//! Emits the canonical output form: `\frac` for non-integer rationals,
//! `\left( \right)` grouping where precedence demands it, and matrices in
//! the canonical `pmatrix` spelling. The delimiter normalizer restyles the
//! matrix spelling afterwards when the caller asked for brackets.

use super::ast::{Expr, Matrix, Rational};

/// Render an expression as a LaTeX fragment.
pub fn render(expr: &Expr) -> String {
    match expr {
        Expr::Number(r) => render_number(r),
        Expr::Symbol(name) => render_symbol(name),
        Expr::Add(terms) => render_sum(terms),
        Expr::Mul(factors) => render_product(factors),
        Expr::Div(num, den) => format!("\\frac{{{}}}{{{}}}", render(num), render(den)),
        Expr::Pow(base, exp) => {
            format!("{}^{{{}}}", render_power_base(base), render(exp))
        }
        Expr::Sqrt(arg) => format!("\\sqrt{{{}}}", render(arg)),
        Expr::Matrix(m) => render_matrix(m),
    }
}

fn render_number(r: &Rational) -> String {
    if let Some(n) = r.as_integer() {
        n.to_string()
    } else {
        let sign = if r.is_negative() { "-" } else { "" };
        format!(
            "{}\\frac{{{}}}{{{}}}",
            sign,
            r.numerator().unsigned_abs(),
            r.denominator()
        )
    }
}

fn render_symbol(name: &str) -> String {
    if name.chars().count() == 1 {
        name.to_string()
    } else {
        format!("\\{}", name)
    }
}

fn render_sum(terms: &[Expr]) -> String {
    let mut out = String::new();
    for (i, term) in terms.iter().enumerate() {
        if i == 0 {
            out.push_str(&render(term));
            continue;
        }
        match negated_form(term) {
            Some(positive) => {
                out.push_str(" - ");
                out.push_str(&render(&positive));
            }
            None => {
                out.push_str(" + ");
                out.push_str(&render(term));
            }
        }
    }
    out
}

/// If the term carries a negative leading coefficient, return it with the
/// sign stripped so the sum can print `a - b` instead of `a + -b`.
fn negated_form(term: &Expr) -> Option<Expr> {
    match term {
        Expr::Number(r) if r.is_negative() => r.neg().ok().map(Expr::Number),
        Expr::Mul(factors) => match factors.first() {
            Some(Expr::Number(r)) if r.is_negative() => {
                let mut rest: Vec<Expr> = factors[1..].to_vec();
                let coeff = r.neg().ok()?;
                if !coeff.is_one() {
                    rest.insert(0, Expr::Number(coeff));
                }
                if rest.len() == 1 {
                    rest.pop()
                } else {
                    Some(Expr::Mul(rest))
                }
            }
            _ => None,
        },
        _ => None,
    }
}

fn render_product(factors: &[Expr]) -> String {
    let mut prefix = "";
    let mut rest = factors;
    if let Some(Expr::Number(r)) = factors.first() {
        if *r == Rational::integer(-1) && factors.len() > 1 {
            prefix = "-";
            rest = &factors[1..];
        }
    }
    let parts: Vec<String> = rest.iter().map(render_factor).collect();
    format!("{}{}", prefix, parts.join(" "))
}

fn render_factor(factor: &Expr) -> String {
    match factor {
        Expr::Add(_) => wrap(&render(factor)),
        _ => render(factor),
    }
}

fn render_power_base(base: &Expr) -> String {
    match base {
        Expr::Symbol(_) | Expr::Matrix(_) => render(base),
        Expr::Number(r) if !r.is_negative() && r.is_integer() => render(base),
        _ => wrap(&render(base)),
    }
}

fn render_matrix(m: &Matrix) -> String {
    let rows: Vec<String> = m
        .row_slices()
        .map(|row| {
            row.iter()
                .map(render)
                .collect::<Vec<String>>()
                .join(" & ")
        })
        .collect();
    format!("\\begin{{pmatrix}}{}\\end{{pmatrix}}", rows.join("\\\\"))
}

fn wrap(inner: &str) -> String {
    format!("\\left({}\\right)", inner)
}
