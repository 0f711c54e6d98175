//! LaTeX math parser
//!
//! Converts a LaTeX math fragment into an expression tree. The grammar is
//! the arithmetic subset the calculator evaluates: numeric literals,
//! single-letter symbols, `+ - * /`, `\cdot`, `\times`, `\frac`, `\sqrt`,
//! `^` with braced groups, parentheses (bare or `\left`/`\right`), and
//! implicit multiplication by adjacency. Unknown control words become free
//! symbols, which is also how matrix placeholders re-enter the tree.

use std::iter::Peekable;
use std::str::CharIndices;

use super::ast::{Expr, Rational};
use crate::utils::error::{CalcError, CalcResult};

/// Parse a LaTeX math fragment into an expression.
pub fn parse(input: &str) -> CalcResult<Expr> {
    let mut parser = Parser::new(input);
    parser.skip_whitespace();
    if parser.peek_char().is_none() {
        return Err(CalcError::parse("empty expression"));
    }
    let expr = parser.parse_expr()?;
    parser.skip_whitespace();
    if let Some(c) = parser.peek_char() {
        return Err(CalcError::parse_at(
            format!("unexpected character '{}'", c),
            parser.position(),
        ));
    }
    Ok(expr)
}

struct Parser<'a> {
    input: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Parser {
            input,
            chars: input.char_indices().peekable(),
        }
    }

    /// Peek at the next character without consuming it
    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, c)| *c)
    }

    /// Byte offset of the next character (input length at end of input)
    fn position(&mut self) -> usize {
        self.chars
            .peek()
            .map(|(i, _)| *i)
            .unwrap_or(self.input.len())
    }

    /// Consume and return the next character
    fn next_char(&mut self) -> Option<char> {
        self.chars.next().map(|(_, c)| c)
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek_char() {
            if c.is_ascii_whitespace() {
                self.next_char();
            } else {
                break;
            }
        }
    }

    fn expect_char(&mut self, expected: char) -> CalcResult<()> {
        self.skip_whitespace();
        let pos = self.position();
        match self.peek_char() {
            Some(c) if c == expected => {
                self.next_char();
                Ok(())
            }
            Some(c) => Err(CalcError::parse_at(
                format!("expected '{}', found '{}'", expected, c),
                pos,
            )),
            None => Err(CalcError::parse_at(
                format!("expected '{}', found end of input", expected),
                pos,
            )),
        }
    }

    /// Read a control word after the backslash has been consumed.
    /// Multi-letter words only; a single non-letter yields that character.
    fn read_control_word(&mut self) -> String {
        let mut name = String::new();
        if let Some(c) = self.peek_char() {
            if c.is_ascii_alphabetic() {
                while let Some(c) = self.peek_char() {
                    if c.is_ascii_alphabetic() {
                        name.push(c);
                        self.next_char();
                    } else {
                        break;
                    }
                }
            } else {
                name.push(c);
                self.next_char();
            }
        }
        name
    }

    /// Look ahead at the control word following a '\\' without consuming
    /// anything. Returns None when the backslash is the last character.
    fn peek_control_word(&mut self) -> Option<String> {
        let mut lookahead = self.chars.clone();
        lookahead.next(); // the backslash
        let (_, first) = *lookahead.peek()?;
        let mut name = String::new();
        if first.is_ascii_alphabetic() {
            for (_, c) in lookahead {
                if c.is_ascii_alphabetic() {
                    name.push(c);
                } else {
                    break;
                }
            }
        } else {
            name.push(first);
        }
        Some(name)
    }

    // expr := ['+'|'-'] term (('+'|'-') term)*
    fn parse_expr(&mut self) -> CalcResult<Expr> {
        self.skip_whitespace();
        let mut terms = Vec::new();

        let mut negate_first = false;
        match self.peek_char() {
            Some('-') => {
                self.next_char();
                negate_first = true;
            }
            Some('+') => {
                self.next_char();
            }
            _ => {}
        }

        let first = self.parse_term()?;
        terms.push(if negate_first { negate(first) } else { first });

        loop {
            self.skip_whitespace();
            match self.peek_char() {
                Some('+') => {
                    self.next_char();
                    let term = self.parse_term()?;
                    terms.push(term);
                }
                Some('-') => {
                    self.next_char();
                    let term = self.parse_term()?;
                    terms.push(negate(term));
                }
                _ => break,
            }
        }

        if terms.len() == 1 {
            Ok(terms.remove(0))
        } else {
            Ok(Expr::Add(terms))
        }
    }

    // term := factor (('*'|'/'|'\cdot'|'\times'|adjacency) factor)*
    fn parse_term(&mut self) -> CalcResult<Expr> {
        self.skip_whitespace();
        let mut lhs = self.parse_factor()?;
        loop {
            self.skip_whitespace();
            match self.peek_char() {
                Some('*') => {
                    self.next_char();
                    let rhs = self.parse_factor()?;
                    lhs = multiply(lhs, rhs);
                }
                Some('/') => {
                    self.next_char();
                    let rhs = self.parse_factor()?;
                    lhs = Expr::Div(Box::new(lhs), Box::new(rhs));
                }
                Some('\\') => match self.peek_control_word().as_deref() {
                    Some("cdot") | Some("times") => {
                        self.next_char();
                        self.read_control_word();
                        let rhs = self.parse_factor()?;
                        lhs = multiply(lhs, rhs);
                    }
                    Some("right") => break,
                    Some(_) => {
                        // implicit multiplication with a control-word atom
                        let rhs = self.parse_factor()?;
                        lhs = multiply(lhs, rhs);
                    }
                    None => break,
                },
                Some(c) if c.is_ascii_alphanumeric() || c == '(' || c == '{' || c == '.' => {
                    // implicit multiplication by adjacency
                    let rhs = self.parse_factor()?;
                    lhs = multiply(lhs, rhs);
                }
                _ => break,
            }
        }
        Ok(lhs)
    }

    // factor := atom ['^' exponent]
    fn parse_factor(&mut self) -> CalcResult<Expr> {
        self.skip_whitespace();
        let base = self.parse_atom()?;
        self.skip_whitespace();
        if self.peek_char() == Some('^') {
            self.next_char();
            let exponent = self.parse_exponent()?;
            return Ok(Expr::Pow(Box::new(base), Box::new(exponent)));
        }
        Ok(base)
    }

    fn parse_exponent(&mut self) -> CalcResult<Expr> {
        self.skip_whitespace();
        match self.peek_char() {
            Some('{') => {
                self.next_char();
                let expr = self.parse_expr()?;
                self.expect_char('}')?;
                Ok(expr)
            }
            Some('-') => {
                self.next_char();
                let atom = self.parse_atom()?;
                Ok(negate(atom))
            }
            // an unbraced exponent binds a single digit: x^23 is x^2 * 3
            Some(c) if c.is_ascii_digit() => {
                self.next_char();
                Ok(Expr::integer((c as u8 - b'0') as i64))
            }
            _ => self.parse_atom(),
        }
    }

    fn parse_atom(&mut self) -> CalcResult<Expr> {
        self.skip_whitespace();
        let pos = self.position();
        match self.peek_char() {
            None => Err(CalcError::parse_at("unexpected end of input", pos)),
            Some(c) if c.is_ascii_digit() || c == '.' => self.parse_number(),
            Some(c) if c.is_ascii_alphabetic() => {
                self.next_char();
                Ok(Expr::symbol(c.to_string()))
            }
            Some('(') => {
                self.next_char();
                let expr = self.parse_expr()?;
                self.expect_char(')')?;
                Ok(expr)
            }
            Some('{') => {
                self.next_char();
                let expr = self.parse_expr()?;
                self.expect_char('}')?;
                Ok(expr)
            }
            Some('\\') => self.parse_control(),
            Some(c) => Err(CalcError::parse_at(
                format!("unexpected character '{}'", c),
                pos,
            )),
        }
    }

    fn parse_number(&mut self) -> CalcResult<Expr> {
        let pos = self.position();
        let mut integer: i64 = 0;
        let mut fraction: i64 = 0;
        let mut frac_digits: u32 = 0;
        let mut seen_digit = false;

        while let Some(c) = self.peek_char() {
            if let Some(d) = c.to_digit(10) {
                integer = integer
                    .checked_mul(10)
                    .and_then(|n| n.checked_add(d as i64))
                    .ok_or_else(|| CalcError::parse_at("numeric literal too large", pos))?;
                seen_digit = true;
                self.next_char();
            } else {
                break;
            }
        }

        if self.peek_char() == Some('.') {
            self.next_char();
            while let Some(c) = self.peek_char() {
                if let Some(d) = c.to_digit(10) {
                    fraction = fraction
                        .checked_mul(10)
                        .and_then(|n| n.checked_add(d as i64))
                        .ok_or_else(|| CalcError::parse_at("numeric literal too large", pos))?;
                    frac_digits += 1;
                    seen_digit = true;
                    self.next_char();
                } else {
                    break;
                }
            }
        }

        if !seen_digit {
            return Err(CalcError::parse_at("expected digits", pos));
        }

        if frac_digits == 0 {
            return Ok(Expr::Number(Rational::integer(integer)));
        }

        let scale = 10i64
            .checked_pow(frac_digits)
            .ok_or_else(|| CalcError::parse_at("numeric literal too large", pos))?;
        let numerator = integer
            .checked_mul(scale)
            .and_then(|n| n.checked_add(fraction))
            .ok_or_else(|| CalcError::parse_at("numeric literal too large", pos))?;
        Ok(Expr::Number(Rational::new(numerator, scale)?))
    }

    fn parse_control(&mut self) -> CalcResult<Expr> {
        let pos = self.position();
        self.next_char(); // the backslash
        let name = self.read_control_word();
        if name.is_empty() {
            return Err(CalcError::parse_at("lone backslash", pos));
        }
        if !name.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(CalcError::parse_at(
                format!("unsupported control sequence '\\{}'", name),
                pos,
            ));
        }
        match name.as_str() {
            "frac" => {
                let numerator = self.parse_group()?;
                let denominator = self.parse_group()?;
                Ok(Expr::Div(Box::new(numerator), Box::new(denominator)))
            }
            "sqrt" => {
                let radicand = self.parse_group()?;
                Ok(Expr::Sqrt(Box::new(radicand)))
            }
            "left" => {
                self.skip_whitespace();
                self.next_char().ok_or_else(|| {
                    CalcError::parse_at("missing delimiter after '\\left'", pos)
                })?;
                let expr = self.parse_expr()?;
                self.expect_control_word("right")?;
                self.next_char().ok_or_else(|| {
                    CalcError::parse_at("missing delimiter after '\\right'", pos)
                })?;
                Ok(expr)
            }
            "cdot" | "times" | "right" => Err(CalcError::parse_at(
                format!("unexpected '\\{}'", name),
                pos,
            )),
            // Greek letters, constants, generated matrix placeholders
            _ => Ok(Expr::symbol(name)),
        }
    }

    fn parse_group(&mut self) -> CalcResult<Expr> {
        self.expect_char('{')?;
        let expr = self.parse_expr()?;
        self.expect_char('}')?;
        Ok(expr)
    }

    fn expect_control_word(&mut self, expected: &str) -> CalcResult<()> {
        self.skip_whitespace();
        let pos = self.position();
        if self.peek_char() != Some('\\') {
            return Err(CalcError::parse_at(format!("expected '\\{}'", expected), pos));
        }
        self.next_char();
        let name = self.read_control_word();
        if name != expected {
            return Err(CalcError::parse_at(
                format!("expected '\\{}', found '\\{}'", expected, name),
                pos,
            ));
        }
        Ok(())
    }
}

fn negate(expr: Expr) -> Expr {
    match expr {
        Expr::Number(r) => match r.neg() {
            Ok(n) => Expr::Number(n),
            Err(_) => multiply(Expr::integer(-1), Expr::Number(r)),
        },
        other => multiply(Expr::integer(-1), other),
    }
}

fn multiply(lhs: Expr, rhs: Expr) -> Expr {
    match lhs {
        Expr::Mul(mut factors) => {
            factors.push(rhs);
            Expr::Mul(factors)
        }
        other => Expr::Mul(vec![other, rhs]),
    }
}
