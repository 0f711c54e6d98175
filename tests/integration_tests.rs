//! Integration tests for calctex end-to-end evaluation

use calctex::{
    evaluate_latex, evaluate_latex_with_options, BracketStyle, CalcError, ConvertOptions,
};

fn options(equation_form: bool, bracket_style: BracketStyle) -> ConvertOptions {
    ConvertOptions {
        equation_form,
        bracket_style,
    }
}

// ============================================================================
// Scalar Evaluation
// ============================================================================

mod scalar {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_simple_addition() {
        assert_eq!(evaluate_latex("1+1").unwrap(), "2");
    }

    #[test]
    fn test_precedence() {
        assert_eq!(evaluate_latex("2*3+4").unwrap(), "10");
        assert_eq!(evaluate_latex("2+3*4").unwrap(), "14");
        assert_eq!(evaluate_latex("2(3+4)").unwrap(), "14");
    }

    #[test]
    fn test_fractions() {
        assert_eq!(
            evaluate_latex("\\frac{1}{2}+\\frac{1}{4}").unwrap(),
            "\\frac{3}{4}"
        );
        assert_eq!(evaluate_latex("\\frac{4}{2}").unwrap(), "2");
    }

    #[test]
    fn test_decimals_become_exact() {
        assert_eq!(evaluate_latex("0.5+0.5").unwrap(), "1");
        assert_eq!(evaluate_latex("0.1+0.2").unwrap(), "\\frac{3}{10}");
    }

    #[test]
    fn test_powers_and_roots() {
        assert_eq!(evaluate_latex("2^{10}").unwrap(), "1024");
        assert_eq!(evaluate_latex("\\sqrt{16}").unwrap(), "4");
        assert_eq!(evaluate_latex("\\sqrt{2}").unwrap(), "\\sqrt{2}");
    }

    #[test]
    fn test_symbolic_terms_collect() {
        assert_eq!(evaluate_latex("x+x").unwrap(), "2 x");
        assert_eq!(evaluate_latex("2x+3x-5x").unwrap(), "0");
        assert_eq!(evaluate_latex("\\alpha+\\alpha").unwrap(), "2 \\alpha");
    }

    #[test]
    fn test_cdot_and_times() {
        assert_eq!(evaluate_latex("2\\cdot 3").unwrap(), "6");
        assert_eq!(evaluate_latex("2\\times 3").unwrap(), "6");
    }

    #[test]
    fn test_left_right_parens() {
        assert_eq!(evaluate_latex("\\left(1+2\\right)^2").unwrap(), "9");
    }

    #[test]
    fn test_unbraced_exponent_binds_one_digit() {
        // LaTeX reads 2^34 as 2^3 * 4
        assert_eq!(evaluate_latex("2^34").unwrap(), "32");
    }

    #[test]
    fn test_huge_exponent_of_one() {
        assert_eq!(evaluate_latex("1^{1000000000000}").unwrap(), "1");
    }
}

// ============================================================================
// Equation Form and Bracket Style
// ============================================================================

mod formatting {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_equation_form() {
        let out = evaluate_latex_with_options("2+2", &options(true, BracketStyle::Round)).unwrap();
        assert_eq!(out, "2+2 = 4");
    }

    #[test]
    fn test_equation_form_preserves_raw_input() {
        let input = "\\begin{bmatrix}1\\end{bmatrix}";
        let out = evaluate_latex_with_options(input, &options(true, BracketStyle::Round)).unwrap();
        assert_eq!(
            out,
            "\\begin{bmatrix}1\\end{bmatrix} = \\begin{pmatrix}1\\end{pmatrix}"
        );
    }

    #[test]
    fn test_bracket_style_applies_regardless_of_input_spelling() {
        let inputs = [
            "\\begin{pmatrix}1&2\\\\3&4\\end{pmatrix}",
            "\\begin{bmatrix}1&2\\\\3&4\\end{bmatrix}",
            "\\left(\\begin{matrix}1&2\\\\3&4\\end{matrix}\\right)",
        ];
        for input in inputs {
            let out =
                evaluate_latex_with_options(input, &options(false, BracketStyle::Square)).unwrap();
            assert_eq!(out, "\\begin{bmatrix}1 & 2\\\\3 & 4\\end{bmatrix}");
        }
    }

    #[test]
    fn test_default_style_is_round() {
        let out = evaluate_latex("\\begin{bmatrix}7\\end{bmatrix}").unwrap();
        assert_eq!(out, "\\begin{pmatrix}7\\end{pmatrix}");
    }
}

// ============================================================================
// Matrix Arithmetic
// ============================================================================

mod matrices {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_matrix_addition() {
        let input = "\\begin{pmatrix}1&2\\\\3&4\\end{pmatrix}+\\begin{pmatrix}1&0\\\\0&1\\end{pmatrix}";
        assert_eq!(
            evaluate_latex(input).unwrap(),
            "\\begin{pmatrix}2 & 2\\\\3 & 5\\end{pmatrix}"
        );
    }

    #[test]
    fn test_matrix_addition_across_spellings() {
        let input = "\\begin{bmatrix}1&2\\\\3&4\\end{bmatrix}+\\left(\\begin{matrix}1&0\\\\0&1\\end{matrix}\\right)";
        assert_eq!(
            evaluate_latex(input).unwrap(),
            "\\begin{pmatrix}2 & 2\\\\3 & 5\\end{pmatrix}"
        );
    }

    #[test]
    fn test_matrix_subtraction() {
        let input = "\\begin{pmatrix}1&2\\\\3&4\\end{pmatrix}-\\begin{pmatrix}1&2\\\\3&4\\end{pmatrix}";
        assert_eq!(
            evaluate_latex(input).unwrap(),
            "\\begin{pmatrix}0 & 0\\\\0 & 0\\end{pmatrix}"
        );
    }

    #[test]
    fn test_scalar_times_matrix() {
        let input = "2\\begin{pmatrix}1&0\\\\0&1\\end{pmatrix}";
        assert_eq!(
            evaluate_latex(input).unwrap(),
            "\\begin{pmatrix}2 & 0\\\\0 & 2\\end{pmatrix}"
        );
    }

    #[test]
    fn test_matrix_product() {
        let input = "\\begin{pmatrix}1&2\\\\3&4\\end{pmatrix}\\begin{pmatrix}0&1\\\\1&0\\end{pmatrix}";
        assert_eq!(
            evaluate_latex(input).unwrap(),
            "\\begin{pmatrix}2 & 1\\\\4 & 3\\end{pmatrix}"
        );
    }

    #[test]
    fn test_matrix_power() {
        let input = "\\begin{pmatrix}1&1\\\\0&1\\end{pmatrix}^2";
        assert_eq!(
            evaluate_latex(input).unwrap(),
            "\\begin{pmatrix}1 & 2\\\\0 & 1\\end{pmatrix}"
        );
    }

    #[test]
    fn test_matrix_directly_followed_by_symbol() {
        let input = "\\begin{pmatrix}2\\end{pmatrix}x";
        let out = evaluate_latex(input).unwrap();
        assert_eq!(out, "x \\begin{pmatrix}2\\end{pmatrix}");
    }

    #[test]
    fn test_symbolic_matrix_entries() {
        let input = "\\begin{pmatrix}x&0\\\\0&x\\end{pmatrix}+\\begin{pmatrix}x&1\\\\1&x\\end{pmatrix}";
        assert_eq!(
            evaluate_latex(input).unwrap(),
            "\\begin{pmatrix}2 x & 1\\\\1 & 2 x\\end{pmatrix}"
        );
    }
}

// ============================================================================
// Failure Surface
// ============================================================================

mod errors {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_open_without_close() {
        let err = evaluate_latex("\\begin{pmatrix}1&2").unwrap_err();
        assert_eq!(err, CalcError::MismatchedDelimiters);
        assert_eq!(err.to_string(), "Mismatched matrix delimiters.");
    }

    #[test]
    fn test_close_without_open() {
        let err = evaluate_latex("1\\end{bmatrix}").unwrap_err();
        assert_eq!(err, CalcError::MismatchedDelimiters);
    }

    #[test]
    fn test_shape_mismatch_propagates() {
        let input = "\\begin{pmatrix}1&2\\end{pmatrix}+\\begin{pmatrix}1\\end{pmatrix}";
        assert!(matches!(
            evaluate_latex(input).unwrap_err(),
            CalcError::EvalError { .. }
        ));
    }

    #[test]
    fn test_matrix_plus_scalar_rejected() {
        let input = "\\begin{pmatrix}1\\end{pmatrix}+1";
        assert!(matches!(
            evaluate_latex(input).unwrap_err(),
            CalcError::EvalError { .. }
        ));
    }

    #[test]
    fn test_unparseable_input_propagates() {
        assert!(matches!(
            evaluate_latex("1+)").unwrap_err(),
            CalcError::ParseError { .. }
        ));
        assert!(matches!(
            evaluate_latex("").unwrap_err(),
            CalcError::ParseError { .. }
        ));
    }

    #[test]
    fn test_division_by_zero() {
        assert!(matches!(
            evaluate_latex("1/0").unwrap_err(),
            CalcError::EvalError { .. }
        ));
    }
}
