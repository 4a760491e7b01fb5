//! Utilities for displaying polynomials and user expressions
//!
//! # Equations
//! [`format_polynomial`] renders fitted coefficients as `y = c0 + c1·x + c2·x^2 ...`:
//! - Terms with a magnitude at or below [`COEFFICIENT_THRESHOLD`] are skipped.
//! - Magnitudes use 4 fixed decimals, or 3-digit scientific notation outside [`fixed_range`].
//! - Every term after the first carries an explicit ` + ` or ` - `.
//!
//! # Expressions
//! [`format_expression`] pretty-prints what a user typed: integer exponents become
//! superscripts, `*` becomes `·`, `pi` becomes `π`, and `sqrt`/`abs` use their symbols.
use crate::expression::{
    self,
    ast::{needs_parens, BinaryOp, Constant, Expr, Function, UnaryOp},
};

pub mod unicode;

/// Coefficients with a magnitude at or below this are left out of equations.
pub const COEFFICIENT_THRESHOLD: f64 = 1e-9;

/// Decimal places used for coefficients in fixed notation
pub const DEFAULT_PRECISION: usize = 4;

/// Decimal places of the mantissa in scientific notation
pub const SCIENTIFIC_PRECISION: usize = 3;

/// Magnitudes in this range are not written in scientific notation
#[must_use]
pub fn fixed_range() -> std::ops::Range<f64> {
    1e-3..1e3
}

/// Represents the sign of a polynomial term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    /// Positive sign (`+` when displayed).
    Positive,

    /// Negative sign (`-` when displayed).
    Negative,
}
impl Sign {
    /// Determines the sign from a numeric coefficient. NaN counts as positive.
    ///
    /// ```
    /// # use plotfit::display::Sign;
    /// assert_eq!(Sign::from_coef(3.0), Sign::Positive);
    /// assert_eq!(Sign::from_coef(-2.0), Sign::Negative);
    /// ```
    #[must_use]
    pub fn from_coef(coef: f64) -> Self {
        if coef < 0.0 {
            Self::Negative
        } else {
            Self::Positive
        }
    }

    /// `+` for `Positive`, `-` for `Negative`.
    #[must_use]
    pub fn char(self) -> char {
        match self {
            Self::Positive => '+',
            Self::Negative => '-',
        }
    }
}

/// A single polynomial term: its sign, and the unsigned body (`2.0000·x^3`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    /// Sign of the coefficient
    pub sign: Sign,

    /// Magnitude and variable part
    pub body: String,
}
impl Term {
    /// Creates a new term.
    #[must_use]
    pub fn new(sign: Sign, body: String) -> Self {
        Self { sign, body }
    }
}

/// Formats `value` like `Number.prototype.toExponential(digits)`: `1.235e+3`, `-4.000e-4`.
///
/// ```
/// # use plotfit::display::exponential;
/// assert_eq!(exponential(1234.56, 3), "1.235e+3");
/// assert_eq!(exponential(0.0004, 3), "4.000e-4");
/// ```
#[must_use]
pub fn exponential(value: f64, digits: usize) -> String {
    let text = format!("{value:.digits$e}");
    match text.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
        _ => text,
    }
}

/// Formats a coefficient magnitude for an equation.
///
/// `NaN` for non-finite values, scientific notation outside [`fixed_range`], fixed otherwise.
#[must_use]
pub fn format_coefficient(value: f64) -> String {
    if !value.is_finite() {
        return "NaN".to_string();
    }

    let precision = DEFAULT_PRECISION;
    if fixed_range().contains(&value.abs()) {
        format!("{value:.precision$}")
    } else {
        exponential(value, SCIENTIFIC_PRECISION)
    }
}

/// Formats the term for `coef·x^degree`, or `None` if the coefficient is negligible.
#[must_use]
pub fn format_term(degree: usize, coef: f64) -> Option<Term> {
    if coef.abs() <= COEFFICIENT_THRESHOLD {
        return None;
    }

    let magnitude = format_coefficient(coef.abs());
    let body = match degree {
        0 => magnitude,
        1 => format!("{magnitude}{}x", unicode::MIDDLE_DOT),
        _ => format!("{magnitude}{}x^{degree}", unicode::MIDDLE_DOT),
    };

    Some(Term::new(Sign::from_coef(coef), body))
}

/// Renders coefficients (lowest degree first) as `y = ...`.
///
/// ```
/// # use plotfit::display::format_polynomial;
/// assert_eq!(format_polynomial(&[-1.0, 0.0, 2500.0]), "y = -1.0000 + 2.500e+3·x^2");
/// assert_eq!(format_polynomial(&[1e-12]), "y = 0");
/// ```
#[must_use]
pub fn format_polynomial(coefficients: &[f64]) -> String {
    let mut terms = coefficients
        .iter()
        .enumerate()
        .filter_map(|(degree, &coef)| format_term(degree, coef));

    let Some(first) = terms.next() else {
        return "y = 0".to_string();
    };

    let mut output = String::from("y = ");
    if first.sign == Sign::Negative {
        output.push(first.sign.char());
    }
    output.push_str(&first.body);

    for term in terms {
        output.push(' ');
        output.push(term.sign.char());
        output.push(' ');
        output.push_str(&term.body);
    }

    output
}

/// Pretty-prints a user expression for display.
///
/// Blank input is `N/A`. Text that does not compile is returned trimmed but otherwise untouched.
///
/// ```
/// # use plotfit::display::format_expression;
/// assert_eq!(format_expression("2*x^2 - 3*x"), "2·x² - 3·x");
/// assert_eq!(format_expression("sqrt(abs(x)) * pi"), "√(|x|)·π");
/// assert_eq!(format_expression("  "), "N/A");
/// ```
#[must_use]
pub fn format_expression(text: &str) -> String {
    if text.trim().is_empty() {
        return "N/A".to_string();
    }

    match expression::parse(text) {
        Ok(tree) => pretty(&tree),
        Err(_) => text.trim().to_string(),
    }
}

fn pretty(expr: &Expr) -> String {
    match expr {
        Expr::Number(v) => crate::value::format_number(*v),
        Expr::Constant(Constant::Pi) => unicode::PI.to_string(),
        Expr::Constant(Constant::E) => "e".to_string(),
        Expr::Variable => "x".to_string(),

        Expr::Unary(op, operand) => {
            let sign = if *op == UnaryOp::Neg { "-" } else { "+" };
            if operand.precedence() < 3 {
                format!("{sign}({})", pretty(operand))
            } else {
                format!("{sign}{}", pretty(operand))
            }
        }

        Expr::Binary(op, lhs, rhs) => {
            let left = wrap(*op, lhs, false);
            match op {
                BinaryOp::Pow => match integer_exponent(rhs) {
                    Some(exponent) => format!("{left}{}", unicode::superscript(&exponent)),
                    None if rhs.precedence() < 5 => format!("{left}^({})", pretty(rhs)),
                    None => format!("{left}^{}", pretty(rhs)),
                },
                BinaryOp::Mul => format!("{left}{}{}", unicode::MIDDLE_DOT, wrap(*op, rhs, true)),
                BinaryOp::Div => format!("{left}/{}", wrap(*op, rhs, true)),
                BinaryOp::Add => format!("{left} + {}", wrap(*op, rhs, true)),
                BinaryOp::Sub => format!("{left} - {}", wrap(*op, rhs, true)),
                BinaryOp::Rem => format!("{left} mod {}", wrap(*op, rhs, true)),
            }
        }

        Expr::Call(Function::Sqrt, args) if args.len() == 1 => {
            format!("{}({})", unicode::SQRT, pretty(&args[0]))
        }
        Expr::Call(Function::Abs, args) if args.len() == 1 => format!("|{}|", pretty(&args[0])),
        Expr::Call(function, args) => {
            let args: Vec<String> = args.iter().map(pretty).collect();
            format!("{}({})", function.name(), args.join(", "))
        }
    }
}

fn wrap(op: BinaryOp, child: &Expr, is_rhs: bool) -> String {
    if needs_parens(op, child, is_rhs) {
        format!("({})", pretty(child))
    } else {
        pretty(child)
    }
}

/// `2` or `-2` as text, if the exponent is an integer literal.
fn integer_exponent(expr: &Expr) -> Option<String> {
    let (negative, value) = match expr {
        Expr::Number(v) => (false, *v),
        Expr::Unary(UnaryOp::Neg, inner) => match inner.as_ref() {
            Expr::Number(v) => (true, *v),
            _ => return None,
        },
        _ => return None,
    };

    if value.fract() != 0.0 || !value.is_finite() || value.abs() >= 1e15 {
        return None;
    }

    let digits = crate::value::format_number(value);
    Some(if negative { format!("-{digits}") } else { digits })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_coefficient() {
        assert_eq!(format_coefficient(2.0), "2.0000");
        assert_eq!(format_coefficient(0.001), "0.0010");
        assert_eq!(format_coefficient(999.99), "999.9900");
        assert_eq!(format_coefficient(1000.0), "1.000e+3");
        assert_eq!(format_coefficient(0.000_5), "5.000e-4");
        assert_eq!(format_coefficient(f64::NAN), "NaN");
    }

    #[test]
    fn test_format_polynomial() {
        assert_eq!(format_polynomial(&[1.0, 2.0]), "y = 1.0000 + 2.0000·x");
        assert_eq!(format_polynomial(&[0.0, -2.0, 0.5]), "y = -2.0000·x + 0.5000·x^2");
        assert_eq!(format_polynomial(&[3.0, 0.0, 0.0, -1.0]), "y = 3.0000 - 1.0000·x^3");
        assert_eq!(format_polynomial(&[0.0, 0.0]), "y = 0");
        assert_eq!(format_polynomial(&[]), "y = 0");
        assert_eq!(format_polynomial(&[f64::NAN, 1.0]), "y = NaN + 1.0000·x");
    }

    #[test]
    fn test_format_expression() {
        assert_eq!(format_expression("x^3 - 3*x"), "x³ - 3·x");
        assert_eq!(format_expression("e^(-x^2)"), "e^(-x²)");
        assert_eq!(format_expression("2^x"), "2^x");
        assert_eq!(format_expression("x^-2"), "x⁻²");
        assert_eq!(format_expression("x^0.5"), "x^0.5");
        assert_eq!(format_expression("sin(x)/x"), "sin(x)/x");
        assert_eq!(format_expression("(x + 1)^2"), "(x + 1)²");
        assert_eq!(format_expression("log(x, 2)"), "log(x, 2)");
        assert_eq!(format_expression("2x"), "2x");
    }
}
