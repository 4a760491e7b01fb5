//! Safe evaluation of user-typed expressions in one variable.
//!
//! Expressions are compiled once into a tree of [`ast::Expr`] and then evaluated at
//! many `x` values. Only a fixed vocabulary is recognised: the variable `x`, the
//! constants `pi` and `e`, the operators `+ - * / % ^ mod`, and the functions in
//! [`ast::Function`]. Nothing else in the input can reach the evaluator.
//!
//! Compiled expressions are cached per [`Evaluator`], keyed by their canonical text.
//! A text that fails to compile is cached too, and then always evaluates to `None`.
//!
//! # Example
//! ```rust
//! use plotfit::expression::Evaluator;
//!
//! let evaluator = Evaluator::new();
//! assert_eq!(evaluator.evaluate("x^2", 3.0), Some(9.0));
//! assert_eq!(evaluator.evaluate("1/x", 0.0), None);
//! assert_eq!(evaluator.evaluate("bogus(x)", 1.0), None);
//! assert!(evaluator.check("sin(x) + 2").is_ok());
//! ```
use std::{cell::RefCell, collections::HashMap, rc::Rc};

pub mod ast;
pub mod lexer;
pub mod parser;

use ast::{Arity, Expr};

/// Reasons an expression fails to compile.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExpressionError {
    /// Nothing left after trimming.
    #[error("Expression is empty.")]
    Empty,

    /// A character outside the expression alphabet.
    #[error("Unsupported character \"{0}\" detected.")]
    UnsupportedCharacter(char),

    /// A name that is neither `x`, a constant, nor a known function.
    #[error("Identifier \"{0}\" is not supported.")]
    UnknownIdentifier(String),

    /// A numeric literal that is not a number, like `1.2.3` or a lone `.`.
    #[error("Malformed number \"{0}\".")]
    MalformedNumber(String),

    /// A token in a position where it cannot appear.
    #[error("Unexpected {found} at position {position}.")]
    UnexpectedToken {
        /// Description of the offending token
        found: String,

        /// Byte offset in the canonical text
        position: usize,
    },

    /// Input ended in the middle of an expression.
    #[error("Unexpected end of expression.")]
    UnexpectedEnd,

    /// A function called with the wrong number of arguments.
    #[error("Function \"{name}\" expects {expected} argument(s), got {found}.")]
    Arity {
        /// Function name
        name: &'static str,

        /// Accepted argument count
        expected: Arity,

        /// Supplied argument count
        found: usize,
    },

    /// Operators, calls or parentheses nested beyond what the parser accepts.
    #[error("Expression is nested too deeply (limit {limit}).")]
    TooDeep {
        /// Deepest nesting allowed
        limit: usize,
    },
}

/// Canonical form of an expression: whitespace runs collapsed to one space, trimmed, lower-cased.
///
/// ```
/// # use plotfit::expression::canonicalize;
/// assert_eq!(canonicalize("  SIN( X )\t+  1 "), "sin( x ) + 1");
/// ```
#[must_use]
pub fn canonicalize(expression: &str) -> String {
    expression
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Compiles an expression without touching any cache.
///
/// # Errors
/// Returns the first problem found in the text.
pub fn parse(expression: &str) -> Result<Expr, ExpressionError> {
    let canonical = canonicalize(expression);
    if canonical.is_empty() {
        return Err(ExpressionError::Empty);
    }

    if let Some(c) = canonical.chars().find(|c| !is_allowed_char(*c)) {
        return Err(ExpressionError::UnsupportedCharacter(c));
    }

    let tokens = lexer::tokenize(&canonical)?;
    parser::parse(&tokens)
}

fn is_allowed_char(c: char) -> bool {
    c.is_ascii_digit()
        || c.is_ascii_lowercase()
        || matches!(c, '+' | '-' | '*' | '/' | '^' | '%' | '(' | ')' | '.' | ',' | ' ')
}

/// A compiled expression. Evaluation never fails; bad input yields `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledExpression {
    source: String,
    tree: Result<Expr, ExpressionError>,
}
impl CompiledExpression {
    /// Compiles `expression`. A failure is kept and reported by [`Self::error`].
    #[must_use]
    pub fn new(expression: &str) -> Self {
        Self {
            source: canonicalize(expression),
            tree: parse(expression),
        }
    }

    /// Canonical source text.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The syntax tree, if compilation succeeded.
    #[must_use]
    pub fn tree(&self) -> Option<&Expr> {
        self.tree.as_ref().ok()
    }

    /// The compilation failure, if any.
    #[must_use]
    pub fn error(&self) -> Option<&ExpressionError> {
        self.tree.as_ref().err()
    }

    /// True if the expression compiled.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.tree.is_ok()
    }

    /// Evaluates at `x`. `None` for a non-finite `x`, a non-finite result, or a failed compilation.
    #[must_use]
    pub fn evaluate(&self, x: f64) -> Option<f64> {
        if !x.is_finite() {
            return None;
        }

        let y = self.tree.as_ref().ok()?.eval(x);
        y.is_finite().then_some(y)
    }
}

/// Compiles and evaluates expressions, caching each distinct canonical text.
///
/// The cache is unbounded and lives as long as the evaluator. It is not shared
/// between threads; give each worker its own evaluator.
#[derive(Debug, Default)]
pub struct Evaluator {
    cache: RefCell<HashMap<String, Rc<CompiledExpression>>>,
}
impl Evaluator {
    /// Creates an evaluator with an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the compiled form of `expression`, compiling it on first use.
    ///
    /// Blank input is never cached.
    pub fn compile(&self, expression: &str) -> Rc<CompiledExpression> {
        let key = canonicalize(expression);
        if key.is_empty() {
            return Rc::new(CompiledExpression::new(""));
        }

        if let Some(compiled) = self.cache.borrow().get(&key) {
            return Rc::clone(compiled);
        }

        let compiled = Rc::new(CompiledExpression::new(&key));
        if let Some(e) = compiled.error() {
            tracing::debug!(expression = %key, error = %e, "expression failed to compile");
        }

        self.cache.borrow_mut().insert(key, Rc::clone(&compiled));
        compiled
    }

    /// Evaluates `expression` at `x`.
    ///
    /// Returns `None` when the text is blank or invalid, `x` is not finite,
    /// or the result is NaN or infinite.
    pub fn evaluate(&self, expression: &str, x: f64) -> Option<f64> {
        if !x.is_finite() {
            return None;
        }

        self.compile(expression).evaluate(x)
    }

    /// Compiles `expression` and reports why it is invalid, if it is.
    ///
    /// # Errors
    /// Returns the compilation failure.
    pub fn check(&self, expression: &str) -> Result<(), ExpressionError> {
        match self.compile(expression).error() {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }

    /// Number of distinct expressions compiled so far.
    #[must_use]
    pub fn cached(&self) -> usize {
        self.cache.borrow().len()
    }

    /// Drops every cached compilation.
    pub fn clear(&self) {
        self.cache.borrow_mut().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_close;

    #[test]
    fn test_evaluate_basics() {
        let evaluator = Evaluator::new();
        assert_eq!(evaluator.evaluate("x^2", 3.0), Some(9.0));
        assert_eq!(evaluator.evaluate("2*x + 1", -1.0), Some(-1.0));
        assert_eq!(evaluator.evaluate("abs(x)", -4.5), Some(4.5));
        assert_close!(evaluator.evaluate("sin(pi/2)", 0.0).unwrap(), 1.0);
        assert_close!(evaluator.evaluate("e^x", 1.0).unwrap(), std::f64::consts::E);
        assert_eq!(evaluator.evaluate("10 % 4", 0.0), Some(2.0));
        assert_eq!(evaluator.evaluate("-7 mod 3", 0.0), Some(-1.0));
    }

    #[test]
    fn test_evaluate_non_finite() {
        let evaluator = Evaluator::new();
        assert_eq!(evaluator.evaluate("1/0", 0.0), None);
        assert_eq!(evaluator.evaluate("1/x", 0.0), None);
        assert_eq!(evaluator.evaluate("sqrt(x)", -1.0), None);
        assert_eq!(evaluator.evaluate("log(x)", 0.0), None);
        assert_eq!(evaluator.evaluate("x", f64::NAN), None);
        assert_eq!(evaluator.evaluate("x", f64::INFINITY), None);
    }

    #[test]
    fn test_invalid_is_cached() {
        let evaluator = Evaluator::new();
        assert_eq!(evaluator.evaluate("bogus(x)", 1.0), None);
        assert_eq!(evaluator.cached(), 1);

        // Same canonical text, same entry
        assert_eq!(evaluator.evaluate("  BOGUS(x) ", 2.0), None);
        assert_eq!(evaluator.cached(), 1);
        assert!(matches!(
            evaluator.check("bogus(x)"),
            Err(ExpressionError::UnknownIdentifier(name)) if name == "bogus"
        ));
    }

    #[test]
    fn test_blank_not_cached() {
        let evaluator = Evaluator::new();
        assert_eq!(evaluator.evaluate("   ", 1.0), None);
        assert_eq!(evaluator.check(""), Err(ExpressionError::Empty));
        assert_eq!(evaluator.cached(), 0);
    }

    #[test]
    fn test_rejects_foreign_syntax() {
        let evaluator = Evaluator::new();
        for bad in ["x; alert(1)", "x = 2", "x[0]", "'x'", "2x", "x**2", "constructor(x)", "x é"] {
            assert!(evaluator.check(bad).is_err(), "{bad} should not compile");
        }
    }

    #[test]
    fn test_deep_nesting_is_invalid() {
        let evaluator = Evaluator::new();
        let nested = format!("{}x{}", "(".repeat(10_000), ")".repeat(10_000));

        assert_eq!(evaluator.evaluate(&nested, 1.0), None);
        assert_eq!(evaluator.evaluate(&nested, 2.0), None);
        assert_eq!(evaluator.cached(), 1);
        assert_eq!(
            evaluator.check(&nested),
            Err(ExpressionError::TooDeep {
                limit: parser::MAX_DEPTH
            })
        );

        let chain = vec!["1"; 5_000].join(" - ");
        assert_eq!(evaluator.evaluate(&chain, 0.0), None);
    }

    #[test]
    fn test_compile_shares_entry() {
        let evaluator = Evaluator::new();
        let a = evaluator.compile("x + 1");
        let b = evaluator.compile("X  +  1");
        assert!(Rc::ptr_eq(&a, &b));
        assert_eq!(a.source(), "x + 1");

        evaluator.clear();
        assert_eq!(evaluator.cached(), 0);
    }
}
