//! Syntax tree for compiled expressions, and its evaluation.
use std::fmt;

/// Named constants recognised by the evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constant {
    /// `pi`
    Pi,

    /// `e`, Euler's number
    E,
}
impl Constant {
    /// Numeric value of the constant.
    #[must_use]
    pub fn value(self) -> f64 {
        match self {
            Constant::Pi => std::f64::consts::PI,
            Constant::E => std::f64::consts::E,
        }
    }
}

/// Prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// `-a`
    Neg,

    /// `+a`, a no-op
    Plus,
}

/// Infix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    /// `a + b`
    Add,

    /// `a - b`
    Sub,

    /// `a * b`
    Mul,

    /// `a / b`
    Div,

    /// `a % b` or `a mod b`, truncated remainder
    Rem,

    /// `a ^ b`, right-associative
    Pow,
}
impl BinaryOp {
    /// Binding strength. Higher binds tighter.
    #[must_use]
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOp::Add | BinaryOp::Sub => 1,
            BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => 2,
            BinaryOp::Pow => 4,
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => " + ",
            BinaryOp::Sub => " - ",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => " % ",
            BinaryOp::Pow => "^",
        }
    }
}

/// Number of arguments a function accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Exactly `n` arguments
    Exactly(usize),

    /// Between `min` and `max` arguments, inclusive
    Between(usize, usize),

    /// `n` or more arguments
    AtLeast(usize),
}
impl Arity {
    /// True if `count` arguments are acceptable.
    #[must_use]
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Exactly(n) => count == n,
            Arity::Between(min, max) => (min..=max).contains(&count),
            Arity::AtLeast(n) => count >= n,
        }
    }
}
impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exactly(n) => write!(f, "{n}"),
            Arity::Between(min, max) => write!(f, "{min} to {max}"),
            Arity::AtLeast(n) => write!(f, "at least {n}"),
        }
    }
}

macro_rules! functions {
    ($( $variant:ident => $name:literal, $arity:expr ),+ $(,)?) => {
        /// Functions callable from an expression.
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        #[allow(missing_docs)]
        pub enum Function {
            $( $variant, )+
        }

        impl Function {
            /// Every supported function, in declaration order.
            pub const ALL: &'static [Function] = &[ $( Function::$variant, )+ ];

            /// Looks up a function by its lower-case name.
            #[must_use]
            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $( $name => Some(Function::$variant), )+
                    _ => None,
                }
            }

            /// Lower-case name as written in expressions.
            #[must_use]
            pub fn name(self) -> &'static str {
                match self {
                    $( Function::$variant => $name, )+
                }
            }

            /// Accepted argument count.
            #[must_use]
            pub fn arity(self) -> Arity {
                match self {
                    $( Function::$variant => $arity, )+
                }
            }
        }
    };
}

functions! {
    Sin => "sin", Arity::Exactly(1),
    Cos => "cos", Arity::Exactly(1),
    Tan => "tan", Arity::Exactly(1),
    Asin => "asin", Arity::Exactly(1),
    Acos => "acos", Arity::Exactly(1),
    Atan => "atan", Arity::Exactly(1),
    Sinh => "sinh", Arity::Exactly(1),
    Cosh => "cosh", Arity::Exactly(1),
    Tanh => "tanh", Arity::Exactly(1),
    Asinh => "asinh", Arity::Exactly(1),
    Acosh => "acosh", Arity::Exactly(1),
    Atanh => "atanh", Arity::Exactly(1),
    Exp => "exp", Arity::Exactly(1),
    Log => "log", Arity::Between(1, 2),
    Ln => "ln", Arity::Exactly(1),
    Log10 => "log10", Arity::Exactly(1),
    Log2 => "log2", Arity::Exactly(1),
    Sqrt => "sqrt", Arity::Exactly(1),
    Cbrt => "cbrt", Arity::Exactly(1),
    Abs => "abs", Arity::Exactly(1),
    Ceil => "ceil", Arity::Exactly(1),
    Floor => "floor", Arity::Exactly(1),
    Round => "round", Arity::Exactly(1),
    Sign => "sign", Arity::Exactly(1),
    Min => "min", Arity::AtLeast(1),
    Max => "max", Arity::AtLeast(1),
    Pow => "pow", Arity::Exactly(2),
}

impl Function {
    /// Applies the function to already-evaluated arguments.
    ///
    /// The argument count has been checked at parse time.
    #[must_use]
    pub fn apply(self, args: &[f64]) -> f64 {
        let a = args.first().copied().unwrap_or(f64::NAN);
        match self {
            Function::Sin => a.sin(),
            Function::Cos => a.cos(),
            Function::Tan => a.tan(),
            Function::Asin => a.asin(),
            Function::Acos => a.acos(),
            Function::Atan => a.atan(),
            Function::Sinh => a.sinh(),
            Function::Cosh => a.cosh(),
            Function::Tanh => a.tanh(),
            Function::Asinh => a.asinh(),
            Function::Acosh => a.acosh(),
            Function::Atanh => a.atanh(),
            Function::Exp => a.exp(),
            Function::Ln => a.ln(),
            Function::Log10 => a.log10(),
            Function::Log2 => a.log2(),
            Function::Sqrt => a.sqrt(),
            Function::Cbrt => a.cbrt(),
            Function::Abs => a.abs(),
            Function::Ceil => a.ceil(),
            Function::Floor => a.floor(),

            // Half-way cases round towards +inf
            Function::Round => (a + 0.5).floor(),

            Function::Sign => {
                if a.is_nan() || a == 0.0 {
                    a
                } else {
                    a.signum()
                }
            }

            Function::Log => match args.get(1) {
                None => a.log10(),
                Some(&base) if base == 10.0 => a.log10(),
                Some(&base) if base == std::f64::consts::E => a.ln(),
                Some(&base) => a.ln() / base.ln(),
            },

            Function::Pow => a.powf(args.get(1).copied().unwrap_or(f64::NAN)),

            Function::Min => fold_nan_aware(args, f64::min),
            Function::Max => fold_nan_aware(args, f64::max),
        }
    }
}

/// `f64::min`/`f64::max` skip NaN, but a NaN argument must poison the result.
fn fold_nan_aware(args: &[f64], op: fn(f64, f64) -> f64) -> f64 {
    if args.iter().any(|v| v.is_nan()) {
        return f64::NAN;
    }

    args.iter().copied().reduce(op).unwrap_or(f64::NAN)
}

/// A parsed expression in the single variable `x`.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Numeric literal
    Number(f64),

    /// Named constant
    Constant(Constant),

    /// The independent variable `x`
    Variable,

    /// Prefix operation
    Unary(UnaryOp, Box<Expr>),

    /// Infix operation
    Binary(BinaryOp, Box<Expr>, Box<Expr>),

    /// Function call
    Call(Function, Vec<Expr>),
}
impl Expr {
    /// Evaluates the tree at `x`. Domain errors surface as NaN or infinities.
    #[must_use]
    pub fn eval(&self, x: f64) -> f64 {
        match self {
            Expr::Number(v) => *v,
            Expr::Constant(c) => c.value(),
            Expr::Variable => x,
            Expr::Unary(UnaryOp::Neg, operand) => -operand.eval(x),
            Expr::Unary(UnaryOp::Plus, operand) => operand.eval(x),
            Expr::Binary(op, lhs, rhs) => {
                let (a, b) = (lhs.eval(x), rhs.eval(x));
                match op {
                    BinaryOp::Add => a + b,
                    BinaryOp::Sub => a - b,
                    BinaryOp::Mul => a * b,
                    BinaryOp::Div => a / b,
                    BinaryOp::Rem => a % b,
                    BinaryOp::Pow => a.powf(b),
                }
            }
            Expr::Call(function, args) => {
                let values: Vec<f64> = args.iter().map(|arg| arg.eval(x)).collect();
                function.apply(&values)
            }
        }
    }

    /// Binding strength of the node, for deciding where parentheses are needed when printing.
    #[must_use]
    pub fn precedence(&self) -> u8 {
        match self {
            Expr::Binary(op, ..) => op.precedence(),
            Expr::Unary(..) => 3,
            _ => 5,
        }
    }
}

/// Whether the child of a binary node needs parentheses.
pub(crate) fn needs_parens(op: BinaryOp, child: &Expr, is_rhs: bool) -> bool {
    let parent = op.precedence();
    let child_prec = child.precedence();

    if op == BinaryOp::Pow {
        // Base must be atomic; exponent may be signed
        return if is_rhs { child_prec < 3 } else { child_prec < 5 };
    }

    if !is_rhs {
        return child_prec < parent;
    }

    match child {
        Expr::Binary(child_op, ..) if child_prec == parent => {
            !(*child_op == op && matches!(op, BinaryOp::Add | BinaryOp::Mul))
        }
        _ => child_prec < parent,
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number(v) => write!(f, "{}", crate::value::format_number(*v)),
            Expr::Constant(Constant::Pi) => write!(f, "pi"),
            Expr::Constant(Constant::E) => write!(f, "e"),
            Expr::Variable => write!(f, "x"),
            Expr::Unary(op, operand) => {
                let sign = if *op == UnaryOp::Neg { "-" } else { "+" };
                if operand.precedence() < 3 {
                    write!(f, "{sign}({operand})")
                } else {
                    write!(f, "{sign}{operand}")
                }
            }
            Expr::Binary(op, lhs, rhs) => {
                if needs_parens(*op, lhs, false) {
                    write!(f, "({lhs})")?;
                } else {
                    write!(f, "{lhs}")?;
                }

                f.write_str(op.symbol())?;

                if needs_parens(*op, rhs, true) {
                    write!(f, "({rhs})")
                } else {
                    write!(f, "{rhs}")
                }
            }
            Expr::Call(function, args) => {
                write!(f, "{}(", function.name())?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_table() {
        assert_eq!(Function::from_name("log10"), Some(Function::Log10));
        assert_eq!(Function::from_name("sec"), None);
        assert_eq!(Function::Log.arity(), Arity::Between(1, 2));
        assert!(Function::Max.arity().accepts(5));
        assert!(!Function::Pow.arity().accepts(1));
        for f in Function::ALL {
            assert_eq!(Function::from_name(f.name()), Some(*f));
        }
    }

    #[test]
    fn test_apply_special_cases() {
        assert_eq!(Function::Round.apply(&[2.5]), 3.0);
        assert_eq!(Function::Round.apply(&[-2.5]), -2.0);
        assert_eq!(Function::Sign.apply(&[-3.0]), -1.0);
        assert_eq!(Function::Sign.apply(&[0.0]), 0.0);
        assert!(Function::Sign.apply(&[f64::NAN]).is_nan());
        assert!(Function::Max.apply(&[1.0, f64::NAN]).is_nan());
        assert_eq!(Function::Min.apply(&[3.0, -1.0, 2.0]), -1.0);
        assert_eq!(Function::Log.apply(&[1000.0]), 3.0);
        assert!((Function::Log.apply(&[8.0, 2.0]) - 3.0).abs() < 1e-12);
        assert!((Function::Log.apply(&[std::f64::consts::E, std::f64::consts::E]) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_eval_tree() {
        // -(x^2) + 3
        let tree = Expr::Binary(
            BinaryOp::Add,
            Box::new(Expr::Unary(
                UnaryOp::Neg,
                Box::new(Expr::Binary(
                    BinaryOp::Pow,
                    Box::new(Expr::Variable),
                    Box::new(Expr::Number(2.0)),
                )),
            )),
            Box::new(Expr::Number(3.0)),
        );
        assert_eq!(tree.eval(2.0), -1.0);
        assert_eq!(tree.to_string(), "-x^2 + 3");
    }

    #[test]
    fn test_display_parenthesises() {
        // (x - 1) - (x - 2)
        let sub = |a: f64| {
            Expr::Binary(BinaryOp::Sub, Box::new(Expr::Variable), Box::new(Expr::Number(a)))
        };
        let tree = Expr::Binary(BinaryOp::Sub, Box::new(sub(1.0)), Box::new(sub(2.0)));
        assert_eq!(tree.to_string(), "x - 1 - (x - 2)");

        let pow = Expr::Binary(
            BinaryOp::Pow,
            Box::new(sub(1.0)),
            Box::new(Expr::Unary(UnaryOp::Neg, Box::new(Expr::Number(2.0)))),
        );
        assert_eq!(pow.to_string(), "(x - 1)^-2");
    }
}
