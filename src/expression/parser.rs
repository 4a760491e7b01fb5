//! Recursive-descent parser over [`Token`]s.
//!
//! ```text
//! expr     := term (('+' | '-') term)*
//! term     := unary (('*' | '/' | '%' | 'mod') unary)*
//! unary    := ('-' | '+') unary | power
//! power    := primary ('^' unary)?
//! primary  := number | 'x' | 'pi' | 'e' | name '(' args ')' | '(' expr ')'
//! ```
//!
//! Unary minus binds looser than `^`, so `-x^2` is `-(x^2)`, while `2^-1` is allowed.
//!
//! Nesting is capped at [`MAX_DEPTH`], both for the tree being built and for the parser's own
//! recursion, so evaluating or dropping a tree can never exhaust the stack.
use super::{
    ast::{BinaryOp, Constant, Expr, Function, UnaryOp},
    lexer::Token,
    ExpressionError,
};

/// Deepest nesting of operators, calls and parentheses the parser accepts.
pub const MAX_DEPTH: usize = 128;

/// A subtree and its height.
type Parsed = (Expr, usize);

/// Parses a token stream into a single expression tree.
///
/// # Errors
/// Returns an error if the tokens do not form a complete expression, or nest deeper than [`MAX_DEPTH`].
pub fn parse(tokens: &[(usize, Token)]) -> Result<Expr, ExpressionError> {
    if tokens.is_empty() {
        return Err(ExpressionError::Empty);
    }

    let mut parser = Parser {
        tokens,
        pos: 0,
        level: 0,
    };
    let (expr, _) = parser.expr()?;

    match parser.peek() {
        None => Ok(expr),
        Some(_) => Err(parser.unexpected()),
    }
}

fn node(expr: Expr, height: usize) -> Result<Parsed, ExpressionError> {
    if height > MAX_DEPTH {
        Err(ExpressionError::TooDeep { limit: MAX_DEPTH })
    } else {
        Ok((expr, height))
    }
}

fn binary(op: BinaryOp, (lhs, l): Parsed, (rhs, r): Parsed) -> Result<Parsed, ExpressionError> {
    node(Expr::Binary(op, Box::new(lhs), Box::new(rhs)), l.max(r) + 1)
}

struct Parser<'t> {
    tokens: &'t [(usize, Token)],
    pos: usize,
    level: usize,
}
impl Parser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(_, t)| t)
    }

    fn unexpected(&self) -> ExpressionError {
        match self.tokens.get(self.pos) {
            Some((position, token)) => ExpressionError::UnexpectedToken {
                found: token.describe(),
                position: *position,
            },
            None => ExpressionError::UnexpectedEnd,
        }
    }

    fn expect(&mut self, token: &Token) -> Result<(), ExpressionError> {
        if self.peek() == Some(token) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    fn expr(&mut self) -> Result<Parsed, ExpressionError> {
        let mut lhs = self.term()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => return Ok(lhs),
            };
            self.pos += 1;

            let rhs = self.term()?;
            lhs = binary(op, lhs, rhs)?;
        }
    }

    fn term(&mut self) -> Result<Parsed, ExpressionError> {
        let mut lhs = self.unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Slash) => BinaryOp::Div,
                Some(Token::Percent) => BinaryOp::Rem,
                Some(Token::Ident(name)) if name == "mod" => BinaryOp::Rem,
                _ => return Ok(lhs),
            };
            self.pos += 1;

            let rhs = self.unary()?;
            lhs = binary(op, lhs, rhs)?;
        }
    }

    /// Every recursive path passes through here, so this is where recursion is counted.
    fn unary(&mut self) -> Result<Parsed, ExpressionError> {
        if self.level >= MAX_DEPTH {
            return Err(ExpressionError::TooDeep { limit: MAX_DEPTH });
        }

        self.level += 1;
        let result = self.prefixed();
        self.level -= 1;
        result
    }

    fn prefixed(&mut self) -> Result<Parsed, ExpressionError> {
        let op = match self.peek() {
            Some(Token::Minus) => UnaryOp::Neg,
            Some(Token::Plus) => UnaryOp::Plus,
            _ => return self.power(),
        };
        self.pos += 1;

        let (operand, height) = self.unary()?;
        node(Expr::Unary(op, Box::new(operand)), height + 1)
    }

    fn power(&mut self) -> Result<Parsed, ExpressionError> {
        let base = self.primary()?;
        if self.peek() != Some(&Token::Caret) {
            return Ok(base);
        }
        self.pos += 1;

        let exponent = self.unary()?;
        binary(BinaryOp::Pow, base, exponent)
    }

    fn primary(&mut self) -> Result<Parsed, ExpressionError> {
        let Some(token) = self.peek().cloned() else {
            return Err(ExpressionError::UnexpectedEnd);
        };

        let leaf = match token {
            Token::Number(v) => Expr::Number(v),

            Token::LParen => {
                self.pos += 1;
                let inner = self.expr()?;
                self.expect(&Token::RParen)?;
                return Ok(inner);
            }

            Token::Ident(name) => match name.as_str() {
                "x" => Expr::Variable,
                "pi" => Expr::Constant(Constant::Pi),
                "e" => Expr::Constant(Constant::E),
                _ => {
                    return match Function::from_name(&name) {
                        Some(function) => self.call(function),
                        None if name == "mod" => Err(self.unexpected()),
                        None => Err(ExpressionError::UnknownIdentifier(name)),
                    }
                }
            },

            _ => return Err(self.unexpected()),
        };

        self.pos += 1;
        Ok((leaf, 1))
    }

    fn call(&mut self, function: Function) -> Result<Parsed, ExpressionError> {
        self.pos += 1;
        self.expect(&Token::LParen)?;

        let mut args = Vec::new();
        let mut height = 0;
        if self.peek() == Some(&Token::RParen) {
            self.pos += 1;
        } else {
            loop {
                let (arg, h) = self.expr()?;
                args.push(arg);
                height = height.max(h);

                match self.peek() {
                    Some(Token::Comma) => self.pos += 1,
                    Some(Token::RParen) => {
                        self.pos += 1;
                        break;
                    }
                    _ => return Err(self.unexpected()),
                }
            }
        }

        let arity = function.arity();
        if !arity.accepts(args.len()) {
            return Err(ExpressionError::Arity {
                name: function.name(),
                expected: arity,
                found: args.len(),
            });
        }

        node(Expr::Call(function, args), height + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::lexer::tokenize;

    fn parse_str(source: &str) -> Result<Expr, ExpressionError> {
        parse(&tokenize(source)?)
    }

    #[test]
    fn test_precedence() {
        let tree = parse_str("1 + 2*3^2").unwrap();
        assert_eq!(tree.eval(0.0), 19.0);

        // Right-associative power
        let tree = parse_str("2^3^2").unwrap();
        assert_eq!(tree.eval(0.0), 512.0);

        // Unary minus is looser than ^
        let tree = parse_str("-x^2").unwrap();
        assert_eq!(tree.eval(3.0), -9.0);

        let tree = parse_str("2^-1").unwrap();
        assert_eq!(tree.eval(0.0), 0.5);

        let tree = parse_str("7 mod 4 * 2").unwrap();
        assert_eq!(tree.eval(0.0), 6.0);
    }

    #[test]
    fn test_calls() {
        let tree = parse_str("max(1, x, 3)").unwrap();
        assert_eq!(tree.eval(5.0), 5.0);

        let tree = parse_str("log(100)").unwrap();
        assert_eq!(tree.eval(0.0), 2.0);

        assert!(matches!(
            parse_str("sin(1, 2)"),
            Err(ExpressionError::Arity { name: "sin", found: 2, .. })
        ));
        assert!(matches!(
            parse_str("pow(2)"),
            Err(ExpressionError::Arity { name: "pow", found: 1, .. })
        ));
    }

    #[test]
    fn test_syntax_errors() {
        assert!(matches!(parse_str("2x"), Err(ExpressionError::UnexpectedToken { position: 1, .. })));
        assert!(matches!(parse_str("(x + 1"), Err(ExpressionError::UnexpectedEnd)));
        assert!(matches!(parse_str("x +"), Err(ExpressionError::UnexpectedEnd)));
        assert!(matches!(parse_str("sin x"), Err(ExpressionError::UnexpectedToken { .. })));
        assert!(matches!(
            parse_str("foo(x)"),
            Err(ExpressionError::UnknownIdentifier(name)) if name == "foo"
        ));
        assert!(matches!(parse_str(""), Err(ExpressionError::Empty)));
    }

    #[test]
    fn test_nesting_limit() {
        let too_deep = ExpressionError::TooDeep { limit: MAX_DEPTH };

        let parens = format!("{}x{}", "(".repeat(10_000), ")".repeat(10_000));
        assert_eq!(parse_str(&parens), Err(too_deep.clone()));

        let negations = format!("{}x", "-".repeat(10_000));
        assert_eq!(parse_str(&negations), Err(too_deep.clone()));

        let powers = vec!["x"; 10_000].join("^");
        assert_eq!(parse_str(&powers), Err(too_deep.clone()));

        // Left-leaning chains are parsed in a loop but still build a deep tree
        let sum = vec!["x"; 10_000].join("+");
        assert_eq!(parse_str(&sum), Err(too_deep.clone()));

        let calls = format!("{}x{}", "sin(".repeat(10_000), ")".repeat(10_000));
        assert_eq!(parse_str(&calls), Err(too_deep));

        // Reasonable nesting is untouched
        let shallow = format!("{}x{}", "(".repeat(100), ")".repeat(100));
        assert_eq!(parse_str(&shallow).unwrap().eval(2.0), 2.0);
        let sum = vec!["x"; 100].join("+");
        assert_eq!(parse_str(&sum).unwrap().eval(1.0), 100.0);
    }
}
