//! Text to [`Expr`].
//!
//! Grammar: `expr := term (('+' | '-') term)*`, `term := factor (('*' | '/')
//! factor)*`, `factor := '-' factor | number | name | '(' expr ')'`.

use combat_core::EvalError;

use super::{BinaryOp, Expr};

#[derive(Clone, Debug, PartialEq, Eq)]
enum Token {
    Number(i64),
    Name(String),
    Plus,
    Minus,
    Star,
    Slash,
    Open,
    Close,
}

/// Parses `expression` into a tree.
///
/// # Errors
///
/// `EvalError::Parse` for unknown characters, out-of-range numbers,
/// unbalanced parentheses and trailing input.
pub fn parse(expression: &str) -> Result<Expr, EvalError> {
    let tokens = tokenize(expression)?;
    let mut parser = Parser {
        expression,
        tokens: &tokens,
        at: 0,
    };
    let expr = parser.expr()?;
    if parser.at != tokens.len() {
        return Err(parser.error("unexpected trailing input"));
    }
    Ok(expr)
}

fn tokenize(expression: &str) -> Result<Vec<Token>, EvalError> {
    let mut tokens = Vec::new();
    let mut chars = expression.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '0'..='9' => {
                let mut end = start;
                while let Some(&(i, d)) = chars.peek() {
                    if !d.is_ascii_digit() {
                        break;
                    }
                    end = i + d.len_utf8();
                    chars.next();
                }
                let number = expression[start..end].parse().map_err(|_| EvalError::Parse {
                    expression: expression.to_owned(),
                    reason: format!("number '{}' out of range", &expression[start..end]),
                })?;
                tokens.push(Token::Number(number));
            }
            c if c.is_alphabetic() || c == '_' => {
                let mut end = start;
                while let Some(&(i, d)) = chars.peek() {
                    if !(d.is_alphanumeric() || d == '_' || d == '.') {
                        break;
                    }
                    end = i + d.len_utf8();
                    chars.next();
                }
                tokens.push(Token::Name(expression[start..end].to_owned()));
            }
            _ => {
                let token = match c {
                    '+' => Token::Plus,
                    '-' => Token::Minus,
                    '*' => Token::Star,
                    '/' => Token::Slash,
                    '(' => Token::Open,
                    ')' => Token::Close,
                    other => {
                        return Err(EvalError::Parse {
                            expression: expression.to_owned(),
                            reason: format!("unexpected character '{other}'"),
                        });
                    }
                };
                tokens.push(token);
                chars.next();
            }
        }
    }
    Ok(tokens)
}

struct Parser<'a> {
    expression: &'a str,
    tokens: &'a [Token],
    at: usize,
}

impl Parser<'_> {
    fn error(&self, reason: &str) -> EvalError {
        EvalError::Parse {
            expression: self.expression.to_owned(),
            reason: reason.to_owned(),
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.at)
    }

    fn next(&mut self) -> Option<&Token> {
        let token = self.tokens.get(self.at);
        self.at += 1;
        token
    }

    fn expr(&mut self) -> Result<Expr, EvalError> {
        let mut lhs = self.term()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => return Ok(lhs),
            };
            self.at += 1;
            let rhs = self.term()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
    }

    fn term(&mut self) -> Result<Expr, EvalError> {
        let mut lhs = self.factor()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Slash) => BinaryOp::Div,
                _ => return Ok(lhs),
            };
            self.at += 1;
            let rhs = self.factor()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
    }

    fn factor(&mut self) -> Result<Expr, EvalError> {
        match self.next().cloned() {
            Some(Token::Minus) => Ok(Expr::Neg(Box::new(self.factor()?))),
            Some(Token::Number(value)) => Ok(Expr::Number(value)),
            Some(Token::Name(name)) => Ok(Expr::Name(name)),
            Some(Token::Open) => {
                let expr = self.expr()?;
                if matches!(self.next(), Some(Token::Close)) {
                    Ok(expr)
                } else {
                    Err(self.error("missing ')'"))
                }
            }
            Some(_) => Err(self.error("expected a value")),
            None => Err(self.error("unexpected end of expression")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(name: &str) -> Box<Expr> {
        Box::new(Expr::Name(name.into()))
    }

    #[test]
    fn operators_associate_left() {
        assert_eq!(
            parse("a - b - c"),
            Ok(Expr::Binary {
                op: BinaryOp::Sub,
                lhs: Box::new(Expr::Binary {
                    op: BinaryOp::Sub,
                    lhs: name("a"),
                    rhs: name("b"),
                }),
                rhs: name("c"),
            })
        );
    }

    #[test]
    fn negation_binds_tighter_than_products() {
        assert_eq!(
            parse("-unit.MAG * 2"),
            Ok(Expr::Binary {
                op: BinaryOp::Mul,
                lhs: Box::new(Expr::Neg(name("unit.MAG"))),
                rhs: Box::new(Expr::Number(2)),
            })
        );
    }

    #[test]
    fn malformed_input_is_a_parse_error() {
        for input in ["", "2 +", "(2", "2 )", "2 $ 3", "99999999999999999999"] {
            assert!(matches!(parse(input), Err(EvalError::Parse { .. })), "{input}");
        }
    }
}
