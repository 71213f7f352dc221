//! Recursive descent parser that builds an expression tree from a slice of
//! tokens.
//!
//! Grammar:
//!
//! ```text
//! expr -> term term*        (folded left-associatively into applications)
//! term -> NAME | '(' expr ')' | '\' NAME expr
//! ```
//!
//! A lambda's body is the whole rest of the enclosing expression, so
//! `x \y y z` parses as `x (\y y z)`.

use std::fmt::Display;
use std::rc::Rc;

use crate::lexical_analysis::Token;
use crate::syntax_tree::ExprNode;

/// Nesting depth allowed by `parse`. Bounds both the nesting of brackets and
/// lambdas and the height of the resulting tree.
pub const DEFAULT_MAX_PARSE_DEPTH: usize = 1_000;

/// Represents a parsing error. Positions are indices into the token slice.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ParseError {
    MissingLambdaParameter {
        position: usize,
        found: Option<Token>,
    },
    UnterminatedGroup {
        open_position: usize,
    },
    UnexpectedCloseBracket {
        position: usize,
    },
    EmptyExpression {
        position: usize,
    },
    RecursionLimitExceeded {
        limit: usize,
    },
}

/// Display trait implementation for ParseError.
impl Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingLambdaParameter { position, found } => match found {
                Some(token) => write!(
                    f,
                    "Expected a parameter name after '\\' at token {}, found {:?}.",
                    position,
                    token.to_string()
                ),
                None => write!(
                    f,
                    "Expected a parameter name after '\\' at token {}, found end of input.",
                    position
                ),
            },

            Self::UnterminatedGroup { open_position } => {
                write!(f, "Bracket opened at token {} is never closed.", open_position)
            }

            Self::UnexpectedCloseBracket { position } => {
                write!(f, "Unmatched ')' at token {}.", position)
            }

            Self::EmptyExpression { position } => {
                write!(f, "Expected an expression at token {}.", position)
            }

            Self::RecursionLimitExceeded { limit } => {
                write!(f, "Program nesting exceeds the parser depth limit of {}.", limit)
            }
        }
    }
}

impl std::error::Error for ParseError {}

// Cursor over the token slice, shared by all recursive calls.
struct Parser<'a> {
    tokens: &'a [Token],
    cursor: usize,
    max_depth: usize,
}

impl<'a> Parser<'a> {
    fn check_depth(&self, depth: usize) -> Result<(), ParseError> {
        if depth > self.max_depth {
            return Err(ParseError::RecursionLimitExceeded {
                limit: self.max_depth,
            });
        }

        Ok(())
    }

    /// Parses `term term*` up to a close bracket (left unconsumed) or the end
    /// of input. Returns the expression and the height of its tree.
    fn try_expr_rule(&mut self, depth: usize) -> Result<(ExprNode, usize), ParseError> {
        self.check_depth(depth)?;

        let tokens = self.tokens;
        let mut out_expr: Option<(ExprNode, usize)> = None;

        while let Some(token) = tokens.get(self.cursor) {
            let (next_term, next_height) = match token {
                Token::CloseBracket => break,
                Token::OpenBracket => self.try_group_rule(depth)?,
                // Consumes everything up to the end of this expression, so
                // the loop ends on the next iteration.
                Token::LambdaMarker => self.try_lambda_rule(depth)?,
                Token::Name(var_name) => {
                    self.cursor += 1;
                    let name_ref = ExprNode::NameRef {
                        var_name: var_name.clone(),
                    };
                    (name_ref, 0)
                }
            };

            out_expr = match out_expr {
                None => Some((next_term, next_height)),
                Some((fn_expr, fn_height)) => {
                    // A bracketed first term may already carry a tall chain
                    // of its own, so the height builds on the taller side.
                    let height = fn_height.max(next_height) + 1;
                    self.check_depth(depth + height)?;

                    Some((
                        ExprNode::Apply {
                            fn_expr: Rc::new(fn_expr),
                            actual_arg: Rc::new(next_term),
                        },
                        height,
                    ))
                }
            };
        }

        out_expr.ok_or(ParseError::EmptyExpression {
            position: self.cursor,
        })
    }

    /// Parses `( expr )`. The cursor is on the open bracket.
    fn try_group_rule(&mut self, depth: usize) -> Result<(ExprNode, usize), ParseError> {
        let open_position = self.cursor;
        self.cursor += 1;

        let (inner_expr, inner_height) = match self.try_expr_rule(depth + 1) {
            Ok(parsed) => parsed,
            // Running out of input inside the group means it was never closed.
            Err(ParseError::EmptyExpression { position }) if position == self.tokens.len() => {
                return Err(ParseError::UnterminatedGroup { open_position });
            }
            Err(parse_error) => return Err(parse_error),
        };

        match self.tokens.get(self.cursor) {
            Some(Token::CloseBracket) => {
                self.cursor += 1;
                Ok((inner_expr, inner_height))
            }
            _ => Err(ParseError::UnterminatedGroup { open_position }),
        }
    }

    /// Parses `\ NAME expr`. The cursor is on the lambda marker.
    fn try_lambda_rule(&mut self, depth: usize) -> Result<(ExprNode, usize), ParseError> {
        self.cursor += 1;

        let formal_param = match self.tokens.get(self.cursor) {
            Some(Token::Name(formal_param)) => formal_param.clone(),
            found => {
                return Err(ParseError::MissingLambdaParameter {
                    position: self.cursor,
                    found: found.cloned(),
                })
            }
        };
        self.cursor += 1;

        let (fn_body, body_height) = self.try_expr_rule(depth + 1)?;

        Ok((
            ExprNode::LambdaAbs {
                formal_param,
                fn_body: Rc::new(fn_body),
            },
            body_height + 1,
        ))
    }
}

/// Parses the given tokens into a single expression, using
/// `DEFAULT_MAX_PARSE_DEPTH`.
pub fn parse(tokens: &[Token]) -> Result<ExprNode, ParseError> {
    parse_with_depth_limit(tokens, DEFAULT_MAX_PARSE_DEPTH)
}

/// Parses the given tokens into a single expression. Every token must be
/// consumed; a stray `)` is an error rather than the end of the program.
pub fn parse_with_depth_limit(tokens: &[Token], max_depth: usize) -> Result<ExprNode, ParseError> {
    let mut parser = Parser {
        tokens,
        cursor: 0,
        max_depth,
    };

    // A top-level expression can only be empty at a leading `)`.
    if let Some(Token::CloseBracket) = tokens.first() {
        return Err(ParseError::UnexpectedCloseBracket { position: 0 });
    }

    let (expr, _) = parser.try_expr_rule(0)?;

    // The top-level expression only stops early at a close bracket.
    if parser.cursor < tokens.len() {
        return Err(ParseError::UnexpectedCloseBracket {
            position: parser.cursor,
        });
    }

    Ok(expr)
}
