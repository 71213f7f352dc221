//! This crate contains code for a small lambda calculus interpreter that
//! evaluates programs with closures over a chain of environments.

pub mod closure_execution;
pub mod end_to_end;
pub mod environment;
pub mod lexical_analysis;
pub mod recursive_descent_parsing;
pub mod syntax_tree;

pub use closure_execution::{evaluate, Closure, EvalError, Value};
pub use environment::Environment;
pub use lexical_analysis::{tokenize, LexError, Token};
pub use recursive_descent_parsing::{parse, ParseError};
pub use syntax_tree::ExprNode;
