//! Evaluates expression trees under an environment of bindings. Arguments are
//! evaluated before the call, and a closure's body runs in the environment
//! the closure captured, extended with its parameter.

use std::fmt::Display;
use std::rc::Rc;

use crate::environment::Environment;
use crate::syntax_tree::{push_lambda_text, ExprNode};

/// Nesting depth allowed by `evaluate`.
pub const DEFAULT_MAX_EVAL_DEPTH: usize = 1_000;

/// A lambda together with the environment it was evaluated in.
#[derive(Debug)]
pub struct Closure {
    pub captured_env: Environment,
    pub formal_param: String,
    pub fn_body: Rc<ExprNode>,
}

/// The result of evaluating an expression.
#[derive(Debug, Clone)]
pub enum Value {
    Closure(Rc<Closure>),
}

impl Value {
    /// Returns the closure to call, if this value can be applied.
    pub fn as_closure(&self) -> Option<&Rc<Closure>> {
        match self {
            Self::Closure(closure) => Some(closure),
        }
    }
}

/// Display trait implementation for Value. A closure prints as the lambda it
/// was made from; its captured bindings are not shown.
impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Closure(closure) => {
                let mut out_string = String::new();
                push_lambda_text(&closure.formal_param, &closure.fn_body, &mut out_string);
                write!(f, "{}", out_string)
            }
        }
    }
}

/// Represents an evaluation error.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum EvalError {
    UnboundVariable(String),
    NotCallable { found: String },
    RecursionLimitExceeded { limit: usize },
}

/// Display trait implementation for EvalError.
impl Display for EvalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnboundVariable(var_name) => {
                write!(f, "Variable {:?} is not bound.", var_name)
            }

            Self::NotCallable { found } => {
                write!(f, "Cannot apply {}: it is not a function.", found)
            }

            Self::RecursionLimitExceeded { limit } => {
                write!(f, "Evaluation nesting exceeds the depth limit of {}.", limit)
            }
        }
    }
}

impl std::error::Error for EvalError {}

/// Options for a single evaluation.
#[derive(Debug, Clone, Copy)]
pub struct EvalOptions {
    pub max_depth: usize,
    /// Print each application as it happens.
    pub verbose: bool,
}

impl Default for EvalOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_EVAL_DEPTH,
            verbose: false,
        }
    }
}

// Outcome of evaluating one node. An application hands back the call it
// reduces to instead of making it, so the caller can run the body in a loop.
enum Step {
    Done(Value),
    TailCall {
        closure: Rc<Closure>,
        argument: Value,
    },
}

fn eval_step(
    expr: &ExprNode,
    env: &Environment,
    depth: usize,
    options: &EvalOptions,
) -> Result<Step, EvalError> {
    match expr {
        ExprNode::NameRef { var_name } => env
            .lookup(var_name)
            .map(Step::Done)
            .ok_or_else(|| EvalError::UnboundVariable(var_name.clone())),

        ExprNode::LambdaAbs {
            formal_param,
            fn_body,
        } => Ok(Step::Done(Value::Closure(Rc::new(Closure {
            captured_env: env.clone(),
            formal_param: formal_param.clone(),
            fn_body: Rc::clone(fn_body),
        })))),

        ExprNode::Apply {
            fn_expr,
            actual_arg,
        } => {
            let fn_value = eval_expr(fn_expr, env, depth + 1, options)?;
            let closure = fn_value
                .as_closure()
                .ok_or_else(|| EvalError::NotCallable {
                    found: fn_value.to_string(),
                })?
                .clone();

            let argument = eval_expr(actual_arg, env, depth + 1, options)?;

            if options.verbose {
                println!(
                    "In eval_expr at depth {}, binding {} to {}",
                    depth, closure.formal_param, argument
                );
            }

            Ok(Step::TailCall { closure, argument })
        }
    }
}

// Evaluates `expr` fully. Closure bodies are run in this loop rather than by
// recursing, so only function and argument positions add to the depth.
fn eval_expr(
    expr: &ExprNode,
    env: &Environment,
    depth: usize,
    options: &EvalOptions,
) -> Result<Value, EvalError> {
    if depth > options.max_depth {
        return Err(EvalError::RecursionLimitExceeded {
            limit: options.max_depth,
        });
    }

    let mut step = eval_step(expr, env, depth, options)?;

    loop {
        match step {
            Step::Done(value) => return Ok(value),
            Step::TailCall { closure, argument } => {
                let call_env = closure
                    .captured_env
                    .extend(&closure.formal_param, argument);
                step = eval_step(&closure.fn_body, &call_env, depth, options)?;
            }
        }
    }
}

/// Evaluates `expr` in `env` with the default options.
pub fn evaluate(expr: &ExprNode, env: &Environment) -> Result<Value, EvalError> {
    evaluate_with_options(expr, env, &EvalOptions::default())
}

/// Evaluates `expr` in `env`. Programs that never reach a value (such as
/// `(\x x x)(\x x x)`) make this loop forever.
pub fn evaluate_with_options(
    expr: &ExprNode,
    env: &Environment,
    options: &EvalOptions,
) -> Result<Value, EvalError> {
    eval_expr(expr, env, 0, options)
}
