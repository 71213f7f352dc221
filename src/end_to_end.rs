//! Code to configure and run the interpreter on an input source code file.

use std::fs;

use clap::Parser;

use crate::closure_execution::{self, EvalError, EvalOptions, DEFAULT_MAX_EVAL_DEPTH};
use crate::environment::Environment;
use crate::lexical_analysis::{self, LexError, Token};
use crate::recursive_descent_parsing::{self, ParseError, DEFAULT_MAX_PARSE_DEPTH};

/// Config for the interpreter. Instantiate via `InterpreterConfig::parse()`.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct InterpreterConfig {
    /// The input filepath to run on.
    #[arg(short, long, default_value_t = String::from("script.txt"))]
    pub src_filepath: String,

    /// Maximum nesting of brackets, lambdas and application chains.
    #[arg(long, default_value_t = DEFAULT_MAX_PARSE_DEPTH)]
    pub max_parse_depth: usize,

    /// Maximum nesting of evaluation (calls in tail position do not count).
    #[arg(long, default_value_t = DEFAULT_MAX_EVAL_DEPTH)]
    pub max_eval_depth: usize,

    /// Include the token sequence in the output.
    #[arg(long)]
    pub show_tokens: bool,

    /// Include the parsed expression in the output.
    #[arg(long)]
    pub show_ast: bool,

    /// Print progress of each stage while running.
    #[arg(short, long)]
    pub verbose: bool,
}

/// Errors that may be thrown when running the interpreter.
#[derive(Debug)]
pub enum RunError {
    ConfigError(String),
    InputFileError(std::io::Error),
    LexError(LexError),
    ParseError(ParseError),
    EvalError(EvalError),
}

/// Display trait implementation for RunError.
impl std::fmt::Display for RunError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ConfigError(config_err_string) => {
                return write!(f, "Interpreter configuration error: {}", config_err_string);
            }

            Self::InputFileError(io_err) => {
                return write!(f, "Input file error: {}", io_err);
            }

            Self::LexError(lex_err) => {
                return write!(f, "Lex error: {}", lex_err);
            }

            Self::ParseError(parse_err) => {
                return write!(f, "Parse error: {}", parse_err);
            }

            Self::EvalError(eval_err) => {
                return write!(f, "Evaluation error: {}", eval_err);
            }
        }
    }
}

impl std::error::Error for RunError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ConfigError(_) => {
                return None;
            }

            Self::InputFileError(io_err) => {
                return Some(io_err);
            }

            Self::LexError(lex_err) => {
                return Some(lex_err);
            }

            Self::ParseError(parse_err) => {
                return Some(parse_err);
            }

            Self::EvalError(eval_err) => {
                return Some(eval_err);
            }
        }
    }
}

/// Type conversions for errors.
impl From<std::io::Error> for RunError {
    fn from(value: std::io::Error) -> Self {
        return Self::InputFileError(value);
    }
}

impl From<LexError> for RunError {
    fn from(value: LexError) -> Self {
        return Self::LexError(value);
    }
}

impl From<ParseError> for RunError {
    fn from(value: ParseError) -> Self {
        return Self::ParseError(value);
    }
}

impl From<EvalError> for RunError {
    fn from(value: EvalError) -> Self {
        return Self::EvalError(value);
    }
}

fn tokens_to_string(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(|token| token.to_string())
        .collect::<Vec<String>>()
        .join(" ")
}

/// Runs the lexer, parser and evaluator on program text held in memory and
/// returns the report to print.
pub fn run_program_bytes(
    program_bytes: &[u8],
    config: &InterpreterConfig,
) -> Result<String, RunError> {
    if config.max_parse_depth == 0 || config.max_eval_depth == 0 {
        return Err(RunError::ConfigError(String::from(
            "depth limits must be at least 1",
        )));
    }

    let mut report = Vec::new();

    // Run lexer.
    let tokens = lexical_analysis::tokenize_bytes(program_bytes)?;
    if config.verbose {
        println!("Lexed {} tokens.", tokens.len());
    }
    if config.show_tokens {
        report.push(format!("tokens: {}", tokens_to_string(&tokens)));
    }

    // Run parser.
    let expr = recursive_descent_parsing::parse_with_depth_limit(&tokens, config.max_parse_depth)?;
    if config.verbose {
        println!("Parsed expression {}", expr);
    }
    if config.show_ast {
        report.push(format!("ast: {}", expr));
    }

    // Evaluate under an empty top-level environment.
    let eval_options = EvalOptions {
        max_depth: config.max_eval_depth,
        verbose: config.verbose,
    };
    let value = closure_execution::evaluate_with_options(&expr, &Environment::empty(), &eval_options)?;
    report.push(format!("result: {}", value));

    return Ok(report.join("\n"));
}

/// Run the interpreter (i.e. the lexer, parser, and evaluator) given an
/// interpreter config.
pub fn run_interpreter(config: &InterpreterConfig) -> Result<String, RunError> {
    // Read the input file as raw bytes; the lexer checks the encoding.
    let program_bytes = fs::read(&config.src_filepath)?;

    return run_program_bytes(&program_bytes, config);
}
