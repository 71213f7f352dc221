//! Run a given lambda calculus program and print the result to standard
//! output.
//!
//! Example usage:
//!
//!     cargo run -- \
//!         --src-filepath script.txt \
//!         --show-tokens --show-ast

use std::process::ExitCode;

use clap::Parser;
use closure_lambda_calc::end_to_end::{run_interpreter, InterpreterConfig};

fn main() -> ExitCode {
    let interpreter_config = InterpreterConfig::parse();

    let interpreter_result = run_interpreter(&interpreter_config);

    match interpreter_result {
        Ok(report) => {
            println!("{}", report);
            ExitCode::SUCCESS
        }

        Err(run_error) => {
            eprintln!("{}", run_error);
            ExitCode::FAILURE
        }
    }
}
