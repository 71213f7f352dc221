//! Splits program text into tokens. Every character belongs to exactly one of
//! four classes (whitespace, bracket, lambda marker, name character), so
//! lexing a `&str` cannot fail.

use std::fmt::Display;

use lazy_static::lazy_static;
use regex::Regex;

/// A single lexical unit of the language.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Token {
    Name(String),
    OpenBracket,
    CloseBracket,
    LambdaMarker,
}

/// Display trait implementation for Token. Prints the token as it would
/// appear in source text.
impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Name(name) => write!(f, "{}", name),
            Self::OpenBracket => write!(f, "("),
            Self::CloseBracket => write!(f, ")"),
            Self::LambdaMarker => write!(f, "\\"),
        }
    }
}

/// Represents a lexing error.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum LexError {
    InvalidEncoding { byte_offset: usize },
    UnclassifiedInput { byte_offset: usize },
}

/// Display trait implementation for LexError.
impl Display for LexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidEncoding { byte_offset } => {
                write!(f, "Input is not valid UTF-8 (first bad byte at offset {}).", byte_offset)
            }

            Self::UnclassifiedInput { byte_offset } => {
                write!(f, "Internal lexer error: no character class matches input at byte offset {}.", byte_offset)
            }
        }
    }
}

impl std::error::Error for LexError {}

// The character classes that make up the language.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
enum TokenClass {
    Whitespace,
    Bracket,
    LambdaMarker,
    Name,
}

// Represents how to recognize a character class.
#[derive(Debug)]
struct TokenRule {
    token_class: TokenClass,
    regex: Regex,
}

// One rule per character class. The classes are disjoint, so at any position
// exactly one rule matches. Brackets match one character at a time so that
// `((` becomes two tokens, while a run of `\` collapses into one marker.
lazy_static! {
    static ref TOKEN_RULES: Vec<TokenRule> = vec![
        TokenRule {
            token_class: TokenClass::Whitespace,
            regex: Regex::new(r"^[ \t\r\n]+").expect("Unable to compile Whitespace rule regex."),
        },
        TokenRule {
            token_class: TokenClass::Bracket,
            regex: Regex::new(r"^[()]").expect("Unable to compile Bracket rule regex."),
        },
        TokenRule {
            token_class: TokenClass::LambdaMarker,
            regex: Regex::new(r"^\\+").expect("Unable to compile LambdaMarker rule regex."),
        },
        TokenRule {
            token_class: TokenClass::Name,
            regex: Regex::new(r"^[^ \t\r\n()\\]+").expect("Unable to compile Name rule regex."),
        },
    ];
}

// Finds the rule that matches the most characters from the start of the input
// string. Returns None only if no rule matches at all.
fn get_longest_matching_rule(input_str: &str) -> Option<(&'static TokenRule, usize)> {
    let mut longest: Option<(&'static TokenRule, usize)> = None;

    for token_rule in TOKEN_RULES.iter() {
        if let Some(match_obj) = token_rule.regex.find(input_str) {
            let is_longer = longest.map_or(true, |(_, len)| match_obj.len() > len);

            if match_obj.len() > 0 && is_longer {
                longest = Some((token_rule, match_obj.len()));
            }
        }
    }

    longest
}

// Converts one matched run of characters into the tokens it stands for.
fn push_tokens_for_run(token_class: TokenClass, run: &str, out: &mut Vec<Token>) {
    match token_class {
        TokenClass::Whitespace => {}
        TokenClass::Bracket => {
            for c in run.chars() {
                if c == '(' {
                    out.push(Token::OpenBracket);
                } else {
                    out.push(Token::CloseBracket);
                }
            }
        }
        TokenClass::LambdaMarker => out.push(Token::LambdaMarker),
        TokenClass::Name => out.push(Token::Name(String::from(run))),
    }
}

/// Given a string, returns the tokens that make it up. Whitespace is
/// discarded.
pub fn tokenize(program_str: &str) -> Result<Vec<Token>, LexError> {
    let mut curr_idx: usize = 0;
    let mut out = Vec::new();

    while curr_idx < program_str.len() {
        let (token_rule, match_len) = get_longest_matching_rule(&program_str[curr_idx..])
            .ok_or(LexError::UnclassifiedInput {
                byte_offset: curr_idx,
            })?;

        push_tokens_for_run(
            token_rule.token_class,
            &program_str[curr_idx..curr_idx + match_len],
            &mut out,
        );
        curr_idx += match_len;
    }

    Ok(out)
}

/// Same as `tokenize`, but starts from raw bytes (e.g. file contents) and
/// rejects input that is not valid UTF-8.
pub fn tokenize_bytes(program_bytes: &[u8]) -> Result<Vec<Token>, LexError> {
    let program_str =
        std::str::from_utf8(program_bytes).map_err(|utf8_error| LexError::InvalidEncoding {
            byte_offset: utf8_error.valid_up_to(),
        })?;

    tokenize(program_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(text: &str) -> Token {
        Token::Name(String::from(text))
    }

    // Test if a simple application of two lambdas lexes as expected.
    #[test]
    fn test_tokenize_simple() {
        let tokens = tokenize(r"(\x x)(\y y)").expect("tokenize failed");

        assert_eq!(
            tokens,
            vec![
                Token::OpenBracket,
                Token::LambdaMarker,
                name("x"),
                name("x"),
                Token::CloseBracket,
                Token::OpenBracket,
                Token::LambdaMarker,
                name("y"),
                name("y"),
                Token::CloseBracket,
            ]
        );
    }

    // Consecutive brackets are never collapsed into one token.
    #[test]
    fn test_consecutive_brackets() {
        let tokens = tokenize("(()))").expect("tokenize failed");

        assert_eq!(
            tokens,
            vec![
                Token::OpenBracket,
                Token::OpenBracket,
                Token::CloseBracket,
                Token::CloseBracket,
                Token::CloseBracket,
            ]
        );
    }

    // A run of backslashes is one lambda marker, and a name directly after a
    // backslash is split off from it.
    #[test]
    fn test_lambda_marker_run() {
        let tokens = tokenize(r"\\\foo").expect("tokenize failed");

        assert_eq!(tokens, vec![Token::LambdaMarker, name("foo")]);
    }

    // Names can contain any character that is not whitespace, a bracket or a
    // backslash.
    #[test]
    fn test_unusual_name_characters() {
        let tokens = tokenize("x' λ.y_1 +").expect("tokenize failed");

        assert_eq!(tokens, vec![name("x'"), name("λ.y_1"), name("+")]);
    }

    // Extra whitespace between tokens does not change the token sequence.
    #[test]
    fn test_whitespace_insensitive() {
        let compact = tokenize(r"(\x \y x)(\p p)(\q q)").expect("tokenize failed");
        let spread = tokenize("  (\t\\x \r\n \\y   x ) \n(\\p\tp)( \\q q )\n\n")
            .expect("tokenize failed");

        assert_eq!(compact, spread);
    }

    #[test]
    fn test_empty_and_blank_input() {
        assert_eq!(tokenize("").expect("tokenize failed"), vec![]);
        assert_eq!(tokenize(" \t\r\n").expect("tokenize failed"), vec![]);
    }

    // Invalid UTF-8 is the only way lexing can fail.
    #[test]
    fn test_tokenize_bytes_invalid_encoding() {
        let result = tokenize_bytes(b"ab \xff cd");

        assert_eq!(result, Err(LexError::InvalidEncoding { byte_offset: 3 }));
    }

    #[test]
    fn test_tokenize_bytes_valid() {
        let tokens = tokenize_bytes(b"f x").expect("tokenize_bytes failed");

        assert_eq!(tokens, vec![name("f"), name("x")]);
    }

    // Rendering tokens gives back their source text.
    #[test]
    fn test_token_display() {
        let rendered: Vec<String> = tokenize(r"(\abc d)")
            .expect("tokenize failed")
            .iter()
            .map(|token| token.to_string())
            .collect();

        assert_eq!(rendered, vec!["(", "\\", "abc", "d", ")"]);
    }
}
