//! # Lexer for program image files
//!
//! The image format is line-oriented: each line optionally carries one
//! binary literal, `#` starts a comment, and everything else makes the line
//! unparseable (which the parser skips rather than rejects).

use logos::Logos;

/// Tokens for program image text
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r]+")] // Skip whitespace (not newlines)
#[logos(skip r"#[^\n]*")] // Skip comments
pub enum Token {
    /// Candidate binary literal
    #[regex(r"[01]+", |lex| lex.slice().to_string(), priority = 3)]
    Bits(String),

    /// Newline
    #[token("\n")]
    Newline,
}
