//! Tokenizing Hack C-instruction mnemonics.
//!
//! A C-instruction is made up of mnemonic runs (`D`, `M+1`, `JGT`, ...)
//! separated by the two separator tokens `=` and `;`.
//! This module holds the tokens ([`Token`]) which the decoder
//! ([`crate::parse::decode_c_instr`]) pattern matches over.

use logos::{Logos, Span};

/// A unit of information in a C-instruction.
#[derive(Debug, Logos, PartialEq, Eq, Clone, Copy)]
#[logos(error = LexErr)]
pub enum Token {
    /// A run of mnemonic characters (e.g., `AMD`, `D|M`, `-1`, `JMP`).
    ///
    /// This is any run of characters other than separators and whitespace.
    /// Whether the run is actually a valid mnemonic is only known
    /// once it is looked up by the code generator.
    #[regex(r"[^=;\s]+")]
    Mnemonic,

    /// The assignment separator, which splits `dest` from `comp`.
    #[token("=")]
    Assign,

    /// The jump separator, which splits `comp` from `jump`.
    #[token(";")]
    Semicolon,
}

/// Any errors raised in attempting to tokenize a C-instruction.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Default)]
pub enum LexErr {
    /// Whitespace appeared in the middle of an instruction.
    #[default]
    Whitespace,
}
impl std::fmt::Display for LexErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LexErr::Whitespace => f.write_str("unexpected whitespace in instruction"),
        }
    }
}
impl std::error::Error for LexErr {}
impl crate::err::Error for LexErr {
    fn help(&self) -> Option<std::borrow::Cow<str>> {
        match self {
            LexErr::Whitespace => Some("write the instruction without spaces (e.g., `D=M` instead of `D = M`)".into()),
        }
    }
}

/// Tokenizes a C-instruction, pairing every token with its span in `src`.
///
/// Erroneous characters are reported together with their span.
pub(crate) fn tokenize(src: &str) -> impl Iterator<Item=Result<(Token, Span), (LexErr, Span)>> + '_ {
    Token::lexer(src)
        .spanned()
        .map(|(m_token, span)| match m_token {
            Ok(token) => Ok((token, span)),
            Err(e) => Err((e, span)),
        })
}
