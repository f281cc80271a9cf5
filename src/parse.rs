//! Parsing Hack assembly source lines.
//!
//! Parsing happens one line at a time and in stages, so each assembler pass
//! only does the work it needs:
//! - [`strip_line`] removes the trailing comment and surrounding whitespace from a raw line,
//! - [`parse_stmt`] classifies a stripped line as a label declaration, A-instruction, or C-instruction,
//! - [`parse_a_operand`] resolves whether an A-instruction operand is a literal or a symbol,
//! - [`decode_c_instr`] splits a C-instruction into its `dest`, `comp`, and `jump` fields.
//!
//! # Example
//! ```
//! use hack_asm::ast::{CInstr, Stmt};
//! use hack_asm::parse::{decode_c_instr, parse_stmt, strip_line};
//!
//! let line = strip_line("    D=D+M;JGT // add and jump");
//! assert_eq!(line, "D=D+M;JGT");
//!
//! let Ok(Some(Stmt::CInstr(mnemonic))) = parse_stmt(line) else { unreachable!() };
//! assert_eq!(decode_c_instr(mnemonic), Ok(CInstr { dest: Some("D"), comp: "D+M", jump: Some("JGT") }));
//! ```

pub mod lex;

use std::num::IntErrorKind;

use lex::{LexErr, Token};

use crate::ast::{AOperand, Addr, AddrNewErr, CInstr, Stmt};

/// The token which starts a comment. The comment spans the remainder of the line.
pub const COMMENT_START: &str = "//";

/// Any errors raised in attempting to parse a source line.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum ParseErr {
    /// The instruction could not be tokenized.
    Lex(LexErr),
    /// A label declaration is missing its closing parenthesis.
    UnclosedLabel,
    /// A label declaration has no name.
    EmptyLabel,
    /// An A-instruction has nothing after the `@`.
    EmptyOperand,
    /// A literal A-instruction operand does not fit in an address.
    AddrNewErr(AddrNewErr),
    /// A C-instruction is missing a field next to a separator (e.g., `D=` or `;JMP`).
    EmptyField,
    /// A C-instruction has more than one `=`.
    MultipleAssign,
    /// A C-instruction has more than one `;`.
    MultipleJump,
    /// A C-instruction has its `;` before its `=`.
    MisorderedFields,
}
impl std::fmt::Display for ParseErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseErr::Lex(e)           => e.fmt(f),
            ParseErr::UnclosedLabel    => f.write_str("label declaration was never closed"),
            ParseErr::EmptyLabel       => f.write_str("label declaration has no name"),
            ParseErr::EmptyOperand     => f.write_str("A-instruction has no operand"),
            ParseErr::AddrNewErr(e)    => e.fmt(f),
            ParseErr::EmptyField       => f.write_str("C-instruction is missing a field"),
            ParseErr::MultipleAssign   => f.write_str("C-instruction has more than one destination"),
            ParseErr::MultipleJump     => f.write_str("C-instruction has more than one jump"),
            ParseErr::MisorderedFields => f.write_str("C-instruction jump appears before its destination"),
        }
    }
}
impl std::error::Error for ParseErr {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseErr::Lex(e)        => Some(e),
            ParseErr::AddrNewErr(e) => Some(e),
            _ => None
        }
    }
}
impl crate::err::Error for ParseErr {
    fn help(&self) -> Option<std::borrow::Cow<str>> {
        match self {
            ParseErr::Lex(e)           => e.help(),
            ParseErr::UnclosedLabel    => Some("add a `)` to the end of the label".into()),
            ParseErr::EmptyLabel       => Some("put the label's name inside the parentheses, e.g. `(LOOP)`".into()),
            ParseErr::EmptyOperand     => Some("an A-instruction is `@` followed by a number or a symbol".into()),
            ParseErr::AddrNewErr(e)    => e.help(),
            ParseErr::EmptyField       => Some("a C-instruction has the form `dest=comp;jump`, where `dest=` and `;jump` may be omitted".into()),
            ParseErr::MultipleAssign   => Some("a C-instruction has the form `dest=comp;jump`, with at most one `=`".into()),
            ParseErr::MultipleJump     => Some("a C-instruction has the form `dest=comp;jump`, with at most one `;`".into()),
            ParseErr::MisorderedFields => Some("a C-instruction has the form `dest=comp;jump`".into()),
        }
    }
}
impl From<LexErr> for ParseErr {
    fn from(value: LexErr) -> Self {
        ParseErr::Lex(value)
    }
}
impl From<AddrNewErr> for ParseErr {
    fn from(value: AddrNewErr) -> Self {
        ParseErr::AddrNewErr(value)
    }
}

/// Strips the comment and any surrounding whitespace from a raw source line.
///
/// The comment starts at the first [`COMMENT_START`] and spans the rest of the line.
///
/// # Example
/// ```
/// use hack_asm::parse::strip_line;
///
/// assert_eq!(strip_line("  @R0  // load R0\r"), "@R0");
/// assert_eq!(strip_line("// just a comment"), "");
/// assert_eq!(strip_line("   "), "");
/// ```
pub fn strip_line(line: &str) -> &str {
    let code = match line.find(COMMENT_START) {
        Some(i) => &line[..i],
        None => line,
    };

    code.trim()
}

/// Classifies a stripped source line (see [`strip_line`]).
///
/// This returns `Ok(None)` if the line is empty.
/// The operands of the statement are not validated here
/// (see [`parse_a_operand`] and [`decode_c_instr`]).
///
/// # Example
/// ```
/// use hack_asm::ast::Stmt;
/// use hack_asm::parse::parse_stmt;
///
/// assert_eq!(parse_stmt("(LOOP)"), Ok(Some(Stmt::Label("LOOP"))));
/// assert_eq!(parse_stmt("@LOOP"), Ok(Some(Stmt::AInstr("LOOP"))));
/// assert_eq!(parse_stmt("0;JMP"), Ok(Some(Stmt::CInstr("0;JMP"))));
/// assert_eq!(parse_stmt(""), Ok(None));
/// ```
pub fn parse_stmt(line: &str) -> Result<Option<Stmt<'_>>, ParseErr> {
    if line.is_empty() {
        return Ok(None);
    }

    if let Some(rest) = line.strip_prefix('(') {
        let label = rest.strip_suffix(')').ok_or(ParseErr::UnclosedLabel)?;
        return match label.is_empty() {
            true  => Err(ParseErr::EmptyLabel),
            false => Ok(Some(Stmt::Label(label))),
        };
    }

    match line.strip_prefix('@') {
        Some(operand) => Ok(Some(Stmt::AInstr(operand))),
        None => Ok(Some(Stmt::CInstr(line))),
    }
}

/// Parses the operand of an A-instruction (the text following the `@`).
///
/// If the operand consists entirely of decimal digits, it is a literal address.
/// Otherwise, it is a symbol.
///
/// # Example
/// ```
/// use hack_asm::ast::{Addr, AOperand};
/// use hack_asm::parse::parse_a_operand;
///
/// assert_eq!(parse_a_operand("21"), Ok(AOperand::Literal(Addr::new(21).unwrap())));
/// assert_eq!(parse_a_operand("i"), Ok(AOperand::Symbol("i")));
/// assert_eq!(parse_a_operand("2i"), Ok(AOperand::Symbol("2i")));
/// assert!(parse_a_operand("32768").is_err());
/// ```
pub fn parse_a_operand(operand: &str) -> Result<AOperand<'_>, ParseErr> {
    if operand.is_empty() {
        return Err(ParseErr::EmptyOperand);
    }
    if !operand.bytes().all(|b| b.is_ascii_digit()) {
        return Ok(AOperand::Symbol(operand));
    }

    let value = operand.parse::<u16>()
        .map_err(|e| match e.kind() {
            IntErrorKind::PosOverflow => ParseErr::AddrNewErr(AddrNewErr),
            _ => unreachable!("digit-only operand should only fail to parse by overflowing"),
        })?;

    Ok(AOperand::Literal(Addr::new(value)?))
}

/// Decodes a C-instruction into its `dest`, `comp`, and `jump` fields.
///
/// The instruction is split on its separators:
/// - `dest=comp;jump`: all three fields
/// - `dest=comp`: no jump
/// - `comp;jump`: no destination
/// - `comp`: only a computation
///
/// The fields are not checked against the instruction set here
/// (that is done by the code generator, see [`crate::asm::code`]).
///
/// # Example
/// ```
/// use hack_asm::ast::CInstr;
/// use hack_asm::parse::decode_c_instr;
///
/// assert_eq!(decode_c_instr("D=A"), Ok(CInstr { dest: Some("D"), comp: "A", jump: None }));
/// assert_eq!(decode_c_instr("0;JMP"), Ok(CInstr { dest: None, comp: "0", jump: Some("JMP") }));
/// assert!(decode_c_instr("D=A=M").is_err());
/// ```
pub fn decode_c_instr(instr: &str) -> Result<CInstr<'_>, ParseErr> {
    use Token::{Assign as Asg, Mnemonic as Mn, Semicolon as Semi};

    let tokens = lex::tokenize(instr)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|(e, _)| ParseErr::Lex(e))?;

    let field = move |span: &logos::Span| &instr[span.clone()];
    match tokens.as_slice() {
        [(Mn, comp)] => Ok(CInstr {
            dest: None,
            comp: field(comp),
            jump: None
        }),
        [(Mn, dest), (Asg, _), (Mn, comp)] => Ok(CInstr {
            dest: Some(field(dest)),
            comp: field(comp),
            jump: None
        }),
        [(Mn, comp), (Semi, _), (Mn, jump)] => Ok(CInstr {
            dest: None,
            comp: field(comp),
            jump: Some(field(jump))
        }),
        [(Mn, dest), (Asg, _), (Mn, comp), (Semi, _), (Mn, jump)] => Ok(CInstr {
            dest: Some(field(dest)),
            comp: field(comp),
            jump: Some(field(jump))
        }),
        _ => Err(malformed_c_instr(&tokens)),
    }
}

/// Determines why a C-instruction's tokens do not fit any of the legal shapes.
fn malformed_c_instr(tokens: &[(Token, logos::Span)]) -> ParseErr {
    let position = |target: Token| tokens.iter().position(|(t, _)| *t == target);
    let count = |target: Token| tokens.iter().filter(|(t, _)| *t == target).count();

    if count(Token::Assign) > 1 {
        return ParseErr::MultipleAssign;
    }
    if count(Token::Semicolon) > 1 {
        return ParseErr::MultipleJump;
    }
    match (position(Token::Assign), position(Token::Semicolon)) {
        (Some(eq), Some(semi)) if semi < eq => ParseErr::MisorderedFields,
        _ => ParseErr::EmptyField,
    }
}
