//! Error interface for this crate.
//!
//! This module re-exports every error the assembler can produce,
//! and provides the [`Error`] trait, which exposes the extra context
//! (source line and help text) these errors carry.

use std::borrow::Cow;

pub use crate::parse::lex::LexErr;
pub use crate::parse::ParseErr;
pub use crate::ast::AddrNewErr;
pub use crate::asm::{AsmErr, AsmErrKind};

/// Unified error interface for all errors in this crate.
///
/// Note that the [`std::fmt::Display`] implementation is used for the brief message,
/// and [`Error::help`] is used for any further help text.
pub trait Error: std::error::Error {
    /// The index of the source line this error occurred on (if it is associated with one).
    fn line(&self) -> Option<usize> {
        None
    }

    /// Any help text associated with this error.
    fn help(&self) -> Option<Cow<str>> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::{AsmErrKind, Error, LexErr, ParseErr};
    use crate::asm::assemble;

    #[test]
    fn test_line_and_help() {
        let err = assemble("@1\n\nD = M").unwrap_err();
        assert_eq!(err.kind, AsmErrKind::Parse(ParseErr::Lex(LexErr::Whitespace)));
        assert_eq!(err.line(), Some(2));
        assert!(err.help().is_some());

        let err = assemble("@1\nM=M<<1").unwrap_err();
        assert_eq!(err.kind, AsmErrKind::UnknownComp("M<<1".to_string()));
        assert_eq!(err.line(), Some(1));
        assert!(err.help().is_some_and(|h| h.contains("D|M")));

        // Lower level errors aren't associated with a line:
        assert_eq!(ParseErr::EmptyLabel.line(), None);
    }

    #[test]
    fn test_source_chain() {
        use std::error::Error as StdError;

        let err = assemble("@99999").unwrap_err();
        let parse_err = err.source().unwrap();
        assert_eq!(parse_err.to_string(), "address is too big for unsigned 15-bit integer");
        assert!(parse_err.source().is_some());
    }
}
