//! Components relating to the syntax of Hack assembly.
//!
//! These components together are used to represent...
//! - [`Stmt`] (a classified, comment-free source line),
//! - [`AOperand`] (the operand of an A-instruction),
//! - and [`CInstr`] (a C-instruction split into its `dest`, `comp`, and `jump` fields).

/// A classified source line.
///
/// Blank and comment-only lines carry no statement.
/// Each variant borrows the relevant text from the source line.
///
/// ## Examples
///
/// ```text
/// (LOOP)      => Stmt::Label("LOOP")
/// @R0         => Stmt::AInstr("R0")
/// D=D+M;JGT   => Stmt::CInstr("D=D+M;JGT")
/// ```
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum Stmt<'s> {
    /// A label declaration. Holds the label's name.
    Label(&'s str),
    /// An A-instruction. Holds the text after the `@`.
    AInstr(&'s str),
    /// A C-instruction. Holds the entire mnemonic.
    CInstr(&'s str),
}
impl Stmt<'_> {
    /// How many words this statement takes up in the final program.
    pub fn word_len(&self) -> u16 {
        match self {
            Stmt::Label(_)  => 0,
            Stmt::AInstr(_) => 1,
            Stmt::CInstr(_) => 1,
        }
    }
}

/// The operand of an A-instruction.
///
/// ## Examples
///
/// ```text
/// @21
///  ~~ Literal
/// @LOOP
///  ~~~~ Symbol
/// ```
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum AOperand<'s> {
    /// A decimal literal address.
    Literal(Addr),
    /// A symbol, either a label, a predefined symbol, or a variable.
    Symbol(&'s str)
}
impl std::fmt::Display for AOperand<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AOperand::Literal(addr) => addr.fmt(f),
            AOperand::Symbol(sym)   => f.write_str(sym),
        }
    }
}

/// A decoded C-instruction.
///
/// `comp` is always present. `dest` and `jump` are only present
/// if their separator (`=` and `;` respectively) appeared in the instruction.
///
/// ## Examples
///
/// ```text
/// AM=M-1;JNE
/// ~~ dest
///    ~~~ comp
///        ~~~ jump
/// ```
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct CInstr<'s> {
    /// The destination mnemonic.
    pub dest: Option<&'s str>,
    /// The computation mnemonic.
    pub comp: &'s str,
    /// The jump mnemonic.
    pub jump: Option<&'s str>,
}
impl std::fmt::Display for CInstr<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(dest) = self.dest {
            write!(f, "{dest}=")?;
        }
        f.write_str(self.comp)?;
        if let Some(jump) = self.jump {
            write!(f, ";{jump}")?;
        }
        Ok(())
    }
}

/// A 15-bit address, as loaded by an A-instruction.
///
/// The top bit of an A-instruction word is always `0`,
/// so only the addresses `0..=32767` can be encoded.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Default)]
pub struct Addr(u16);

impl Addr {
    /// The number of bits of an address.
    pub const BITS: u32 = 15;
    /// The largest encodable address.
    pub const MAX: Addr = Addr((1 << Self::BITS) - 1);

    /// Creates a new address.
    /// This must fit within 15 bits, otherwise an error is raised.
    ///
    /// # Examples
    ///
    /// ```
    /// # use hack_asm::ast::Addr;
    /// #
    /// assert!(Addr::new(0).is_ok());
    /// assert!(Addr::new(24576).is_ok());
    /// assert!(Addr::new(32767).is_ok());
    /// assert!(Addr::new(32768).is_err());
    /// ```
    pub fn new(n: u16) -> Result<Self, AddrNewErr> {
        match n <= Self::MAX.0 {
            true  => Ok(Addr(n)),
            false => Err(AddrNewErr),
        }
    }

    /// Gets the value of this address.
    pub fn get(self) -> u16 {
        self.0
    }
}
impl std::fmt::Display for Addr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
impl From<Addr> for u16 {
    fn from(value: Addr) -> Self {
        value.0
    }
}
impl TryFrom<u16> for Addr {
    type Error = AddrNewErr;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Addr::new(value)
    }
}

/// The error that results from calling [`Addr::new`] with a value that does not fit in 15 bits.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct AddrNewErr;

impl std::fmt::Display for AddrNewErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "address is too big for unsigned {}-bit integer", Addr::BITS)
    }
}
impl std::error::Error for AddrNewErr {}
impl crate::err::Error for AddrNewErr {
    fn help(&self) -> Option<std::borrow::Cow<str>> {
        Some(format!("the range for an address is [0, {}]", Addr::MAX).into())
    }
}

#[cfg(test)]
mod tests {
    use super::{Addr, CInstr, Stmt};

    #[test]
    fn test_addr_bounds() {
        assert_eq!(Addr::new(0).map(Addr::get), Ok(0));
        assert_eq!(Addr::new(16384).map(Addr::get), Ok(16384));
        assert_eq!(Addr::MAX.get(), 0x7FFF);
        assert!(Addr::new(0x8000).is_err());
        assert!(Addr::new(u16::MAX).is_err());
    }

    #[test]
    fn test_word_len() {
        assert_eq!(Stmt::Label("LOOP").word_len(), 0);
        assert_eq!(Stmt::AInstr("LOOP").word_len(), 1);
        assert_eq!(Stmt::CInstr("0;JMP").word_len(), 1);
    }

    #[test]
    fn test_c_instr_display() {
        let instr = CInstr { dest: Some("AM"), comp: "M-1", jump: Some("JNE") };
        assert_eq!(instr.to_string(), "AM=M-1;JNE");
        let instr = CInstr { dest: None, comp: "0", jump: Some("JMP") };
        assert_eq!(instr.to_string(), "0;JMP");
        let instr = CInstr { dest: Some("D"), comp: "A", jump: None };
        assert_eq!(instr.to_string(), "D=A");
        let instr = CInstr { dest: None, comp: "D", jump: None };
        assert_eq!(instr.to_string(), "D");
    }
}
