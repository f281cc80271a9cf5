//! Encoding decoded instructions into machine words.
//!
//! The code generator consists of three lookup tables, one per C-instruction field:
//! - [`dest_bits`]: the 3-bit destination code
//! - [`comp_bits`]: the 7-bit computation code
//! - [`jump_bits`]: the 3-bit jump code
//!
//! A C-instruction word is laid out as:
//! ```text
//! 111a cccc ccdd djjj
//! ~~~              prefix
//!    ~ ~~~~ ~~     comp (a selects M over A, c is the ALU control code)
//!             ~~ ~ dest
//!                 ~~~ jump
//! ```
//!
//! An A-instruction word is a `0` bit followed by a 15-bit address.

use crate::ast::{Addr, CInstr};

use super::AsmErrKind;

/// The fixed top bits of every C-instruction.
const C_PREFIX: u16 = 0b111 << 13;

/// Looks up the 3-bit code of a destination mnemonic.
///
/// An absent destination encodes as `000`.
///
/// | dest   | code (bin) |
/// |--------|------------|
/// | none   | `000`      |
/// | `M`    | `001`      |
/// | `D`    | `010`      |
/// | `MD`   | `011`      |
/// | `A`    | `100`      |
/// | `AM`   | `101`      |
/// | `AD`   | `110`      |
/// | `AMD`  | `111`      |
pub fn dest_bits(dest: Option<&str>) -> Option<u16> {
    let Some(dest) = dest else { return Some(0b000) };

    match dest {
        "M"   => Some(0b001),
        "D"   => Some(0b010),
        "MD"  => Some(0b011),
        "A"   => Some(0b100),
        "AM"  => Some(0b101),
        "AD"  => Some(0b110),
        "AMD" => Some(0b111),
        _ => None
    }
}

/// Looks up the 3-bit code of a jump mnemonic.
///
/// An absent jump encodes as `000`.
///
/// | jump   | code (bin) |
/// |--------|------------|
/// | none   | `000`      |
/// | `JGT`  | `001`      |
/// | `JEQ`  | `010`      |
/// | `JGE`  | `011`      |
/// | `JLT`  | `100`      |
/// | `JNE`  | `101`      |
/// | `JLE`  | `110`      |
/// | `JMP`  | `111`      |
pub fn jump_bits(jump: Option<&str>) -> Option<u16> {
    let Some(jump) = jump else { return Some(0b000) };

    match jump {
        "JGT" => Some(0b001),
        "JEQ" => Some(0b010),
        "JGE" => Some(0b011),
        "JLT" => Some(0b100),
        "JNE" => Some(0b101),
        "JLE" => Some(0b110),
        "JMP" => Some(0b111),
        _ => None
    }
}

/// Looks up the 7-bit code of a computation mnemonic.
///
/// The top bit (`a`) is set when the computation reads the memory cell `M`
/// instead of the `A` register. The remaining 6 bits are the ALU control code,
/// which is the same for the `A` and `M` forms of a computation.
pub fn comp_bits(comp: &str) -> Option<u16> {
    let code = match comp {
        "0"   => 0b0_101010,
        "1"   => 0b0_111111,
        "-1"  => 0b0_111010,
        "D"   => 0b0_001100,
        "A"   => 0b0_110000,
        "!D"  => 0b0_001101,
        "!A"  => 0b0_110001,
        "-D"  => 0b0_001111,
        "-A"  => 0b0_110011,
        "D+1" => 0b0_011111,
        "A+1" => 0b0_110111,
        "D-1" => 0b0_001110,
        "A-1" => 0b0_110010,
        "D+A" => 0b0_000010,
        "D-A" => 0b0_010011,
        "A-D" => 0b0_000111,
        "D&A" => 0b0_000000,
        "D|A" => 0b0_010101,

        "M"   => 0b1_110000,
        "!M"  => 0b1_110001,
        "-M"  => 0b1_110011,
        "M+1" => 0b1_110111,
        "M-1" => 0b1_110010,
        "D+M" => 0b1_000010,
        "D-M" => 0b1_010011,
        "M-D" => 0b1_000111,
        "D&M" => 0b1_000000,
        "D|M" => 0b1_010101,
        _ => return None
    };

    Some(code)
}

impl CInstr<'_> {
    /// Encodes this C-instruction into a machine word.
    ///
    /// This fails if any of the fields is not a mnemonic of the instruction set.
    ///
    /// # Example
    /// ```
    /// use hack_asm::ast::CInstr;
    ///
    /// let instr = CInstr { dest: Some("D"), comp: "A", jump: None };
    /// assert_eq!(instr.encode(), Ok(0b111_0110000_010_000));
    ///
    /// let instr = CInstr { dest: None, comp: "A*2", jump: None };
    /// assert!(instr.encode().is_err());
    /// ```
    pub fn encode(&self) -> Result<u16, AsmErrKind> {
        let comp = comp_bits(self.comp)
            .ok_or_else(|| AsmErrKind::UnknownComp(self.comp.to_string()))?;
        let dest = dest_bits(self.dest)
            .ok_or_else(|| AsmErrKind::UnknownDest(self.dest.unwrap_or_default().to_string()))?;
        let jump = jump_bits(self.jump)
            .ok_or_else(|| AsmErrKind::UnknownJump(self.jump.unwrap_or_default().to_string()))?;

        Ok(C_PREFIX | comp << 6 | dest << 3 | jump)
    }
}

/// Encodes an A-instruction which loads the given address.
///
/// The top bit of the word is always `0`, since addresses are 15 bits.
pub fn encode_a_instr(addr: Addr) -> u16 {
    addr.get()
}

/// Recovers the address loaded by an A-instruction word.
///
/// This returns `None` if the word is not an A-instruction (i.e., its top bit is set).
///
/// # Example
/// ```
/// use hack_asm::ast::Addr;
/// use hack_asm::asm::code::{decode_a_instr, encode_a_instr};
///
/// let addr = Addr::new(24576).unwrap();
/// assert_eq!(decode_a_instr(encode_a_instr(addr)), Some(addr));
/// assert_eq!(decode_a_instr(0b111_0101010_000_111), None);
/// ```
pub fn decode_a_instr(word: u16) -> Option<Addr> {
    Addr::new(word).ok()
}
