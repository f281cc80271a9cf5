//! Formatters which can read and write object files into disk.
//!
//! The [`ObjFileFormat`] trait describes an implementation of reading/writing object files into disk.
//! This module provides two implementations of the trait:
//! - [`TextFormat`]: The `.hack` text representation, one binary word per line
//! - [`BinaryFormat`]: A raw binary representation of the words
//!
//! Neither format stores debug symbols.

use std::fmt::Write;

use super::ObjectFile;

/// A trait defining object file formats.
pub trait ObjFileFormat {
    /// Representation of the serialized format.
    ///
    /// For binary formats, `[u8]` should be used.
    /// For text-based formats,`str` should be used.
    type Stream: ToOwned + ?Sized;
    /// Serializes into the stream format.
    fn serialize(o: &ObjectFile) -> <Self::Stream as ToOwned>::Owned;
    /// Deserializes from the stream format, returning `None`
    /// if an error occurred during deserialization.
    fn deserialize(i: &Self::Stream) -> Option<ObjectFile>;
}

// BINARY!
/// A binary format of object file data.
///
/// Each word is written as two bytes, most significant byte first.
/// There is no header.
///
/// # Example
/// ```
/// use hack_asm::asm::assemble;
/// use hack_asm::asm::encoding::{BinaryFormat, ObjFileFormat};
///
/// let obj_file = assemble("@2\nD=A").unwrap();
/// assert_eq!(BinaryFormat::serialize(&obj_file), [0x00, 0x02, 0xEC, 0x10]);
/// ```
pub struct BinaryFormat;

impl ObjFileFormat for BinaryFormat {
    type Stream = [u8];

    fn serialize(o: &ObjectFile) -> <Self::Stream as ToOwned>::Owned {
        o.words.iter()
            .flat_map(|&w| u16::to_be_bytes(w))
            .collect()
    }

    fn deserialize(bytes: &Self::Stream) -> Option<ObjectFile> {
        if bytes.len() % 2 != 0 { return None; }

        let words = bytes.chunks_exact(2)
            .map(|c| <[u8; 2]>::try_from(c).ok().map(u16::from_be_bytes))
            .collect::<Option<_>>()?;

        Some(ObjectFile::new(words))
    }
}

// TEXT!
/// A text-based format of object file data.
///
/// Each word is written as a line of 16 `0`/`1` characters,
/// most significant bit first, terminated by a newline.
///
/// When deserializing, blank lines are skipped and `\r\n` line endings are accepted.
///
/// # Example
/// ```
/// use hack_asm::asm::assemble;
/// use hack_asm::asm::encoding::{ObjFileFormat, TextFormat};
///
/// let obj_file = assemble("@2\nD=A").unwrap();
/// assert_eq!(TextFormat::serialize(&obj_file), "0000000000000010\n1110110000010000\n");
/// ```
pub struct TextFormat;

const TFMT_WORD_LEN: usize = 16;

impl ObjFileFormat for TextFormat {
    type Stream = str;

    fn serialize(o: &ObjectFile) -> <Self::Stream as ToOwned>::Owned {
        let mut buf = String::with_capacity(o.words.len() * (TFMT_WORD_LEN + 1));
        for word in &o.words {
            // Writing into a String cannot fail.
            let _ = writeln!(buf, "{word:016b}");
        }
        buf
    }

    fn deserialize(string: &Self::Stream) -> Option<ObjectFile> {
        let words = string.lines()
            .map(str::trim_end)
            .filter(|l| !l.is_empty())
            .map(bin2u16)
            .collect::<Option<_>>()?;

        Some(ObjectFile::new(words))
    }
}

fn bin2u16(s: &str) -> Option<u16> {
    match s.len() == TFMT_WORD_LEN && s.bytes().all(|b| matches!(b, b'0' | b'1')) {
        true  => u16::from_str_radix(s, 2).ok(),
        false => None
    }
}

#[cfg(test)]
mod tests {
    use crate::asm::code::decode_a_instr;
    use crate::asm::{assemble, assemble_with, AsmFlags, ObjectFile};

    use super::{BinaryFormat, ObjFileFormat, TextFormat};

    const SRC: &str = "
        @R0
        D=M
        @R1
        D=D-M
        @OUTPUT_FIRST
        D;JGT
        @R1
        D=M
        @OUTPUT_D
        0;JMP
    (OUTPUT_FIRST)
        @R0
        D=M
    (OUTPUT_D)
        @R2
        M=D
    (INFINITE_LOOP)
        @INFINITE_LOOP
        0;JMP
    ";

    #[test]
    fn test_text_ser() {
        let obj = assemble("@END\n0;JMP\n(END)").unwrap();
        assert_eq!(TextFormat::serialize(&obj), "0000000000000010\n1110101010000111\n");

        let empty = ObjectFile::new(vec![]);
        assert_eq!(TextFormat::serialize(&empty), "");
    }

    #[test]
    fn test_text_ser_deser() {
        let obj = assemble(SRC).unwrap();
        let text = TextFormat::serialize(&obj);
        assert_eq!(text.lines().count(), 16);
        assert_eq!(TextFormat::deserialize(&text), Some(obj));
    }

    #[test]
    fn test_text_deser_lenient() {
        let obj = TextFormat::deserialize("0000000000000010\r\n\r\n1110110000010000  \n").unwrap();
        assert_eq!(obj.words(), [0b10, 0b1110110000010000]);
    }

    #[test]
    fn test_text_deser_invalid() {
        assert_eq!(TextFormat::deserialize("000000000000001"), None);
        assert_eq!(TextFormat::deserialize("00000000000000010"), None);
        assert_eq!(TextFormat::deserialize("000000000000002X"), None);
        assert_eq!(TextFormat::deserialize("+000000000000001"), None);
    }

    #[test]
    fn test_binary_ser_deser() {
        let obj = assemble(SRC).unwrap();
        let bytes = BinaryFormat::serialize(&obj);
        assert_eq!(bytes.len(), 32);
        assert_eq!(&bytes[..4], [0x00, 0x00, 0xFC, 0x10]);
        assert_eq!(BinaryFormat::deserialize(&bytes), Some(obj));

        assert_eq!(BinaryFormat::deserialize(&bytes[..3]), None);
    }

    #[test]
    fn test_symbols_not_stored() {
        let flags = AsmFlags { debug_symbols: true, ..Default::default() };
        let obj = assemble_with(SRC, flags).unwrap();
        assert!(obj.symbol_table().is_some());

        let read = TextFormat::deserialize(&TextFormat::serialize(&obj)).unwrap();
        assert!(read.symbol_table().is_none());
        assert_eq!(read.words(), obj.words());
    }

    #[test]
    fn test_a_instr_recovery() {
        let obj = assemble("@0\n@SCREEN\n@KBD\n@32767").unwrap();
        let read = TextFormat::deserialize(&TextFormat::serialize(&obj)).unwrap();
        let addrs: Vec<_> = read.words().iter()
            .map(|&w| decode_a_instr(w).map(u16::from))
            .collect();
        assert_eq!(addrs, [Some(0), Some(16384), Some(24576), Some(32767)]);
    }
}
