//! A Hack assembler.
//!
//! This translates Hack assembly (the symbolic language of the 16-bit Hack computer)
//! into Hack machine code, one 16-bit word per instruction.
//!
//! # Usage
//!
//! To convert Hack source code to an object file, it must be assembled:
//! ```
//! use hack_asm::asm::{assemble, ObjectFile};
//!
//! let code = "
//!     // Computes R0 = 2 + 3
//!     @2
//!     D=A
//!     @3
//!     D=D+A
//!     @0
//!     M=D
//! ";
//! let obj_file: ObjectFile = assemble(code).unwrap();
//! assert_eq!(obj_file.words().len(), 6);
//! ```
//!
//! Once an object file has been created, it can be written out in one of the formats
//! of [`asm::encoding`]. [`TextFormat`](asm::encoding::TextFormat) produces the usual `.hack` file:
//! ```
//! # use hack_asm::asm::assemble;
//! use hack_asm::asm::encoding::{ObjFileFormat, TextFormat};
//!
//! # let obj_file = assemble("@2\nD=A\n@3\nD=D+A\n@0\nM=D").unwrap();
//! let hack = TextFormat::serialize(&obj_file);
//! assert!(hack.starts_with("0000000000000010\n1110110000010000\n"));
//! ```
//!
//! Assembly can be configured with [`asm::AsmFlags`] (see [`asm::assemble_with`]),
//! and the individual stages are available in the [`parse`] and [`asm`] modules.
#![warn(missing_docs)]

pub mod parse;
pub mod ast;
pub mod asm;
pub mod err;
