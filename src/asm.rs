//! Assembling Hack assembly source into object files.
//!
//! Assembly happens in two passes over the (comment-stripped) source lines:
//! 1. The first pass walks every line and binds each label declaration
//!    to the address of the instruction following it.
//! 2. The second pass encodes every A- and C-instruction into a machine word,
//!    resolving symbols through the symbol table and allocating variables on first use.
//!
//! The assembler module notably consists of:
//! - [`assemble`], [`assemble_with`], and [`assemble_lines`]: The main functions which assemble source code into an object file.
//! - [`SymbolTable`]: a struct holding the symbol table, which maps predefined symbols, labels, and variables to addresses
//! - [`ObjectFile`]: a struct holding the object file, the sequence of assembled machine words
//!
//! The instruction tables live in [`code`] and the output formats in [`encoding`].

pub mod code;
pub mod encoding;

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::ast::{AOperand, Addr, AddrNewErr, Stmt};
use crate::parse::{self, ParseErr};

/// Address of the first variable allocated by the assembler.
pub const VAR_START: u16 = 16;
/// Base address of the screen memory map.
pub const SCREEN: u16 = 16384;
/// Address of the keyboard memory map.
pub const KBD: u16 = 24576;

/// Predefined symbols, other than the virtual registers `R0`-`R15`.
const PREDEFINED: [(&str, u16); 7] = [
    ("SP",     0),
    ("LCL",    1),
    ("ARG",    2),
    ("THIS",   3),
    ("THAT",   4),
    ("SCREEN", SCREEN),
    ("KBD",    KBD),
];

/// Assembles Hack assembly source code into an object file, using the default [`AsmFlags`].
///
/// # Example
/// ```
/// use hack_asm::asm::assemble;
///
/// let src = "
///     @2
///     D=A
///     @3
///     D=D+A
///     @0
///     M=D
/// ";
///
/// let obj_file = assemble(src).unwrap();
/// let lines: Vec<_> = obj_file.lines().collect();
/// assert_eq!(lines.len(), 6);
/// assert_eq!(lines[0], "0000000000000010");
/// assert_eq!(lines[1], "1110110000010000");
///
/// // Symbol table doesn't exist in object file:
/// assert!(obj_file.symbol_table().is_none());
/// ```
pub fn assemble(src: &str) -> Result<ObjectFile, AsmErr> {
    assemble_with(src, AsmFlags::default())
}

/// Assembles Hack assembly source code into an object file.
///
/// # Example
/// ```
/// use hack_asm::asm::{assemble_with, AsmFlags};
///
/// let src = "
///     @END
///     0;JMP
/// (END)
/// ";
///
/// let flags = AsmFlags { debug_symbols: true, ..Default::default() };
/// let obj_file = assemble_with(src, flags).unwrap();
///
/// // Symbol table does exist in object file:
/// let sym = obj_file.symbol_table().unwrap();
/// assert_eq!(sym.lookup("END"), Some(2));
/// ```
pub fn assemble_with(src: &str, flags: AsmFlags) -> Result<ObjectFile, AsmErr> {
    let lines: Vec<_> = src.lines().collect();
    assemble_lines(&lines, flags)
}

/// Assembles a sequence of source lines into an object file.
///
/// The lines may still hold comments and surrounding whitespace.
/// Errors report the index of the offending line in `lines`.
pub fn assemble_lines<S: AsRef<str>>(lines: &[S], flags: AsmFlags) -> Result<ObjectFile, AsmErr> {
    let lines: Vec<_> = lines.iter()
        .map(|line| parse::strip_line(line.as_ref()))
        .collect();

    let mut sym = SymbolTable::new();

    // PASS 1
    let len = bind_labels(&lines, &mut sym, flags)?;
    log::debug!("pass 1 complete: {len} instructions, {} labels", sym.iter().filter(|&(_, _, k)| k == SymbolKind::Label).count());

    // PASS 2
    let words = encode_instrs(&lines, &mut sym)?;
    log::debug!("pass 2 complete: {} words, {} variables", words.len(), sym.next_variable() - VAR_START);

    Ok(ObjectFile {
        words,
        sym: flags.debug_symbols.then_some(sym),
    })
}

/// Configuration flags for the assembler.
///
/// These can be modified after construction,
/// or built using struct update syntax:
/// ```
/// use hack_asm::asm::AsmFlags;
///
/// let flags = AsmFlags { strict_labels: true, ..Default::default() };
/// ```
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct AsmFlags {
    /// Whether label redeclarations are rejected.
    ///
    /// If a label is declared twice at different addresses:
    /// - **permissive** (`false`): the later declaration silently replaces the earlier one
    ///     (a warning is logged).
    /// - **strict** (`true`): assembly fails with [`AsmErrKind::DuplicateLabel`].
    ///
    /// Declaring a label twice at the same address is accepted either way.
    ///
    /// By default, this flag is `false`.
    pub strict_labels: bool,

    /// Whether to keep the symbol table in the resulting [`ObjectFile`].
    ///
    /// By default, this flag is `false`.
    pub debug_symbols: bool,
}

#[allow(clippy::derivable_impls)]
impl Default for AsmFlags {
    fn default() -> Self {
        Self {
            strict_labels: false,
            debug_symbols: false,
        }
    }
}

/// Kinds of errors that can occur from assembling given assembly code.
///
/// See [`AsmErr`] for this error type with line information included.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub enum AsmErrKind {
    /// The line could not be parsed.
    Parse(ParseErr),
    /// The computation is not part of the instruction set (pass 2).
    UnknownComp(String),
    /// The destination is not part of the instruction set (pass 2).
    UnknownDest(String),
    /// The jump is not part of the instruction set (pass 2).
    UnknownJump(String),
    /// A symbol's address does not fit in an A-instruction (pass 2).
    AddrNewErr(AddrNewErr),
    /// A label was declared with the name of a predefined symbol (pass 1).
    PredefinedLabel(String),
    /// A label was declared more than once at different addresses,
    /// and [`AsmFlags::strict_labels`] is set (pass 1).
    DuplicateLabel(String),
    /// The program has more instructions than can be addressed (pass 1).
    ProgramTooLarge,
}
impl std::fmt::Display for AsmErrKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(e)           => e.fmt(f),
            Self::UnknownComp(m)     => write!(f, "unknown computation `{m}`"),
            Self::UnknownDest(m)     => write!(f, "unknown destination `{m}`"),
            Self::UnknownJump(m)     => write!(f, "unknown jump `{m}`"),
            Self::AddrNewErr(e)      => e.fmt(f),
            Self::PredefinedLabel(l) => write!(f, "label `{l}` redefines a predefined symbol"),
            Self::DuplicateLabel(l)  => write!(f, "label `{l}` was defined multiple times"),
            Self::ProgramTooLarge    => f.write_str("program has too many instructions"),
        }
    }
}
impl From<ParseErr> for AsmErrKind {
    fn from(value: ParseErr) -> Self {
        AsmErrKind::Parse(value)
    }
}

/// Error from assembling given assembly code.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct AsmErr {
    /// The kind of error.
    pub kind: AsmErrKind,
    /// The index of the source line associated with this error.
    pub line: usize
}
impl AsmErr {
    /// Creates a new [`AsmErr`].
    pub fn new<E: Into<AsmErrKind>>(kind: E, line: usize) -> Self {
        AsmErr { kind: kind.into(), line }
    }
}
impl std::fmt::Display for AsmErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.kind.fmt(f)
    }
}
impl std::error::Error for AsmErr {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            AsmErrKind::Parse(e)      => Some(e),
            AsmErrKind::AddrNewErr(e) => Some(e),
            _ => None
        }
    }
}
impl crate::err::Error for AsmErr {
    fn line(&self) -> Option<usize> {
        Some(self.line)
    }

    fn help(&self) -> Option<std::borrow::Cow<str>> {
        match &self.kind {
            AsmErrKind::Parse(e)           => e.help(),
            AsmErrKind::UnknownComp(_)     => Some("computations are expressions of D, A, M, 0, 1, and -1, such as `D+1` or `D|M`".into()),
            AsmErrKind::UnknownDest(_)     => Some("the valid destinations are M, D, MD, A, AM, AD, and AMD".into()),
            AsmErrKind::UnknownJump(_)     => Some("the valid jumps are JGT, JEQ, JGE, JLT, JNE, JLE, and JMP".into()),
            AsmErrKind::AddrNewErr(e)      => e.help(),
            AsmErrKind::PredefinedLabel(_) => Some("predefined symbols (SP, LCL, ARG, THIS, THAT, R0-R15, SCREEN, KBD) cannot be labels, try renaming the label".into()),
            AsmErrKind::DuplicateLabel(_)  => Some("labels must be unique within a file, try renaming one of the labels".into()),
            AsmErrKind::ProgramTooLarge    => None,
        }
    }
}

/// Where a symbol in the [`SymbolTable`] came from.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum SymbolKind {
    /// A symbol built into the assembler (e.g., `SP`, `R13`, `SCREEN`).
    Predefined,
    /// A label declared in the source (e.g., `(LOOP)`).
    Label,
    /// A variable, allocated on its first use as an A-instruction operand.
    Variable,
}

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
struct SymbolData {
    addr: u16,
    kind: SymbolKind
}

/// The symbol table used during assembly.
///
/// The table maps symbol names to addresses. There are three kinds of symbols (see [`SymbolKind`]):
/// - predefined symbols, which are present from construction and never change,
/// - labels, which are bound during the first assembler pass,
/// - variables, which are allocated during the second assembler pass,
///     starting at [`VAR_START`] and counting up in order of first use.
///
/// All three kinds share a single namespace.
///
/// Without debug symbols, the symbol table is dropped after assembly.
/// With [`AsmFlags::debug_symbols`], it persists in the resultant [`ObjectFile`].
#[derive(PartialEq, Eq, Clone)]
pub struct SymbolTable {
    /// A mapping from symbol name to its address and kind.
    symbol_map: HashMap<String, SymbolData>,

    /// The address the next variable is allocated to.
    next_var: u16,
}

impl SymbolTable {
    /// Creates a new symbol table, holding only the predefined symbols.
    ///
    /// ## Example
    /// ```
    /// use hack_asm::asm::SymbolTable;
    ///
    /// let sym = SymbolTable::new();
    /// assert_eq!(sym.lookup("SP"), Some(0));
    /// assert_eq!(sym.lookup("THAT"), Some(4));
    /// assert_eq!(sym.lookup("R13"), Some(13));
    /// assert_eq!(sym.lookup("SCREEN"), Some(16384));
    /// assert_eq!(sym.lookup("KBD"), Some(24576));
    /// assert_eq!(sym.lookup("LOOP"), None);
    /// ```
    pub fn new() -> Self {
        let registers = (0..16).map(|i| (format!("R{i}"), i));
        let named = PREDEFINED.iter().map(|&(name, addr)| (name.to_string(), addr));

        let symbol_map = named.chain(registers)
            .map(|(name, addr)| (name, SymbolData { addr, kind: SymbolKind::Predefined }))
            .collect();

        SymbolTable { symbol_map, next_var: VAR_START }
    }

    /// Binds a label to an address, replacing any earlier binding of the label.
    ///
    /// This returns the address the label was previously bound to (if it was already declared).
    ///
    /// Predefined symbols are never rebound: if `name` is predefined, the table
    /// is left unchanged and this returns `None`.
    /// Use [`SymbolTable::is_predefined`] to check beforehand.
    ///
    /// ## Example
    /// ```
    /// use hack_asm::asm::SymbolTable;
    ///
    /// let mut sym = SymbolTable::new();
    /// assert_eq!(sym.add_label("LOOP", 4), None);
    /// assert_eq!(sym.add_label("LOOP", 9), Some(4));
    /// assert_eq!(sym.lookup("LOOP"), Some(9));
    ///
    /// assert_eq!(sym.add_label("SP", 9), None);
    /// assert_eq!(sym.lookup("SP"), Some(0));
    /// ```
    pub fn add_label(&mut self, name: &str, addr: u16) -> Option<u16> {
        let data = SymbolData { addr, kind: SymbolKind::Label };

        match self.symbol_map.entry(name.to_string()) {
            Entry::Occupied(e) if e.get().kind == SymbolKind::Predefined => None,
            Entry::Occupied(mut e) => {
                let old = e.insert(data);
                (old.kind == SymbolKind::Label).then_some(old.addr)
            },
            Entry::Vacant(e) => {
                e.insert(data);
                None
            }
        }
    }

    /// Gets the address of a symbol, allocating it as a new variable if it is not yet bound.
    ///
    /// Variables are allocated consecutive addresses, starting at [`VAR_START`].
    ///
    /// ## Example
    /// ```
    /// use hack_asm::asm::SymbolTable;
    ///
    /// let mut sym = SymbolTable::new();
    /// sym.add_label("LOOP", 4);
    ///
    /// assert_eq!(sym.resolve_or_allocate("i"), 16);
    /// assert_eq!(sym.resolve_or_allocate("sum"), 17);
    /// assert_eq!(sym.resolve_or_allocate("i"), 16);
    /// assert_eq!(sym.resolve_or_allocate("LOOP"), 4);
    /// assert_eq!(sym.resolve_or_allocate("KBD"), 24576);
    /// assert_eq!(sym.next_variable(), 18);
    /// ```
    pub fn resolve_or_allocate(&mut self, name: &str) -> u16 {
        if let Some(data) = self.symbol_map.get(name) {
            return data.addr;
        }

        let addr = self.next_var;
        self.symbol_map.insert(name.to_string(), SymbolData { addr, kind: SymbolKind::Variable });
        // Past Addr::MAX, variables can no longer be encoded, so saturating is harmless.
        self.next_var = self.next_var.saturating_add(1);
        log::trace!("allocated variable {name} at {addr}");

        addr
    }

    /// Gets the address of a given symbol (if it exists).
    pub fn lookup(&self, name: &str) -> Option<u16> {
        self.symbol_map.get(name).map(|data| data.addr)
    }

    /// Gets the kind of a given symbol (if it exists).
    pub fn kind(&self, name: &str) -> Option<SymbolKind> {
        self.symbol_map.get(name).map(|data| data.kind)
    }

    /// Checks whether the given name is a predefined symbol.
    pub fn is_predefined(&self, name: &str) -> bool {
        self.kind(name) == Some(SymbolKind::Predefined)
    }

    /// The address that the next new variable will be allocated to.
    pub fn next_variable(&self) -> u16 {
        self.next_var
    }

    /// Gets an iterable of the mapping from symbols to addresses.
    ///
    /// The iteration order is unspecified.
    pub fn iter(&self) -> impl Iterator<Item=(&str, u16, SymbolKind)> + '_ {
        self.symbol_map.iter()
            .map(|(name, data)| (&**name, data.addr, data.kind))
    }
}
impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}
impl std::fmt::Debug for SymbolTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        struct ClosureMap<R, F: Fn() -> R>(F);
        impl<K, V, R, F> std::fmt::Debug for ClosureMap<R, F>
            where K: std::fmt::Debug,
                  V: std::fmt::Debug,
                  R: IntoIterator<Item=(K, V)>,
                  F: Fn() -> R
        {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.debug_map()
                    .entries((self.0)())
                    .finish()
            }
        }

        // Predefined symbols are the same in every table, so they're left out.
        let user_symbols = || {
            let mut symbols: Vec<_> = self.iter()
                .filter(|&(_, _, kind)| kind != SymbolKind::Predefined)
                .collect();
            symbols.sort_by_key(|&(name, addr, _)| (addr, name));
            symbols.into_iter().map(|(name, addr, kind)| (name, (addr, kind)))
        };

        f.debug_struct("SymbolTable")
            .field("symbols", &ClosureMap(user_symbols))
            .field("next_var", &self.next_var)
            .finish()
    }
}

/// The first assembler pass.
///
/// This binds every label to the address of the instruction following it,
/// returning the number of instructions in the program.
fn bind_labels(lines: &[&str], sym: &mut SymbolTable, flags: AsmFlags) -> Result<u16, AsmErr> {
    // The location counter (the address of the next instruction).
    let mut lc: u16 = 0;

    for (lno, line) in lines.iter().enumerate() {
        let Some(stmt) = parse::parse_stmt(line).map_err(|e| AsmErr::new(e, lno))? else { continue };

        if let Stmt::Label(label) = stmt {
            if sym.is_predefined(label) {
                return Err(AsmErr::new(AsmErrKind::PredefinedLabel(label.to_string()), lno));
            }

            match sym.add_label(label, lc) {
                Some(prev) if prev != lc && flags.strict_labels => {
                    return Err(AsmErr::new(AsmErrKind::DuplicateLabel(label.to_string()), lno));
                },
                Some(prev) if prev != lc => {
                    log::warn!("label {label} redeclared on line {}, rebinding it from {prev} to {lc}", lno + 1);
                },
                _ => log::trace!("bound label {label} to {lc}"),
            }
        }

        lc = lc.checked_add(stmt.word_len())
            .ok_or_else(|| AsmErr::new(AsmErrKind::ProgramTooLarge, lno))?;
    }

    Ok(lc)
}

/// The second assembler pass.
///
/// This encodes every instruction into a machine word, in program order.
fn encode_instrs(lines: &[&str], sym: &mut SymbolTable) -> Result<Vec<u16>, AsmErr> {
    let mut words = Vec::with_capacity(lines.len());

    for (lno, line) in lines.iter().enumerate() {
        let word = match parse::parse_stmt(line).map_err(|e| AsmErr::new(e, lno))? {
            None | Some(Stmt::Label(_)) => continue,
            Some(Stmt::AInstr(operand)) => resolve_a_operand(operand, sym).map(code::encode_a_instr),
            Some(Stmt::CInstr(instr)) => parse::decode_c_instr(instr)
                .map_err(AsmErrKind::from)
                .and_then(|instr| instr.encode()),
        };

        words.push(word.map_err(|e| AsmErr::new(e, lno))?);
    }

    Ok(words)
}

/// Resolves an A-instruction operand to the address it loads.
fn resolve_a_operand(operand: &str, sym: &mut SymbolTable) -> Result<Addr, AsmErrKind> {
    match parse::parse_a_operand(operand)? {
        AOperand::Literal(addr) => Ok(addr),
        AOperand::Symbol(name) => {
            Addr::new(sym.resolve_or_allocate(name))
                .map_err(AsmErrKind::AddrNewErr)
        },
    }
}

/// An object file.
///
/// This is the final product after assembly source code is fully assembled:
/// one machine word per instruction, in program order.
/// It can be written to disk using one of the formats in [`encoding`].
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ObjectFile {
    /// The assembled words.
    words: Vec<u16>,

    /// Debug symbols.
    sym: Option<SymbolTable>
}
impl ObjectFile {
    /// Creates an object file from machine words, without debug symbols.
    pub fn new(words: Vec<u16>) -> Self {
        ObjectFile { words, sym: None }
    }

    /// Gets the assembled machine words.
    pub fn words(&self) -> &[u16] {
        &self.words
    }

    /// Gets an iterator over each word as a 16-character binary string.
    ///
    /// The lines do not include a line terminator.
    pub fn lines(&self) -> impl Iterator<Item=String> + '_ {
        self.words.iter().map(|w| format!("{w:016b}"))
    }

    /// Gets the symbol table if it is present in the object file.
    pub fn symbol_table(&self) -> Option<&SymbolTable> {
        self.sym.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::AddrNewErr;
    use crate::parse::lex::LexErr;
    use crate::parse::ParseErr;

    use super::{assemble, assemble_lines, assemble_with, AsmErr, AsmErrKind, AsmFlags, SymbolKind, SymbolTable};

    fn assemble_lines_of(src: &str) -> Result<Vec<String>, AsmErr> {
        assemble(src).map(|obj| obj.lines().collect())
    }
    fn assemble_debug(src: &str) -> SymbolTable {
        let flags = AsmFlags { debug_symbols: true, ..Default::default() };
        assemble_with(src, flags)
            .unwrap()
            .symbol_table()
            .cloned()
            .unwrap()
    }
    fn assert_asm_fail<T: std::fmt::Debug>(r: Result<T, AsmErr>, kind: AsmErrKind, line: usize) {
        let err = r.unwrap_err();
        assert_eq!(err.kind, kind);
        assert_eq!(err.line, line);
    }

    #[test]
    fn test_predefined() {
        let sym = SymbolTable::new();
        let expected = [("SP", 0), ("LCL", 1), ("ARG", 2), ("THIS", 3), ("THAT", 4), ("SCREEN", 16384), ("KBD", 24576)];
        for (name, addr) in expected {
            assert_eq!(sym.lookup(name), Some(addr), "{name} should be predefined");
            assert!(sym.is_predefined(name));
        }
        for i in 0..16 {
            assert_eq!(sym.lookup(&format!("R{i}")), Some(i));
        }
        assert_eq!(sym.lookup("R16"), None);
        assert_eq!(sym.lookup("sp"), None);
        assert_eq!(sym.iter().count(), 23);
        assert_eq!(sym.next_variable(), 16);
    }

    #[test]
    fn test_predefined_in_program() {
        let src = "
            @i
            @SCREEN
            (LOOP)
            @R15
            @KBD
            @THIS
        ";
        let lines = assemble_lines_of(src).unwrap();
        assert_eq!(lines, [
            "0000000000010000",
            "0100000000000000",
            "0000000000001111",
            "0110000000000000",
            "0000000000000011",
        ]);
    }

    #[test]
    fn test_sym_basic() {
        let src = "
        // sums 1..100
            @i
            M=1
            @sum
            M=0
        (LOOP)
            @i
            D=M
            @100
            D=D-A
            @END
            D;JGT
            @i
            D=M
            @sum
            M=D+M
            @i
            M=M+1
            @LOOP
            0;JMP
        (END)
            @END
            0;JMP
        ";

        let sym = assemble_debug(src);
        assert_eq!(sym.lookup("LOOP"), Some(4));
        assert_eq!(sym.lookup("END"), Some(18));
        assert_eq!(sym.lookup("i"), Some(16));
        assert_eq!(sym.lookup("sum"), Some(17));
        assert_eq!(sym.kind("LOOP"), Some(SymbolKind::Label));
        assert_eq!(sym.kind("sum"), Some(SymbolKind::Variable));
        assert_eq!(sym.next_variable(), 18);
    }

    #[test]
    fn test_label_addresses() {
        // Consecutive labels, blank lines, and comments don't take up space.
        let src = "
            (START)
            (ALSO_START)

            // comment
            @1
            D=A // trailing
            (MIDDLE)
            D=D+1
            (TAIL)
        ";
        let sym = assemble_debug(src);
        assert_eq!(sym.lookup("START"), Some(0));
        assert_eq!(sym.lookup("ALSO_START"), Some(0));
        assert_eq!(sym.lookup("MIDDLE"), Some(2));
        assert_eq!(sym.lookup("TAIL"), Some(3));
    }

    #[test]
    fn test_forward_label() {
        let lines = assemble_lines_of("@END\n0;JMP\n(END)").unwrap();
        assert_eq!(lines, ["0000000000000010", "1110101010000111"]);
    }

    #[test]
    fn test_variable_order() {
        let src = "@foo\n@bar\n@foo\n@LOOP\n(LOOP)\n@baz";
        let lines = assemble_lines_of(src).unwrap();
        assert_eq!(lines, [
            "0000000000010000",
            "0000000000010001",
            "0000000000010000",
            "0000000000000100",
            "0000000000010010",
        ]);
    }

    #[test]
    fn test_duplicate_label_permissive() {
        let src = "
            (TWICE)
            @TWICE
            (TWICE)
            0;JMP
        ";
        let lines = assemble_lines_of(src).unwrap();
        assert_eq!(lines[0], "0000000000000001");

        // Same address is fine in strict mode:
        let src = "(A)\n(A)\n@A";
        let flags = AsmFlags { strict_labels: true, ..Default::default() };
        assemble_with(src, flags).unwrap();
    }

    #[test]
    fn test_duplicate_label_strict() {
        let src = "(TWICE)\n@TWICE\n(TWICE)\n0;JMP";
        let flags = AsmFlags { strict_labels: true, ..Default::default() };
        assert_asm_fail(assemble_with(src, flags), AsmErrKind::DuplicateLabel("TWICE".to_string()), 2);
    }

    #[test]
    fn test_predefined_label() {
        let src = "@0\n(SCREEN)\n0;JMP";
        assert_asm_fail(assemble(src), AsmErrKind::PredefinedLabel("SCREEN".to_string()), 1);
    }

    #[test]
    fn test_unknown_mnemonics() {
        assert_asm_fail(assemble("@1\nD=D*A"), AsmErrKind::UnknownComp("D*A".to_string()), 1);
        assert_asm_fail(assemble("@1\nD=A+D"), AsmErrKind::UnknownComp("A+D".to_string()), 1);
        assert_asm_fail(assemble("DA=A"), AsmErrKind::UnknownDest("DA".to_string()), 0);
        assert_asm_fail(assemble("0;JUMP"), AsmErrKind::UnknownJump("JUMP".to_string()), 0);
        assert_asm_fail(assemble("@1\nM=M<<1"), AsmErrKind::UnknownComp("M<<1".to_string()), 1);
        assert_asm_fail(assemble("A*=M"), AsmErrKind::UnknownDest("A*".to_string()), 0);
        assert_asm_fail(assemble("D;J>"), AsmErrKind::UnknownJump("J>".to_string()), 0);
    }

    #[test]
    fn test_parse_failures() {
        assert_asm_fail(assemble("@2\n\n(LOOP\n"), AsmErrKind::Parse(ParseErr::UnclosedLabel), 2);
        assert_asm_fail(assemble("@"), AsmErrKind::Parse(ParseErr::EmptyOperand), 0);
        assert_asm_fail(assemble("D=A;JMP;JMP"), AsmErrKind::Parse(ParseErr::MultipleJump), 0);
        assert_asm_fail(assemble("D = A"), AsmErrKind::Parse(ParseErr::Lex(LexErr::Whitespace)), 0);
        assert_asm_fail(assemble("@32768"), AsmErrKind::Parse(ParseErr::AddrNewErr(AddrNewErr)), 0);
    }

    #[test]
    fn test_label_errors_before_encoding_errors() {
        // Pass 1 sees the bad label before pass 2 sees the bad instruction.
        let src = "D=D*A\n(BAD";
        assert_asm_fail(assemble(src), AsmErrKind::Parse(ParseErr::UnclosedLabel), 1);
    }

    #[test]
    fn test_first_error_wins() {
        let src = "@1\nD=Q\nD=R";
        assert_asm_fail(assemble(src), AsmErrKind::UnknownComp("Q".to_string()), 1);
    }

    #[test]
    fn test_lines_api() {
        let lines = ["@2 // two", "  D=A  ", "", "// nothing"];
        let obj = assemble_lines(&lines, AsmFlags::default()).unwrap();
        assert_eq!(obj.words(), [0b0000000000000010, 0b1110110000010000]);

        let owned: Vec<String> = lines.iter().map(|s| s.to_string()).collect();
        assert_eq!(assemble_lines(&owned, AsmFlags::default()).unwrap(), obj);
    }

    #[test]
    fn test_crlf() {
        let lines = assemble_lines_of("@2\r\nD=A\r\n(END)\r\n@END\r\n").unwrap();
        assert_eq!(lines, ["0000000000000010", "1110110000010000", "0000000000000010"]);
    }

    #[test]
    fn test_empty_program() {
        assert_eq!(assemble_lines_of("").unwrap(), Vec::<String>::new());
        assert_eq!(assemble_lines_of("// only comments\n\n   \n").unwrap(), Vec::<String>::new());
        assert_eq!(assemble_lines_of("(ONLY_A_LABEL)").unwrap(), Vec::<String>::new());
    }

    #[test]
    fn test_idempotent() {
        let src = "@x\nM=1\n(L)\n@y\nD=M\n@L\nD;JNE";
        let a = assemble(src).unwrap();
        let b = assemble(src).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_debug_omits_predefined() {
        let sym = assemble_debug("(L)\n@v\n@L");
        let dbg = format!("{sym:?}");
        assert!(dbg.contains("\"L\""));
        assert!(dbg.contains("\"v\""));
        assert!(!dbg.contains("SCREEN"));
    }
}
