use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::info;

use hack_asm::asm::encoding::{BinaryFormat, ObjFileFormat, TextFormat};
use hack_asm::asm::{assemble_with, AsmErr, AsmFlags, ObjectFile, SymbolKind, SymbolTable};
use hack_asm::err::Error;

/// Hack assembler
#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Assembly file to assemble
    input: PathBuf,

    /// File to write the machine code to (defaults to the input with a .hack extension)
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Reject labels which are declared more than once
    #[arg(long)]
    strict_labels: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Print the symbol table (labels and variables)
    #[arg(long)]
    symbols: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    /// One line of 16 binary digits per instruction
    Text,
    /// Two big-endian bytes per instruction
    Binary,
}

fn main() -> Result<()> {
    let env = env_logger::Env::default()
        .filter_or("HACKASM_LOG", "info")
        .write_style_or("HACKASM_LOG_STYLE", "auto");
    env_logger::init_from_env(env);

    let args = Args::parse();
    let src = std::fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read {:?}", args.input))?;

    info!("assembling {}", args.input.display());
    let flags = AsmFlags {
        strict_labels: args.strict_labels,
        debug_symbols: args.symbols,
    };
    let obj = match assemble_with(&src, flags) {
        Ok(obj) => obj,
        Err(e) => {
            report(&args.input, &e);
            std::process::exit(1);
        }
    };

    let output = args.output.unwrap_or_else(|| args.input.with_extension("hack"));
    std::fs::write(&output, serialize(&obj, args.format))
        .with_context(|| format!("failed to write {:?}", output))?;
    info!("wrote {} instructions to {}", obj.words().len(), output.display());

    if let Some(sym) = obj.symbol_table() {
        print_symbols(sym);
    }

    Ok(())
}

fn serialize(obj: &ObjectFile, format: Format) -> Vec<u8> {
    match format {
        Format::Text   => TextFormat::serialize(obj).into_bytes(),
        Format::Binary => BinaryFormat::serialize(obj),
    }
}

/// Prints an assembly error as `path:line: message`, followed by any help.
fn report(path: &Path, err: &AsmErr) {
    eprintln!("{}:{}: error: {err}", path.display(), err.line + 1);
    if let Some(help) = err.help() {
        eprintln!("  help: {help}");
    }
}

fn print_symbols(sym: &SymbolTable) {
    let mut symbols: Vec<_> = sym.iter()
        .filter(|&(_, _, kind)| kind != SymbolKind::Predefined)
        .collect();
    symbols.sort_by_key(|&(name, addr, _)| (addr, name));

    for (name, addr, kind) in symbols {
        let kind = match kind {
            SymbolKind::Label => "label",
            _ => "var",
        };
        println!("{addr:>5}  {kind:<5}  {name}");
    }
}
