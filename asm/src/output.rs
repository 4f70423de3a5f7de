use std::fmt::Write;

use color_print::cprintln;

use crate::assemble::Program;

/// Little-endian word stream, no header or padding.
pub fn binary(program: &Program) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(program.words.len() * 4);
    for word in &program.words {
        bytes.extend_from_slice(&word.to_le_bytes());
    }
    bytes
}

/// One `AAAAAAAA: WWWWWWWW` line per instruction, lowercase hex.
pub fn hex_listing(program: &Program) -> String {
    let mut out = String::new();
    for (i, word) in program.words.iter().enumerate() {
        let _ = writeln!(out, "{:08x}: {:08x}", program.address(i), word);
    }
    out
}

/// Human-readable trace: the label table, then per instruction its address,
/// assembly text, 32-bit binary string, and hex word.
pub fn text_trace(program: &Program) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "RISC-V Assembly to Machine Code");
    let _ = writeln!(out, "{}\n", "=".repeat(50));
    let _ = writeln!(out, "LABELS:");
    for (name, addr) in program.labels.iter() {
        let _ = writeln!(out, "  {name}: 0x{addr:08x}");
    }
    let _ = writeln!(out, "\n{}\n", "=".repeat(50));

    for (i, (entry, word)) in program.entries.iter().zip(&program.words).enumerate() {
        let _ = writeln!(out, "Address: 0x{:08x}", program.address(i));
        let _ = writeln!(out, "Assembly: {} {}", entry.op, entry.args.join(", "));
        let _ = writeln!(out, "Binary:   {word:032b}");
        let _ = writeln!(out, "Hex:      {word:08x}");
        let _ = writeln!(out, "{}", "-".repeat(40));
    }
    out
}

/// Colored per-instruction listing for the CLI `--dump` flag.
pub fn print_dump(program: &Program) {
    for (i, (entry, word)) in program.entries.iter().zip(&program.words).enumerate() {
        if let Some(name) = &entry.label {
            cprintln!("<green>{}:</>", name);
        }
        let bytes = format!(
            "{:02X} {:02X} {:02X} {:02X}",
            (word >> 24) & 0xFF,
            (word >> 16) & 0xFF,
            (word >> 8) & 0xFF,
            word & 0xFF
        );
        cprintln!(
            "  <green>{:08X}</> | {} | <red>{:<6}</><blue>{}</>",
            program.address(i),
            bytes,
            entry.op,
            entry.args.join(", ")
        );
    }
}
