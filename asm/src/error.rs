use color_print::cprintln;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid immediate: `{0}`")]
    InvalidImmediate(String),

    #[error("Unknown reg name: `{0}`")]
    InvalidRegister(String),

    #[error("Invalid memory operand: `{0}`")]
    InvalidMemoryOperand(String),

    #[error("Unknown instruction: `{0}`")]
    UnknownInstruction(String),

    #[error("Unknown pseudo instruction: `{0}`")]
    UnknownPseudo(String),

    #[error("`{op}` takes {want} operands")]
    BadOperandCount { op: String, want: &'static str },

    #[error("Immediate out of range ({min} to {max}): {value}")]
    ImmediateOutOfRange { value: i64, min: i64, max: i64 },

    #[error("Branch offset must be even: {0}")]
    OddBranchOffset(i64),

    #[error("Jump offset must be even: {0}")]
    OddJumpOffset(i64),

    #[error("Re-defined label: `{0}`")]
    RedefinedLabel(String),

    #[error("line {line}: {source}")]
    AtLine {
        line: usize,
        #[source]
        source: Box<Error>,
    },

    #[error("address 0x{addr:08x}: {source}")]
    AtAddress {
        addr: u32,
        #[source]
        source: Box<Error>,
    },

    #[error("Failed to open file: {0}")]
    FileOpen(String, #[source] std::io::Error),

    #[error("Failed to write file: {0}")]
    FileWrite(String, #[source] std::io::Error),
}

impl Error {
    /// 1-based source line the error is anchored to, if it carries one.
    pub fn line(&self) -> Option<usize> {
        match self {
            Error::AtLine { line, .. } => Some(*line),
            _ => None,
        }
    }

    /// Print the error, with an arrow to the offending source line when the
    /// line number is known.
    pub fn print_diag(&self, path: &str, source: &str) {
        cprintln!("<red,bold>error</>: {}", self);
        if let Some(line) = self.line() {
            let content = source.lines().nth(line - 1).unwrap_or("");
            cprintln!("     <blue>--></> <underline>{}:{}</>", path, line);
            cprintln!("      <blue>|</>");
            cprintln!(" <blue>{:>4} |</> {}", line, content);
            cprintln!("      <blue>|</>");
        }
    }
}
