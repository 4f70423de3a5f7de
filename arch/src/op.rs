use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// The six RV32I instruction word layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Format {
    R,
    I,
    S,
    B,
    U,
    J,
}

/// The RV32I base mnemonics.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, Display,
)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
pub enum OpKind {
    Add,
    Sub,
    Sll,
    Slt,
    Sltu,
    Xor,
    Srl,
    Sra,
    Or,
    And,

    Addi,
    Slti,
    Sltiu,
    Xori,
    Ori,
    Andi,
    Slli,
    Srli,
    Srai,

    Lb,
    Lh,
    Lw,
    Lbu,
    Lhu,

    Sb,
    Sh,
    Sw,

    Beq,
    Bne,
    Blt,
    Bge,
    Bltu,
    Bgeu,

    Lui,
    Auipc,

    Jal,
    Jalr,

    Ecall,
    Ebreak,
    Fence,
}

/// Static encoding data for one mnemonic. `funct7` doubles as the shift
/// marker for `slli`/`srli`/`srai`; `imm` is the fixed immediate of the
/// system instructions.
#[derive(Debug, Clone, Copy)]
pub struct InstrDesc {
    pub format: Format,
    pub opcode: u32,
    pub funct3: u32,
    pub funct7: Option<u32>,
    pub imm: Option<i64>,
}

impl OpKind {
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.parse::<Self>() {
            Ok(op) => Ok(op),
            Err(_) => Err(format!("Unknown instruction: {s}")),
        }
    }

    pub fn desc(self) -> InstrDesc {
        use OpKind::*;
        match self {
            Add => r(0b000, 0b0000000),
            Sub => r(0b000, 0b0100000),
            Sll => r(0b001, 0b0000000),
            Slt => r(0b010, 0b0000000),
            Sltu => r(0b011, 0b0000000),
            Xor => r(0b100, 0b0000000),
            Srl => r(0b101, 0b0000000),
            Sra => r(0b101, 0b0100000),
            Or => r(0b110, 0b0000000),
            And => r(0b111, 0b0000000),

            Addi => i(0b0010011, 0b000),
            Slti => i(0b0010011, 0b010),
            Sltiu => i(0b0010011, 0b011),
            Xori => i(0b0010011, 0b100),
            Ori => i(0b0010011, 0b110),
            Andi => i(0b0010011, 0b111),
            Slli => shift(0b001, 0b0000000),
            Srli => shift(0b101, 0b0000000),
            Srai => shift(0b101, 0b0100000),

            Lb => i(0b0000011, 0b000),
            Lh => i(0b0000011, 0b001),
            Lw => i(0b0000011, 0b010),
            Lbu => i(0b0000011, 0b100),
            Lhu => i(0b0000011, 0b101),

            Sb => s(0b000),
            Sh => s(0b001),
            Sw => s(0b010),

            Beq => b(0b000),
            Bne => b(0b001),
            Blt => b(0b100),
            Bge => b(0b101),
            Bltu => b(0b110),
            Bgeu => b(0b111),

            Lui => u(0b0110111),
            Auipc => u(0b0010111),

            Jal => InstrDesc {
                format: Format::J,
                opcode: 0b1101111,
                funct3: 0,
                funct7: None,
                imm: None,
            },
            Jalr => i(0b1100111, 0b000),

            Ecall => sys(0),
            Ebreak => sys(1),
            Fence => i(0b0001111, 0b000),
        }
    }
}

fn r(funct3: u32, funct7: u32) -> InstrDesc {
    InstrDesc {
        format: Format::R,
        opcode: 0b0110011,
        funct3,
        funct7: Some(funct7),
        imm: None,
    }
}

fn i(opcode: u32, funct3: u32) -> InstrDesc {
    InstrDesc {
        format: Format::I,
        opcode,
        funct3,
        funct7: None,
        imm: None,
    }
}

fn shift(funct3: u32, funct7: u32) -> InstrDesc {
    InstrDesc {
        format: Format::I,
        opcode: 0b0010011,
        funct3,
        funct7: Some(funct7),
        imm: None,
    }
}

fn s(funct3: u32) -> InstrDesc {
    InstrDesc {
        format: Format::S,
        opcode: 0b0100011,
        funct3,
        funct7: None,
        imm: None,
    }
}

fn b(funct3: u32) -> InstrDesc {
    InstrDesc {
        format: Format::B,
        opcode: 0b1100011,
        funct3,
        funct7: None,
        imm: None,
    }
}

fn u(opcode: u32) -> InstrDesc {
    InstrDesc {
        format: Format::U,
        opcode,
        funct3: 0,
        funct7: None,
        imm: None,
    }
}

fn sys(imm: i64) -> InstrDesc {
    InstrDesc {
        format: Format::I,
        opcode: 0b1110011,
        funct3: 0b000,
        funct7: None,
        imm: Some(imm),
    }
}
