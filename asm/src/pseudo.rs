use arch::op::OpKind;

use crate::{error::Error, label::Labels, parser::parse_imm};

/// The recognized pseudo mnemonics.
const PSEUDOS: &[&str] = &[
    "nop", "mv", "not", "neg", "seqz", "snez", "sltz", "sgtz", "beqz", "bnez", "blez", "bgez",
    "bltz", "bgtz", "j", "jr", "ret", "call", "tail", "li", "la",
];

pub fn is_pseudo(op: &str) -> bool {
    PSEUDOS.contains(&op)
}

type Expansion = Vec<(OpKind, Vec<String>)>;

/// Rewrite one pseudo instruction into one or two real instructions.
///
/// `labels` supplies the address `la` materializes; a label still unbound at
/// expansion time degrades to `addi rd, x0, 0`.
pub fn expand(op: &str, args: &[String], labels: &Labels) -> Result<Expansion, Error> {
    use OpKind::*;

    macro_rules! need {
        ($n:literal) => {
            if args.len() != $n {
                return Err(Error::BadOperandCount {
                    op: op.to_string(),
                    want: stringify!($n),
                });
            }
        };
    }

    let expansion = match op {
        "nop" => {
            need!(0);
            one(Addi, ["x0", "x0", "0"])
        }
        "mv" => {
            need!(2);
            one(Add, [&args[0], &args[1], "x0"])
        }
        "not" => {
            need!(2);
            one(Xori, [&args[0], &args[1], "-1"])
        }
        "neg" => {
            need!(2);
            one(Sub, [&args[0], "x0", &args[1]])
        }
        "seqz" => {
            need!(2);
            one(Sltiu, [&args[0], &args[1], "1"])
        }
        "snez" => {
            need!(2);
            one(Sltu, [&args[0], "x0", &args[1]])
        }
        "sltz" => {
            need!(2);
            one(Slt, [&args[0], &args[1], "x0"])
        }
        "sgtz" => {
            need!(2);
            one(Slt, [&args[0], "x0", &args[1]])
        }
        "beqz" => {
            need!(2);
            one(Beq, [&args[0], "x0", &args[1]])
        }
        "bnez" => {
            need!(2);
            one(Bne, [&args[0], "x0", &args[1]])
        }
        "blez" => {
            need!(2);
            one(Bge, ["x0", &args[0], &args[1]])
        }
        "bgez" => {
            need!(2);
            one(Bge, [&args[0], "x0", &args[1]])
        }
        "bltz" => {
            need!(2);
            one(Blt, [&args[0], "x0", &args[1]])
        }
        "bgtz" => {
            need!(2);
            one(Blt, ["x0", &args[0], &args[1]])
        }
        "j" => {
            need!(1);
            one(Jal, ["x0", &args[0]])
        }
        "jr" => {
            need!(1);
            one(Jalr, ["x0", &args[0]])
        }
        "ret" => {
            need!(0);
            one(Jalr, ["x0", "ra"])
        }
        "call" => {
            need!(1);
            one(Jal, ["ra", &args[0]])
        }
        "tail" => {
            need!(1);
            one(Jal, ["x0", &args[0]])
        }
        "li" => {
            need!(2);
            load_imm(&args[0], parse_imm(&args[1])?)
        }
        "la" => {
            need!(2);
            match labels.get(&args[1]) {
                Some(addr) => load_imm(&args[0], i64::from(addr)),
                None => one(Addi, [&args[0], "x0", "0"]),
            }
        }
        _ => return Err(Error::UnknownPseudo(op.to_string())),
    };
    Ok(expansion)
}

/// Materialize a 32-bit constant: a single `addi` when it fits in 12 signed
/// bits, otherwise `lui` with the rounded upper part plus an `addi` for the
/// re-biased low part, elided when the low part is zero.
fn load_imm(rd: &str, imm: i64) -> Expansion {
    if (-2048..=2047).contains(&imm) {
        return one(OpKind::Addi, [rd, "x0", &imm.to_string()]);
    }
    let upper = (imm + 0x800) >> 12;
    let mut lower = imm & 0xFFF;
    if lower >= 0x800 {
        lower -= 0x1000;
    }
    let mut out = one(OpKind::Lui, [rd, &(upper & 0xFFFFF).to_string()]);
    if lower != 0 {
        out.push((OpKind::Addi, operands([rd, rd, &lower.to_string()])));
    }
    out
}

fn one<const N: usize>(op: OpKind, args: [&str; N]) -> Expansion {
    vec![(op, operands(args))]
}

fn operands<const N: usize>(args: [&str; N]) -> Vec<String> {
    args.iter().map(|s| s.to_string()).collect()
}
