use arch::{
    op::{Format, InstrDesc, OpKind},
    reg::Reg,
    word,
};

use crate::{error::Error, label::Labels, parser::parse_imm};

/// Encode one flattened instruction into its 32-bit word. `addr` is the
/// instruction's own byte address; branch and jump offsets are computed as
/// `target - addr` against the frozen label table.
pub fn encode(op: OpKind, args: &[String], labels: &Labels, addr: u32) -> Result<u32, Error> {
    let desc = op.desc();
    match desc.format {
        Format::R => encode_r(op, &desc, args),
        Format::I => encode_i(op, &desc, args, labels),
        Format::S => encode_s(op, &desc, args, labels),
        Format::B => encode_b(op, &desc, args, labels, addr),
        Format::U => encode_u(op, &desc, args),
        Format::J => encode_j(op, &desc, args, labels, addr),
    }
}

fn encode_r(op: OpKind, desc: &InstrDesc, args: &[String]) -> Result<u32, Error> {
    if args.len() != 3 {
        return Err(bad_arity(op, "3"));
    }
    let rd = reg(&args[0])?;
    let rs1 = reg(&args[1])?;
    let rs2 = reg(&args[2])?;
    Ok(word::pack_r(
        desc.opcode,
        desc.funct3,
        desc.funct7.unwrap_or(0),
        rd,
        rs1,
        rs2,
    ))
}

/// I-type dispatch, in priority order: shift-immediate (the descriptor
/// carries a funct7), memory-operand form, 3-operand arithmetic, 2-operand
/// `jalr`, 0-operand system instruction.
fn encode_i(op: OpKind, desc: &InstrDesc, args: &[String], labels: &Labels) -> Result<u32, Error> {
    let (rd, rs1, imm): (u32, u32, i64) = if let Some(funct7) = desc.funct7 {
        if args.len() != 3 {
            return Err(bad_arity(op, "3"));
        }
        let rd = reg(&args[0])?;
        let rs1 = reg(&args[1])?;
        let shamt = parse_imm(&args[2])?;
        if !(0..=31).contains(&shamt) {
            return Err(Error::ImmediateOutOfRange {
                value: shamt,
                min: 0,
                max: 31,
            });
        }
        (rd, rs1, i64::from(funct7 << 5) | shamt)
    } else if args.len() >= 2 && args[args.len() - 1].contains('(') {
        let rd = reg(&args[0])?;
        let (offset, rs1) = mem_operand(&args[args.len() - 1], labels)?;
        (rd, rs1, offset)
    } else if args.len() == 3 {
        (reg(&args[0])?, reg(&args[1])?, parse_imm(&args[2])?)
    } else if args.len() == 2 {
        // jalr rd, rs1
        (reg(&args[0])?, reg(&args[1])?, 0)
    } else if args.is_empty() && matches!(op, OpKind::Ecall | OpKind::Ebreak | OpKind::Fence) {
        (0, 0, desc.imm.unwrap_or(0))
    } else {
        return Err(bad_arity(op, "at least 2"));
    };

    check_imm12(imm)?;
    Ok(word::pack_i(desc.opcode, desc.funct3, rd, rs1, imm))
}

fn encode_s(op: OpKind, desc: &InstrDesc, args: &[String], labels: &Labels) -> Result<u32, Error> {
    if args.len() != 2 {
        return Err(bad_arity(op, "2"));
    }
    let rs2 = reg(&args[0])?;
    let (offset, rs1) = mem_operand(&args[1], labels)?;
    check_imm12(offset)?;
    Ok(word::pack_s(desc.opcode, desc.funct3, rs1, rs2, offset))
}

fn encode_b(
    op: OpKind,
    desc: &InstrDesc,
    args: &[String],
    labels: &Labels,
    addr: u32,
) -> Result<u32, Error> {
    if args.len() != 3 {
        return Err(bad_arity(op, "3"));
    }
    let rs1 = reg(&args[0])?;
    let rs2 = reg(&args[1])?;
    let offset = label_offset(&args[2], labels, addr);
    if offset % 2 != 0 {
        return Err(Error::OddBranchOffset(offset));
    }
    if !(-4096..=4094).contains(&offset) {
        return Err(Error::ImmediateOutOfRange {
            value: offset,
            min: -4096,
            max: 4094,
        });
    }
    Ok(word::pack_b(desc.opcode, desc.funct3, rs1, rs2, offset))
}

fn encode_u(op: OpKind, desc: &InstrDesc, args: &[String]) -> Result<u32, Error> {
    if args.len() != 2 {
        return Err(bad_arity(op, "2"));
    }
    let rd = reg(&args[0])?;
    let imm = parse_imm(&args[1])?;
    if !(0..=0xFFFFF).contains(&imm) {
        return Err(Error::ImmediateOutOfRange {
            value: imm,
            min: 0,
            max: 0xFFFFF,
        });
    }
    Ok(word::pack_u(desc.opcode, rd, imm))
}

fn encode_j(
    op: OpKind,
    desc: &InstrDesc,
    args: &[String],
    labels: &Labels,
    addr: u32,
) -> Result<u32, Error> {
    let (rd, target) = match args {
        [target] => (Reg::Ra.num(), target),
        [rd, target] => (reg(rd)?, target),
        _ => return Err(bad_arity(op, "1 or 2")),
    };
    let offset = label_offset(target, labels, addr);
    if offset % 2 != 0 {
        return Err(Error::OddJumpOffset(offset));
    }
    if !(-1048576..=1048574).contains(&offset) {
        return Err(Error::ImmediateOutOfRange {
            value: offset,
            min: -1048576,
            max: 1048574,
        });
    }
    Ok(word::pack_j(desc.opcode, rd, offset))
}

// ----------------------------------------------------------------------------
// Operand resolution

fn reg(s: &str) -> Result<u32, Error> {
    Reg::parse(s)
        .map(Reg::num)
        .map_err(|_| Error::InvalidRegister(s.trim().to_string()))
}

/// `offset(reg)` memory operands. The offset may be a numeric literal or a
/// label name; a label resolves to its absolute address, an unbound name to 0.
fn mem_operand(operand: &str, labels: &Labels) -> Result<(i64, u32), Error> {
    let s = operand.trim();
    let invalid = || Error::InvalidMemoryOperand(s.to_string());

    let inner = s.strip_suffix(')').ok_or_else(invalid)?;
    let (off_str, reg_str) = inner.split_once('(').ok_or_else(invalid)?;
    if !is_offset_token(off_str) || reg_str.is_empty() || !is_word(reg_str) {
        return Err(invalid());
    }

    let offset = match parse_imm(off_str) {
        Ok(value) => value,
        Err(_) => labels.get(off_str).map_or(0, i64::from),
    };
    let rs1 = reg(reg_str)?;
    Ok((offset, rs1))
}

/// A decimal literal (optionally negative) or a bare word, the two shapes a
/// memory-operand offset may take.
fn is_offset_token(s: &str) -> bool {
    if let Some(digits) = s.strip_prefix('-') {
        return !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit());
    }
    is_word(s)
}

fn is_word(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_alphanumeric() || c == '_')
}

fn label_offset(target: &str, labels: &Labels, addr: u32) -> i64 {
    match labels.get(target) {
        Some(target_addr) => i64::from(target_addr) - i64::from(addr),
        None => 0,
    }
}

fn check_imm12(imm: i64) -> Result<(), Error> {
    if (-2048..=2047).contains(&imm) {
        Ok(())
    } else {
        Err(Error::ImmediateOutOfRange {
            value: imm,
            min: -2048,
            max: 2047,
        })
    }
}

fn bad_arity(op: OpKind, want: &'static str) -> Error {
    Error::BadOperandCount {
        op: op.to_string(),
        want,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arch::word::{b_offset_of, funct3_of, i_imm_of, opcode_of, rd_of, rs1_of};

    fn enc(op: OpKind, operands: &[&str]) -> Result<u32, Error> {
        let args: Vec<String> = operands.iter().map(|s| s.to_string()).collect();
        encode(op, &args, &Labels::new(), 0)
    }

    fn enc_at(op: OpKind, operands: &[&str], labels: &Labels, addr: u32) -> Result<u32, Error> {
        let args: Vec<String> = operands.iter().map(|s| s.to_string()).collect();
        encode(op, &args, labels, addr)
    }

    #[test]
    fn addi_fields_roundtrip() {
        let word = enc(OpKind::Addi, &["x1", "x0", "10"]).unwrap();
        assert_eq!(word, 0x00A00093);
        assert_eq!(opcode_of(word), 0b0010011);
        assert_eq!(funct3_of(word), 0);
        assert_eq!(rd_of(word), 1);
        assert_eq!(rs1_of(word), 0);
        assert_eq!(i_imm_of(word), 10);
    }

    #[test]
    fn r_type() {
        assert_eq!(enc(OpKind::Add, &["x3", "x1", "x2"]).unwrap(), 0x002081B3);
        assert_eq!(enc(OpKind::Sub, &["x3", "x1", "x2"]).unwrap(), 0x402081B3);
        assert_eq!(enc(OpKind::And, &["a0", "a1", "a2"]).unwrap(), 0x00C5F533);
        assert!(matches!(
            enc(OpKind::Add, &["x1", "x2"]),
            Err(Error::BadOperandCount { .. })
        ));
    }

    #[test]
    fn shifts_take_a_shamt() {
        assert_eq!(enc(OpKind::Slli, &["x1", "x2", "3"]).unwrap(), 0x00311093);
        assert_eq!(enc(OpKind::Srai, &["x1", "x2", "3"]).unwrap(), 0x40315093);
        assert!(matches!(
            enc(OpKind::Slli, &["x1", "x2", "32"]),
            Err(Error::ImmediateOutOfRange { max: 31, .. })
        ));
        assert!(matches!(
            enc(OpKind::Srli, &["x1", "x2", "-1"]),
            Err(Error::ImmediateOutOfRange { .. })
        ));
    }

    #[test]
    fn loads_and_stores_use_memory_operands() {
        assert_eq!(enc(OpKind::Lw, &["x5", "0(sp)"]).unwrap(), 0x00012283);
        assert_eq!(enc(OpKind::Sw, &["x5", "-4(sp)"]).unwrap(), 0xFE512E23);
        assert_eq!(enc(OpKind::Lb, &["x5", "0x10(a0)"]).unwrap(), 0x01050283);
    }

    #[test]
    fn memory_offset_may_be_a_label() {
        let mut labels = Labels::new();
        labels.bind("data", 0x20).unwrap();
        let word = enc_at(OpKind::Lw, &["x5", "data(x0)"], &labels, 0).unwrap();
        assert_eq!(i_imm_of(word), 0x20);
        // unbound names default to 0
        let word = enc_at(OpKind::Lw, &["x5", "nowhere(x0)"], &Labels::new(), 0).unwrap();
        assert_eq!(i_imm_of(word), 0);
    }

    #[test]
    fn malformed_memory_operands_fail() {
        assert!(matches!(
            enc(OpKind::Lw, &["x5", "(x2)"]),
            Err(Error::InvalidMemoryOperand(_))
        ));
        assert!(matches!(
            enc(OpKind::Sw, &["x5", "4[x2]"]),
            Err(Error::InvalidMemoryOperand(_))
        ));
        assert!(matches!(
            enc(OpKind::Sw, &["x5", "-0x4(x2)"]),
            Err(Error::InvalidMemoryOperand(_))
        ));
    }

    #[test]
    fn branch_eight_ahead_sets_only_imm_4_1() {
        let mut labels = Labels::new();
        labels.bind("end", 8).unwrap();
        let word = enc_at(OpKind::Beq, &["x0", "x0", "end"], &labels, 0).unwrap();
        assert_eq!((word >> 8) & 0xF, 0b0100); // imm[4:1]
        assert_eq!(word >> 31, 0); // imm[12]
        assert_eq!((word >> 25) & 0x3F, 0); // imm[10:5]
        assert_eq!((word >> 7) & 0x1, 0); // imm[11]
        assert_eq!(b_offset_of(word), 8);
    }

    #[test]
    fn branch_offsets_are_target_minus_address() {
        let mut labels = Labels::new();
        labels.bind("end", 16).unwrap();
        let word = enc_at(OpKind::Beq, &["x1", "x0", "end"], &labels, 4).unwrap();
        assert_eq!(word, 0x00008663);
        assert_eq!(b_offset_of(word), 12);
    }

    #[test]
    fn branch_range_is_enforced() {
        let mut labels = Labels::new();
        labels.bind("far", 8192).unwrap();
        assert!(matches!(
            enc_at(OpKind::Beq, &["x0", "x0", "far"], &labels, 0),
            Err(Error::ImmediateOutOfRange { .. })
        ));
    }

    #[test]
    fn unknown_branch_target_defaults_to_zero() {
        let word = enc(OpKind::Beq, &["x0", "x0", "nowhere"]).unwrap();
        assert_eq!(b_offset_of(word), 0);
    }

    #[test]
    fn upper_immediates() {
        assert_eq!(enc(OpKind::Lui, &["x5", "0x12345"]).unwrap(), 0x123452B7);
        assert_eq!(enc(OpKind::Auipc, &["x5", "1"]).unwrap(), 0x00001297);
        assert!(matches!(
            enc(OpKind::Lui, &["x5", "-1"]),
            Err(Error::ImmediateOutOfRange { .. })
        ));
        assert!(matches!(
            enc(OpKind::Lui, &["x5", "0x100000"]),
            Err(Error::ImmediateOutOfRange { .. })
        ));
    }

    #[test]
    fn jumps_default_rd_to_ra() {
        let mut labels = Labels::new();
        labels.bind("fun", 4).unwrap();
        assert_eq!(enc_at(OpKind::Jal, &["fun"], &labels, 0).unwrap(), 0x004000EF);
        assert_eq!(
            enc_at(OpKind::Jal, &["x0", "fun"], &labels, 0).unwrap(),
            0x0040006F
        );
        assert!(matches!(
            enc(OpKind::Jal, &["x0", "a", "b"]),
            Err(Error::BadOperandCount { .. })
        ));
    }

    #[test]
    fn backward_jump() {
        let mut labels = Labels::new();
        labels.bind("start", 0).unwrap();
        let word = enc_at(OpKind::Jal, &["x0", "start"], &labels, 12).unwrap();
        assert_eq!(word, 0xFF5FF06F);
    }

    #[test]
    fn jalr_forms() {
        assert_eq!(enc(OpKind::Jalr, &["x1", "x2"]).unwrap(), 0x000100E7);
        assert_eq!(enc(OpKind::Jalr, &["x1", "8(x2)"]).unwrap(), 0x008100E7);
        assert_eq!(enc(OpKind::Jalr, &["x1", "x2", "4"]).unwrap(), 0x004100E7);
    }

    #[test]
    fn system_instructions_encode_with_no_operands() {
        assert_eq!(enc(OpKind::Ecall, &[]).unwrap(), 0x00000073);
        assert_eq!(enc(OpKind::Ebreak, &[]).unwrap(), 0x00100073);
        assert_eq!(enc(OpKind::Fence, &[]).unwrap(), 0x0000000F);
        assert!(matches!(
            enc(OpKind::Addi, &[]),
            Err(Error::BadOperandCount { .. })
        ));
    }

    #[test]
    fn twelve_bit_range_is_enforced() {
        assert!(matches!(
            enc(OpKind::Addi, &["x1", "x0", "4096"]),
            Err(Error::ImmediateOutOfRange { .. })
        ));
        assert!(matches!(
            enc(OpKind::Addi, &["x1", "x0", "-2049"]),
            Err(Error::ImmediateOutOfRange { .. })
        ));
        assert_eq!(i_imm_of(enc(OpKind::Addi, &["x1", "x0", "2047"]).unwrap()), 2047);
        assert_eq!(i_imm_of(enc(OpKind::Addi, &["x1", "x0", "-2048"]).unwrap()), -2048);
    }

    #[test]
    fn bad_registers_are_reported() {
        assert!(matches!(
            enc(OpKind::Add, &["x1", "x2", "q7"]),
            Err(Error::InvalidRegister(_))
        ));
        assert!(matches!(
            enc(OpKind::Lw, &["x5", "0(q7)"]),
            Err(Error::InvalidRegister(_))
        ));
    }
}
