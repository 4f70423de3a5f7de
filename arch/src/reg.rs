use num_enum::{FromPrimitive, IntoPrimitive};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// The 32 RV32I integer registers. Parsing accepts the canonical `x0..x31`
/// names and every ABI alias, case-insensitively; `fp` and `s0` are the same
/// register. Display uses the ABI name.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Default,
    FromPrimitive,
    IntoPrimitive,
    EnumString,
    Display,
)]
#[repr(u8)]
#[strum(ascii_case_insensitive)]
pub enum Reg {
    #[default]
    #[strum(serialize = "x0", to_string = "zero")]
    Zero,
    #[strum(serialize = "x1", to_string = "ra")]
    Ra,
    #[strum(serialize = "x2", to_string = "sp")]
    Sp,
    #[strum(serialize = "x3", to_string = "gp")]
    Gp,
    #[strum(serialize = "x4", to_string = "tp")]
    Tp,
    #[strum(serialize = "x5", to_string = "t0")]
    T0,
    #[strum(serialize = "x6", to_string = "t1")]
    T1,
    #[strum(serialize = "x7", to_string = "t2")]
    T2,
    #[strum(serialize = "x8", serialize = "fp", to_string = "s0")]
    S0,
    #[strum(serialize = "x9", to_string = "s1")]
    S1,
    #[strum(serialize = "x10", to_string = "a0")]
    A0,
    #[strum(serialize = "x11", to_string = "a1")]
    A1,
    #[strum(serialize = "x12", to_string = "a2")]
    A2,
    #[strum(serialize = "x13", to_string = "a3")]
    A3,
    #[strum(serialize = "x14", to_string = "a4")]
    A4,
    #[strum(serialize = "x15", to_string = "a5")]
    A5,
    #[strum(serialize = "x16", to_string = "a6")]
    A6,
    #[strum(serialize = "x17", to_string = "a7")]
    A7,
    #[strum(serialize = "x18", to_string = "s2")]
    S2,
    #[strum(serialize = "x19", to_string = "s3")]
    S3,
    #[strum(serialize = "x20", to_string = "s4")]
    S4,
    #[strum(serialize = "x21", to_string = "s5")]
    S5,
    #[strum(serialize = "x22", to_string = "s6")]
    S6,
    #[strum(serialize = "x23", to_string = "s7")]
    S7,
    #[strum(serialize = "x24", to_string = "s8")]
    S8,
    #[strum(serialize = "x25", to_string = "s9")]
    S9,
    #[strum(serialize = "x26", to_string = "s10")]
    S10,
    #[strum(serialize = "x27", to_string = "s11")]
    S11,
    #[strum(serialize = "x28", to_string = "t3")]
    T3,
    #[strum(serialize = "x29", to_string = "t4")]
    T4,
    #[strum(serialize = "x30", to_string = "t5")]
    T5,
    #[strum(serialize = "x31", to_string = "t6")]
    T6,
}

impl Reg {
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.trim().parse::<Self>() {
            Ok(r) => Ok(r),
            Err(_) => Err(format!("Unknown reg name: {s}")),
        }
    }

    /// The 5-bit register index, widened for word packing.
    pub fn num(self) -> u32 {
        u32::from(u8::from(self))
    }
}
