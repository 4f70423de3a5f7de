use crate::error::Error;

// ----------------------------------------------------------------------------
// Line

/// One tokenized source line. The label is kept verbatim (binding and
/// duplicate checks happen in the driver); the mnemonic is folded to
/// lowercase; operands keep their original spelling.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub label: Option<String>,
    pub op: Option<String>,
    pub args: Vec<String>,
}

impl Line {
    pub fn tokenize(raw: &str) -> Line {
        let code = match raw.split_once('#') {
            Some((code, _comment)) => code,
            None => raw,
        };
        let mut rest = code.trim();

        let label = match rest.split_once(':') {
            Some((head, tail)) => {
                rest = tail.trim();
                Some(head.trim().to_string())
            }
            None => None,
        };

        if rest.is_empty() {
            return Line {
                label,
                op: None,
                args: vec![],
            };
        }

        let (op, tail) = match rest.split_once(char::is_whitespace) {
            Some((op, tail)) => (op, tail.trim_start()),
            None => (rest, ""),
        };

        Line {
            label,
            op: Some(op.to_lowercase()),
            args: split_operands(tail),
        }
    }
}

/// Split on commas, but only at parenthesis depth 0, so memory operands like
/// `0(sp)` stay in one piece.
fn split_operands(s: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut depth = 0i32;

    for ch in s.chars().chain(std::iter::once(',')) {
        if ch == ',' && depth == 0 {
            let operand = current.trim();
            if !operand.is_empty() {
                args.push(operand.to_string());
            }
            current.clear();
        } else {
            match ch {
                '(' => depth += 1,
                ')' => depth -= 1,
                _ => {}
            }
            current.push(ch);
        }
    }
    args
}

// ----------------------------------------------------------------------------
// Immediates

/// Parse a numeric literal: decimal, `0x`/`0X` hex, `0b`/`0B` binary, or
/// `-0x` negated hex. An empty token resolves to 0 (the safe default for
/// offsets that are really unresolved labels).
pub fn parse_imm(s: &str) -> Result<i64, Error> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(0);
    }
    let parsed = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        i64::from_str_radix(hex, 16)
    } else if let Some(bin) = s.strip_prefix("0b").or_else(|| s.strip_prefix("0B")) {
        i64::from_str_radix(bin, 2)
    } else if let Some(hex) = s.strip_prefix("-0x").or_else(|| s.strip_prefix("-0X")) {
        i64::from_str_radix(hex, 16).map(|v| -v)
    } else {
        s.parse::<i64>()
    };
    parsed.map_err(|_| Error::InvalidImmediate(s.to_string()))
}
