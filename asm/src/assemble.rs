use arch::op::OpKind;

use crate::{encode, error::Error, label::Labels, parser::Line, pseudo};

// ----------------------------------------------------------------------------
// Program

/// One flattened, pseudo-expanded instruction awaiting encoding. The label is
/// the one bound at this instruction's address, kept for listings only.
#[derive(Debug, Clone)]
pub struct Entry {
    pub label: Option<String>,
    pub op: OpKind,
    pub args: Vec<String>,
}

/// A fully assembled program: the flattened instruction list, the label
/// table, and one 32-bit word per instruction at addresses 0, 4, 8, ...
#[derive(Debug)]
pub struct Program {
    pub entries: Vec<Entry>,
    pub labels: Labels,
    pub words: Vec<u32>,
}

impl Program {
    pub fn address(&self, index: usize) -> u32 {
        (index * 4) as u32
    }
}

// ----------------------------------------------------------------------------
// Two-pass driver

/// Assemble RV32I source text. All state is local to the call; independent
/// sources never share a label table.
pub fn assemble(source: &str) -> Result<Program, Error> {
    let (entries, labels) = first_pass(source)?;
    let words = second_pass(&entries, &labels)?;
    Ok(Program {
        entries,
        labels,
        words,
    })
}

/// Pass 1: bind labels and flatten pseudo instructions. Produces entries and
/// labels, never words. Each emitted instruction advances the address cursor
/// by 4, so forward labels land on the addresses Pass 2 will revisit.
fn first_pass(source: &str) -> Result<(Vec<Entry>, Labels), Error> {
    let mut entries = Vec::new();
    let mut labels = Labels::new();
    let mut addr: u32 = 0;

    for (idx, raw) in source.lines().enumerate() {
        collect_line(raw, &mut entries, &mut labels, &mut addr).map_err(|e| Error::AtLine {
            line: idx + 1,
            source: Box::new(e),
        })?;
    }
    Ok((entries, labels))
}

fn collect_line(
    raw: &str,
    entries: &mut Vec<Entry>,
    labels: &mut Labels,
    addr: &mut u32,
) -> Result<(), Error> {
    let Line { label, op, args } = Line::tokenize(raw);

    if let Some(name) = &label {
        if !name.is_empty() {
            labels.bind(name, *addr)?;
        }
    }

    let Some(op) = op else { return Ok(()) };

    if pseudo::is_pseudo(&op) {
        for (real, real_args) in pseudo::expand(&op, &args, labels)? {
            entries.push(Entry {
                label: None,
                op: real,
                args: real_args,
            });
            *addr += 4;
        }
    } else {
        match OpKind::parse(&op) {
            Ok(real) => {
                entries.push(Entry {
                    label,
                    op: real,
                    args,
                });
                *addr += 4;
            }
            Err(_) => return Err(Error::UnknownInstruction(op)),
        }
    }
    Ok(())
}

/// Pass 2: encode every flattened entry against the now-frozen label table,
/// walking the same address sequence as Pass 1.
fn second_pass(entries: &[Entry], labels: &Labels) -> Result<Vec<u32>, Error> {
    let mut words = Vec::with_capacity(entries.len());
    let mut addr: u32 = 0;

    for entry in entries {
        let word = encode::encode(entry.op, &entry.args, labels, addr).map_err(|e| {
            Error::AtAddress {
                addr,
                source: Box::new(e),
            }
        })?;
        words.push(word);
        addr += 4;
    }
    Ok(words)
}
