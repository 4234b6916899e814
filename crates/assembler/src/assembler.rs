//! MIPS assembler: source lines in, text segment out.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tracing::warn;

use mipsim_isa::{register_index, set_field, Address, Field, InstrType, Instruction, MachineCode, TextSegment};

use crate::decoder::{Decoder, DECODERS};
use crate::error::AssemblerError;

/// Default base address of the text segment.
pub const TEXT_BASE: Address = 0x0040_0000;

/// MIPS ASM assembler.
///
/// Feeds normalized source lines through the per-mnemonic decoder table
/// and builds the instruction-memory image, one word every 4 bytes
/// starting at the configured base address.
pub struct Assembler {
    base: Address,
    text: TextSegment,
}

impl Assembler {
    pub fn new() -> Self {
        Self::with_base(TEXT_BASE)
    }

    pub fn with_base(base: Address) -> Self {
        Self {
            base,
            text: TextSegment::new(),
        }
    }

    /// Assemble a whole input file.
    ///
    /// An unopenable file is an error for the caller to report; register
    /// and immediate faults inside the file also surface here.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, AssemblerError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| AssemblerError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut assembler = Self::new();
        assembler.assemble(source.lines())?;
        Ok(assembler)
    }

    /// Feed source lines in order.
    pub fn assemble<'l, I>(&mut self, lines: I) -> Result<(), AssemblerError>
    where
        I: IntoIterator<Item = &'l str>,
    {
        for line in lines {
            self.assemble_line(line)?;
        }
        Ok(())
    }

    /// Normalize and encode one source line.
    ///
    /// Blank lines, pure comments, and unknown mnemonics are skipped; a
    /// recognized mnemonic whose body does not match its template is
    /// reported and dropped. Only register-table misses and malformed
    /// immediates are hard errors.
    pub fn assemble_line(&mut self, raw: &str) -> Result<(), AssemblerError> {
        let Some(line) = normalize(raw) else {
            return Ok(());
        };

        let Some(mnemonic) = line.split_whitespace().next() else {
            return Ok(());
        };
        let Some(decoder) = DECODERS.get(mnemonic) else {
            // Unknown mnemonics pass through silently so directives or
            // labels can coexist with the supported subset.
            return Ok(());
        };

        let Some(binary) = encode(&line, decoder)? else {
            return Ok(());
        };

        let address = self.base + 4 * self.text.len() as Address;
        self.text.insert(address, Instruction { binary, text: line });
        Ok(())
    }

    /// The assembled instruction image.
    pub fn text_segment(&self) -> &TextSegment {
        &self.text
    }

    /// Consume the assembler, keeping only the instruction image.
    pub fn into_text_segment(self) -> TextSegment {
        self.text
    }

    /// Write the text image, one `address: word; source` line per
    /// instruction.
    pub fn dump_image<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for (address, instruction) in self.text.iter() {
            writeln!(
                out,
                "0x{address:08x}: 0x{:08x};\t{}",
                instruction.binary, instruction.text
            )?;
        }
        Ok(())
    }
}

impl Default for Assembler {
    fn default() -> Self {
        Self::new()
    }
}

/// Strip comments and surrounding whitespace, lowercase, reject empties.
fn normalize(line: &str) -> Option<String> {
    let line = match line.find("//") {
        Some(pos) => &line[..pos],
        None => line,
    };
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    Some(line.to_lowercase())
}

/// Pack a normalized statement into a machine word using its decoder.
///
/// Returns `None` when the statement does not match the decoder template;
/// the mismatch is reported to the diagnostic stream and the line dropped.
fn encode(line: &str, decoder: &Decoder) -> Result<Option<MachineCode>, AssemblerError> {
    let Some(captures) = decoder.pattern.captures(line) else {
        warn!(line, pattern = decoder.pattern.as_str(), "statement does not match decoder template");
        return Ok(None);
    };

    let mut binary: MachineCode = 0;
    set_field(&mut binary, Field::Opcode, decoder.opcode);
    if decoder.ty == InstrType::R {
        set_field(&mut binary, Field::Funct, decoder.funct);
    }

    for (slot, &field) in decoder.operands.iter().enumerate() {
        let value = captures.get(slot + 2).map_or("", |m| m.as_str());
        match field {
            Field::Rs | Field::Rt | Field::Rd => {
                let index =
                    register_index(value).ok_or_else(|| AssemblerError::UnknownRegister {
                        name: value.to_string(),
                        line: line.to_string(),
                    })?;
                set_field(&mut binary, field, index);
            }
            Field::Shamt | Field::Imm => {
                let digits = value.strip_prefix("0x").unwrap_or(value);
                let parsed = u32::from_str_radix(digits, 16).map_err(|source| {
                    AssemblerError::InvalidImmediate {
                        value: value.to_string(),
                        line: line.to_string(),
                        source,
                    }
                })?;
                set_field(&mut binary, field, parsed);
            }
            Field::Opcode | Field::Funct => {
                unreachable!("operand tables never carry opcode or funct")
            }
        }
    }

    Ok(Some(binary))
}
