//! Blitz instruction encoding formats and operand kinds.
//!
//! Every instruction is encoded in one of seven formats (`A`..`G`). A format fixes the operand-type sequence the
//! assembler expects, which is what operand validation checks against.
//!
//! ## Notes
//! - Operand order follows the assembler's written order (`add r1,100,r3` is `E`: register, data16, register).
//! - Memory and register-sum operands (`[r1+r2]`, `r1+r2`) count as one operand each.

use std::fmt;

/// Instruction encoding format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstructionFormat {
    /// No operands.
    A,
    /// One register.
    B,
    /// Two registers.
    C,
    /// Three registers.
    D,
    /// Register, 16-bit immediate, register.
    E,
    /// 24-bit immediate or label.
    F,
    /// 16-bit immediate, register.
    G,
}

/// Kind of a single instruction or directive operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperandType {
    Register,
    Immediate,
    Label,
    Memory,
    Constant,
    String,
    Data16,
    Data24,
    None,
}

pub const ALL_FORMATS: &[InstructionFormat] = &[
    InstructionFormat::A,
    InstructionFormat::B,
    InstructionFormat::C,
    InstructionFormat::D,
    InstructionFormat::E,
    InstructionFormat::F,
    InstructionFormat::G,
];

impl InstructionFormat {
    /// Expected operand types, in written order.
    pub fn operands(self) -> &'static [OperandType] {
        use OperandType::*;
        match self {
            InstructionFormat::A => &[],
            InstructionFormat::B => &[Register],
            InstructionFormat::C => &[Register, Register],
            InstructionFormat::D => &[Register, Register, Register],
            InstructionFormat::E => &[Register, Data16, Register],
            InstructionFormat::F => &[Data24],
            InstructionFormat::G => &[Data16, Register],
        }
    }

    /// Single-letter name used in hover text and listings.
    pub fn letter(self) -> char {
        match self {
            InstructionFormat::A => 'A',
            InstructionFormat::B => 'B',
            InstructionFormat::C => 'C',
            InstructionFormat::D => 'D',
            InstructionFormat::E => 'E',
            InstructionFormat::F => 'F',
            InstructionFormat::G => 'G',
        }
    }
}

impl fmt::Display for InstructionFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

impl fmt::Display for OperandType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OperandType::Register => "register",
            OperandType::Immediate => "immediate",
            OperandType::Label => "label",
            OperandType::Memory => "memory",
            OperandType::Constant => "constant",
            OperandType::String => "string",
            OperandType::Data16 => "data16",
            OperandType::Data24 => "data24",
            OperandType::None => "none",
        };
        write!(f, "{s}")
    }
}

/// Split an operand list on top-level commas, ignoring commas inside `[...]` and quotes.
///
/// ## Examples
/// ```rust
/// use kpl_core::blitz::formats::split_operands;
///
/// assert_eq!(split_operands("[r1+r2],r3"), vec!["[r1+r2]", "r3"]);
/// assert!(split_operands("   ").is_empty());
/// ```
pub fn split_operands(text: &str) -> Vec<&str> {
    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;
    for (i, c) in text.char_indices() {
        match (quote, c) {
            (Some(q), _) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '[') => depth += 1,
            (None, ']') => depth = depth.saturating_sub(1),
            (None, ',') if depth == 0 => {
                parts.push(text[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(text[start..].trim());
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operand_counts() {
        let counts: Vec<usize> = ALL_FORMATS.iter().map(|f| f.operands().len()).collect();
        assert_eq!(counts, vec![0, 1, 2, 3, 3, 1, 2]);
    }

    #[test]
    fn test_split_operands_keeps_quoted_commas() {
        assert_eq!(split_operands("\"a,b\",r1"), vec!["\"a,b\"", "r1"]);
        assert_eq!(split_operands("r1+r2"), vec!["r1+r2"]);
    }
}
