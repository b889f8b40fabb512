//! Operand checks against instruction formats.
//!
//! Operands are checked as written strings (as produced by [`split_operands`](kpl_core::blitz::formats::split_operands)).
//! A format matches when it has exactly as many operand slots as there are operands and every operand fits its
//! slot's type.

use kpl_core::blitz::instructions::{self, FormatUsage};
use kpl_core::blitz::registers::REGISTER_COUNT;
use kpl_core::blitz::{InstructionFormat, OperandType};

/// `rN` or `fN` with `N < 16`. Reserved registers (`pc`, `sr`) are not operands.
pub fn is_valid_register(operand: &str) -> bool {
    let lower = operand.to_ascii_lowercase();
    let Some(digits) = lower.strip_prefix('r').or_else(|| lower.strip_prefix('f')) else {
        return false;
    };
    if digits.is_empty() || digits.len() > 2 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    digits.parse::<u8>().is_ok_and(|n| n < REGISTER_COUNT)
}

/// Hex (`0x1F`), binary (`0b101`) or optionally negative decimal literal.
pub fn is_valid_immediate(operand: &str) -> bool {
    if let Some(hex) = operand.strip_prefix("0x") {
        return !hex.is_empty() && hex.bytes().all(|b| b.is_ascii_hexdigit());
    }
    if let Some(bin) = operand.strip_prefix("0b") {
        return !bin.is_empty() && bin.bytes().all(|b| b == b'0' || b == b'1');
    }
    let digits = operand.strip_prefix('-').unwrap_or(operand);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// `[reg]`, `[reg+reg]` or `[reg+offset]`.
pub fn is_valid_memory_ref(operand: &str) -> bool {
    let Some(inner) = operand.strip_prefix('[').and_then(|s| s.strip_suffix(']')) else {
        return false;
    };
    match inner.split_once('+') {
        None => is_valid_register(inner),
        Some((base, offset)) => {
            is_valid_register(base)
                && (is_valid_register(offset) || (!offset.is_empty() && offset.bytes().all(|b| b.is_ascii_digit())))
        }
    }
}

/// Decode an immediate literal as written in Blitz source.
pub fn parse_number(text: &str) -> Option<i64> {
    let (negative, body) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let value = if let Some(hex) = body.strip_prefix("0x").or_else(|| body.strip_prefix("0X")) {
        i64::from_str_radix(hex, 16).ok()?
    } else if let Some(bin) = body.strip_prefix("0b").or_else(|| body.strip_prefix("0B")) {
        i64::from_str_radix(bin, 2).ok()?
    } else {
        body.parse::<i64>().ok()?
    };
    Some(if negative { -value } else { value })
}

pub fn validate_operand_type(operand: &str, expected: OperandType) -> bool {
    match expected {
        OperandType::Register => is_valid_register(operand),
        OperandType::Immediate | OperandType::Data16 | OperandType::Data24 => is_valid_immediate(operand),
        OperandType::Memory => is_valid_memory_ref(operand),
        OperandType::Label => true,
        OperandType::Constant | OperandType::String | OperandType::None => false,
    }
}

pub fn validate_format(format: InstructionFormat, operands: &[&str]) -> bool {
    let expected = format.operands();
    expected.len() == operands.len()
        && operands
            .iter()
            .zip(expected)
            .all(|(operand, ty)| validate_operand_type(operand, *ty))
}

/// First format usage of `mnemonic` that `operands` satisfy.
pub fn matching_format(mnemonic: &str, operands: &[&str]) -> Option<&'static FormatUsage> {
    instructions::lookup(mnemonic)?
        .formats
        .iter()
        .find(|usage| validate_format(usage.format, operands))
}

/// Format usages of `mnemonic`, empty when it is not an instruction.
pub fn instruction_formats(mnemonic: &str) -> &'static [FormatUsage] {
    instructions::lookup(mnemonic).map(|def| def.formats).unwrap_or(&[])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registers() {
        assert!(is_valid_register("r0"));
        assert!(is_valid_register("R15"));
        assert!(is_valid_register("f7"));
        assert!(!is_valid_register("r16"));
        assert!(!is_valid_register("r"));
        assert!(!is_valid_register("r123"));
        assert!(!is_valid_register("pc"));
        assert!(!is_valid_register("x1"));
    }

    #[test]
    fn test_immediates() {
        for ok in ["0", "42", "-7", "0x1F", "0b1010"] {
            assert!(is_valid_immediate(ok), "{ok}");
        }
        for bad in ["", "-", "0x", "0b12", "12a", "label"] {
            assert!(!is_valid_immediate(bad), "{bad}");
        }
    }

    #[test]
    fn test_memory_refs() {
        assert!(is_valid_memory_ref("[r1]"));
        assert!(is_valid_memory_ref("[r1+r2]"));
        assert!(is_valid_memory_ref("[r14+8]"));
        assert!(!is_valid_memory_ref("[r1+]"));
        assert!(!is_valid_memory_ref("r1+r2"));
        assert!(!is_valid_memory_ref("[r1+label]"));
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("0x10"), Some(16));
        assert_eq!(parse_number("0b11"), Some(3));
        assert_eq!(parse_number("-12"), Some(-12));
        assert_eq!(parse_number("Size+4"), None);
    }

    #[test]
    fn test_validate_format() {
        assert!(validate_format(InstructionFormat::A, &[]));
        assert!(validate_format(InstructionFormat::D, &["r1", "r2", "r3"]));
        assert!(validate_format(InstructionFormat::E, &["r1", "0x10", "r3"]));
        assert!(!validate_format(InstructionFormat::E, &["r1", "r2", "r3"]));
        assert!(!validate_format(InstructionFormat::D, &["r1", "r2"]));
    }

    #[test]
    fn test_matching_format_picks_first_fit() {
        let usage = matching_format("add", &["r1", "5", "r2"]).unwrap();
        assert_eq!(usage.format, InstructionFormat::E);
        let usage = matching_format("ADD", &["r1", "r2", "r3"]).unwrap();
        assert_eq!(usage.format, InstructionFormat::D);
        assert!(matching_format("add", &["r1"]).is_none());
        assert!(matching_format("frobnicate", &[]).is_none());
    }

    #[test]
    fn test_instruction_formats() {
        assert_eq!(instruction_formats("jmp").len(), 2);
        assert!(instruction_formats("nope").is_empty());
    }
}
