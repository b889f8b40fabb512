//! Blitz assembler directives (`.text`, `.word`, `.export`, ...).

use super::formats::OperandType;

/// Static metadata for one directive.
#[derive(Debug, Clone, Copy)]
pub struct DirectiveDefinition {
    /// Spelling including the leading dot.
    pub name: &'static str,
    pub description: &'static str,
    pub operands: &'static [OperandType],
    pub example: &'static str,
}

pub const DIRECTIVES: &[DirectiveDefinition] = &[
    directive(".ascii", "Define ASCII string constant", &[OperandType::String], ".ascii \"hello\\n\\0\""),
    directive(".byte", "Define 8-bit value", &[OperandType::Immediate], ".byte ('a'+4)&0x0f"),
    directive(".word", "Define 32-bit word value or address", &[OperandType::Immediate], ".word MyLabel+4"),
    directive(".double", "Define 32-bit floating point value", &[OperandType::Immediate], ".double -12.34e-56"),
    directive(".align", "Align to next boundary", &[], ".align"),
    directive(".skip", "Skip specified number of bytes", &[OperandType::Immediate], ".skip 1000"),
    directive(".data", "Begin data section", &[], ".data"),
    directive(".text", "Begin code section", &[], ".text"),
    directive(".bss", "Begin uninitialized data section", &[], ".bss"),
    directive(".export", "Export symbol for use by other modules", &[OperandType::Label], ".export MyLabel"),
    directive(".import", "Import symbol from another module", &[OperandType::Label], ".import ForeignProc"),
];

/// Look up a directive by spelling (with leading dot), ignoring ASCII case.
pub fn lookup(name: &str) -> Option<&'static DirectiveDefinition> {
    DIRECTIVES.iter().find(|d| d.name.eq_ignore_ascii_case(name))
}

const fn directive(
    name: &'static str,
    description: &'static str,
    operands: &'static [OperandType],
    example: &'static str,
) -> DirectiveDefinition {
    DirectiveDefinition {
        name,
        description,
        operands,
        example,
    }
}
