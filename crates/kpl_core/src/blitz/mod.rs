//! Blitz instruction-set metadata.
//!
//! Static, read-only tables keyed by mnemonic/name. The Blitz tokenizer uses them to classify words; the
//! validator and hover text use them to check operands and describe instructions.
//!
//! ## Notes
//! - All lookups here are **case-insensitive**: Blitz source is conventionally lowercase but the assembler accepts
//!   any case for mnemonics, directives and registers.

pub mod directives;
pub mod formats;
pub mod instructions;
pub mod registers;

pub use directives::DirectiveDefinition;
pub use formats::{InstructionFormat, OperandType};
pub use instructions::{FormatUsage, InstructionCategory, InstructionDefinition};
pub use registers::{RegisterDefinition, RegisterKind};
