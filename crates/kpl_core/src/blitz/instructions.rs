//! Blitz instruction set definitions.
//!
//! [`INSTRUCTIONS`] is the static table consulted by the Blitz tokenizer (to classify mnemonics), the operand
//! validator, and hover text. Each entry lists the formats the mnemonic can be encoded in, with an example and a
//! short explanation per format.
//!
//! ## Notes
//! - Mnemonics are stored lowercase. [`lookup`] lowercases its input, so `ADD` and `add` resolve alike.
//! - A format usage's written operand count comes from its example, not from the format letter: `load` in format
//!   `D` is written `load [Ra+Rb],Rc` (two operands, one of them a memory reference).
//!
//! ## Examples
//! ```rust
//! use kpl_core::blitz::instructions::{self, InstructionCategory};
//!
//! let add = instructions::lookup("ADD").unwrap();
//! assert_eq!(add.category, InstructionCategory::Arithmetic);
//! assert!(instructions::takes_label_target("jmp"));
//! ```

use std::fmt;

use super::formats::{InstructionFormat, split_operands};

/// Instruction grouping shown in hover text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstructionCategory {
    Arithmetic,
    Bitwise,
    Memory,
    Control,
    System,
}

impl fmt::Display for InstructionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            InstructionCategory::Arithmetic => "arithmetic",
            InstructionCategory::Bitwise => "bitwise",
            InstructionCategory::Memory => "memory",
            InstructionCategory::Control => "control",
            InstructionCategory::System => "system",
        };
        write!(f, "{s}")
    }
}

/// One way to write an instruction.
#[derive(Debug, Clone, Copy)]
pub struct FormatUsage {
    pub format: InstructionFormat,
    pub example: &'static str,
    pub description: Option<&'static str>,
}

impl FormatUsage {
    /// Number of comma-separated operands in the written form.
    pub fn operand_count(&self) -> usize {
        match self.example.split_once(char::is_whitespace) {
            Some((_, operands)) => split_operands(operands).len(),
            None => 0,
        }
    }
}

/// Static metadata for one mnemonic.
#[derive(Debug, Clone, Copy)]
pub struct InstructionDefinition {
    pub mnemonic: &'static str,
    pub description: &'static str,
    pub category: InstructionCategory,
    pub formats: &'static [FormatUsage],
}

impl InstructionDefinition {
    /// Return `true` if some format usage is written with `count` operands.
    pub fn accepts_operand_count(&self, count: usize) -> bool {
        self.formats.iter().any(|u| u.operand_count() == count)
    }
}

/// Look up an instruction by mnemonic, ignoring ASCII case.
pub fn lookup(mnemonic: &str) -> Option<&'static InstructionDefinition> {
    INSTRUCTIONS.iter().find(|i| i.mnemonic.eq_ignore_ascii_case(mnemonic))
}

/// Return `true` if `word` is a known mnemonic.
pub fn is_instruction(word: &str) -> bool {
    lookup(word).is_some()
}

/// Return `true` if the instruction transfers control to an address operand (branches, `jmp`, `call`).
///
/// A bare identifier following one of these is a label reference.
pub fn takes_label_target(mnemonic: &str) -> bool {
    lookup(mnemonic).is_some_and(|def| {
        def.category == InstructionCategory::Control && def.formats.iter().any(|u| u.format == InstructionFormat::F)
    })
}

const fn usage(format: InstructionFormat, example: &'static str, description: Option<&'static str>) -> FormatUsage {
    FormatUsage {
        format,
        example,
        description,
    }
}

/// Registry of every Blitz instruction.
pub const INSTRUCTIONS: &[InstructionDefinition] = &[
    InstructionDefinition {
        mnemonic: "add",
        description: "Add two values and store the result",
        category: InstructionCategory::Arithmetic,
        formats: &[
            usage(InstructionFormat::D, "add Ra,Rb,Rc", Some("Add registers: Rc = Ra + Rb")),
            usage(InstructionFormat::E, "add Ra,data16,Rc", Some("Add immediate: Rc = Ra + data16")),
        ],
    },
    InstructionDefinition {
        mnemonic: "sub",
        description: "Subtract two values and store the result",
        category: InstructionCategory::Arithmetic,
        formats: &[
            usage(InstructionFormat::D, "sub Ra,Rb,Rc", Some("Subtract registers: Rc = Ra - Rb")),
            usage(InstructionFormat::E, "sub Ra,data16,Rc", Some("Subtract immediate: Rc = Ra - data16")),
        ],
    },
    InstructionDefinition {
        mnemonic: "mul",
        description: "Multiply two values and store the result",
        category: InstructionCategory::Arithmetic,
        formats: &[
            usage(InstructionFormat::D, "mul Ra,Rb,Rc", Some("Multiply registers: Rc = Ra * Rb")),
            usage(InstructionFormat::E, "mul Ra,data16,Rc", Some("Multiply immediate: Rc = Ra * data16")),
        ],
    },
    InstructionDefinition {
        mnemonic: "div",
        description: "Divide two values and store the result",
        category: InstructionCategory::Arithmetic,
        formats: &[
            usage(InstructionFormat::D, "div Ra,Rb,Rc", Some("Divide registers: Rc = Ra / Rb")),
            usage(InstructionFormat::E, "div Ra,data16,Rc", Some("Divide immediate: Rc = Ra / data16")),
        ],
    },
    InstructionDefinition {
        mnemonic: "sll",
        description: "Shift left logical",
        category: InstructionCategory::Bitwise,
        formats: &[
            usage(InstructionFormat::D, "sll Ra,Rb,Rc", Some("Shift Ra left by Rb bits, store in Rc")),
            usage(InstructionFormat::E, "sll Ra,data16,Rc", Some("Shift Ra left by immediate value, store in Rc")),
        ],
    },
    InstructionDefinition {
        mnemonic: "srl",
        description: "Shift right logical",
        category: InstructionCategory::Bitwise,
        formats: &[
            usage(InstructionFormat::D, "srl Ra,Rb,Rc", Some("Shift Ra right by Rb bits, store in Rc")),
            usage(InstructionFormat::E, "srl Ra,data16,Rc", Some("Shift Ra right by immediate value, store in Rc")),
        ],
    },
    InstructionDefinition {
        mnemonic: "sra",
        description: "Shift right arithmetic",
        category: InstructionCategory::Bitwise,
        formats: &[
            usage(InstructionFormat::D, "sra Ra,Rb,Rc", Some("Shift Ra right arithmetic by Rb bits, store in Rc")),
            usage(InstructionFormat::E, "sra Ra,data16,Rc", None),
        ],
    },
    InstructionDefinition {
        mnemonic: "btst",
        description: "Bit Test",
        category: InstructionCategory::Bitwise,
        formats: &[
            usage(InstructionFormat::C, "btst Ra,Rc", Some("Test the bit specified by Ra in the value stored in Rc")),
            usage(
                InstructionFormat::E,
                "btst data16,Rc",
                Some("Test the bit specified by the immediate value data16 in Rc"),
            ),
        ],
    },
    InstructionDefinition {
        mnemonic: "rem",
        description: "Integer remainder/modulo operation",
        category: InstructionCategory::Arithmetic,
        formats: &[
            usage(InstructionFormat::D, "rem Ra,Rb,Rc", Some("Remainder of Ra divided by Rb stored in Rc")),
            usage(
                InstructionFormat::E,
                "rem Ra,data16,Rc",
                Some("Remainder of Ra divided by immediate value stored in Rc"),
            ),
        ],
    },
    InstructionDefinition {
        mnemonic: "or",
        description: "Bitwise OR operation",
        category: InstructionCategory::Bitwise,
        formats: &[
            usage(InstructionFormat::D, "or Ra,Rb,Rc", Some("OR registers: Rc = Ra OR Rb")),
            usage(InstructionFormat::E, "or Ra,data16,Rc", Some("OR immediate: Rc = Ra OR data16")),
        ],
    },
    InstructionDefinition {
        mnemonic: "and",
        description: "Bitwise AND operation",
        category: InstructionCategory::Bitwise,
        formats: &[
            usage(InstructionFormat::D, "and Ra,Rb,Rc", Some("AND registers: Rc = Ra AND Rb")),
            usage(InstructionFormat::E, "and Ra,data16,Rc", Some("AND immediate: Rc = Ra AND data16")),
        ],
    },
    InstructionDefinition {
        mnemonic: "andn",
        description: "Bitwise AND NOT operation",
        category: InstructionCategory::Bitwise,
        formats: &[
            usage(InstructionFormat::D, "andn Ra,Rb,Rc", Some("AND NOT registers: Rc = Ra AND (NOT Rb)")),
            usage(InstructionFormat::E, "andn Ra,data16,Rc", Some("AND NOT immediate: Rc = Ra AND (NOT data16)")),
        ],
    },
    InstructionDefinition {
        mnemonic: "xor",
        description: "Bitwise XOR operation",
        category: InstructionCategory::Bitwise,
        formats: &[
            usage(InstructionFormat::D, "xor Ra,Rb,Rc", Some("XOR registers: Rc = Ra XOR Rb")),
            usage(InstructionFormat::E, "xor Ra,data16,Rc", Some("XOR immediate: Rc = Ra XOR data16")),
        ],
    },
    InstructionDefinition {
        mnemonic: "load",
        description: "Load word from memory",
        category: InstructionCategory::Memory,
        formats: &[
            usage(InstructionFormat::D, "load [Ra+Rb],Rc", Some("Load word from memory at Ra+Rb into Rc")),
            usage(InstructionFormat::E, "load [Ra+data16],Rc", Some("Load word from memory at Ra+data16 into Rc")),
        ],
    },
    InstructionDefinition {
        mnemonic: "loadb",
        description: "Load byte from memory",
        category: InstructionCategory::Memory,
        formats: &[
            usage(InstructionFormat::D, "loadb [Ra+Rb],Rc", Some("Load byte from memory at Ra+Rb into Rc")),
            usage(InstructionFormat::E, "loadb [Ra+data16],Rc", Some("Load byte from memory at Ra+data16 into Rc")),
        ],
    },
    InstructionDefinition {
        mnemonic: "loadv",
        description: "Load word using virtual address",
        category: InstructionCategory::Memory,
        formats: &[
            usage(InstructionFormat::D, "loadv [Ra+Rb],Rc", Some("Load word from virtual memory at Ra+Rb into Rc")),
            usage(
                InstructionFormat::E,
                "loadv [Ra+data16],Rc",
                Some("Load word from virtual memory at Ra+data16 into Rc"),
            ),
        ],
    },
    InstructionDefinition {
        mnemonic: "loadbv",
        description: "Load byte using virtual address",
        category: InstructionCategory::Memory,
        formats: &[
            usage(InstructionFormat::D, "loadbv [Ra+Rb],Rc", Some("Load byte from virtual memory at Ra+Rb into Rc")),
            usage(
                InstructionFormat::E,
                "loadbv [Ra+data16],Rc",
                Some("Load byte from virtual memory at Ra+data16 into Rc"),
            ),
        ],
    },
    InstructionDefinition {
        mnemonic: "store",
        description: "Store word to memory",
        category: InstructionCategory::Memory,
        formats: &[
            usage(InstructionFormat::D, "store Rc,[Ra+Rb]", Some("Store Rc to memory at Ra+Rb")),
            usage(InstructionFormat::E, "store Rc,[Ra+data16]", Some("Store Rc to memory at Ra+data16")),
        ],
    },
    InstructionDefinition {
        mnemonic: "storeb",
        description: "Store byte to memory",
        category: InstructionCategory::Memory,
        formats: &[
            usage(InstructionFormat::D, "storeb Rc,[Ra+Rb]", Some("Store byte from Rc to memory at Ra+Rb")),
            usage(InstructionFormat::E, "storeb Rc,[Ra+data16]", Some("Store byte from Rc to memory at Ra+data16")),
        ],
    },
    InstructionDefinition {
        mnemonic: "storev",
        description: "Store word using virtual address",
        category: InstructionCategory::Memory,
        formats: &[
            usage(InstructionFormat::D, "storev Rc,[Ra+Rb]", Some("Store word from Rc to virtual memory at Ra+Rb")),
            usage(
                InstructionFormat::E,
                "storev Rc,[Ra+data16]",
                Some("Store word from Rc to virtual memory at Ra+data16"),
            ),
        ],
    },
    InstructionDefinition {
        mnemonic: "storebv",
        description: "Store byte using virtual address",
        category: InstructionCategory::Memory,
        formats: &[
            usage(InstructionFormat::D, "storebv Rc,[Ra+Rb]", Some("Store byte from Rc to virtual memory at Ra+Rb")),
            usage(
                InstructionFormat::E,
                "storebv Rc,[Ra+data16]",
                Some("Store byte from Rc to virtual memory at Ra+data16"),
            ),
        ],
    },
    InstructionDefinition {
        mnemonic: "call",
        description: "Call subroutine",
        category: InstructionCategory::Control,
        formats: &[
            usage(InstructionFormat::C, "call Ra+Rc", Some("Call subroutine at Ra+Rc")),
            usage(InstructionFormat::F, "call data24", Some("Call subroutine at immediate address")),
        ],
    },
    InstructionDefinition {
        mnemonic: "jmp",
        description: "Jump to address",
        category: InstructionCategory::Control,
        formats: &[
            usage(InstructionFormat::C, "jmp Ra+Rc", Some("Jump to address Ra+Rc")),
            usage(InstructionFormat::F, "jmp data24", Some("Jump to immediate address")),
        ],
    },
    InstructionDefinition {
        mnemonic: "nop",
        description: "No operation",
        category: InstructionCategory::System,
        formats: &[
            usage(InstructionFormat::A, "nop", Some("Perform no operation")),
        ],
    },
    InstructionDefinition {
        mnemonic: "syscall",
        description: "System call",
        category: InstructionCategory::System,
        formats: &[
            usage(InstructionFormat::G, "syscall Rc+data16", Some("Execute system call with parameters")),
        ],
    },
    InstructionDefinition {
        mnemonic: "sethi",
        description: "Set high 16 bits of register",
        category: InstructionCategory::System,
        formats: &[
            usage(InstructionFormat::G, "sethi data16,Rc", Some("Set high 16 bits of Rc to data16, clear low bits")),
        ],
    },
    InstructionDefinition {
        mnemonic: "setlo",
        description: "Set low 16 bits of register",
        category: InstructionCategory::System,
        formats: &[
            usage(InstructionFormat::G, "setlo data16,Rc", Some("Set low 16 bits of Rc to data16, preserve high bits")),
        ],
    },
    InstructionDefinition {
        mnemonic: "ldaddr",
        description: "Load address into register",
        category: InstructionCategory::Memory,
        formats: &[
            usage(InstructionFormat::G, "ldaddr data16,Rc", Some("Load address specified by data16 into Rc")),
        ],
    },
    InstructionDefinition {
        mnemonic: "push",
        description: "Push register onto stack",
        category: InstructionCategory::Memory,
        formats: &[
            usage(InstructionFormat::C, "push Rc,[--Ra]", Some("Decrement Ra and push Rc onto stack at address Ra")),
        ],
    },
    InstructionDefinition {
        mnemonic: "pop",
        description: "Pop value from stack into register",
        category: InstructionCategory::Memory,
        formats: &[
            usage(InstructionFormat::C, "pop [Ra++],Rc", None),
        ],
    },
    InstructionDefinition {
        mnemonic: "wait",
        description: "Enter low-power wait state",
        category: InstructionCategory::System,
        formats: &[
            usage(InstructionFormat::A, "wait", Some("Processor enters low-power wait state until interrupt")),
        ],
    },
    InstructionDefinition {
        mnemonic: "debug",
        description: "Debug breakpoint",
        category: InstructionCategory::System,
        formats: &[
            usage(InstructionFormat::A, "debug", Some("Generate debug breakpoint")),
        ],
    },
    InstructionDefinition {
        mnemonic: "debug2",
        description: "Alternative debug breakpoint",
        category: InstructionCategory::System,
        formats: &[
            usage(InstructionFormat::A, "debug2", Some("Generate alternative debug breakpoint")),
        ],
    },
    InstructionDefinition {
        mnemonic: "reti",
        description: "Return from interrupt",
        category: InstructionCategory::Control,
        formats: &[
            usage(InstructionFormat::A, "reti", Some("Return from interrupt handler to interrupted code")),
        ],
    },
    InstructionDefinition {
        mnemonic: "ret",
        description: "Return from subroutine",
        category: InstructionCategory::Control,
        formats: &[
            usage(InstructionFormat::A, "ret", Some("Return from subroutine to caller")),
        ],
    },
    InstructionDefinition {
        mnemonic: "tset",
        description: "Atomic test and set memory location",
        category: InstructionCategory::Memory,
        formats: &[
            usage(InstructionFormat::C, "tset [Ra],Rc", None),
        ],
    },
    InstructionDefinition {
        mnemonic: "readu",
        description: "Read from user mode register",
        category: InstructionCategory::System,
        formats: &[
            usage(InstructionFormat::C, "readu Rc,Ra", Some("Read user mode register Ra into Rc")),
            usage(InstructionFormat::E, "readu Rc,[Ra+data16]", Some("Read user mode memory at Ra+data16 into Rc")),
        ],
    },
    InstructionDefinition {
        mnemonic: "writeu",
        description: "Write to user mode register",
        category: InstructionCategory::System,
        formats: &[
            usage(InstructionFormat::C, "writeu Ra,Rc", Some("Write Rc to user mode register Ra")),
            usage(InstructionFormat::E, "writeu [Ra+data16],Rc", Some("Write Rc to user mode memory at Ra+data16")),
        ],
    },
    InstructionDefinition {
        mnemonic: "ldptbr",
        description: "Load page table base register",
        category: InstructionCategory::System,
        formats: &[
            usage(InstructionFormat::B, "ldptbr Rc", Some("Load page table base register from Rc")),
        ],
    },
    InstructionDefinition {
        mnemonic: "ldptlr",
        description: "Load page table length register",
        category: InstructionCategory::System,
        formats: &[
            usage(InstructionFormat::B, "ldptlr Rc", Some("Load page table length register from Rc")),
        ],
    },
    InstructionDefinition {
        mnemonic: "ftoi",
        description: "Convert floating point to integer",
        category: InstructionCategory::Arithmetic,
        formats: &[
            usage(InstructionFormat::C, "ftoi Fa,Rc", Some("Convert float in Fa to integer in Rc")),
        ],
    },
    InstructionDefinition {
        mnemonic: "itof",
        description: "Convert integer to floating point",
        category: InstructionCategory::Arithmetic,
        formats: &[
            usage(InstructionFormat::C, "itof Ra,Fc", Some("Convert integer in Ra to float in Fc")),
        ],
    },
    InstructionDefinition {
        mnemonic: "fcmp",
        description: "Compare floating point values",
        category: InstructionCategory::Arithmetic,
        formats: &[
            usage(InstructionFormat::C, "fcmp Fa,Fc", Some("Compare float in Fa with Fc, set condition codes")),
        ],
    },
    InstructionDefinition {
        mnemonic: "fsqrt",
        description: "Floating point square root",
        category: InstructionCategory::Arithmetic,
        formats: &[
            usage(InstructionFormat::C, "fsqrt Fa,Fc", Some("Calculate square root of Fa, store in Fc")),
        ],
    },
    InstructionDefinition {
        mnemonic: "fneg",
        description: "Floating point negation",
        category: InstructionCategory::Arithmetic,
        formats: &[
            usage(InstructionFormat::C, "fneg Fa,Fc", Some("Negate float in Fa, store in Fc")),
        ],
    },
    InstructionDefinition {
        mnemonic: "fabs",
        description: "Floating point absolute value",
        category: InstructionCategory::Arithmetic,
        formats: &[
            usage(InstructionFormat::C, "fabs Fa,Fc", Some("Calculate absolute value of Fa, store in Fc")),
        ],
    },
    InstructionDefinition {
        mnemonic: "fadd",
        description: "Floating point addition",
        category: InstructionCategory::Arithmetic,
        formats: &[
            usage(InstructionFormat::D, "fadd Fa,Fb,Fc", Some("Add floats: Fc = Fa + Fb")),
        ],
    },
    InstructionDefinition {
        mnemonic: "fsub",
        description: "Floating point subtraction",
        category: InstructionCategory::Arithmetic,
        formats: &[
            usage(InstructionFormat::D, "fsub Fa,Fb,Fc", Some("Subtract floats: Fc = Fa - Fb")),
        ],
    },
    InstructionDefinition {
        mnemonic: "fmul",
        description: "Floating point multiplication",
        category: InstructionCategory::Arithmetic,
        formats: &[
            usage(InstructionFormat::D, "fmul Fa,Fb,Fc", Some("Multiply floats: Fc = Fa * Fb")),
        ],
    },
    InstructionDefinition {
        mnemonic: "fdiv",
        description: "Floating point division",
        category: InstructionCategory::Arithmetic,
        formats: &[
            usage(InstructionFormat::D, "fdiv Fa,Fb,Fc", Some("Divide floats: Fc = Fa / Fb")),
        ],
    },
    InstructionDefinition {
        mnemonic: "fload",
        description: "Load floating point value from memory",
        category: InstructionCategory::Memory,
        formats: &[
            usage(InstructionFormat::D, "fload [Ra+Rb],Fc", Some("Load float from memory at Ra+Rb into Fc")),
            usage(InstructionFormat::E, "fload [Ra+data16],Fc", Some("Load float from memory at Ra+data16 into Fc")),
        ],
    },
    InstructionDefinition {
        mnemonic: "fstore",
        description: "Store floating point value to memory",
        category: InstructionCategory::Memory,
        formats: &[
            usage(InstructionFormat::D, "fstore Fc,[Ra+Rb]", Some("Store float Fc to memory at Ra+Rb")),
            usage(InstructionFormat::E, "fstore Fc,[Ra+data16]", Some("Store float Fc to memory at Ra+data16")),
        ],
    },
    InstructionDefinition {
        mnemonic: "be",
        description: "Branch if equal",
        category: InstructionCategory::Control,
        formats: &[
            usage(InstructionFormat::C, "be Ra+Rc", Some("Branch to Ra+Rc if equal flag is set")),
            usage(InstructionFormat::F, "be data24", Some("Branch to data24 if equal flag is set")),
        ],
    },
    InstructionDefinition {
        mnemonic: "bne",
        description: "Branch if not equal",
        category: InstructionCategory::Control,
        formats: &[
            usage(InstructionFormat::C, "bne Ra+Rc", Some("Branch to Ra+Rc if equal flag is clear")),
            usage(InstructionFormat::F, "bne data24", Some("Branch to data24 if equal flag is clear")),
        ],
    },
    InstructionDefinition {
        mnemonic: "bl",
        description: "Branch if less than",
        category: InstructionCategory::Control,
        formats: &[
            usage(InstructionFormat::C, "bl Ra+Rc", Some("Branch to Ra+Rc if less than flag is set")),
            usage(InstructionFormat::F, "bl data24", Some("Branch to data24 if less than flag is set")),
        ],
    },
    InstructionDefinition {
        mnemonic: "ble",
        description: "Branch if less than or equal",
        category: InstructionCategory::Control,
        formats: &[
            usage(InstructionFormat::C, "ble Ra+Rc", Some("Branch to Ra+Rc if less than or equal flags are set")),
            usage(InstructionFormat::F, "ble data24", Some("Branch to data24 if less than or equal flags are set")),
        ],
    },
    InstructionDefinition {
        mnemonic: "bg",
        description: "Branch if greater than",
        category: InstructionCategory::Control,
        formats: &[
            usage(InstructionFormat::C, "bg Ra+Rc", Some("Branch to Ra+Rc if greater than flag is set")),
            usage(InstructionFormat::F, "bg data24", Some("Branch to data24 if greater than flag is set")),
        ],
    },
    InstructionDefinition {
        mnemonic: "bge",
        description: "Branch if greater than or equal",
        category: InstructionCategory::Control,
        formats: &[
            usage(InstructionFormat::C, "bge Ra+Rc", Some("Branch to Ra+Rc if greater than or equal flags are set")),
            usage(InstructionFormat::F, "bge data24", Some("Branch to data24 if greater than or equal flags are set")),
        ],
    },
    InstructionDefinition {
        mnemonic: "bvs",
        description: "Branch if overflow set",
        category: InstructionCategory::Control,
        formats: &[
            usage(InstructionFormat::C, "bvs Ra+Rc", Some("Branch to Ra+Rc if overflow flag is set")),
            usage(InstructionFormat::F, "bvs data24", Some("Branch to data24 if overflow flag is set")),
        ],
    },
    InstructionDefinition {
        mnemonic: "bvc",
        description: "Branch if overflow clear",
        category: InstructionCategory::Control,
        formats: &[
            usage(InstructionFormat::C, "bvc Ra+Rc", Some("Branch to Ra+Rc if overflow flag is clear")),
            usage(InstructionFormat::F, "bvc data24", Some("Branch to data24 if overflow flag is clear")),
        ],
    },
    InstructionDefinition {
        mnemonic: "bns",
        description: "Branch if negative set",
        category: InstructionCategory::Control,
        formats: &[
            usage(InstructionFormat::C, "bns Ra+Rc", Some("Branch to Ra+Rc if negative flag is set")),
            usage(InstructionFormat::F, "bns data24", Some("Branch to data24 if negative flag is set")),
        ],
    },
    InstructionDefinition {
        mnemonic: "bnc",
        description: "Branch if negative clear",
        category: InstructionCategory::Control,
        formats: &[
            usage(InstructionFormat::C, "bnc Ra+Rc", Some("Branch to Ra+Rc if negative flag is clear")),
            usage(InstructionFormat::F, "bnc data24", Some("Branch to data24 if negative flag is clear")),
        ],
    },
    InstructionDefinition {
        mnemonic: "bss",
        description: "Branch if supervisor set",
        category: InstructionCategory::Control,
        formats: &[
            usage(InstructionFormat::C, "bss Ra+Rc", Some("Branch to Ra+Rc if supervisor mode flag is set")),
            usage(InstructionFormat::F, "bss data24", Some("Branch to data24 if supervisor mode flag is set")),
        ],
    },
    InstructionDefinition {
        mnemonic: "bsc",
        description: "Branch if supervisor clear",
        category: InstructionCategory::Control,
        formats: &[
            usage(InstructionFormat::C, "bsc Ra+Rc", Some("Branch to Ra+Rc if supervisor mode flag is clear")),
            usage(InstructionFormat::F, "bsc data24", Some("Branch to data24 if supervisor mode flag is clear")),
        ],
    },
    InstructionDefinition {
        mnemonic: "bis",
        description: "Branch if interrupt set",
        category: InstructionCategory::Control,
        formats: &[
            usage(InstructionFormat::C, "bis Ra+Rc", Some("Branch to Ra+Rc if interrupt flag is set")),
            usage(InstructionFormat::F, "bis data24", Some("Branch to data24 if interrupt flag is set")),
        ],
    },
    InstructionDefinition {
        mnemonic: "bic",
        description: "Branch if interrupt clear",
        category: InstructionCategory::Control,
        formats: &[
            usage(InstructionFormat::C, "bic Ra+Rc", Some("Branch to Ra+Rc if interrupt flag is clear")),
            usage(InstructionFormat::F, "bic data24", Some("Branch to data24 if interrupt flag is clear")),
        ],
    },
    InstructionDefinition {
        mnemonic: "bps",
        description: "Branch if paging set",
        category: InstructionCategory::Control,
        formats: &[
            usage(InstructionFormat::C, "bps Ra+Rc", Some("Branch to Ra+Rc if paging flag is set")),
            usage(InstructionFormat::F, "bps data24", Some("Branch to data24 if paging flag is set")),
        ],
    },
    InstructionDefinition {
        mnemonic: "bpc",
        description: "Branch if paging clear",
        category: InstructionCategory::Control,
        formats: &[
            usage(InstructionFormat::C, "bpc Ra+Rc", Some("Branch to Ra+Rc if paging flag is clear")),
            usage(InstructionFormat::F, "bpc data24", Some("Branch to data24 if paging flag is clear")),
        ],
    },
    InstructionDefinition {
        mnemonic: "mov",
        description: "Move (copy) value from one register to another",
        category: InstructionCategory::Memory,
        formats: &[
            usage(InstructionFormat::C, "mov Ra,Rc", Some("Copy value from Ra to Rc")),
        ],
    },
    InstructionDefinition {
        mnemonic: "set",
        description: "Set a register to an immediate value",
        category: InstructionCategory::Arithmetic,
        formats: &[
            usage(InstructionFormat::G, "set data16,Rc", Some("Set register Rc to immediate value")),
        ],
    },
    InstructionDefinition {
        mnemonic: "cmp",
        description: "Compare two values and set condition codes",
        category: InstructionCategory::Arithmetic,
        formats: &[
            usage(InstructionFormat::C, "cmp Ra,Rc", Some("Compare Ra with Rc and set condition codes")),
        ],
    },
    InstructionDefinition {
        mnemonic: "cleari",
        description: "Clear interrupt enable flag",
        category: InstructionCategory::System,
        formats: &[
            usage(InstructionFormat::A, "cleari", Some("Clear the interrupt enable flag in status register")),
        ],
    },
    InstructionDefinition {
        mnemonic: "seti",
        description: "Set interrupt enable flag",
        category: InstructionCategory::System,
        formats: &[
            usage(InstructionFormat::A, "seti", Some("Set the interrupt enable flag in status register")),
        ],
    },
    InstructionDefinition {
        mnemonic: "clearp",
        description: "Clear paging enable flag",
        category: InstructionCategory::System,
        formats: &[
            usage(InstructionFormat::A, "clearp", Some("Clear the paging enable flag in status register")),
        ],
    },
    InstructionDefinition {
        mnemonic: "setp",
        description: "Set paging enable flag",
        category: InstructionCategory::System,
        formats: &[
            usage(InstructionFormat::A, "setp", Some("Set the paging enable flag in status register")),
        ],
    },
    InstructionDefinition {
        mnemonic: "clears",
        description: "Clear supervisor mode flag",
        category: InstructionCategory::System,
        formats: &[
            usage(InstructionFormat::A, "clears", Some("Clear the supervisor mode flag in status register")),
        ],
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(lookup("StOrE").map(|d| d.mnemonic), Some("store"));
        assert!(lookup("frobnicate").is_none());
    }

    #[test]
    fn test_operand_count_from_example() {
        let load = lookup("load").unwrap();
        assert!(load.accepts_operand_count(2));
        assert!(!load.accepts_operand_count(3));
        let ret = lookup("ret").unwrap();
        assert!(ret.accepts_operand_count(0));
    }

    #[test]
    fn test_branches_take_labels_but_ret_does_not() {
        for m in ["be", "bne", "bpc", "jmp", "call"] {
            assert!(takes_label_target(m), "{m}");
        }
        assert!(!takes_label_target("ret"));
        assert!(!takes_label_target("add"));
    }
}
