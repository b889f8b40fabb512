//! Blitz register file: sixteen integer registers, sixteen float registers, and the reserved `pc`/`sr`.
//!
//! The numbered registers are generated on demand rather than spelled out as 32 table rows; [`lookup`] parses
//! `rN`/`fN` and returns an owned [`RegisterDefinition`].

/// Register file a register belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegisterKind {
    Integer,
    Float,
}

/// Number of registers in each numbered file.
pub const REGISTER_COUNT: u8 = 16;

/// Metadata for one register.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterDefinition {
    pub name: String,
    /// Register number, or `None` for reserved registers.
    pub number: Option<u8>,
    pub description: String,
    pub kind: RegisterKind,
    pub reserved: bool,
}

/// Look up a register by name, ignoring ASCII case.
///
/// ## Examples
/// ```rust
/// use kpl_core::blitz::registers::{self, RegisterKind};
///
/// let r = registers::lookup("R15").unwrap();
/// assert_eq!(r.kind, RegisterKind::Integer);
/// assert!(registers::lookup("r16").is_none());
/// assert!(registers::lookup("sr").unwrap().reserved);
/// ```
pub fn lookup(name: &str) -> Option<RegisterDefinition> {
    let lower = name.to_ascii_lowercase();
    match lower.as_str() {
        "pc" => return Some(reserved("pc", "Program Counter")),
        "sr" => return Some(reserved("sr", "Status Register")),
        _ => {}
    }

    let (kind, digits) = match lower.split_at_checked(1)? {
        ("r", rest) => (RegisterKind::Integer, rest),
        ("f", rest) => (RegisterKind::Float, rest),
        _ => return None,
    };
    if digits.is_empty() || digits.len() > 2 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let number: u8 = digits.parse().ok()?;
    if number >= REGISTER_COUNT {
        return None;
    }

    let description = match kind {
        RegisterKind::Integer => format!("32-bit general purpose register {number}"),
        RegisterKind::Float => format!("64-bit floating point register {number}"),
    };
    Some(RegisterDefinition {
        name: lower,
        number: Some(number),
        description,
        kind,
        reserved: false,
    })
}

/// Return `true` if `name` is any register.
pub fn is_register(name: &str) -> bool {
    lookup(name).is_some()
}

/// All register names, numbered files first.
pub fn all_names() -> Vec<String> {
    let mut names: Vec<String> = (0..REGISTER_COUNT)
        .map(|i| format!("r{i}"))
        .chain((0..REGISTER_COUNT).map(|i| format!("f{i}")))
        .collect();
    names.push("pc".to_string());
    names.push("sr".to_string());
    names
}

fn reserved(name: &str, description: &str) -> RegisterDefinition {
    RegisterDefinition {
        name: name.to_string(),
        number: None,
        description: description.to_string(),
        kind: RegisterKind::Integer,
        reserved: true,
    }
}
