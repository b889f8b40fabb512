//! Blitz symbol table: labels, constants, imports and exports of one file.
//!
//! Symbols are fed in file order while lines are tokenized. A reference to a name that has not been seen yet is
//! parked in a pending list and adopted when the name is finally added, so forward branches resolve without a
//! second scan over the tokens. [`SymbolManager::validate_symbols`] is the only pass that reports problems.

use std::collections::{BTreeMap, HashMap};
use std::fmt::{self, Write as _};

use crate::diagnostics::Diagnostic;

/// A 1-based `(line, column)` position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl Location {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Label,
    Import,
    Export,
    Constant,
}

impl SymbolKind {
    fn noun(self) -> &'static str {
        match self {
            SymbolKind::Label | SymbolKind::Export => "Label",
            SymbolKind::Import => "Imported symbol",
            SymbolKind::Constant => "Constant",
        }
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SymbolKind::Label => "label",
            SymbolKind::Import => "import",
            SymbolKind::Export => "export",
            SymbolKind::Constant => "constant",
        };
        write!(f, "{s}")
    }
}

/// Value bound by a constant definition (`SIZE = 0x100`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymbolValue {
    Number(i64),
    /// Any expression that is not a plain literal, kept as written.
    Text(String),
}

impl fmt::Display for SymbolValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymbolValue::Number(n) => write!(f, "{n}"),
            SymbolValue::Text(s) => write!(f, "{s}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    pub definition: Option<Location>,
    pub references: Vec<Location>,
    pub value: Option<SymbolValue>,
}

impl Symbol {
    pub fn new(name: impl Into<String>, kind: SymbolKind) -> Self {
        Self {
            name: name.into(),
            kind,
            definition: None,
            references: Vec::new(),
            value: None,
        }
    }

    pub fn defined_at(mut self, location: Location) -> Self {
        self.definition = Some(location);
        self
    }

    pub fn referenced_at(mut self, location: Location) -> Self {
        self.references.push(location);
        self
    }

    pub fn with_value(mut self, value: SymbolValue) -> Self {
        self.value = Some(value);
        self
    }
}

/// Per-file symbol table with pending forward references.
#[derive(Debug, Default)]
pub struct SymbolManager {
    symbols: Vec<Symbol>,
    index: HashMap<String, usize>,
    /// References to names that have not been added yet.
    pending: BTreeMap<String, Vec<Location>>,
    /// Second and later definitions of an already-defined name.
    redefinitions: Vec<(usize, Location)>,
}

impl SymbolManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or merge a symbol.
    ///
    /// An existing definition is never overwritten; a conflicting one is remembered and reported by
    /// [`validate_symbols`](Self::validate_symbols). Imports and exports upgrade the kind of a plain label.
    pub fn add_symbol(&mut self, mut symbol: Symbol) {
        if let Some(&idx) = self.index.get(&symbol.name) {
            let existing = &mut self.symbols[idx];
            existing.references.append(&mut symbol.references);
            match (existing.definition, symbol.definition) {
                (Some(first), Some(again)) if first != again => self.redefinitions.push((idx, again)),
                (None, Some(location)) => existing.definition = Some(location),
                _ => {}
            }
            if existing.value.is_none() {
                existing.value = symbol.value;
            }
            if existing.kind == SymbolKind::Label && matches!(symbol.kind, SymbolKind::Import | SymbolKind::Export) {
                existing.kind = symbol.kind;
            }
            return;
        }

        if let Some(mut pending) = self.pending.remove(&symbol.name) {
            pending.append(&mut symbol.references);
            symbol.references = pending;
        }
        self.index.insert(symbol.name.clone(), self.symbols.len());
        self.symbols.push(symbol);
    }

    /// Record a use of `name`, parking it if the name is not known yet.
    pub fn add_reference(&mut self, name: &str, location: Location) {
        match self.index.get(name) {
            Some(&idx) => self.symbols[idx].references.push(location),
            None => self.pending.entry(name.to_string()).or_default().push(location),
        }
    }

    pub fn get_symbol(&self, name: &str) -> Option<&Symbol> {
        self.index.get(name).map(|&idx| &self.symbols[idx])
    }

    /// Symbols in the order they were first added.
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// Names referenced but never added, with their use sites.
    pub fn pending_references(&self) -> impl Iterator<Item = (&str, &[Location])> {
        self.pending.iter().map(|(name, refs)| (name.as_str(), refs.as_slice()))
    }

    pub fn reset(&mut self) {
        self.symbols.clear();
        self.index.clear();
        self.pending.clear();
        self.redefinitions.clear();
    }

    /// Report undefined, duplicated, wrongly defined imports and missing exports.
    #[tracing::instrument(skip_all, fields(symbols = self.symbols.len(), pending = self.pending.len()))]
    pub fn validate_symbols(&self) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();

        for symbol in &self.symbols {
            let len = symbol.name.chars().count();
            match symbol.kind {
                SymbolKind::Import => {
                    if let Some(def) = symbol.definition {
                        diagnostics.push(Diagnostic::error(
                            format!("Imported symbol '{}' cannot be defined locally", symbol.name),
                            def.line,
                            def.column,
                            len,
                        ));
                    }
                }
                SymbolKind::Export if symbol.definition.is_none() => {
                    let at = symbol.references.first().copied().unwrap_or_default();
                    diagnostics.push(Diagnostic::error(
                        format!("Exported symbol '{}' is not defined", symbol.name),
                        at.line,
                        at.column,
                        len,
                    ));
                }
                _ => {
                    if let (None, Some(first)) = (symbol.definition, symbol.references.first()) {
                        diagnostics.push(undefined(&symbol.name, *first));
                    }
                }
            }
        }

        for &(idx, again) in &self.redefinitions {
            let symbol = &self.symbols[idx];
            let Some(first) = symbol.definition else { continue };
            diagnostics.push(Diagnostic::error(
                format!(
                    "{} '{}' is already defined at line {}, column {}",
                    symbol.kind.noun(),
                    symbol.name,
                    first.line,
                    first.column
                ),
                again.line,
                again.column,
                symbol.name.chars().count(),
            ));
        }

        for (name, refs) in &self.pending {
            if let Some(first) = refs.first() {
                diagnostics.push(undefined(name, *first));
            }
        }

        diagnostics
    }

    /// Human-readable listing of the table, for debugging.
    pub fn dump_state(&self) -> String {
        let mut out = String::from("Symbol Manager State:\n===================\n\n");
        for symbol in &self.symbols {
            let _ = writeln!(out, "Symbol: {}", symbol.name);
            let _ = writeln!(out, "-----------------");
            let _ = writeln!(out, "Type: {}", symbol.kind);
            match symbol.definition {
                Some(def) => {
                    let _ = writeln!(out, "Definition: line {}, column {}", def.line, def.column);
                }
                None => out.push_str("Definition: undefined\n"),
            }
            if let Some(value) = &symbol.value {
                let _ = writeln!(out, "Value: {value}");
            }
            let _ = writeln!(out, "References ({}):", symbol.references.len());
            for (i, r) in symbol.references.iter().enumerate() {
                let _ = writeln!(out, "  {}. line {}, column {}", i + 1, r.line, r.column);
            }
            out.push('\n');
        }
        out
    }
}

fn undefined(name: &str, at: Location) -> Diagnostic {
    Diagnostic::error(
        format!("Symbol '{name}' is used but never defined"),
        at.line,
        at.column,
        name.chars().count(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(name: &str, line: usize, column: usize) -> Symbol {
        Symbol::new(name, SymbolKind::Label).defined_at(Location::new(line, column))
    }

    #[test]
    fn test_forward_reference_is_adopted() {
        let mut symbols = SymbolManager::new();
        symbols.add_reference("L", Location::new(1, 6));
        assert_eq!(symbols.pending_references().count(), 1);

        symbols.add_symbol(label("L", 5, 1));

        assert_eq!(symbols.pending_references().count(), 0);
        let l = symbols.get_symbol("L").unwrap();
        assert_eq!(l.references, vec![Location::new(1, 6)]);
        assert!(symbols.validate_symbols().is_empty());
    }

    #[test]
    fn test_reference_to_unknown_name_is_reported_once() {
        let mut symbols = SymbolManager::new();
        symbols.add_reference("Missing", Location::new(2, 5));
        symbols.add_reference("Missing", Location::new(7, 5));

        let diags = symbols.validate_symbols();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].message, "Symbol 'Missing' is used but never defined");
        assert_eq!((diags[0].line, diags[0].column, diags[0].length), (2, 5, 7));
    }

    #[test]
    fn test_duplicate_label_keeps_first_definition() {
        let mut symbols = SymbolManager::new();
        symbols.add_symbol(label("Loop", 2, 1));
        symbols.add_symbol(label("Loop", 9, 1));

        assert_eq!(symbols.get_symbol("Loop").unwrap().definition, Some(Location::new(2, 1)));
        let diags = symbols.validate_symbols();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].message, "Label 'Loop' is already defined at line 2, column 1");
        assert_eq!(diags[0].line, 9);
    }

    #[test]
    fn test_import_defined_locally() {
        let mut symbols = SymbolManager::new();
        symbols.add_symbol(Symbol::new("Foreign", SymbolKind::Import));
        symbols.add_symbol(label("Foreign", 4, 1));

        let diags = symbols.validate_symbols();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].message, "Imported symbol 'Foreign' cannot be defined locally");
        assert_eq!(diags[0].line, 4);
    }

    #[test]
    fn test_import_used_without_definition_is_fine() {
        let mut symbols = SymbolManager::new();
        symbols.add_symbol(Symbol::new("print", SymbolKind::Import));
        symbols.add_reference("print", Location::new(3, 7));
        assert!(symbols.validate_symbols().is_empty());
    }

    #[test]
    fn test_export_without_definition() {
        let mut symbols = SymbolManager::new();
        symbols.add_symbol(Symbol::new("main", SymbolKind::Export).referenced_at(Location::new(1, 9)));

        let diags = symbols.validate_symbols();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].message, "Exported symbol 'main' is not defined");
        assert_eq!((diags[0].line, diags[0].column), (1, 9));

        symbols.add_symbol(label("main", 3, 1));
        assert!(symbols.validate_symbols().is_empty());
        assert_eq!(symbols.get_symbol("main").unwrap().kind, SymbolKind::Export);
    }

    #[test]
    fn test_value_filled_only_once() {
        let mut symbols = SymbolManager::new();
        symbols.add_symbol(Symbol::new("K", SymbolKind::Constant).with_value(SymbolValue::Number(1)));
        symbols.add_symbol(Symbol::new("K", SymbolKind::Constant).with_value(SymbolValue::Number(2)));
        assert_eq!(symbols.get_symbol("K").unwrap().value, Some(SymbolValue::Number(1)));
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut symbols = SymbolManager::new();
        symbols.add_symbol(label("A", 1, 1));
        symbols.add_reference("B", Location::new(2, 2));
        symbols.reset();
        assert!(symbols.symbols().is_empty());
        assert!(symbols.validate_symbols().is_empty());
    }

    #[test]
    fn test_dump_state() {
        let mut symbols = SymbolManager::new();
        symbols.add_reference("L1", Location::new(2, 6));
        symbols.add_symbol(label("L1", 1, 1));
        symbols.add_symbol(Symbol::new("SIZE", SymbolKind::Constant).with_value(SymbolValue::Number(16)));

        insta::assert_snapshot!(symbols.dump_state().trim_end(), @r"
        Symbol Manager State:
        ===================

        Symbol: L1
        -----------------
        Type: label
        Definition: line 1, column 1
        References (1):
          1. line 2, column 6

        Symbol: SIZE
        -----------------
        Type: constant
        Definition: undefined
        Value: 16
        References (0):
        ");
    }
}
