use std::collections::HashMap;

use kpl_core::blitz::{directives, instructions, registers};
use kpl_core::lang::{keywords, operators, punctuation};

#[test]
fn keywords_spellings_unique_and_resolvable() {
    let mut seen: HashMap<&'static str, keywords::KeywordId> = HashMap::new();

    for info in keywords::KEYWORDS {
        assert_eq!(
            keywords::from_str(info.canonical),
            Some(info.id),
            "keyword canonical spelling not resolvable: {}",
            info.canonical
        );
        assert_eq!(
            keywords::as_str(info.id),
            info.canonical,
            "keyword as_str mismatch for {:?}",
            info.id
        );

        if let Some(prev) = seen.insert(info.canonical, info.id) {
            panic!(
                "duplicate keyword spelling {:?}: {:?} and {:?}",
                info.canonical, prev, info.id
            );
        }
    }
}

#[test]
fn keywords_are_identifier_shaped() {
    for info in keywords::KEYWORDS {
        let mut chars = info.canonical.chars();
        let first = chars.next().unwrap();
        assert!(first.is_ascii_alphabetic(), "{}", info.canonical);
        assert!(chars.all(|c| c.is_ascii_alphanumeric() || c == '_'), "{}", info.canonical);
    }
}

#[test]
fn operators_spellings_unique_and_resolvable() {
    let mut seen: HashMap<&'static str, operators::OperatorId> = HashMap::new();

    for info in operators::OPERATORS {
        assert_eq!(operators::from_str(info.spelling), Some(info.id));
        if let Some(prev) = seen.insert(info.spelling, info.id) {
            panic!("duplicate operator spelling {:?}: {:?} and {:?}", info.spelling, prev, info.id);
        }
    }
}

#[test]
fn punctuation_spellings_unique_and_resolvable() {
    let mut seen = HashMap::new();

    for info in punctuation::PUNCTUATION {
        assert_eq!(punctuation::from_char(info.canonical), Some(info.id));
        assert_eq!(punctuation::from_str(info.spelling), Some(info.id));
        assert!(
            !operators::is_operator_char(info.canonical),
            "punctuation {:?} overlaps operator characters",
            info.canonical
        );
        if let Some(prev) = seen.insert(info.canonical, info.id) {
            panic!("duplicate punctuation {:?}: {:?} and {:?}", info.canonical, prev, info.id);
        }
    }
}

#[test]
fn instructions_unique_and_documented() {
    let mut seen = HashMap::new();

    for def in instructions::INSTRUCTIONS {
        assert_eq!(def.mnemonic, def.mnemonic.to_ascii_lowercase(), "mnemonic must be stored lowercase");
        assert!(!def.formats.is_empty(), "instruction {} has no formats", def.mnemonic);
        assert!(!def.description.is_empty());
        if seen.insert(def.mnemonic, ()).is_some() {
            panic!("duplicate instruction mnemonic {:?}", def.mnemonic);
        }
        for usage in def.formats {
            let written = usage.example.split_whitespace().next().unwrap_or("");
            assert_eq!(
                written, def.mnemonic,
                "example {:?} does not start with its own mnemonic",
                usage.example
            );
        }
    }
}

#[test]
fn instructions_do_not_collide_with_registers_or_directives() {
    for def in instructions::INSTRUCTIONS {
        assert!(!registers::is_register(def.mnemonic), "{}", def.mnemonic);
        assert!(directives::lookup(def.mnemonic).is_none());
    }
}

#[test]
fn directives_unique_and_dotted() {
    let mut seen = HashMap::new();

    for d in directives::DIRECTIVES {
        assert!(d.name.starts_with('.'), "{}", d.name);
        assert!(d.example.starts_with(d.name), "{}", d.example);
        if seen.insert(d.name, ()).is_some() {
            panic!("duplicate directive {:?}", d.name);
        }
    }
}
