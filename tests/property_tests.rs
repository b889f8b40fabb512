//! Property-based tests for the KPL lexer, the Blitz pipeline and the formatter
//!
//! These tests use proptest to check invariants across many randomly
//! generated inputs.

use kpl::format::{check_formatted, format_source};
use kpl_core::lang::keywords::KEYWORDS;
use kpl_syntax::lexer::{self, TokenKind};
use proptest::prelude::*;

/// Mostly-KPL text: identifiers, numbers, operators, strings, comments and whitespace.
fn kpl_fragment_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            "[a-zA-Z_][a-zA-Z0-9_]{0,8}",
            "[0-9]{1,6}",
            "0x[0-9A-F]{1,4}",
            Just("+".to_string()),
            Just("==".to_string()),
            Just("(".to_string()),
            Just(")".to_string()),
            Just(":".to_string()),
            Just("\"str\"".to_string()),
            Just("'c'".to_string()),
            Just("-- note\n".to_string()),
            Just("/* a /* b */ c */".to_string()),
            Just(" ".to_string()),
            Just("\n".to_string()),
            Just("\t".to_string()),
        ],
        0..40,
    )
    .prop_map(|parts| parts.join(" "))
}

fn ident_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-zA-Z0-9_]{0,10}".prop_filter("must not be a keyword", |s| KEYWORDS.iter().all(|k| k.canonical != s))
}

// =============================================================================
// Lexer Properties
// =============================================================================

#[cfg(test)]
mod lexer_tests {
    use super::*;

    #[test]
    fn empty_source_is_just_eof() {
        let (tokens, errors) = lexer::lex_with_errors("");
        assert!(errors.is_empty());
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Eof);
    }

    #[test]
    fn nested_comment_is_one_token() {
        let (tokens, errors) = lexer::lex_with_errors("/* /* */ */");
        assert!(errors.is_empty());
        assert_eq!(tokens.len(), 2);
        assert!(matches!(tokens[0].kind, TokenKind::Comment(_)));
    }

    proptest! {
        /// Property: every stream ends with exactly one EOF, for any input
        #[test]
        fn eof_terminates_every_stream(source in any::<String>()) {
            let (tokens, _) = lexer::lex_with_errors(&source);
            prop_assert!(matches!(tokens.last().map(|t| &t.kind), Some(TokenKind::Eof)));
            prop_assert_eq!(tokens.iter().filter(|t| t.kind == TokenKind::Eof).count(), 1);
        }

        /// Property: each token's byte span slices its lexeme back out of the source
        #[test]
        fn spans_round_trip_to_lexemes(source in kpl_fragment_strategy()) {
            let (tokens, _) = lexer::lex_with_errors(&source);
            for tok in &tokens {
                prop_assert_eq!(&source[tok.span.start..tok.span.end], tok.lexeme.as_str());
            }
        }

        /// Property: positions never go backwards
        #[test]
        fn positions_are_monotonic(source in kpl_fragment_strategy()) {
            let (tokens, _) = lexer::lex_with_errors(&source);
            for pair in tokens.windows(2) {
                prop_assert!((pair[0].line(), pair[0].column()) <= (pair[1].line(), pair[1].column()));
                prop_assert!(pair[0].span.start <= pair[1].span.start);
            }
        }

        /// Property: plain identifiers are never keywords
        #[test]
        fn identifiers_stay_identifiers(ident in ident_strategy()) {
            let tokens = lexer::lex(&ident).expect("identifier should lex");
            prop_assert_eq!(tokens.len(), 2);
            prop_assert_eq!(&tokens[0].kind, &TokenKind::Ident(ident.clone()));
        }
    }

    /// Property: every keyword spelling lexes as its keyword, never as an identifier
    #[test]
    fn keywords_are_exclusive() {
        for info in KEYWORDS {
            let tokens = lexer::lex(info.canonical).expect("keyword should lex");
            assert_eq!(tokens[0].kind, TokenKind::Keyword(info.id), "{}", info.canonical);
        }
    }
}

// =============================================================================
// Blitz Properties
// =============================================================================

#[cfg(test)]
mod blitz_tests {
    use super::*;
    use kpl_core::blitz::{directives, instructions, registers};
    use kpl_syntax::blitz;

    fn label_strategy() -> impl Strategy<Value = String> {
        "[A-Z][a-zA-Z0-9]{0,8}".prop_filter("must not collide with the instruction set", |s| {
            !registers::is_register(s) && !instructions::is_instruction(s) && directives::lookup(s).is_none()
        })
    }

    proptest! {
        /// Property: a label defined anywhere after its use is never reported as undefined
        #[test]
        fn forward_references_resolve(label in label_strategy(), gap in 0usize..6) {
            let mut source = format!("\tjmp {label}\n");
            for _ in 0..gap {
                source.push_str("\tnop\n");
            }
            source.push_str(&format!("{label}:\n\tret\n"));
            let result = blitz::parse_text(&source);
            prop_assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
        }

        /// Property: parsing never panics and diagnostics come back sorted
        #[test]
        fn diagnostics_are_sorted(source in "[ a-z0-9,:.!\\[\\]\n]{0,120}") {
            let result = blitz::parse_text(&source);
            for pair in result.diagnostics.windows(2) {
                prop_assert!((pair[0].line, pair[0].column) <= (pair[1].line, pair[1].column));
            }
        }
    }
}

// =============================================================================
// Format Properties
// =============================================================================

#[cfg(test)]
mod format_tests {
    use super::*;

    fn blitz_line_strategy() -> impl Strategy<Value = String> {
        prop_oneof![
            Just(String::new()),
            "[ \t]{0,3}! [a-z ]{0,12}",
            "[ \t]{0,3}[A-Z][a-z]{0,5}:",
            "[ \t]{0,3}[A-Z][a-z]{0,5}: +(add|sub) +r[0-9],r[0-9],r[0-9]",
            "[ \t]{0,3}(nop|ret|syscall)( +! [a-z]{1,8})?",
            "[ \t]{0,3}\\.(text|data|align)",
            "[ \t]{0,3}[A-Z]{1,5} *= *[0-9]{1,4}",
        ]
    }

    proptest! {
        /// Property: formatting is idempotent (format(format(x)) == format(x))
        #[test]
        fn format_is_idempotent(lines in prop::collection::vec(blitz_line_strategy(), 0..12)) {
            let source = lines.join("\n");
            let once = format_source(&source);
            let twice = format_source(&once);
            prop_assert_eq!(&once, &twice);
            prop_assert!(check_formatted(&once));
        }

        /// Property: formatting keeps the token stream of every line
        #[test]
        fn format_preserves_words(lines in prop::collection::vec(blitz_line_strategy(), 0..12)) {
            let source = lines.join("\n");
            let words = |s: &str| s.split_whitespace().map(str::to_string).collect::<Vec<_>>();
            let before: Vec<String> = words(&source.replace('=', " = "));
            let after: Vec<String> = words(&format_source(&source).replace('=', " = "));
            prop_assert_eq!(before, after);
        }
    }
}
