//! End-to-end tests for parsing, normalizing and rendering license expressions.

use license_expression::{
    LicenseError, LicenseExpression, LicenseSymbol, LicenseSymbolLike, Licensing, ParseErrorCode,
    ParseOptions, SymbolLike, Template,
};

fn parse(licensing: &Licensing, text: &str) -> LicenseExpression {
    licensing
        .parse(text, ParseOptions::default())
        .unwrap()
        .unwrap()
}

// ============================================================================
// Reference scenarios
// ============================================================================

mod scenarios {
    use super::*;

    #[test]
    fn test_and_binds_tighter_than_or() {
        let licensing = Licensing::default();
        let expr = parse(&licensing, "GPL-2.0 or LGPL-2.1 and mit");
        assert_eq!(
            expr.render("{symbol.key}").unwrap(),
            "GPL-2.0 OR (LGPL-2.1 AND mit)"
        );
    }

    #[test]
    fn test_known_symbols_with_exception_and_parens() {
        let licensing = Licensing::new(["GPL-2.0+", "Classpath", "BSD"]).unwrap();
        let expr = parse(&licensing, "GPL-2.0+ with Classpath or (bsd)");
        assert_eq!(
            expr.render("{symbol.key}").unwrap(),
            "GPL-2.0+ WITH Classpath OR BSD"
        );
    }

    #[test]
    fn test_license_keys_first_appearance_order() {
        let licensing = Licensing::default();
        let expr = parse(
            &licensing,
            "GPL-2.0 and mit+ with blabla and mit or LGPL-2.1 and mit and mit+ with GPL-2.0",
        );
        assert_eq!(
            licensing.license_keys(&expr, true).unwrap(),
            vec!["GPL-2.0", "mit+", "blabla", "mit", "LGPL-2.1"]
        );
    }

    #[test]
    fn test_mixed_case_operators() {
        let licensing = Licensing::default();
        let expr = parse(
            &licensing,
            "EPL-1.0 and Apache-1.1 OR GPL-2.0 with Classpath-exception",
        );
        assert_eq!(
            expr.render("{symbol.key}").unwrap(),
            "(EPL-1.0 AND Apache-1.1) OR GPL-2.0 WITH Classpath-exception"
        );
    }

    #[test]
    fn test_case_variant_keys_are_refused() {
        match Licensing::new(["MIT", "mit"]) {
            Err(LicenseError::InvalidRegistry { errors, .. }) => {
                assert_eq!(errors, vec!["Invalid duplicated license key: mit.".to_string()]);
            }
            other => panic!("expected an invalid registry, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_expressions() {
        let licensing = Licensing::default();
        assert_eq!(licensing.parse("", ParseOptions::default()).unwrap(), None);
        assert_eq!(
            licensing.parse(None::<&str>, ParseOptions::default()).unwrap(),
            None
        );
    }
}

// ============================================================================
// Tokenizer modes
// ============================================================================

mod tokenizer_modes {
    use super::*;

    #[test]
    fn test_simple_and_advanced_agree_on_single_words() {
        let licensing = Licensing::new(["MIT", "Apache-2.0", "BSD-3-Clause"]).unwrap();
        let text = "(mit or apache-2.0) and bsd-3-clause and zlib with foo";
        let advanced = licensing.parse(text, ParseOptions::default()).unwrap();
        let simple = licensing
            .parse(text, ParseOptions::new().with_simple(true))
            .unwrap();
        assert_eq!(advanced, simple);
    }

    #[test]
    fn test_multi_word_names_need_the_advanced_tokenizer() {
        let licensing = Licensing::new([LicenseSymbol::new("GPL 2.0 or later").unwrap()]).unwrap();

        let expr = parse(&licensing, "gpl 2.0 or later and mit");
        assert_eq!(expr.to_string(), "GPL 2.0 or later AND mit");

        let simple = licensing.parse("gpl 2.0 or later and mit", ParseOptions::new().with_simple(true));
        assert!(simple.is_err());
    }

    fn punctuated_registry() -> Licensing {
        Licensing::new([
            LicenseSymbol::new("GPL-2.0").unwrap().with_aliases(["GPL (v2)"]),
            LicenseSymbol::new("LGPL-2.1-or-later")
                .unwrap()
                .with_aliases(["LGPL-2.1 (or later)"]),
            LicenseSymbol::new("ab").unwrap().with_aliases(["a(b)"]),
        ])
        .unwrap()
    }

    #[test]
    fn test_parenthesized_alias_either_spacing() {
        let licensing = punctuated_registry();
        for text in ["a(b) or mit", "a (b) or mit", "A ( B ) or mit"] {
            assert_eq!(parse(&licensing, text).to_string(), "ab OR mit", "{text}");
        }
        assert_eq!(
            parse(&licensing, "gpl(v2) and GPL (v2)").to_string(),
            "GPL-2.0 AND GPL-2.0"
        );
    }

    #[test]
    fn test_alias_with_keyword_inside_parens() {
        let licensing = punctuated_registry();
        let expr = parse(&licensing, "lgpl-2.1 (or later) with classpath");
        assert_eq!(expr.to_string(), "LGPL-2.1-or-later WITH classpath");
    }

    #[test]
    fn test_unregistered_parenthesized_name_is_nesting() {
        let err = Licensing::default()
            .parse("a (b)", ParseOptions::default())
            .unwrap_err();
        assert_eq!(err.parse_code(), Some(ParseErrorCode::InvalidNesting));
    }

    #[test]
    fn test_token_positions() {
        let licensing = Licensing::default();
        let tokens = licensing
            .tokenize("mit  or (bsd with foo)", ParseOptions::default())
            .unwrap();
        let summary: Vec<(String, usize)> = tokens
            .iter()
            .map(|t| (t.string.clone(), t.position))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("mit".to_string(), 0),
                ("or".to_string(), 5),
                ("(".to_string(), 8),
                ("bsd with foo".to_string(), 9),
                (")".to_string(), 21),
            ]
        );
    }
}

// ============================================================================
// Parse errors
// ============================================================================

mod parse_errors {
    use super::*;

    fn code_of(text: &str) -> Option<ParseErrorCode> {
        Licensing::default()
            .parse(text, ParseOptions::default())
            .unwrap_err()
            .parse_code()
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(code_of("mit )"), Some(ParseErrorCode::UnbalancedClosingParens));
        assert_eq!(code_of("(mit or bsd"), Some(ParseErrorCode::UnbalancedClosingParens));
        assert_eq!(code_of("mit or"), Some(ParseErrorCode::InvalidExpression));
        assert_eq!(code_of("mit (bsd)"), Some(ParseErrorCode::InvalidNesting));
        assert_eq!(code_of("mit and or bsd"), Some(ParseErrorCode::InvalidOperatorSequence));
        assert_eq!(code_of("with"), Some(ParseErrorCode::InvalidExpression));
    }

    #[test]
    fn test_symbol_sequence_in_simple_mode() {
        let err = Licensing::default()
            .parse("(mit bsd)", ParseOptions::new().with_simple(true))
            .unwrap_err();
        assert_eq!(err.parse_code(), Some(ParseErrorCode::InvalidSymbolSequence));
    }

    #[test]
    fn test_error_message() {
        let err = Licensing::default()
            .parse("mit and or bsd", ParseOptions::default())
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid operator sequence without symbols such as AND OR or OR OR for token: \"or\" at position: 8"
        );
    }

    #[test]
    fn test_invalid_characters() {
        let err = Licensing::default()
            .parse("mit/x11 or bsd", ParseOptions::default())
            .unwrap_err();
        assert!(matches!(err, LicenseError::InvalidKey { .. }));
    }
}

// ============================================================================
// Rendering
// ============================================================================

mod rendering {
    use super::*;

    #[derive(Debug)]
    struct CatalogEntry {
        key: &'static str,
        name: &'static str,
        exception: bool,
    }

    impl SymbolLike for CatalogEntry {
        fn key(&self) -> &str {
            self.key
        }

        fn is_exception(&self) -> bool {
            self.exception
        }

        fn attribute(&self, name: &str) -> Option<String> {
            match name {
                "name" => Some(self.name.to_string()),
                _ => None,
            }
        }
    }

    fn catalog() -> Licensing {
        let entries = [
            CatalogEntry {
                key: "gpl-2.0",
                name: "GNU General Public License 2.0",
                exception: false,
            },
            CatalogEntry {
                key: "classpath-exception-2.0",
                name: "Classpath exception to GPL 2.0",
                exception: true,
            },
            CatalogEntry {
                key: "mit",
                name: "MIT License",
                exception: false,
            },
        ];
        let symbols: Vec<LicenseSymbolLike<CatalogEntry>> = entries
            .into_iter()
            .map(|entry| LicenseSymbolLike::new(entry).unwrap())
            .collect();
        Licensing::new(symbols).unwrap()
    }

    #[test]
    fn test_extra_attributes_from_wrapped_symbols() {
        let licensing = catalog();
        let expr = parse(&licensing, "GPL-2.0 with Classpath-Exception-2.0 or MIT");
        assert_eq!(
            expr.render("[{symbol.name}]").unwrap(),
            "[GNU General Public License 2.0] WITH [Classpath exception to GPL 2.0] OR [MIT License]"
        );
    }

    #[test]
    fn test_readable_rendering() {
        let licensing = catalog();
        let expr = parse(&licensing, "gpl-2.0 with classpath-exception-2.0 or mit");
        assert_eq!(
            expr.render_as_readable("{symbol.key}").unwrap(),
            "(gpl-2.0 WITH classpath-exception-2.0) OR mit"
        );
    }

    #[test]
    fn test_html_template() {
        let licensing = Licensing::default();
        let expr = parse(&licensing, "mit or bsd");
        let template = Template::new("<a href=\"/l/{symbol.key}\">{symbol.key}</a>").unwrap();
        assert_eq!(
            expr.render_with(&template).unwrap(),
            "<a href=\"/l/mit\">mit</a> OR <a href=\"/l/bsd\">bsd</a>"
        );
    }

    #[test]
    fn test_render_then_parse_is_equivalent() {
        let licensing = Licensing::default();
        let expr = parse(&licensing, "(a or b) and (c with d or e) and a");
        let rendered = expr.render("{symbol.key}").unwrap();
        assert!(licensing.is_equivalent(&expr, rendered.as_str()).unwrap());
    }
}

// ============================================================================
// Normalization
// ============================================================================

mod normalization {
    use super::*;

    #[test]
    fn test_simplify_normalizes_order_and_duplicates() {
        let licensing = Licensing::default();
        let expr = parse(&licensing, "mit or (bsd or mit) or apache-2.0");
        assert_eq!(expr.simplify().to_string(), "apache-2.0 OR bsd OR mit");
    }

    #[test]
    fn test_equivalence_is_symmetric() {
        let licensing = Licensing::default();
        let pairs = [
            ("mit and bsd", "bsd and mit"),
            ("mit or (mit and bsd)", "mit"),
            ("a with b or c", "c or a with b"),
        ];
        for (left, right) in pairs {
            assert!(licensing.is_equivalent(left, right).unwrap(), "{left} vs {right}");
            assert!(licensing.is_equivalent(right, left).unwrap(), "{right} vs {left}");
        }
        assert!(!licensing.is_equivalent("a with b", "b with a").unwrap());
    }

    #[test]
    fn test_containment() {
        let licensing = Licensing::default();
        assert!(licensing.contains("mit and (bsd or gpl)", "gpl or bsd").unwrap());
        assert!(licensing.contains("mit and bsd and gpl", "gpl and mit").unwrap());
        assert!(!licensing.contains("mit and bsd", "mit or bsd").unwrap());
        assert!(licensing.contains("gpl with classpath or mit", "classpath").unwrap());
    }
}
