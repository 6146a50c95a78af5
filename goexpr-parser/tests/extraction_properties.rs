//! Property-based tests for extraction
//!
//! Headers and expressions are generated from a small Go expression grammar, followed by
//! each of the markup suffixes a template can put after them.

use goexpr_parser::goexpr::lexing::tokenize;
use goexpr_parser::goexpr::testing::ALL_SUFFIXES;
use goexpr_parser::goexpr::token::Token;
use goexpr_parser::{extract, Category, ExtractError};
use proptest::prelude::*;

const KEYWORDS: &[&str] = &[
    "break",
    "case",
    "chan",
    "const",
    "continue",
    "default",
    "defer",
    "else",
    "fallthrough",
    "for",
    "func",
    "go",
    "goto",
    "if",
    "import",
    "interface",
    "map",
    "package",
    "range",
    "return",
    "select",
    "struct",
    "switch",
    "type",
    "var",
];

fn ident_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-zA-Z0-9_]{0,6}".prop_filter("Go keywords are not identifiers", |name| {
        !KEYWORDS.contains(&name.as_str())
    })
}

fn leaf_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => ident_strategy(),
        1 => (ident_strategy(), ident_strategy()).prop_map(|(pkg, name)| format!("{}.{}", pkg, name)),
        1 => (0u32..1000).prop_map(|n| n.to_string()),
        1 => "[a-z ]{0,8}".prop_map(|s| format!("{:?}", s)),
    ]
}

/// Go expressions that parse without errors
fn expr_strategy() -> impl Strategy<Value = String> {
    leaf_strategy().prop_recursive(3, 24, 3, |inner| {
        prop_oneof![
            (
                inner.clone(),
                prop::sample::select(vec!["+", "-", "*", "/", "==", "!=", "<", "&&", "||"]),
                inner.clone()
            )
                .prop_map(|(x, op, y)| format!("{} {} {}", x, op, y)),
            (ident_strategy(), prop::collection::vec(inner.clone(), 0..3))
                .prop_map(|(fun, args)| format!("{}({})", fun, args.join(", "))),
            (ident_strategy(), inner.clone()).prop_map(|(x, i)| format!("{}[{}]", x, i)),
            inner.clone().prop_map(|x| format!("({})", x)),
            inner.prop_map(|x| format!("func() bool {{ return {} }}()", x)),
        ]
    })
}

fn block_header_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        expr_strategy().prop_map(|cond| format!("if {} {{", cond)),
        (ident_strategy(), expr_strategy())
            .prop_map(|(v, cond)| format!("if {} := {}; {} {{", v, cond, v)),
        expr_strategy().prop_map(|cond| format!("for {} {{", cond)),
        (ident_strategy(), ident_strategy(), expr_strategy())
            .prop_map(|(k, v, x)| format!("for {}, {} := range {} {{", k, v, x)),
        (ident_strategy(), expr_strategy())
            .prop_map(|(i, n)| format!("for {} := 0; {} < {}; {}++ {{", i, i, n, i)),
        expr_strategy().prop_map(|tag| format!("switch {} {{", tag)),
    ]
}

fn suffix_strategy() -> impl Strategy<Value = &'static str> {
    prop::sample::select(ALL_SUFFIXES.to_vec())
}

/// Go-ish token soup, including markup and unbalanced delimiters
fn soup_strategy() -> impl Strategy<Value = String> {
    let vocab = vec![
        "if", "else", "for", "switch", "case", "default", "range", "func", "return", "x", "y",
        "f", "1", "\"s\"", "+", "<", ">", "/", ":=", "=", ":", ";", ",", ".", "...", "(", ")",
        "{", "}", "[", "]", "\n", "<div>", "</div>",
    ];
    prop::collection::vec(prop::sample::select(vocab), 0..16).prop_map(|parts| parts.join(" "))
}

proptest! {
    #[test]
    fn block_headers_are_extracted_exactly(header in block_header_strategy(), suffix in suffix_strategy()) {
        let input = format!("{}{}", header, suffix);
        prop_assert_eq!(extract(&input), Ok(header));
    }

    #[test]
    fn extraction_is_idempotent(header in block_header_strategy(), suffix in suffix_strategy()) {
        let input = format!("{}{}", header, suffix);
        if let Ok(first) = extract(&input) {
            prop_assert_eq!(extract(&first), Ok(first.clone()));
        }
    }

    #[test]
    fn else_if_is_the_if_header_with_else(cond in expr_strategy(), suffix in suffix_strategy()) {
        let header = format!("if {} {{", cond);
        let input = format!("else {}{}", header, suffix);
        prop_assert_eq!(Category::classify(&input), Category::ElseIf);
        prop_assert_eq!(extract(&input), Ok(format!("else {}", header)));
    }

    #[test]
    fn closing_brace_is_not_part_of_the_expression(expr in expr_strategy()) {
        let input = format!("{}}}", expr);
        prop_assert_eq!(extract(&input), Ok(expr));
    }

    #[test]
    fn result_is_a_prefix_of_the_fragment(input in soup_strategy()) {
        match extract(&input) {
            Ok(output) => prop_assert!(
                input.trim_start().starts_with(&output),
                "{:?} is not a prefix of {:?}",
                output,
                input
            ),
            Err(ExtractError::Syntax { error, .. }) => prop_assert!(error.offset <= input.len()),
            Err(_) => {}
        }
    }

    #[test]
    fn tokens_cover_the_source_in_order(input in "\\PC{0,40}") {
        let tokens = tokenize(&input);
        let last = tokens.last().expect("tokenize always ends with EOF");
        prop_assert_eq!(last.token, Token::Eof);
        prop_assert_eq!(last.span.start, input.len());

        let mut previous_end = 0;
        for token in &tokens {
            prop_assert!(token.span.start >= previous_end);
            prop_assert!(token.span.end <= input.len());
            if !token.is_implicit_semicolon() {
                prop_assert_eq!(&input[token.span.start..token.span.end], token.text);
            }
            previous_end = token.span.end;
        }
    }
}
