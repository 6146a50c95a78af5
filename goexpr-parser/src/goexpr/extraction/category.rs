//! Category dispatch
//!
//! A fragment is classified by its leading keyword. Rules are tried in order and the first
//! match wins; a fragment no rule matches is a bare expression.

use serde::Serialize;
use std::fmt;

/// Grammatical category of a fragment's leading construct
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    If,
    ElseIf,
    Else,
    /// Plain, conditional, three-clause and range loops
    For,
    /// Expression and type switches
    Switch,
    Case,
    Default,
    Expression,
    /// `children...`; never selected by keyword
    #[serde(rename = "children")]
    ChildrenSpread,
}

/// How a rule compares its text against the start of a fragment
#[derive(Debug, Clone, Copy)]
enum Prefix {
    /// Plain string prefix
    Literal(&'static str),
    /// The keyword, not followed by an identifier character
    Keyword(&'static str),
}

impl Prefix {
    fn matches(self, fragment: &str) -> bool {
        match self {
            Prefix::Literal(text) => fragment.starts_with(text),
            Prefix::Keyword(keyword) => fragment
                .strip_prefix(keyword)
                .is_some_and(|rest| !rest.starts_with(is_ident_char)),
        }
    }
}

fn is_ident_char(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

const RULES: &[(Prefix, Category)] = &[
    (Prefix::Literal("else {"), Category::Else),
    (Prefix::Literal("else if"), Category::ElseIf),
    (Prefix::Keyword("case"), Category::Case),
    (Prefix::Keyword("if"), Category::If),
    (Prefix::Keyword("else"), Category::Else),
    (Prefix::Keyword("for"), Category::For),
    (Prefix::Keyword("switch"), Category::Switch),
    (Prefix::Keyword("default"), Category::Default),
];

impl Category {
    pub const ALL: [Category; 9] = [
        Category::If,
        Category::ElseIf,
        Category::Else,
        Category::For,
        Category::Switch,
        Category::Case,
        Category::Default,
        Category::Expression,
        Category::ChildrenSpread,
    ];

    pub fn classify(fragment: &str) -> Category {
        RULES
            .iter()
            .find(|(prefix, _)| prefix.matches(fragment))
            .map(|(_, category)| *category)
            .unwrap_or(Category::Expression)
    }

    pub fn name(self) -> &'static str {
        match self {
            Category::If => "if",
            Category::ElseIf => "else-if",
            Category::Else => "else",
            Category::For => "for",
            Category::Switch => "switch",
            Category::Case => "case",
            Category::Default => "default",
            Category::Expression => "expression",
            Category::ChildrenSpread => "children",
        }
    }

    pub fn from_name(name: &str) -> Option<Category> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("else {\n<div>", Category::Else)]
    #[case("else if x {", Category::ElseIf)]
    #[case("case 1:", Category::Case)]
    #[case("if true {", Category::If)]
    #[case("if(ok) {", Category::If)]
    #[case("else{", Category::Else)]
    #[case("for {", Category::For)]
    #[case("switch x {", Category::Switch)]
    #[case("default:", Category::Default)]
    #[case("components.Other()", Category::Expression)]
    #[case("iffy()", Category::Expression)]
    #[case("format(x)", Category::Expression)]
    #[case("cases[0]", Category::Expression)]
    #[case("defaults.Name", Category::Expression)]
    #[case("", Category::Expression)]
    fn test_classify(#[case] fragment: &str, #[case] expected: Category) {
        assert_eq!(Category::classify(fragment), expected);
    }

    #[test]
    fn test_names_round_trip() {
        for category in Category::ALL {
            assert_eq!(Category::from_name(category.name()), Some(category));
        }
        assert_eq!(Category::from_name("while"), None);
    }

    #[test]
    fn test_serialized_names_match() {
        for category in Category::ALL {
            let json = serde_json::to_string(&category).expect("category serializes");
            assert_eq!(json, format!("\"{}\"", category.name()));
        }
    }
}
