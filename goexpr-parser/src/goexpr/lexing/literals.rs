//! Literal classification and validation
//!
//! Logos matches numbers and quoted literals by their extent only. Whether the text is a
//! well-formed Go literal is decided here, with the messages Go's scanner uses. Offsets are
//! relative to the start of the literal.

use crate::goexpr::token::Token;
use std::iter::Peekable;

/// `Int`, `Float` or `Imag`, from the text of a number
pub(super) fn number_kind(text: &str) -> Token {
    let hex = text.len() > 1 && matches!(&text[..2], "0x" | "0X");
    let exponent = |c: char| matches!(c, 'p' | 'P') || (!hex && matches!(c, 'e' | 'E'));
    if text.ends_with('i') {
        Token::Imag
    } else if text.contains('.') || text.contains(exponent) {
        Token::Float
    } else {
        Token::Int
    }
}

pub(super) fn literal_errors(token: Token, text: &str) -> Vec<(usize, String)> {
    match token {
        Token::Int | Token::Float | Token::Imag => number_errors(text),
        Token::Char => quoted_errors(text, '\''),
        Token::String => quoted_errors(text, '"'),
        _ => Vec::new(),
    }
}

#[derive(Default)]
struct Digits {
    seen: bool,
    separated: bool,
    /// First digit out of range for the base
    invalid: Option<usize>,
}

fn scan_digits(bytes: &[u8], mut i: usize, base: u8, digits: &mut Digits) -> usize {
    while let Some(&c) = bytes.get(i) {
        if c == b'_' {
            digits.separated = true;
        } else if (base <= 10 && c.is_ascii_digit()) || (base == 16 && c.is_ascii_hexdigit()) {
            digits.seen = true;
            if base < 10 && c >= b'0' + base && digits.invalid.is_none() {
                digits.invalid = Some(i);
            }
        } else {
            break;
        }
        i += 1;
    }
    i
}

fn literal_name(prefix: u8) -> &'static str {
    match prefix {
        b'x' => "hexadecimal literal",
        b'o' | b'0' => "octal literal",
        b'b' => "binary literal",
        _ => "decimal literal",
    }
}

fn number_errors(text: &str) -> Vec<(usize, String)> {
    let bytes = text.as_bytes();
    let at = |i: usize| bytes.get(i).copied().unwrap_or(0);
    let mut errors = Vec::new();
    let mut i = 0;
    let mut base = 10;
    let mut prefix = 0u8;
    let mut digits = Digits::default();
    let mut float = false;

    if at(0) != b'.' {
        if at(0) == b'0' {
            i = 1;
            match at(1).to_ascii_lowercase() {
                b'x' => (i, base, prefix) = (2, 16, b'x'),
                b'o' => (i, base, prefix) = (2, 8, b'o'),
                b'b' => (i, base, prefix) = (2, 2, b'b'),
                _ => {
                    (base, prefix) = (8, b'0');
                    digits.seen = true;
                }
            }
        }
        i = scan_digits(bytes, i, base, &mut digits);
    }

    if at(i) == b'.' {
        float = true;
        if matches!(prefix, b'o' | b'b') {
            errors.push((i, format!("invalid radix point in {}", literal_name(prefix))));
        }
        i = scan_digits(bytes, i + 1, base, &mut digits);
    }

    // Reported at the literal start so that it stays within the literal
    if !digits.seen {
        errors.push((0, format!("{} has no digits", literal_name(prefix))));
    }

    let e = at(i).to_ascii_lowercase();
    if e == b'e' || e == b'p' {
        if e == b'e' && prefix != 0 && prefix != b'0' {
            errors.push((i, format!("'{}' exponent requires decimal mantissa", at(i) as char)));
        } else if e == b'p' && prefix != b'x' {
            errors.push((i, format!("'{}' exponent requires hexadecimal mantissa", at(i) as char)));
        }
        float = true;
        i += 1;
        if matches!(at(i), b'+' | b'-') {
            i += 1;
        }
        let mut exponent = Digits::default();
        i = scan_digits(bytes, i, 10, &mut exponent);
        digits.separated |= exponent.separated;
        if !exponent.seen {
            errors.push((0, "exponent has no digits".to_string()));
        }
    } else if prefix == b'x' && float {
        errors.push((0, "hexadecimal mantissa requires a 'p' exponent".to_string()));
    }

    if !float && at(i) != b'i' {
        if let Some(bad) = digits.invalid {
            errors.push((
                bad,
                format!("invalid digit '{}' in {}", bytes[bad] as char, literal_name(prefix)),
            ));
        }
    }

    if digits.separated {
        if let Some(sep) = invalid_separator(bytes) {
            errors.push((sep, "'_' must separate successive digits".to_string()));
        }
    }
    errors
}

/// Offset of the first `_` that does not sit between two digits
fn invalid_separator(x: &[u8]) -> Option<usize> {
    // '0' after a digit, '_' after a separator, '.' after anything else
    let mut x1 = b' ';
    let mut d = b'.';
    let mut i = 0;

    if x.len() >= 2 && x[0] == b'0' {
        x1 = x[1].to_ascii_lowercase();
        if matches!(x1, b'x' | b'o' | b'b') {
            d = b'0';
            i = 2;
        }
    }

    while i < x.len() {
        let previous = d;
        d = x[i];
        if d == b'_' {
            if previous != b'0' {
                return Some(i);
            }
        } else if d.is_ascii_digit() || (x1 == b'x' && d.is_ascii_hexdigit()) {
            d = b'0';
        } else {
            if previous == b'_' {
                return Some(i - 1);
            }
            d = b'.';
        }
        i += 1;
    }
    (d == b'_').then(|| x.len() - 1)
}

fn quoted_errors(text: &str, quote: char) -> Vec<(usize, String)> {
    let mut errors = Vec::new();
    let close = text.len() - quote.len_utf8();
    let mut chars = text[1..close]
        .char_indices()
        .map(|(i, c)| (i + 1, c))
        .peekable();
    let mut count = 0;
    let mut valid = true;

    while let Some((_, c)) = chars.next() {
        count += 1;
        if c == '\\' {
            if let Some(error) = escape_error(&mut chars, quote, close) {
                errors.push(error);
                valid = false;
            }
        }
    }

    if quote == '\'' && valid && count != 1 {
        errors.push((0, "illegal rune literal".to_string()));
    }
    errors
}

/// Validate the escape after a backslash, consuming it when well-formed
fn escape_error<I>(chars: &mut Peekable<I>, quote: char, close: usize) -> Option<(usize, String)>
where
    I: Iterator<Item = (usize, char)>,
{
    let (offset, c) = chars.peek().copied().unwrap_or((close, quote));
    let (count, base, max) = match c {
        'a' | 'b' | 'f' | 'n' | 'r' | 't' | 'v' | '\\' => {
            chars.next();
            return None;
        }
        c if c == quote => {
            chars.next();
            return None;
        }
        '0'..='7' => (3, 8, 255),
        'x' => (2, 16, 255),
        'u' => (4, 16, 0x10FFFF),
        'U' => (8, 16, 0x10FFFF),
        _ => return Some((offset, "unknown escape sequence".to_string())),
    };
    if !c.is_ascii_digit() {
        chars.next();
    }

    let mut value: u32 = 0;
    for _ in 0..count {
        let (at, d) = chars.peek().copied().unwrap_or((close, quote));
        match d.to_digit(base) {
            Some(digit) => {
                value = value * base + digit;
                chars.next();
            }
            None => {
                return Some((
                    at,
                    format!(
                        "illegal character U+{:04X} '{}' in escape sequence",
                        d as u32, d
                    ),
                ))
            }
        }
    }

    if value > max || (0xD800..0xE000).contains(&value) {
        return Some((offset, "escape is invalid Unicode code point".to_string()));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("42", Token::Int)]
    #[case("0x1F", Token::Int)]
    #[case("0x1e", Token::Int)]
    #[case("3.14", Token::Float)]
    #[case(".5", Token::Float)]
    #[case("1e9", Token::Float)]
    #[case("0x1p-2", Token::Float)]
    #[case("2i", Token::Imag)]
    #[case("0x1p4i", Token::Imag)]
    fn test_number_kind(#[case] text: &str, #[case] expected: Token) {
        assert_eq!(number_kind(text), expected);
    }

    #[rstest]
    #[case("0")]
    #[case("0x1p4")]
    #[case("0x1.8p-2")]
    #[case("1_000_000")]
    #[case("0b1010")]
    #[case("0o17")]
    #[case("017")]
    #[case("08.5")]
    #[case("09i")]
    #[case("1e+10")]
    fn test_valid_numbers(#[case] text: &str) {
        assert_eq!(number_errors(text), vec![]);
    }

    #[rstest]
    #[case("0x", 0, "hexadecimal literal has no digits")]
    #[case("0b", 0, "binary literal has no digits")]
    #[case("1e", 0, "exponent has no digits")]
    #[case("08", 1, "invalid digit '8' in octal literal")]
    #[case("0b12", 3, "invalid digit '2' in binary literal")]
    #[case("0o1.2", 3, "invalid radix point in octal literal")]
    #[case("0x1.8", 0, "hexadecimal mantissa requires a 'p' exponent")]
    #[case("1p4", 1, "'p' exponent requires hexadecimal mantissa")]
    #[case("0b1e2", 3, "'e' exponent requires decimal mantissa")]
    #[case("1__0", 2, "'_' must separate successive digits")]
    #[case("10_", 2, "'_' must separate successive digits")]
    fn test_invalid_numbers(#[case] text: &str, #[case] offset: usize, #[case] message: &str) {
        assert_eq!(number_errors(text), vec![(offset, message.to_string())]);
    }

    #[rstest]
    #[case("'x'")]
    #[case(r"'\n'")]
    #[case(r"'\''")]
    #[case(r"'\x41'")]
    #[case(r"'\101'")]
    #[case("'é'")]
    #[case(r"'\u00e9'")]
    fn test_valid_runes(#[case] text: &str) {
        assert_eq!(quoted_errors(text, '\''), vec![]);
    }

    #[rstest]
    #[case(r#""plain""#)]
    #[case(r#""tab\tquote\"""#)]
    #[case(r#""\U0001F600""#)]
    fn test_valid_strings(#[case] text: &str) {
        assert_eq!(quoted_errors(text, '"'), vec![]);
    }

    #[rstest]
    #[case("''", '\'', 0, "illegal rune literal")]
    #[case("'ab'", '\'', 0, "illegal rune literal")]
    #[case(r#""\q""#, '"', 2, "unknown escape sequence")]
    #[case(r#""\'""#, '"', 2, "unknown escape sequence")]
    #[case(r"'\x4'", '\'', 4, "illegal character U+0027 ''' in escape sequence")]
    #[case(r"'\400'", '\'', 2, "escape is invalid Unicode code point")]
    #[case(r#""\uD800""#, '"', 2, "escape is invalid Unicode code point")]
    fn test_invalid_quoted(
        #[case] text: &str,
        #[case] quote: char,
        #[case] offset: usize,
        #[case] message: &str,
    ) {
        assert_eq!(quoted_errors(text, quote), vec![(offset, message.to_string())]);
    }
}
