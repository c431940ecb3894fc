//! Counter properties and counter styles.
//!
//! [§ 12.4 Automatic counters and numbering](https://www.w3.org/TR/CSS2/generate.html#counters)

use serde::Serialize;
use strum_macros::{Display, EnumString};

use crate::StyleError;

/// One `<counter-name> <integer>?` entry of `counter-reset` or
/// `counter-increment`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CounterData {
    /// Counter identifier.
    pub name: String,
    /// Reset value or increment step.
    pub value: i32,
}

impl CounterData {
    /// Create a counter entry.
    #[must_use]
    pub fn new(name: &str, value: i32) -> Self {
        Self {
            name: name.to_string(),
            value,
        }
    }
}

/// Parse a `counter-reset` / `counter-increment` value.
///
/// "The 'counter-increment' property accepts one or more names of counters
/// (identifiers), each one optionally followed by an integer."
///
/// `default` is the implied integer (0 for resets, 1 for increments).
///
/// # Errors
///
/// Returns [`StyleError::InvalidValue`] if an integer appears without a
/// preceding counter name.
pub fn parse_counter_list(
    property: &str,
    text: &str,
    default: i32,
) -> Result<Vec<CounterData>, StyleError> {
    let text = text.trim();
    if text.is_empty() || text.eq_ignore_ascii_case("none") {
        return Ok(Vec::new());
    }

    let mut counters: Vec<CounterData> = Vec::new();
    for word in text.split_ascii_whitespace() {
        if let Ok(value) = word.parse::<i32>() {
            match counters.last_mut() {
                Some(last) => last.value = value,
                None => {
                    return Err(StyleError::InvalidValue {
                        property: property.to_string(),
                        value: text.to_string(),
                    });
                }
            }
        } else {
            counters.push(CounterData::new(word, default));
        }
    }
    Ok(counters)
}

/// [§ 12.6.2 Lists: the 'list-style-type' property](https://www.w3.org/TR/CSS2/generate.html#propdef-list-style-type)
///
/// Also used as the counter style argument of `counter()` and `counters()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Display, EnumString)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum ListStyleType {
    /// A filled circle.
    #[default]
    Disc,
    /// A hollow circle.
    Circle,
    /// A filled square.
    Square,
    /// "Decimal numbers, beginning with 1."
    Decimal,
    /// "Decimal numbers padded by initial zeros (e.g., 01, 02, 03, ..., 98, 99)."
    DecimalLeadingZero,
    /// "Lowercase roman numerals (i, ii, iii, iv, v, etc.)."
    LowerRoman,
    /// "Uppercase roman numerals (I, II, III, IV, V, etc.)."
    UpperRoman,
    /// "Lowercase ascii letters (a, b, c, ... z)."
    #[strum(to_string = "lower-alpha", serialize = "lower-latin")]
    LowerAlpha,
    /// "Uppercase ascii letters (A, B, C, ... Z)."
    #[strum(to_string = "upper-alpha", serialize = "upper-latin")]
    UpperAlpha,
    /// "Lowercase classical Greek alpha, beta, gamma, ..."
    LowerGreek,
    /// No marker.
    None,
}

impl ListStyleType {
    /// Render a counter value in this style.
    ///
    /// Alphabetic and roman systems fall back to decimal outside their range.
    #[must_use]
    pub fn format(self, value: i32) -> String {
        match self {
            Self::Disc => "\u{2022}".to_string(),
            Self::Circle => "\u{25e6}".to_string(),
            Self::Square => "\u{25a0}".to_string(),
            Self::None => String::new(),
            Self::Decimal => value.to_string(),
            Self::DecimalLeadingZero => {
                if (0..10).contains(&value) {
                    format!("0{value}")
                } else {
                    value.to_string()
                }
            }
            Self::LowerRoman => to_roman(value).to_lowercase(),
            Self::UpperRoman => to_roman(value),
            Self::LowerAlpha => to_alpha(value, false),
            Self::UpperAlpha => to_alpha(value, true),
            Self::LowerGreek => to_greek(value),
        }
    }
}

fn to_roman(mut n: i32) -> String {
    if !(1..4000).contains(&n) {
        return n.to_string();
    }

    const NUMERALS: [(i32, &str); 13] = [
        (1000, "M"),
        (900, "CM"),
        (500, "D"),
        (400, "CD"),
        (100, "C"),
        (90, "XC"),
        (50, "L"),
        (40, "XL"),
        (10, "X"),
        (9, "IX"),
        (5, "V"),
        (4, "IV"),
        (1, "I"),
    ];

    let mut result = String::new();
    for (value, numeral) in NUMERALS {
        while n >= value {
            result.push_str(numeral);
            n -= value;
        }
    }
    result
}

fn to_alpha(n: i32, uppercase: bool) -> String {
    if n <= 0 {
        return n.to_string();
    }

    let base = if uppercase { b'A' } else { b'a' };
    let mut letters = Vec::new();
    let mut n = n;
    while n > 0 {
        n -= 1;
        letters.push(char::from(base + u8::try_from(n % 26).unwrap_or(0)));
        n /= 26;
    }
    letters.iter().rev().collect()
}

fn to_greek(n: i32) -> String {
    const GREEK: [char; 24] = [
        'α', 'β', 'γ', 'δ', 'ε', 'ζ', 'η', 'θ', 'ι', 'κ', 'λ', 'μ', 'ν', 'ξ', 'ο', 'π', 'ρ', 'σ',
        'τ', 'υ', 'φ', 'χ', 'ψ', 'ω',
    ];

    usize::try_from(n)
        .ok()
        .and_then(|i| i.checked_sub(1))
        .and_then(|i| GREEK.get(i))
        .map_or_else(|| n.to_string(), char::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_counter_list_defaults() {
        let list = parse_counter_list("counter-increment", "chapter section 2", 1).unwrap();
        assert_eq!(
            list,
            vec![CounterData::new("chapter", 1), CounterData::new("section", 2)]
        );
        assert!(parse_counter_list("counter-reset", "none", 0).unwrap().is_empty());
        assert!(parse_counter_list("counter-reset", "3 x", 0).is_err());
    }

    #[test]
    fn test_format_styles() {
        assert_eq!(ListStyleType::Decimal.format(7), "7");
        assert_eq!(ListStyleType::DecimalLeadingZero.format(7), "07");
        assert_eq!(ListStyleType::LowerRoman.format(14), "xiv");
        assert_eq!(ListStyleType::UpperRoman.format(1999), "MCMXCIX");
        assert_eq!(ListStyleType::LowerAlpha.format(27), "aa");
        assert_eq!(ListStyleType::UpperAlpha.format(3), "C");
        assert_eq!(ListStyleType::LowerGreek.format(2), "β");
        assert_eq!(ListStyleType::LowerGreek.format(30), "30");
        assert_eq!(ListStyleType::None.format(5), "");
    }

    #[test]
    fn test_list_style_aliases() {
        assert_eq!(
            "lower-latin".parse::<ListStyleType>().unwrap(),
            ListStyleType::LowerAlpha
        );
        assert_eq!(
            "UPPER-ROMAN".parse::<ListStyleType>().unwrap(),
            ListStyleType::UpperRoman
        );
    }
}
