//! The `content` property and its value list.
//!
//! [§ 12.2 The 'content' property](https://www.w3.org/TR/CSS2/generate.html#content)
//!
//! Values are parsed from their CSS text with a small hand-written scanner;
//! full CSS tokenization is outside this crate.

use std::iter::Peekable;
use std::str::Chars;

use serde::Serialize;
use thiserror::Error;

/// Errors raised while scanning a `content` (or `quotes`) value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContentParseError {
    /// A string literal was not closed before the end of input.
    #[error("unterminated string in '{0}'")]
    UnterminatedString(String),
    /// A function's argument list was not closed.
    #[error("unbalanced parentheses in '{0}'")]
    UnbalancedParentheses(String),
    /// A character that cannot start any content value.
    #[error("unexpected character '{found}' in '{input}'")]
    UnexpectedCharacter {
        /// The offending character.
        found: char,
        /// Whole input being parsed.
        input: String,
    },
}

/// Computed value of `content`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContentProperty {
    /// "For :before and :after pseudo-elements, this value computes to 'none'."
    #[default]
    Normal,
    /// "The pseudo-element is not generated."
    None,
    /// Ordered list of content values.
    List(Vec<ContentValue>),
}

/// One component of a `content` value list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContentValue {
    /// "Text content."
    String(String),
    /// "The value is a URI that designates an external resource (such as an image)."
    Uri(String),
    /// A bare keyword such as `open-quote`.
    Ident(String),
    /// A functional notation such as `counter(x)` or `attr(title)`.
    Function(FunctionValue),
}

/// A functional notation inside `content`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionValue {
    /// Lowercased function name.
    pub name: String,
    /// Comma-separated arguments.
    pub args: Vec<ContentValue>,
}

impl FunctionValue {
    /// Argument at `index` if it is an identifier.
    #[must_use]
    pub fn ident_arg(&self, index: usize) -> Option<&str> {
        match self.args.get(index) {
            Some(ContentValue::Ident(ident)) => Some(ident),
            _ => None,
        }
    }

    /// Argument at `index` if it is a string literal.
    #[must_use]
    pub fn string_arg(&self, index: usize) -> Option<&str> {
        match self.args.get(index) {
            Some(ContentValue::String(s)) => Some(s),
            _ => None,
        }
    }
}

/// Parse the text of a `content` declaration.
///
/// # Errors
///
/// Returns a [`ContentParseError`] on unterminated strings, unbalanced
/// parentheses, or characters that cannot start a value.
pub fn parse_content(input: &str) -> Result<ContentProperty, ContentParseError> {
    let trimmed = input.trim();
    match trimmed.to_ascii_lowercase().as_str() {
        "normal" => return Ok(ContentProperty::Normal),
        "none" => return Ok(ContentProperty::None),
        _ => {}
    }

    let mut scanner = Scanner {
        chars: trimmed.chars().peekable(),
        input: trimmed,
    };
    let values = scanner.values(false)?;
    Ok(ContentProperty::List(values))
}

/// [§ 12.3.1 'quotes'](https://www.w3.org/TR/CSS2/generate.html#quotes-specify)
///
/// Parse the string pairs of a `quotes` declaration. Returns `None` for the
/// `none` keyword.
///
/// # Errors
///
/// Returns a [`ContentParseError`] if the value is not a list of strings.
pub fn parse_quotes(input: &str) -> Result<Option<Vec<String>>, ContentParseError> {
    let trimmed = input.trim();
    if trimmed.eq_ignore_ascii_case("none") {
        return Ok(None);
    }

    let mut scanner = Scanner {
        chars: trimmed.chars().peekable(),
        input: trimmed,
    };
    scanner
        .values(false)?
        .into_iter()
        .map(|value| match value {
            ContentValue::String(s) => Ok(s),
            _ => Err(ContentParseError::UnexpectedCharacter {
                found: trimmed.chars().next().unwrap_or(' '),
                input: trimmed.to_string(),
            }),
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}

struct Scanner<'a> {
    chars: Peekable<Chars<'a>>,
    input: &'a str,
}

impl Scanner<'_> {
    /// Scan values until end of input, or until the closing `)` when
    /// `in_function` is set. Commas only separate function arguments.
    fn values(&mut self, in_function: bool) -> Result<Vec<ContentValue>, ContentParseError> {
        let mut values = Vec::new();
        loop {
            self.skip_whitespace();
            match self.chars.peek().copied() {
                None if in_function => {
                    return Err(ContentParseError::UnbalancedParentheses(
                        self.input.to_string(),
                    ));
                }
                None => return Ok(values),
                Some(')') if in_function => {
                    let _ = self.chars.next();
                    return Ok(values);
                }
                Some(',') if in_function => {
                    let _ = self.chars.next();
                }
                Some(quote @ ('"' | '\'')) => {
                    let _ = self.chars.next();
                    values.push(ContentValue::String(self.string(quote)?));
                }
                Some(c) if is_name_char(c) => {
                    let name = self.name();
                    if self.chars.peek() == Some(&'(') {
                        let _ = self.chars.next();
                        values.push(self.function(&name)?);
                    } else {
                        values.push(ContentValue::Ident(name));
                    }
                }
                Some(found) => {
                    return Err(ContentParseError::UnexpectedCharacter {
                        found,
                        input: self.input.to_string(),
                    });
                }
            }
        }
    }

    fn function(&mut self, name: &str) -> Result<ContentValue, ContentParseError> {
        let name = name.to_ascii_lowercase();
        if name != "url" {
            let args = self.values(true)?;
            return Ok(ContentValue::Function(FunctionValue { name, args }));
        }

        // url() allows an unquoted body
        let mut raw = String::new();
        for c in self.chars.by_ref() {
            if c == ')' {
                let raw = raw.trim();
                let unquoted = raw
                    .strip_prefix('"')
                    .and_then(|r| r.strip_suffix('"'))
                    .or_else(|| raw.strip_prefix('\'').and_then(|r| r.strip_suffix('\'')))
                    .unwrap_or(raw);
                return Ok(ContentValue::Uri(unquoted.to_string()));
            }
            raw.push(c);
        }
        Err(ContentParseError::UnbalancedParentheses(
            self.input.to_string(),
        ))
    }

    /// [§ 4.3.5 Consume a string token](https://www.w3.org/TR/css-syntax-3/#consume-string-token)
    fn string(&mut self, quote: char) -> Result<String, ContentParseError> {
        let mut out = String::new();
        while let Some(c) = self.chars.next() {
            match c {
                _ if c == quote => return Ok(out),
                '\\' => match self.chars.peek().copied() {
                    None => break,
                    Some('\n') => {
                        let _ = self.chars.next();
                    }
                    Some(_) => out.push(self.escaped_code_point()),
                },
                _ => out.push(c),
            }
        }
        Err(ContentParseError::UnterminatedString(
            self.input.to_string(),
        ))
    }

    /// [§ 4.3.13 Consume an escaped code point](https://www.w3.org/TR/css-syntax-3/#consume-escaped-code-point)
    ///
    /// Called after the backslash.
    fn escaped_code_point(&mut self) -> char {
        let Some(first) = self.chars.next() else {
            return char::REPLACEMENT_CHARACTER;
        };
        if !first.is_ascii_hexdigit() {
            return first;
        }

        // "Consume as many hex digits as possible, but no more than 5."
        let mut hex = String::from(first);
        while hex.len() < 6 {
            match self.chars.next_if(char::is_ascii_hexdigit) {
                Some(digit) => hex.push(digit),
                None => break,
            }
        }
        // "If the next input code point is whitespace, consume it."
        let _ = self.chars.next_if(|&c| is_css_whitespace(c));

        // "If this number is zero, or is for a surrogate, or is greater than
        // the maximum allowed code point, return U+FFFD."
        u32::from_str_radix(&hex, 16)
            .ok()
            .filter(|&code_point| code_point != 0)
            .and_then(char::from_u32)
            .unwrap_or(char::REPLACEMENT_CHARACTER)
    }

    fn name(&mut self) -> String {
        let mut name = String::new();
        while let Some(&c) = self.chars.peek() {
            if !is_name_char(c) {
                break;
            }
            name.push(c);
            let _ = self.chars.next();
        }
        name
    }

    fn skip_whitespace(&mut self) {
        while self.chars.peek().is_some_and(|c| c.is_whitespace()) {
            let _ = self.chars.next();
        }
    }
}

/// [§ 4.2](https://www.w3.org/TR/css-syntax-3/#whitespace)
const fn is_css_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0C')
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_' || c == '.' || c == '#'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(s: &str) -> ContentValue {
        ContentValue::Ident(s.to_string())
    }

    #[test]
    fn test_hex_escapes_in_strings() {
        let parsed = parse_content(r#""\201C" "\AB x" "\A" "\2014\2014""#).unwrap();
        assert_eq!(
            parsed,
            ContentProperty::List(vec![
                ContentValue::String("\u{201C}".to_string()),
                ContentValue::String("\u{AB}x".to_string()),
                ContentValue::String("\n".to_string()),
                ContentValue::String("\u{2014}\u{2014}".to_string()),
            ])
        );
    }

    #[test]
    fn test_escape_limits() {
        // at most six hex digits; the seventh is literal
        let parsed = parse_content(r#""\0000411""#).unwrap();
        assert_eq!(
            parsed,
            ContentProperty::List(vec![ContentValue::String("A1".to_string())])
        );

        let parsed = parse_content(r#""\0 \D800 \110000 \q""#).unwrap();
        assert_eq!(
            parsed,
            ContentProperty::List(vec![ContentValue::String(
                "\u{FFFD}\u{FFFD}\u{FFFD}q".to_string()
            )])
        );
    }

    #[test]
    fn test_keywords() {
        assert_eq!(parse_content("normal").unwrap(), ContentProperty::Normal);
        assert_eq!(parse_content(" NONE ").unwrap(), ContentProperty::None);
    }

    #[test]
    fn test_mixed_list() {
        let parsed = parse_content(r#"counter(x) "." attr(data-y) open-quote"#).unwrap();
        assert_eq!(
            parsed,
            ContentProperty::List(vec![
                ContentValue::Function(FunctionValue {
                    name: "counter".to_string(),
                    args: vec![ident("x")],
                }),
                ContentValue::String(".".to_string()),
                ContentValue::Function(FunctionValue {
                    name: "attr".to_string(),
                    args: vec![ident("data-y")],
                }),
                ident("open-quote"),
            ])
        );
    }

    #[test]
    fn test_counters_with_separator_and_style() {
        let parsed = parse_content(r#"counters(item, ".", lower-roman)"#).unwrap();
        let ContentProperty::List(values) = parsed else {
            panic!("expected a list");
        };
        let ContentValue::Function(func) = &values[0] else {
            panic!("expected a function");
        };
        assert_eq!(func.ident_arg(0), Some("item"));
        assert_eq!(func.string_arg(1), Some("."));
        assert_eq!(func.ident_arg(2), Some("lower-roman"));
    }

    #[test]
    fn test_url_and_nested_function() {
        let parsed = parse_content("url(logo.png) target-counter(attr(href), page)").unwrap();
        let ContentProperty::List(values) = parsed else {
            panic!("expected a list");
        };
        assert_eq!(values[0], ContentValue::Uri("logo.png".to_string()));
        let ContentValue::Function(func) = &values[1] else {
            panic!("expected a function");
        };
        assert_eq!(func.name, "target-counter");
        assert!(matches!(func.args[0], ContentValue::Function(_)));
        assert_eq!(func.ident_arg(1), Some("page"));
    }

    #[test]
    fn test_string_escapes() {
        let parsed = parse_content(r#""a\"b" 'line\A'"#).unwrap();
        assert_eq!(
            parsed,
            ContentProperty::List(vec![
                ContentValue::String("a\"b".to_string()),
                ContentValue::String("line\n".to_string()),
            ])
        );
    }

    #[test]
    fn test_errors() {
        assert!(matches!(
            parse_content(r#""open"#),
            Err(ContentParseError::UnterminatedString(_))
        ));
        assert!(matches!(
            parse_content("counter(x"),
            Err(ContentParseError::UnbalancedParentheses(_))
        ));
        assert!(matches!(
            parse_content("\"a\" + \"b\""),
            Err(ContentParseError::UnexpectedCharacter { found: '+', .. })
        ));
    }

    #[test]
    fn test_quotes() {
        assert_eq!(parse_quotes("none").unwrap(), None);
        assert_eq!(
            parse_quotes(r#""«" "»""#).unwrap(),
            Some(vec!["«".to_string(), "»".to_string()])
        );
    }
}
