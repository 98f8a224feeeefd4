//! Property values and the value grammar.
//!
//! A raw value is one of three shapes:
//!
//! - a simple string: `name = Foo`
//! - a list, produced by top-level commas: `changed_enumerators = A, B`
//! - a tuple, written with braces: `has_data_member_inserted_between = {8, end}`
//!
//! Inside a tuple, runs of comma-separated words are gathered into a single
//! list item, and nested braces become nested tuples. So `{8, end}` is a
//! tuple holding the list `[8, end]`, while `{{8, 24}, {32, end}}` is a tuple
//! of two tuples.

use std::fmt;

use crate::error::ConfigError;

/// The value of one property.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PropertyValue {
    /// A single string.
    String(String),
    /// Two or more comma-separated strings.
    List(Vec<String>),
    /// A brace-delimited group of lists and nested tuples.
    Tuple(Vec<PropertyValue>),
}

impl PropertyValue {
    /// Returns the string when the value is a simple string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the items when the value is a list.
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the members when the value is a tuple.
    pub fn as_tuple(&self) -> Option<&[PropertyValue]> {
        match self {
            Self::Tuple(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the value as words: a string yields one word, a list its items.
    ///
    /// Tuples have no word form.
    pub fn to_words(&self) -> Option<Vec<String>> {
        match self {
            Self::String(s) => Some(vec![s.clone()]),
            Self::List(items) => Some(items.clone()),
            Self::Tuple(_) => None,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            Self::List(items) => f.write_str(&items.join(", ")),
            Self::Tuple(items) => {
                f.write_str("{")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("}")
            }
        }
    }
}

/// Parses the text to the right of `=`.
pub(crate) fn parse_value(raw: &str, line: usize) -> Result<PropertyValue, ConfigError> {
    let raw = raw.trim();
    if raw.starts_with('{') {
        let mut cursor = Cursor::new(raw, line);
        let tuple = cursor.tuple()?;
        cursor.skip_whitespace();
        if !cursor.at_end() {
            return Err(ConfigError::syntax_error(
                line,
                "unexpected content after closing '}'",
            ));
        }
        return Ok(tuple);
    }

    let mut items = split_top_level(raw, line)?;
    Ok(match items.len() {
        0 => PropertyValue::String(String::new()),
        1 => PropertyValue::String(items.remove(0)),
        _ => PropertyValue::List(items),
    })
}

/// Splits on commas that are not nested in brackets or quotes.
///
/// Brackets only shield commas from splitting. A plain value is often a
/// regular expression, so stray or unclosed brackets are kept as text and
/// left for the pattern compiler to judge.
fn split_top_level(raw: &str, line: usize) -> Result<Vec<String>, ConfigError> {
    let mut items = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut chars = raw.chars();
    let mut quoted_item = false;

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                current.push(c);
                if let Some(escaped) = chars.next() {
                    current.push(escaped);
                }
            }
            '"' if depth == 0 && current.trim().is_empty() => {
                current = read_quoted(&mut chars, line)?;
                quoted_item = true;
            }
            _ if quoted_item => {
                if c == ',' {
                    push_item(&mut items, &mut current, &mut quoted_item);
                } else if !c.is_whitespace() {
                    return Err(ConfigError::syntax_error(
                        line,
                        "unexpected content after closing quote",
                    ));
                }
            }
            '(' | '[' | '{' => {
                depth += 1;
                current.push(c);
            }
            ')' | ']' | '}' => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            ',' if depth == 0 => {
                push_item(&mut items, &mut current, &mut quoted_item);
            }
            _ => current.push(c),
        }
    }

    push_item(&mut items, &mut current, &mut quoted_item);
    Ok(items)
}

fn push_item(items: &mut Vec<String>, current: &mut String, quoted: &mut bool) {
    let item = std::mem::take(current);
    if *quoted {
        items.push(item);
        *quoted = false;
        return;
    }
    let trimmed = item.trim();
    if !trimmed.is_empty() {
        items.push(trimmed.to_owned());
    }
}

/// Reads the body of a double-quoted string, the opening quote already consumed.
fn read_quoted(chars: &mut std::str::Chars<'_>, line: usize) -> Result<String, ConfigError> {
    let mut out = String::new();
    loop {
        match chars.next() {
            Some('"') => return Ok(out),
            Some('\\') => match chars.next() {
                Some(c @ ('"' | '\\')) => out.push(c),
                Some(c) => {
                    out.push('\\');
                    out.push(c);
                }
                None => break,
            },
            Some(c) => out.push(c),
            None => break,
        }
    }
    Err(ConfigError::syntax_error(line, "unterminated quoted string"))
}

struct Cursor<'a> {
    text: &'a str,
    pos: usize,
    line: usize,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str, line: usize) -> Self {
        Self { text, pos: 0, line }
    }

    fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn at_end(&self) -> bool {
        self.pos >= self.text.len()
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn tuple(&mut self) -> Result<PropertyValue, ConfigError> {
        if self.bump() != Some('{') {
            return Err(ConfigError::syntax_error(self.line, "expected '{'"));
        }

        let mut members = Vec::new();
        let mut words = Vec::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                None => {
                    return Err(ConfigError::syntax_error(self.line, "missing '}' in value"));
                }
                Some('}') => {
                    self.bump();
                    flush_words(&mut members, &mut words);
                    return Ok(PropertyValue::Tuple(members));
                }
                Some('{') => {
                    flush_words(&mut members, &mut words);
                    members.push(self.tuple()?);
                }
                Some(',') => {
                    self.bump();
                }
                Some('"') => {
                    self.bump();
                    let mut chars = self.text[self.pos..].chars();
                    let word = read_quoted(&mut chars, self.line)?;
                    self.pos = self.text.len() - chars.as_str().len();
                    words.push(word);
                }
                Some(_) => words.push(self.word()?),
            }
        }
    }

    /// Reads one bare word, keeping parenthesised arguments intact.
    fn word(&mut self) -> Result<String, ConfigError> {
        let start = self.pos;
        let mut parens = 0usize;
        while let Some(c) = self.peek() {
            match c {
                '(' => parens += 1,
                ')' => {
                    if parens == 0 {
                        return Err(ConfigError::syntax_error(
                            self.line,
                            "unbalanced ')' in value",
                        ));
                    }
                    parens -= 1;
                }
                ',' | '{' | '}' if parens == 0 => break,
                _ => {}
            }
            self.bump();
        }
        if parens > 0 {
            return Err(ConfigError::syntax_error(self.line, "missing ')' in value"));
        }
        Ok(self.text[start..self.pos].trim().to_owned())
    }
}

fn flush_words(members: &mut Vec<PropertyValue>, words: &mut Vec<String>) {
    if !words.is_empty() {
        members.push(PropertyValue::List(std::mem::take(words)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(items: &[&str]) -> PropertyValue {
        PropertyValue::List(items.iter().map(|s| (*s).to_owned()).collect())
    }

    #[test]
    fn simple_value() {
        assert_eq!(
            parse_value("  Foo  ", 1).unwrap(),
            PropertyValue::String("Foo".into())
        );
    }

    #[test]
    fn empty_value_is_empty_string() {
        assert_eq!(parse_value("", 1).unwrap(), PropertyValue::String(String::new()));
    }

    #[test]
    fn commas_make_a_list() {
        assert_eq!(parse_value("A, B ,C", 1).unwrap(), list(&["A", "B", "C"]));
    }

    #[test]
    fn commas_inside_parentheses_do_not_split() {
        assert_eq!(
            parse_value("^foo(a,b)$", 1).unwrap(),
            PropertyValue::String("^foo(a,b)$".into())
        );
    }

    #[test]
    fn quoted_item_keeps_commas() {
        assert_eq!(
            parse_value(r#""a, b", c"#, 1).unwrap(),
            list(&["a, b", "c"])
        );
    }

    #[test]
    fn quoted_item_unescapes() {
        assert_eq!(
            parse_value(r#""say \"hi\" \\o/""#, 1).unwrap(),
            PropertyValue::String(r#"say "hi" \o/"#.into())
        );
    }

    #[test]
    fn flat_tuple_holds_one_list() {
        assert_eq!(
            parse_value("{0, end}", 1).unwrap(),
            PropertyValue::Tuple(vec![list(&["0", "end"])])
        );
    }

    #[test]
    fn tuple_keeps_function_calls_whole() {
        assert_eq!(
            parse_value("{offset_of(a), offset_after(b)}", 1).unwrap(),
            PropertyValue::Tuple(vec![list(&["offset_of(a)", "offset_after(b)"])])
        );
    }

    #[test]
    fn nested_tuples() {
        assert_eq!(
            parse_value("{{8, 24}, {32, end}}", 1).unwrap(),
            PropertyValue::Tuple(vec![
                PropertyValue::Tuple(vec![list(&["8", "24"])]),
                PropertyValue::Tuple(vec![list(&["32", "end"])]),
            ])
        );
    }

    #[test]
    fn unbalanced_tuple_is_rejected() {
        let err = parse_value("{8, 24", 7).unwrap_err();
        assert_eq!(err.line(), Some(7));
    }

    #[test]
    fn trailing_content_after_tuple_is_rejected() {
        assert!(parse_value("{8, 24} x", 1).is_err());
    }

    #[test]
    fn escaped_brackets_are_not_counted() {
        assert_eq!(
            parse_value(r"^foo\($", 1).unwrap(),
            PropertyValue::String(r"^foo\($".into())
        );
    }

    #[test]
    fn unbalanced_brackets_are_kept_as_text() {
        for text in ["foo)", "[a-z", "^a(", "^[)]x$", "a{2"] {
            assert_eq!(
                parse_value(text, 1).unwrap(),
                PropertyValue::String(text.into()),
                "{text}"
            );
        }
    }

    #[test]
    fn unclosed_group_keeps_later_commas() {
        assert_eq!(
            parse_value("a(b, c", 1).unwrap(),
            PropertyValue::String("a(b, c".into())
        );
    }

    #[test]
    fn stray_closer_does_not_shield_commas() {
        assert_eq!(parse_value("a), b", 1).unwrap(), list(&["a)", "b"]));
    }

    #[test]
    fn repetition_braces_do_not_split() {
        assert_eq!(
            parse_value("^x{2,3}$", 1).unwrap(),
            PropertyValue::String("^x{2,3}$".into())
        );
    }

    #[test]
    fn display_round_trips_shape() {
        let value = parse_value("{{8, 24}, {32, end}}", 1).unwrap();
        assert_eq!(value.to_string(), "{{8, 24}, {32, end}}");
    }
}
