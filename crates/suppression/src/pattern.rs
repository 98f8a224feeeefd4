//! Compiled patterns and the small text helpers built on them.
//!
//! Patterns use search semantics: a pattern matches when it matches any
//! substring of the subject. Anchor with `^` and `$` for whole-string matches.

use std::fmt;

use regex::Regex;

/// A compiled regular expression taken from a suppression property.
#[derive(Clone, Debug)]
pub struct Pattern {
    regex: Regex,
}

impl Pattern {
    /// Compiles `text`, returning `None` when it is not a valid pattern.
    #[must_use]
    pub fn compile(text: &str) -> Option<Self> {
        Regex::new(text).ok().map(|regex| Self { regex })
    }

    /// Returns the source text.
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Returns `true` if the pattern matches anywhere in `text`.
    #[inline]
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for Pattern {}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const METACHARACTERS: &str = "^.[]$()|*+?{}\\";

/// Escapes every pattern metacharacter in `text`.
#[must_use]
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if METACHARACTERS.contains(c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Pattern that matches no symbol name.
pub(crate) const NEVER_MATCHES: &str = "^_^";

/// Builds `^(a|b|c)$` from literal strings, escaping each one.
///
/// An empty input yields `^_^`, which matches no name.
///
/// ```
/// use suppression::generate_from_strings;
///
/// assert_eq!(generate_from_strings(["foo", "a.b"]), r"^(foo|a\.b)$");
/// assert_eq!(generate_from_strings(Vec::<&str>::new()), "^_^");
/// ```
#[must_use]
pub fn generate_from_strings<I, S>(strings: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let alternatives: Vec<String> = strings.into_iter().map(|s| escape(s.as_ref())).collect();
    if alternatives.is_empty() {
        return NEVER_MATCHES.to_owned();
    }
    format!("^({})$", alternatives.join("|"))
}

/// Parses `yes`, `true`, `no` or `false`.
#[must_use]
pub fn parse_boolean(text: &str) -> Option<bool> {
    match text {
        "yes" | "true" => Some(true),
        "no" | "false" => Some(false),
        _ => None,
    }
}

/// `true` when `pattern` is absent or matches `text`.
#[inline]
pub(crate) fn matches_or_absent(pattern: Option<&Pattern>, text: &str) -> bool {
    pattern.is_none_or(|p| p.is_match(text))
}

/// `true` when `pattern` is absent or does not match `text`.
#[inline]
pub(crate) fn misses_or_absent(pattern: Option<&Pattern>, text: &str) -> bool {
    pattern.is_none_or(|p| !p.is_match(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_semantics() {
        let p = Pattern::compile("priv").unwrap();
        assert!(p.is_match("my_private_thing"));
        assert!(!Pattern::compile("^priv").unwrap().is_match("my_private_thing"));
    }

    #[test]
    fn invalid_pattern_is_none() {
        assert!(Pattern::compile("(unclosed").is_none());
        assert!(Pattern::compile("[a-").is_none());
    }

    #[test]
    fn patterns_compare_by_source() {
        assert_eq!(Pattern::compile("^a$"), Pattern::compile("^a$"));
        assert_ne!(Pattern::compile("^a$"), Pattern::compile("^b$"));
    }

    #[test]
    fn booleans() {
        assert_eq!(parse_boolean("yes"), Some(true));
        assert_eq!(parse_boolean("true"), Some(true));
        assert_eq!(parse_boolean("no"), Some(false));
        assert_eq!(parse_boolean("false"), Some(false));
        assert_eq!(parse_boolean("1"), None);
        assert_eq!(parse_boolean("YES"), None);
    }

    #[test]
    fn generated_pattern_matches_exactly_its_strings() {
        let text = generate_from_strings(["test_symbol", "x+y"]);
        assert_eq!(text, r"^(test_symbol|x\+y)$");
        let p = Pattern::compile(&text).unwrap();
        assert!(p.is_match("x+y"));
        assert!(!p.is_match("xxy"));
        assert!(!p.is_match("test_symbol2"));
    }

    #[test]
    fn escapes_only_metacharacters() {
        assert_eq!(escape("a.b*c"), r"a\.b\*c");
        assert_eq!(escape("plain-name_1"), "plain-name_1");
        assert_eq!(escape(r"\{x}"), r"\\\{x\}");
        let never = Pattern::compile(NEVER_MATCHES).unwrap();
        assert!(!never.is_match("_"));
        assert!(!never.is_match(""));
    }

    #[test]
    fn optional_helpers() {
        let p = Pattern::compile("^a").unwrap();
        assert!(matches_or_absent(None, "b"));
        assert!(matches_or_absent(Some(&p), "ab"));
        assert!(!matches_or_absent(Some(&p), "ba"));
        assert!(misses_or_absent(None, "a"));
        assert!(!misses_or_absent(Some(&p), "ab"));
    }
}
