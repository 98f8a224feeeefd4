use std::fmt;

/// A one-line function call such as `offset_of(member)`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FunctionCallExpr {
    name: String,
    arguments: Vec<String>,
}

impl FunctionCallExpr {
    /// Parses `name(arg, ...)`.
    ///
    /// Returns `None` when the text is not a call: no parenthesis, an empty or
    /// non-identifier name, or content after the closing parenthesis.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let (name, rest) = text.split_once('(')?;
        let name = name.trim();
        if !is_identifier(name) {
            return None;
        }

        let inner = rest.strip_suffix(')')?;
        if inner.contains(['(', ')']) {
            return None;
        }

        let arguments = if inner.trim().is_empty() {
            Vec::new()
        } else {
            inner.split(',').map(|a| a.trim().to_owned()).collect()
        };
        if arguments.iter().any(String::is_empty) {
            return None;
        }

        Some(Self {
            name: name.to_owned(),
            arguments,
        })
    }

    /// Returns the function name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the arguments, trimmed.
    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }
}

impl fmt::Display for FunctionCallExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.arguments.join(", "))
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_argument() {
        let expr = FunctionCallExpr::parse("offset_of(member)").unwrap();
        assert_eq!(expr.name(), "offset_of");
        assert_eq!(expr.arguments(), ["member"]);
    }

    #[test]
    fn trims_whitespace() {
        let expr = FunctionCallExpr::parse("  offset_after ( m_x )  ").unwrap();
        assert_eq!(expr.name(), "offset_after");
        assert_eq!(expr.arguments(), ["m_x"]);
    }

    #[test]
    fn parses_several_arguments() {
        let expr = FunctionCallExpr::parse("f(a, b)").unwrap();
        assert_eq!(expr.arguments(), ["a", "b"]);
        assert_eq!(expr.to_string(), "f(a, b)");
    }

    #[test]
    fn parses_no_arguments() {
        let expr = FunctionCallExpr::parse("f()").unwrap();
        assert!(expr.arguments().is_empty());
    }

    #[test]
    fn rejects_non_calls() {
        for text in ["end", "42", "(x)", "f(x", "f(x) y", "1f(x)", "f(a,,b)", "f((x))"] {
            assert!(FunctionCallExpr::parse(text).is_none(), "{text}");
        }
    }
}
