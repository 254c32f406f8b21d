//! Shortcode argument parsing.
//!
//! Parses the shell-like `solo "a b" key=value n=42` syntax used inside
//! `{{ ... }}` directives and after the separator in image/link text.

use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::{Captures, Regex};

use super::Value;

static QUOTES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?s)"([^"]*?)"|'([^']*?)'"#).unwrap());

/// Marks placeholder tokens. Never whitespace, never typed by authors.
const PLACEHOLDER_MARK: char = '\u{1}';

/// Parsed positional and keyword arguments.
///
/// # Example
///
/// ```
/// use sc_renderer::{ParsedArgs, Value};
///
/// let parsed = ParsedArgs::parse(r#"solo "a b" k="x=y" n=42 f=1.5"#);
/// assert_eq!(parsed.args, vec![Value::from("solo"), Value::from("a b")]);
/// assert_eq!(parsed.get("k"), Some(&Value::from("x=y")));
/// assert_eq!(parsed.get("n"), Some(&Value::Int(42)));
/// assert_eq!(parsed.get("f"), Some(&Value::Float(1.5)));
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParsedArgs {
    /// Positional arguments in source order.
    pub args: Vec<Value>,
    /// Keyword arguments, in first-seen order.
    pub kwargs: IndexMap<String, Value>,
}

impl ParsedArgs {
    /// Parse a raw argument string.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let mut quoted: Vec<String> = Vec::new();

        // Quoted strings become whitespace-free placeholders so that the
        // whitespace split below cannot break them apart.
        let masked = QUOTES.replace_all(raw, |caps: &Captures<'_>| {
            let content = caps
                .get(1)
                .or_else(|| caps.get(2))
                .map_or("", |m| m.as_str());
            let key = placeholder(quoted.len());
            quoted.push(content.to_owned());
            key
        });

        let mut parsed = Self::default();
        for token in masked.split_whitespace() {
            if let Some((key, value)) = token.split_once('=') {
                let key = resolve(key, &quoted).to_string();
                parsed.kwargs.insert(key, resolve(value, &quoted));
            } else {
                parsed.args.push(resolve(token, &quoted));
            }
        }
        parsed
    }

    /// Get a keyword argument by name.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.kwargs.get(key)
    }

    /// Whether there are no arguments at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.args.is_empty() && self.kwargs.is_empty()
    }
}

fn placeholder(index: usize) -> String {
    format!("{PLACEHOLDER_MARK}{index}{PLACEHOLDER_MARK}")
}

/// Turn a masked token back into a value.
fn resolve(token: &str, quoted: &[String]) -> Value {
    if !token.contains(PLACEHOLDER_MARK) {
        return Value::coerce(token);
    }
    if let Some(content) = exact_placeholder(token, quoted) {
        return Value::Str(content.to_owned());
    }
    // Quotes glued to other text, e.g. `a"b c"d`: restore the text, keep a string.
    let mut restored = token.to_owned();
    for (index, content) in quoted.iter().enumerate() {
        restored = restored.replace(&placeholder(index), content);
    }
    Value::Str(restored)
}

fn exact_placeholder<'q>(token: &str, quoted: &'q [String]) -> Option<&'q str> {
    let index: usize = token
        .strip_prefix(PLACEHOLDER_MARK)?
        .strip_suffix(PLACEHOLDER_MARK)?
        .parse()
        .ok()?;
    quoted.get(index).map(String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn strs(values: &[&str]) -> Vec<Value> {
        values.iter().map(|v| Value::from(*v)).collect()
    }

    #[test]
    fn test_empty() {
        let parsed = ParsedArgs::parse("");
        assert!(parsed.args.is_empty());
        assert!(parsed.kwargs.is_empty());
        assert!(parsed.is_empty());
    }

    #[test]
    fn test_whitespace_only() {
        assert!(ParsedArgs::parse("  \n\t ").is_empty());
    }

    #[test]
    fn test_mixed_arguments() {
        let parsed = ParsedArgs::parse(r#"solo "a b" k="x=y" n=42 f=1.5"#);
        assert_eq!(parsed.args, strs(&["solo", "a b"]));
        assert_eq!(parsed.kwargs.len(), 3);
        assert_eq!(parsed.get("k"), Some(&Value::from("x=y")));
        assert_eq!(parsed.get("n"), Some(&Value::Int(42)));
        assert_eq!(parsed.get("f"), Some(&Value::Float(1.5)));
    }

    #[test]
    fn test_positional_order() {
        let parsed = ParsedArgs::parse("c b a 3");
        assert_eq!(
            parsed.args,
            vec![
                Value::from("c"),
                Value::from("b"),
                Value::from("a"),
                Value::Int(3)
            ]
        );
    }

    #[test]
    fn test_single_quotes() {
        let parsed = ParsedArgs::parse("title='Hello World' x");
        assert_eq!(parsed.get("title"), Some(&Value::from("Hello World")));
        assert_eq!(parsed.args, strs(&["x"]));
    }

    #[test]
    fn test_quoted_numbers_stay_strings() {
        let parsed = ParsedArgs::parse(r#""42" n="7" f='1.5'"#);
        assert_eq!(parsed.args, strs(&["42"]));
        assert_eq!(parsed.get("n"), Some(&Value::from("7")));
        assert_eq!(parsed.get("f"), Some(&Value::from("1.5")));
    }

    #[test]
    fn test_quotes_span_newlines() {
        let parsed = ParsedArgs::parse("quote text=\"line one\nline two\"");
        assert_eq!(parsed.get("text"), Some(&Value::from("line one\nline two")));
    }

    #[test]
    fn test_whitespace_only_quoted_preserved() {
        let parsed = ParsedArgs::parse(r#"sep="   ""#);
        assert_eq!(parsed.get("sep"), Some(&Value::from("   ")));
    }

    #[test]
    fn test_empty_quoted_preserved() {
        let parsed = ParsedArgs::parse(r#"alt="" ''"#);
        assert_eq!(parsed.get("alt"), Some(&Value::from("")));
        assert_eq!(parsed.args, strs(&[""]));
    }

    #[test]
    fn test_empty_value() {
        let parsed = ParsedArgs::parse("key=");
        assert_eq!(parsed.get("key"), Some(&Value::from("")));
    }

    #[test]
    fn test_value_keeps_later_equals() {
        let parsed = ParsedArgs::parse("q=a=b");
        assert_eq!(parsed.get("q"), Some(&Value::from("a=b")));
    }

    #[test]
    fn test_numeric_key_is_string() {
        let parsed = ParsedArgs::parse("1=one");
        assert_eq!(parsed.get("1"), Some(&Value::from("one")));
    }

    #[test]
    fn test_duplicate_key_last_wins() {
        let parsed = ParsedArgs::parse("a=1 b=2 a=3");
        assert_eq!(parsed.get("a"), Some(&Value::Int(3)));
        let keys: Vec<_> = parsed.kwargs.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn test_glued_quotes_restored() {
        let parsed = ParsedArgs::parse(r#"pre"fix text"post"#);
        assert_eq!(parsed.args, strs(&["prefix textpost"]));
    }

    #[test]
    fn test_coercion_of_unquoted() {
        let parsed = ParsedArgs::parse("w=50px h=20 r=.75 name=007");
        assert_eq!(parsed.get("w"), Some(&Value::from("50px")));
        assert_eq!(parsed.get("h"), Some(&Value::Int(20)));
        assert_eq!(parsed.get("r"), Some(&Value::Float(0.75)));
        assert_eq!(parsed.get("name"), Some(&Value::Int(7)));
    }

    #[test]
    fn test_multiple_quoted_strings() {
        let parsed = ParsedArgs::parse(r#"cite "first one" by='second one'"#);
        assert_eq!(parsed.args, strs(&["cite", "first one"]));
        assert_eq!(parsed.get("by"), Some(&Value::from("second one")));
    }
}
