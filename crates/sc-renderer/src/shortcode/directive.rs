//! A single parsed shortcode invocation.

use indexmap::IndexMap;

use crate::error::ShortcodeError;

use super::{ParsedArgs, Value};

/// Parsed `{{ command arg key=value }}` invocation.
///
/// Created per match while scanning and dropped once rendered.
#[derive(Clone, Debug, PartialEq)]
pub struct Directive {
    /// First positional token, in text form.
    pub command: String,
    /// Remaining positional arguments.
    pub args: Vec<Value>,
    /// Keyword arguments.
    pub kwargs: IndexMap<String, Value>,
}

impl Directive {
    /// Parse the body of a directive (the text between the delimiters).
    ///
    /// # Errors
    ///
    /// Returns [`ShortcodeError::MissingCommand`] if the body has no
    /// positional token.
    ///
    /// # Example
    ///
    /// ```
    /// use sc_renderer::{Directive, Value};
    ///
    /// let directive = Directive::parse(" tweet id=123 ").unwrap();
    /// assert_eq!(directive.command, "tweet");
    /// assert!(directive.args.is_empty());
    /// assert_eq!(directive.kwargs["id"], Value::Int(123));
    /// ```
    pub fn parse(body: &str) -> Result<Self, ShortcodeError> {
        let ParsedArgs { args, kwargs } = ParsedArgs::parse(body.trim());
        let mut args = args.into_iter();
        let command = args.next().ok_or_else(|| ShortcodeError::MissingCommand {
            raw: body.to_owned(),
        })?;

        Ok(Self {
            command: command.to_string(),
            args: args.collect(),
            kwargs,
        })
    }

    /// Template bindings for this directive.
    #[must_use]
    pub fn values(&self) -> ShortcodeValues<'_> {
        ShortcodeValues {
            args: &self.args,
            kwargs: &self.kwargs,
        }
    }
}

/// Values handed to a shortcode template.
///
/// Serializes as the keyword arguments flattened at the top level, plus
/// `args` (positional list) and `kwargs` (keyword map). `args` and `kwargs`
/// win over keyword arguments of the same name.
#[derive(Clone, Copy, Debug)]
pub struct ShortcodeValues<'a> {
    /// Positional arguments after the command.
    pub args: &'a [Value],
    /// Keyword arguments.
    pub kwargs: &'a IndexMap<String, Value>,
}

impl ShortcodeValues<'_> {
    /// Look up a top-level keyword value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.kwargs.get(key)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for ShortcodeValues<'_> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let flattened = self
            .kwargs
            .iter()
            .filter(|(key, _)| !matches!(key.as_str(), "args" | "kwargs"));

        let mut map = serializer.serialize_map(None)?;
        for (key, value) in flattened {
            map.serialize_entry(key, value)?;
        }
        map.serialize_entry("args", self.args)?;
        map.serialize_entry("kwargs", self.kwargs)?;
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_command_and_args() {
        let directive = Directive::parse("youtube abc123 start=30 \"My video\"").unwrap();
        assert_eq!(directive.command, "youtube");
        assert_eq!(
            directive.args,
            vec![Value::from("abc123"), Value::from("My video")]
        );
        assert_eq!(directive.kwargs["start"], Value::Int(30));
    }

    #[test]
    fn test_parse_numeric_command_uses_text_form() {
        let directive = Directive::parse("404").unwrap();
        assert_eq!(directive.command, "404");
    }

    #[test]
    fn test_parse_empty_is_error() {
        let err = Directive::parse("   ").unwrap_err();
        assert!(matches!(err, ShortcodeError::MissingCommand { .. }));
    }

    #[test]
    fn test_parse_only_kwargs_is_error() {
        let err = Directive::parse("id=1").unwrap_err();
        assert!(matches!(err, ShortcodeError::MissingCommand { .. }));
    }

    #[test]
    fn test_values_lookup() {
        let directive = Directive::parse("tweet id=123").unwrap();
        let values = directive.values();
        assert_eq!(values.get("id"), Some(&Value::Int(123)));
        assert!(values.args.is_empty());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_values_serialize_flattened() {
        let directive = Directive::parse("tweet id=123").unwrap();
        let json = serde_json::to_value(directive.values()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": 123, "args": [], "kwargs": {"id": 123}})
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_values_reserved_names_win() {
        let directive = Directive::parse("x a args=shadowed").unwrap();
        let json = serde_json::to_value(directive.values()).unwrap();
        assert_eq!(json["args"], serde_json::json!(["a"]));
        assert_eq!(json["kwargs"]["args"], serde_json::json!("shadowed"));
    }
}
