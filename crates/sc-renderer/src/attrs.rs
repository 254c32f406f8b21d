//! Attribute helpers for the image and link overrides.

use std::fmt::Write;
use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;

use crate::shortcode::Value;
use crate::state::escape_html;

/// Bootstrap sizing class: `w50`, `w-50`, `w-md-75`.
static BOOTSTRAP_WIDTH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^w(?:([0-9]+)|-(?:[a-z-]+)?([0-9]+))$").unwrap());

/// Join keyword arguments into an inline CSS declaration list.
///
/// Keys have `_` replaced by `-` and are lowercased; pairs are joined with `;`.
///
/// # Example
///
/// ```
/// use indexmap::IndexMap;
/// use sc_renderer::{Value, tostyles};
///
/// let mut kwargs = IndexMap::new();
/// kwargs.insert("Border_Radius".to_owned(), Value::from("4px"));
/// kwargs.insert("opacity".to_owned(), Value::Float(0.5));
///
/// assert_eq!(tostyles(&kwargs), "border-radius:4px;opacity:0.5");
/// ```
#[must_use]
pub fn tostyles(kwargs: &IndexMap<String, Value>) -> String {
    let mut styles = String::new();
    for (key, value) in kwargs {
        if !styles.is_empty() {
            styles.push(';');
        }
        write!(styles, "{}:{value}", key.replace('_', "-").to_lowercase()).unwrap();
    }
    styles
}

/// Width factor requested by image arguments.
///
/// A `width` keyword (integer, or digits with an optional `px` suffix) wins
/// and is taken as pixels. Otherwise the first sizing class gives a
/// percentage. Otherwise the factor is 1.
pub(crate) fn width_factor(classes: &[Value], kwargs: &IndexMap<String, Value>) -> f64 {
    if let Some(width) = kwargs.get("width").and_then(explicit_width) {
        return f64::from(width);
    }

    classes
        .iter()
        .filter_map(Value::as_str)
        .filter(|class| class.starts_with('w'))
        .find_map(|class| {
            let caps = BOOTSTRAP_WIDTH.captures(class)?;
            let percent = caps.get(1).or_else(|| caps.get(2))?.as_str();
            percent.parse::<u32>().ok()
        })
        .map_or(1.0, |percent| f64::from(percent) / 100.0)
}

fn explicit_width(value: &Value) -> Option<u32> {
    match value {
        Value::Int(n) => u32::try_from(*n).ok(),
        Value::Str(s) => {
            let digits = s.strip_suffix("px").unwrap_or(s);
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            digits.parse().ok()
        }
        Value::Float(_) => None,
    }
}

/// Thumbnail width in pixels for a width factor.
///
/// Factors above 1 are absolute pixels; anything else scales `base`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn thumbnail_width(factor: f64, base: u32) -> u32 {
    if factor > 1.0 {
        factor as u32
    } else {
        (f64::from(base) * factor).round() as u32
    }
}

/// Space-joined class list.
pub(crate) fn class_list(classes: &[Value]) -> String {
    let mut list = String::new();
    for class in classes {
        if !list.is_empty() {
            list.push(' ');
        }
        write!(list, "{class}").unwrap();
    }
    list
}

/// Accumulates ` name="value"` pairs, skipping empty values.
#[derive(Default)]
pub(crate) struct Attrs {
    out: String,
}

impl Attrs {
    /// Add an escaped attribute unless `value` is empty.
    pub(crate) fn push(&mut self, name: &str, value: &str) -> &mut Self {
        if !value.is_empty() {
            write!(self.out, r#" {name}="{}""#, escape_html(value)).unwrap();
        }
        self
    }

    /// Add a bare attribute such as `download`.
    pub(crate) fn flag(&mut self, name: &str) -> &mut Self {
        write!(self.out, " {name}").unwrap();
        self
    }

    pub(crate) fn as_str(&self) -> &str {
        &self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shortcode::ParsedArgs;
    use pretty_assertions::assert_eq;

    fn factor(tail: &str) -> f64 {
        let parsed = ParsedArgs::parse(tail);
        width_factor(&parsed.args, &parsed.kwargs)
    }

    #[test]
    fn test_tostyles_empty() {
        assert_eq!(tostyles(&IndexMap::new()), "");
    }

    #[test]
    fn test_tostyles_order_and_keys() {
        let parsed = ParsedArgs::parse("Font_Size=12px width=50px z=1");
        assert_eq!(tostyles(&parsed.kwargs), "font-size:12px;width:50px;z:1");
    }

    #[test]
    fn test_width_from_px_keyword() {
        assert!((factor("center large width=50px") - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_width_from_int_keyword() {
        assert!((factor("width=300") - 300.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_width_keyword_not_numeric_falls_through() {
        assert!((factor("w25 width=50%") - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn test_width_from_class() {
        assert!((factor("w50") - 0.5).abs() < f64::EPSILON);
        assert!((factor("w-75") - 0.75).abs() < f64::EPSILON);
        assert!((factor("shadow w-md-30") - 0.3).abs() < f64::EPSILON);
    }

    #[test]
    fn test_width_default() {
        assert!((factor("center wide") - 1.0).abs() < f64::EPSILON);
        assert!((factor("") - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_thumbnail_width() {
        assert_eq!(thumbnail_width(50.0, 800), 50);
        assert_eq!(thumbnail_width(0.5, 800), 400);
        assert_eq!(thumbnail_width(1.0, 800), 800);
        assert_eq!(thumbnail_width(0.333, 800), 266);
    }

    #[test]
    fn test_class_list() {
        let parsed = ParsedArgs::parse("center 3 large");
        assert_eq!(class_list(&parsed.args), "center 3 large");
    }

    #[test]
    fn test_attrs_skip_empty_and_escape() {
        let mut attrs = Attrs::default();
        attrs
            .push("style", "")
            .push("class", "a b")
            .flag("download")
            .push("title", r#"say "hi""#);
        assert_eq!(attrs.as_str(), r#" class="a b" download title="say &quot;hi&quot;""#);
    }
}
