//! Tag section parsing (`@key=value;key2=a,b`).
//!
//! Values are kept exactly as they appear on the wire. Escape sequences such
//! as `\s` or `\:` are **not** unescaped; callers doing substring checks on
//! badge names are unaffected, but free-form values may still carry escapes.

use std::collections::HashMap;

/// A single tag value: a scalar, or an ordered list when the raw value
/// contained commas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagValue {
    /// Value without commas.
    Single(String),
    /// Comma-separated value, split in order.
    List(Vec<String>),
}

impl TagValue {
    /// Parse a raw value, splitting on `,` when present.
    pub fn parse(raw: &str) -> Self {
        if raw.contains(',') {
            TagValue::List(raw.split(',').map(str::to_string).collect())
        } else {
            TagValue::Single(raw.to_string())
        }
    }

    /// Iterate over the value parts; a scalar yields exactly one item.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        let parts: &[String] = match self {
            TagValue::Single(value) => std::slice::from_ref(value),
            TagValue::List(values) => values,
        };
        parts.iter().map(String::as_str)
    }

    /// The scalar value, if this is not a list.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            TagValue::Single(value) => Some(value),
            TagValue::List(_) => None,
        }
    }
}

/// Tag map for one chat line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tags(HashMap<String, TagValue>);

impl Tags {
    /// Parse a tag section (without the leading `@`).
    ///
    /// Segments are split on `;`, then on the first `=`. A segment without
    /// `=` gets an empty scalar; empty segments are skipped. A repeated key
    /// keeps its last value.
    pub fn parse(section: &str) -> Self {
        section
            .split(';')
            .filter(|segment| !segment.is_empty())
            .map(|segment| match segment.split_once('=') {
                Some((key, value)) => (key.to_string(), TagValue::parse(value)),
                None => (segment.to_string(), TagValue::Single(String::new())),
            })
            .collect()
    }

    /// Look up a tag.
    pub fn get(&self, key: &str) -> Option<&TagValue> {
        self.0.get(key)
    }

    /// Iterate over all parts of a tag; empty when the tag is absent.
    pub fn values<'a>(&'a self, key: &str) -> impl Iterator<Item = &'a str> {
        self.0.get(key).into_iter().flat_map(TagValue::iter)
    }

    /// Whether the tag is present.
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Number of tags.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no tags.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, TagValue)> for Tags {
    fn from_iter<I: IntoIterator<Item = (String, TagValue)>>(iter: I) -> Self {
        Tags(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scalars_and_lists() {
        let tags = Tags::parse("badges=moderator/1,subscriber/12;color=#FF4500;mod=1");
        assert_eq!(
            tags.get("badges"),
            Some(&TagValue::List(vec![
                "moderator/1".to_string(),
                "subscriber/12".to_string()
            ]))
        );
        assert_eq!(tags.get("color").and_then(TagValue::as_str), Some("#FF4500"));
        assert_eq!(tags.len(), 3);
    }

    #[test]
    fn test_split_on_first_equals_only() {
        let tags = Tags::parse("reply-parent-msg-body=a=b");
        assert_eq!(
            tags.get("reply-parent-msg-body").and_then(TagValue::as_str),
            Some("a=b")
        );
    }

    #[test]
    fn test_missing_value_and_empty_segments() {
        let tags = Tags::parse(";flag;emotes=;");
        assert_eq!(tags.get("flag"), Some(&TagValue::Single(String::new())));
        assert_eq!(tags.get("emotes"), Some(&TagValue::Single(String::new())));
        assert_eq!(tags.len(), 2);
        assert!(Tags::parse("").is_empty());
    }

    #[test]
    fn test_escapes_are_left_alone() {
        let tags = Tags::parse(r"system-msg=hello\sworld");
        assert_eq!(
            tags.get("system-msg").and_then(TagValue::as_str),
            Some(r"hello\sworld")
        );
    }

    #[test]
    fn test_values_iterates_scalar_and_list() {
        let tags = Tags::parse("badges=broadcaster/1;single=x");
        assert_eq!(tags.values("badges").collect::<Vec<_>>(), ["broadcaster/1"]);
        assert_eq!(tags.values("single").collect::<Vec<_>>(), ["x"]);
        assert_eq!(tags.values("absent").count(), 0);
        assert!(tags.contains("single"));
        assert!(!tags.contains("absent"));
    }

    #[test]
    fn test_trailing_comma_keeps_empty_part() {
        let value = TagValue::parse("a,");
        assert_eq!(value.iter().collect::<Vec<_>>(), ["a", ""]);
    }
}
