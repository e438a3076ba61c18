//! Search index records and their categories.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Structural role of a fragment within its page.
///
/// The generator only documents `section`, `page` and `type`, but the set is open:
/// unknown values round-trip verbatim through [`Category::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Category {
    Section,
    Page,
    Type,
    Other(String),
}

impl Category {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Section => "section",
            Self::Page => "page",
            Self::Type => "type",
            Self::Other(other) => other,
        }
    }
}

impl From<&str> for Category {
    fn from(value: &str) -> Self {
        match value {
            "section" => Self::Section,
            "page" => Self::Page,
            "type" => Self::Type,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for Category {
    fn from(value: String) -> Self {
        match value.as_str() {
            "section" | "page" | "type" => Self::from(value.as_str()),
            _ => Self::Other(value),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Category {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(Self::from)
    }
}

/// One indexed fragment of documentation: a heading, a page marker, or a symbol docstring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Page-relative URL, optionally with a `#anchor`
    pub location: String,
    /// Human-readable page name
    pub page: String,
    /// Section or symbol title
    #[serde(default)]
    pub title: String,
    /// Body text; empty for structural separators
    #[serde(default)]
    pub text: String,
    pub category: Category,
}

impl Record {
    /// The document path of `location`, without its anchor.
    ///
    /// `manual/deqs/#Standard-Models` → `manual/deqs/`
    pub fn path(&self) -> &str {
        self.location
            .split_once('#')
            .map_or(self.location.as_str(), |(path, _)| path)
    }

    /// The anchor of `location`, if it has one.
    pub fn anchor(&self) -> Option<&str> {
        self.location.split_once('#').map(|(_, anchor)| anchor)
    }

    /// Whether this record carries no body text (headings and page markers).
    pub fn is_separator(&self) -> bool {
        self.text.is_empty()
    }

    /// First non-blank line of the body text, trimmed.
    pub fn summary(&self) -> Option<&str> {
        self.text
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::{check, let_assert};
    use rstest::rstest;

    fn record(location: &str, text: &str) -> Record {
        Record {
            location: location.to_string(),
            page: "Home".to_string(),
            title: "Title".to_string(),
            text: text.to_string(),
            category: Category::Section,
        }
    }

    #[rstest]
    #[case("section", Category::Section)]
    #[case("page", Category::Page)]
    #[case("type", Category::Type)]
    #[case("function", Category::Other("function".to_string()))]
    #[case("Section", Category::Other("Section".to_string()))]
    fn test_category_from_str(#[case] input: &str, #[case] expected: Category) {
        check!(Category::from(input) == expected);
        check!(Category::from(input.to_string()) == expected);
        check!(expected.as_str() == input);
    }

    #[test]
    fn test_unknown_category_round_trips() {
        let json = r#"{"location":"a","page":"P","category":"macro"}"#;
        let parsed: Record = serde_json::from_str(json).unwrap();
        check!(parsed.category == Category::Other("macro".to_string()));
        check!(parsed.title.is_empty());
        check!(parsed.text.is_empty());

        let value = serde_json::to_value(&parsed).unwrap();
        check!(value["category"] == "macro");
    }

    #[test]
    fn test_category_rejects_non_string() {
        let json = r#"{"location":"a","page":"P","category":3}"#;
        let_assert!(Err(_) = serde_json::from_str::<Record>(json));
    }

    #[rstest]
    #[case("manual/deqs/#Standard-Models", "manual/deqs/", Some("Standard-Models"))]
    #[case("manual/deqs/", "manual/deqs/", None)]
    #[case("#Top", "", Some("Top"))]
    #[case("", "", None)]
    fn test_location_split(
        #[case] location: &str,
        #[case] expected_path: &str,
        #[case] expected_anchor: Option<&str>,
    ) {
        let record = record(location, "");
        check!(record.path() == expected_path);
        check!(record.anchor() == expected_anchor);
    }

    #[rstest]
    #[case("", None, true)]
    #[case("\n\n  first line \nsecond", Some("first line"), false)]
    #[case("   \n\t", None, false)]
    fn test_summary(
        #[case] text: &str,
        #[case] expected: Option<&str>,
        #[case] is_separator: bool,
    ) {
        let record = record("a", text);
        check!(record.summary() == expected);
        check!(record.is_separator() == is_separator);
    }
}
