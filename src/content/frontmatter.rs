//! Front-matter parsing

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// Custom deserializer for the tags field.
///
/// A YAML sequence is taken verbatim; a string is treated as comma-separated
/// and split with empties dropped; null yields `None`, the same as an absent
/// field, so the default tag list can be substituted later.
fn tag_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, SeqAccess, Visitor};
    use std::fmt;

    struct TagList;

    impl<'de> Visitor<'de> for TagList {
        type Value = Option<Vec<String>>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a comma-separated string or a list of strings")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            let tags: Vec<String> = value
                .split(',')
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect();
            Ok(Some(tags))
        }

        fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            self.visit_str(&value)
        }

        fn visit_seq<S>(self, mut seq: S) -> Result<Self::Value, S::Error>
        where
            S: SeqAccess<'de>,
        {
            let mut vec = Vec::new();
            while let Some(item) = seq.next_element::<String>()? {
                vec.push(item);
            }
            Ok(Some(vec))
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }
    }

    deserializer.deserialize_any(TagList)
}

/// Front-matter data from a post
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    pub title: Option<String>,
    /// Publication date, kept as the string written in the file
    pub date: Option<String>,
    pub description: Option<String>,
    pub author: Option<String>,
    #[serde(alias = "coverImage")]
    pub cover_image: Option<String>,
    #[serde(deserialize_with = "tag_list")]
    pub tags: Option<Vec<String>>,

    /// Additional custom fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

lazy_static! {
    /// "April 3, 2024" style prefix sometimes pasted into descriptions
    static ref LEADING_DATE: Regex = Regex::new(r"^[A-Z][a-z]+ \d+, \d{4}").unwrap();
    static ref BYLINE: Regex = Regex::new(r"^By ([^\n]+)").unwrap();
}

impl FrontMatter {
    /// Parse front-matter from content string
    /// Returns (front_matter, remaining_content)
    pub fn parse(content: &str) -> (Self, &str) {
        let trimmed = content.trim_start();

        let Some(rest) = trimmed.strip_prefix("---") else {
            return (FrontMatter::default(), content);
        };
        let rest = rest.trim_start_matches(['\n', '\r']);

        let Some(end_pos) = rest.find("\n---") else {
            // No closing ---, treat as no front-matter
            return (FrontMatter::default(), content);
        };

        let yaml_content = &rest[..end_pos];
        let remaining = &rest[end_pos + 4..];
        let remaining = remaining.trim_start_matches(['\n', '\r']);

        if yaml_content.trim().is_empty() {
            return (FrontMatter::default(), remaining);
        }

        match serde_yaml::from_str::<FrontMatter>(yaml_content) {
            Ok(fm) => (fm, remaining),
            Err(e) => {
                tracing::warn!("Failed to parse front-matter, treating as content: {}", e);
                (FrontMatter::default(), content)
            }
        }
    }

    /// Whether the required listing fields are all present
    pub fn is_complete(&self) -> bool {
        self.title.is_some() && self.date.is_some() && self.description.is_some()
    }

    /// Resolved tag list, falling back to the configured defaults
    pub fn tags_or_default(&self, defaults: &[String]) -> Vec<String> {
        self.tags
            .clone()
            .unwrap_or_else(|| defaults.to_vec())
    }

    /// Clean up a description that has a date or byline pasted into it.
    ///
    /// Returns the cleaned description and the author, preferring the
    /// explicit author field over one lifted out of the description.
    pub fn clean_description(&self) -> (String, Option<String>) {
        let mut description = self.description.clone().unwrap_or_default();
        let mut extracted_author = None;

        if let Some(date) = LEADING_DATE.find(&description) {
            description = description[date.end()..].trim().to_string();

            if description.starts_with("By") {
                if let Some(caps) = BYLINE.captures(&description) {
                    extracted_author = Some(caps[1].trim().to_string());
                    let end = caps.get(0).map(|m| m.end()).unwrap_or(0);
                    description = description[end..].trim().to_string();
                }
            }
        }

        if description.is_empty() {
            let title = self.title.as_deref().unwrap_or_default();
            description = format!("Learn about {} in this Montessori education guide.", title);
        }

        (description, self.author.clone().or(extracted_author))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_yaml_frontmatter() {
        let content = r#"---
title: Choosing a School
date: 2024-01-15
description: How to evaluate programs near you.
tags:
  - Education
  - School Choice
---

This is the content.
"#;

        let (fm, remaining) = FrontMatter::parse(content);
        assert_eq!(fm.title, Some("Choosing a School".to_string()));
        assert_eq!(fm.date, Some("2024-01-15".to_string()));
        assert_eq!(fm.tags, Some(vec!["Education".to_string(), "School Choice".to_string()]));
        assert!(fm.is_complete());
        assert!(remaining.contains("This is the content."));
    }

    #[test]
    fn test_tags_from_comma_string() {
        let content = "---\ntitle: T\ndate: 2024-01-01\ndescription: D\ntags: A, B, C\n---\nBody\n";
        let (fm, _) = FrontMatter::parse(content);
        assert_eq!(
            fm.tags,
            Some(vec!["A".to_string(), "B".to_string(), "C".to_string()])
        );
    }

    #[test]
    fn test_tags_default_when_missing() {
        let content = "---\ntitle: T\ndate: 2024-01-01\ndescription: D\n---\nBody\n";
        let (fm, _) = FrontMatter::parse(content);
        assert_eq!(fm.tags, None);

        let defaults = vec![
            "Education".to_string(),
            "Montessori".to_string(),
            "School Choice".to_string(),
        ];
        assert_eq!(fm.tags_or_default(&defaults), defaults);
    }

    #[test]
    fn test_empty_tag_entries_dropped() {
        let content = "---\ntitle: T\ndate: 2024-01-01\ndescription: D\ntags: 'A, , B'\n---\n";
        let (fm, _) = FrontMatter::parse(content);
        assert_eq!(fm.tags, Some(vec!["A".to_string(), "B".to_string()]));
    }

    #[test]
    fn test_no_frontmatter() {
        let content = "Just a markdown document.\n";
        let (fm, remaining) = FrontMatter::parse(content);
        assert!(!fm.is_complete());
        assert_eq!(remaining, content);
    }

    #[test]
    fn test_missing_required_fields() {
        let content = "---\ntitle: Only a Title\n---\nBody\n";
        let (fm, _) = FrontMatter::parse(content);
        assert!(!fm.is_complete());
    }

    #[test]
    fn test_cover_image_alias() {
        let content =
            "---\ntitle: T\ndate: 2024-01-01\ndescription: D\ncoverImage: /img/cover.jpg\n---\n";
        let (fm, _) = FrontMatter::parse(content);
        assert_eq!(fm.cover_image, Some("/img/cover.jpg".to_string()));
    }

    #[test]
    fn test_clean_description_strips_date_and_byline() {
        let fm = FrontMatter {
            title: Some("Montessori at Home".to_string()),
            description: Some("April 3, 2024 By Maria Example".to_string()),
            ..Default::default()
        };

        let (description, author) = fm.clean_description();
        assert_eq!(author, Some("Maria Example".to_string()));
        assert_eq!(
            description,
            "Learn about Montessori at Home in this Montessori education guide."
        );
    }

    #[test]
    fn test_clean_description_keeps_explicit_author() {
        let fm = FrontMatter {
            title: Some("T".to_string()),
            author: Some("Site Staff".to_string()),
            description: Some("May 1, 2024 By Someone Else".to_string()),
            ..Default::default()
        };

        let (_, author) = fm.clean_description();
        assert_eq!(author, Some("Site Staff".to_string()));
    }

    #[test]
    fn test_clean_description_passthrough() {
        let fm = FrontMatter {
            title: Some("T".to_string()),
            description: Some("A plain description.".to_string()),
            ..Default::default()
        };

        let (description, author) = fm.clean_description();
        assert_eq!(description, "A plain description.");
        assert_eq!(author, None);
    }
}
