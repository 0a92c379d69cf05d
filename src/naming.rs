//! Identifier-style to column-style name conversion.

use serde::{Deserialize, Serialize};

/// Pure identifier → column name transform.
pub trait NamingConverter {
    fn convert(&self, name: &str) -> String;
}

/// Built-in naming styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamingStyle {
    /// `userName` → `user_name`
    #[default]
    LowerUnderScore,
    /// `userName` → `USER_NAME`
    UpperUnderScore,
    /// `UserName` → `userName`
    LowerCamel,
    /// `userName` → `UserName`
    UpperCamel,
    /// Unchanged
    Identity,
}

impl NamingConverter for NamingStyle {
    fn convert(&self, name: &str) -> String {
        match self {
            NamingStyle::LowerUnderScore => words(name)
                .iter()
                .map(|w| w.to_lowercase())
                .collect::<Vec<_>>()
                .join("_"),
            NamingStyle::UpperUnderScore => words(name)
                .iter()
                .map(|w| w.to_uppercase())
                .collect::<Vec<_>>()
                .join("_"),
            NamingStyle::LowerCamel => map_first(name, |c| c.to_lowercase().collect()),
            NamingStyle::UpperCamel => map_first(name, |c| c.to_uppercase().collect()),
            NamingStyle::Identity => name.to_string(),
        }
    }
}

impl<F> NamingConverter for F
where
    F: Fn(&str) -> String,
{
    fn convert(&self, name: &str) -> String {
        self(name)
    }
}

/// Splits a camel-case identifier into words, returning each word with its
/// character offset.
///
/// A word starts at an upper-case letter that follows a lower-case letter or a
/// digit, or at the last upper-case letter of an acronym run when a lower-case
/// letter follows it (`URLName` → `URL`, `Name`).
///
/// # Examples
/// ```
/// use mapgen::naming::split_camel;
///
/// let words: Vec<_> = split_camel("findByURLName").into_iter().map(|(_, w)| w).collect();
/// assert_eq!(words, vec!["find", "By", "URL", "Name"]);
/// ```
pub fn split_camel(input: &str) -> Vec<(usize, String)> {
    let chars: Vec<char> = input.chars().collect();
    let mut result = Vec::new();
    let mut current = String::new();
    let mut start = 0;

    for (i, &ch) in chars.iter().enumerate() {
        let boundary = i > 0 && ch.is_uppercase() && {
            let prev = chars[i - 1];
            let next = chars.get(i + 1).copied();
            prev.is_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_uppercase() && next.is_some_and(char::is_lowercase))
        };

        if boundary && !current.is_empty() {
            result.push((start, std::mem::take(&mut current)));
            start = i;
        }
        current.push(ch);
    }

    if !current.is_empty() {
        result.push((start, current));
    }
    result
}

/// Lower-cases the first character unless the first two are both upper-case.
///
/// # Examples
/// ```
/// use mapgen::naming::decapitalize;
///
/// assert_eq!(decapitalize("Name"), "name");
/// assert_eq!(decapitalize("URL"), "URL");
/// ```
pub fn decapitalize(name: &str) -> String {
    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (Some(first), Some(second)) if first.is_uppercase() && second.is_uppercase() => {
            name.to_string()
        }
        (Some(_), _) => map_first(name, |c| c.to_lowercase().collect()),
        (None, _) => String::new(),
    }
}

fn words(name: &str) -> Vec<String> {
    name.split('_')
        .filter(|part| !part.is_empty())
        .flat_map(split_camel)
        .map(|(_, word)| word)
        .collect()
}

fn map_first(name: &str, f: impl Fn(char) -> String) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => f(first) + chars.as_str(),
        None => String::new(),
    }
}

#[test]
fn test_lower_under_score() {
    assert_eq!(NamingStyle::LowerUnderScore.convert("userName"), "user_name");
    assert_eq!(NamingStyle::LowerUnderScore.convert("id"), "id");
    assert_eq!(NamingStyle::LowerUnderScore.convert("homeURLPath"), "home_url_path");
    assert_eq!(NamingStyle::LowerUnderScore.convert("address2City"), "address2_city");
}

#[test]
fn test_other_styles() {
    assert_eq!(NamingStyle::UpperUnderScore.convert("userName"), "USER_NAME");
    assert_eq!(NamingStyle::LowerCamel.convert("UserName"), "userName");
    assert_eq!(NamingStyle::UpperCamel.convert("userName"), "UserName");
    assert_eq!(NamingStyle::Identity.convert("userName"), "userName");
}
