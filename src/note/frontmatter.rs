//! Frontmatter codec
//!
//! Reads and rewrites the leading `---` block of a note line by line. Keys the
//! caller does not touch keep their original lines byte for byte, so hand
//! edited YAML survives automated updates.
//!
//! # Example
//! ```
//! use obsidian_journal::note::frontmatter::{Frontmatter, FrontmatterUpdate, update_frontmatter};
//!
//! let text = "---\nmood: bad\njournal-date: 2025-03-16\n---\n# Day\n";
//! let updates = FrontmatterUpdate::new()
//!     .set("mood", "good")
//!     .set("topics", vec!["work", "sleep"]);
//!
//! let updated = update_frontmatter(text, &updates);
//! assert_eq!(
//!     updated,
//!     "---\nmood: good\njournal-date: 2025-03-16\ntopics:\n  - work\n  - sleep\n---\n# Day\n"
//! );
//!
//! let frontmatter = Frontmatter::parse(&updated);
//! assert_eq!(frontmatter.get("topics").and_then(|v| v.as_list()).map(<[_]>::len), Some(2));
//! ```

use super::parser::{self, ResultParse, parse_note};
use std::{collections::HashSet, fmt};

/// Single frontmatter value
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// Text, quoted on output when it contains YAML punctuation
    Str(String),

    /// Rendered as `true` / `false`
    Bool(bool),

    /// Rendered with [`f64`]'s `Display` (`3.0` becomes `3`)
    Number(f64),
}

impl Scalar {
    /// Text of a [`Scalar::Str`]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(text) => Some(text),
            Self::Bool(_) | Self::Number(_) => None,
        }
    }

    fn is_empty_str(&self) -> bool {
        matches!(self, Self::Str(text) if text.is_empty())
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(text) => f.write_str(text),
            Self::Bool(value) => write!(f, "{value}"),
            Self::Number(value) => write!(f, "{value}"),
        }
    }
}

/// Value of a frontmatter key
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// `key: value`
    Scalar(Scalar),

    /// `key:` followed by `  - item` lines
    List(Vec<Scalar>),

    /// Key is removed on update
    Absent,
}

impl Value {
    /// Text of a string scalar
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Scalar(scalar) => scalar.as_str(),
            Self::List(_) | Self::Absent => None,
        }
    }

    /// Items of a list
    #[must_use]
    pub fn as_list(&self) -> Option<&[Scalar]> {
        match self {
            Self::List(items) => Some(items),
            Self::Scalar(_) | Self::Absent => None,
        }
    }
}

macro_rules! impl_from_scalar {
    ($t:ty, $value:ident => $body:expr) => {
        impl From<$t> for Scalar {
            fn from($value: $t) -> Self {
                $body
            }
        }

        impl From<$t> for Value {
            fn from(value: $t) -> Self {
                Self::Scalar(Scalar::from(value))
            }
        }
    };
}

impl_from_scalar!(&str, value => Self::Str(value.to_string()));
impl_from_scalar!(String, value => Self::Str(value));
impl_from_scalar!(bool, value => Self::Bool(value));
impl_from_scalar!(f64, value => Self::Number(value));
impl_from_scalar!(i32, value => Self::Number(f64::from(value)));
impl_from_scalar!(u32, value => Self::Number(f64::from(value)));

impl From<Scalar> for Value {
    fn from(value: Scalar) -> Self {
        Self::Scalar(value)
    }
}

impl<T: Into<Scalar>> From<Vec<T>> for Value {
    fn from(value: Vec<T>) -> Self {
        Self::List(value.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Absent, Into::into)
    }
}

/// Parsed frontmatter, in document order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frontmatter {
    entries: Vec<(String, Value)>,
}

impl Frontmatter {
    /// Parse the frontmatter of a note
    ///
    /// Never fails: a note without a block, or with an unclosed one, yields an
    /// empty mapping. Values are kept as text; quotes are stripped and
    /// `[a, b]` / `- item` forms become lists.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        match parse_note(text) {
            Ok(ResultParse::WithProperties { properties, .. }) => Self::parse_block(properties),
            Ok(ResultParse::WithoutProperties) => Self::default(),
            Err(parser::Error::NotFoundCloser) => {
                #[cfg(feature = "tracing")]
                tracing::warn!("Unclosed frontmatter block, treating note as without frontmatter");

                Self::default()
            }
        }
    }

    fn parse_block(block: &str) -> Self {
        let mut frontmatter = Self::default();
        let mut list_key: Option<String> = None;

        for line in block.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            if let Some((key, raw_value)) = split_key_line(trimmed) {
                let raw_value = raw_value.trim();
                list_key = raw_value.is_empty().then(|| key.to_string());
                frontmatter.insert(key, parse_value(raw_value));
                continue;
            }

            let item = trimmed
                .strip_prefix("- ")
                .map(str::trim)
                .filter(|item| !item.is_empty());

            if let (Some(key), Some(item)) = (&list_key, item) {
                frontmatter.push_item(key, Scalar::Str(unquote(item)));
            }
        }

        frontmatter
    }

    fn insert(&mut self, key: &str, value: Value) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key.to_string(), value)),
        }
    }

    fn push_item(&mut self, key: &str, item: Scalar) {
        if let Some((_, value)) = self.entries.iter_mut().find(|(k, _)| k == key) {
            match value {
                Value::List(items) => items.push(item),
                _ => *value = Value::List(vec![item]),
            }
        }
    }

    /// Value of `key`
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Iterate over `(key, value)` in document order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Count of keys
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Has no keys
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Ordered set of frontmatter changes
///
/// Setting a key twice keeps its first position and the last value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrontmatterUpdate {
    entries: Vec<(String, Value)>,
}

impl FrontmatterUpdate {
    /// Empty update
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Set `key` to `value`
    #[must_use]
    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        let value = value.into();

        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }

        self
    }

    /// Remove `key` from the note
    #[must_use]
    pub fn remove(self, key: impl Into<String>) -> Self {
        self.set(key, Value::Absent)
    }

    /// Requested value for `key`
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Iterate in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// No changes requested
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for FrontmatterUpdate
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |updates, (key, value)| updates.set(key, value))
    }
}

/// Apply `updates` to the frontmatter of `text`
///
/// - keys in `updates` are rewritten in place, the rest keep their lines
/// - new keys go to the end of the block in update order
/// - [`Value::Absent`], empty strings and empty lists remove the key
/// - without a (closed) block a new one is prepended
///
/// Line endings are normalized to `\n` whenever `updates` is not empty.
#[must_use]
pub fn update_frontmatter(text: &str, updates: &FrontmatterUpdate) -> String {
    if updates.is_empty() {
        return text.to_string();
    }

    let lines: Vec<&str> = text.lines().collect();
    let closing = match parse_note(text) {
        Ok(ResultParse::WithProperties { properties, .. }) => Some(1 + properties.lines().count()),
        Ok(ResultParse::WithoutProperties) => None,
        Err(parser::Error::NotFoundCloser) => {
            #[cfg(feature = "tracing")]
            tracing::warn!("Unclosed frontmatter block, prepending a new one");

            None
        }
    };

    let output: Vec<String> = if let Some(closing) = closing {
        let block = rewrite_block(&lines[1..closing], updates);

        lines[..1]
            .iter()
            .map(ToString::to_string)
            .chain(block)
            .chain(lines[closing..].iter().map(ToString::to_string))
            .collect()
    } else {
        let block: Vec<String> = updates
            .iter()
            .flat_map(|(key, value)| format_lines(key, value))
            .collect();

        if block.is_empty() {
            return text.to_string();
        }

        std::iter::once("---".to_string())
            .chain(block)
            .chain(std::iter::once("---".to_string()))
            .chain(lines.iter().map(ToString::to_string))
            .collect()
    };

    let mut rendered = output.join("\n");
    if text.ends_with('\n') {
        rendered.push('\n');
    }

    rendered
}

fn rewrite_block(block: &[&str], updates: &FrontmatterUpdate) -> Vec<String> {
    let mut output = Vec::with_capacity(block.len());
    let mut replaced = HashSet::new();
    let mut i = 0;

    while i < block.len() {
        let Some((key, _)) = split_key_line(block[i]) else {
            output.push(block[i].to_string());
            i += 1;
            continue;
        };

        let end = block[i + 1..]
            .iter()
            .position(|line| split_key_line(line).is_some())
            .map_or(block.len(), |offset| i + 1 + offset);

        match updates.get(key) {
            Some(value) => {
                replaced.insert(key);
                output.extend(format_lines(key, value));
            }
            None => output.extend(block[i..end].iter().map(ToString::to_string)),
        }

        i = end;
    }

    for (key, value) in updates.iter() {
        if !replaced.contains(key) {
            output.extend(format_lines(key, value));
        }
    }

    output
}

/// `key: rest` where key is `[A-Za-z0-9_-]+`, ignoring surrounding whitespace
fn split_key_line(line: &str) -> Option<(&str, &str)> {
    let line = line.trim();
    let end = line
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '-'))
        .unwrap_or(line.len());

    if end == 0 {
        return None;
    }

    line[end..]
        .trim_start()
        .strip_prefix(':')
        .map(|rest| (&line[..end], rest))
}

fn format_lines(key: &str, value: &Value) -> Vec<String> {
    match value {
        Value::Absent => Vec::new(),
        Value::List(items) => {
            let items: Vec<String> = items
                .iter()
                .filter(|item| !item.is_empty_str())
                .map(format_scalar)
                .collect();

            if items.is_empty() {
                return Vec::new();
            }

            std::iter::once(format!("{key}:"))
                .chain(items.iter().map(|item| format!("  - {item}")))
                .collect()
        }
        Value::Scalar(Scalar::Str(text)) if text.trim().is_empty() => Vec::new(),
        Value::Scalar(scalar) => vec![format!("{key}: {}", format_scalar(scalar))],
    }
}

fn format_scalar(scalar: &Scalar) -> String {
    let Scalar::Str(text) = scalar else {
        return scalar.to_string();
    };

    if is_wiki_link(text) {
        return text.clone();
    }

    if text.contains([':', '#', '{', '}', '[', ']', ',']) || text.trim() != text {
        return format!("\"{}\"", text.replace('"', "\\\""));
    }

    text.clone()
}

/// `[[Target]]`, `[[Target|Alias]]`: exactly one link and nothing around it
#[must_use]
pub fn is_wiki_link(text: &str) -> bool {
    text.strip_prefix("[[")
        .and_then(|rest| rest.strip_suffix("]]"))
        .is_some_and(|inner| !inner.is_empty() && !inner.contains("[[") && !inner.contains("]]"))
}

fn parse_value(raw: &str) -> Value {
    let is_flow_list = raw.len() >= 2 && raw.starts_with('[') && raw.ends_with(']');

    if is_flow_list && !is_wiki_link(raw) {
        let items = raw[1..raw.len() - 1]
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(|item| Scalar::Str(unquote(item)))
            .collect();

        return Value::List(items);
    }

    Value::Scalar(Scalar::Str(unquote(raw)))
}

fn unquote(raw: &str) -> String {
    for quote in ['"', '\''] {
        let inner = raw
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
            .filter(|_| raw.len() >= 2);

        if let Some(inner) = inner {
            return if quote == '"' {
                inner.replace("\\\"", "\"")
            } else {
                inner.to_string()
            };
        }
    }

    raw.to_string()
}
