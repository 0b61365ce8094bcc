use std::collections::hash_map::{Entry, HashMap};
use std::time::SystemTime;

use crate::error::{ParseError, Result};

pub const CONTENT_LENGTH: &str = "Content-Length";
pub const COOKIE: &str = "Cookie";
pub const DATE: &str = "Date";

/// Header fields of one request, keyed by the name exactly as received.
///
/// Lookups are case-sensitive: `Host` and `host` are different fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeaderMap {
    fields: HashMap<String, String>,
}

impl HeaderMap {
    /// Builds the map from raw header lines, stopping at the first empty line.
    /// Lines that do not look like `Name: value` are skipped.
    pub fn parse<I>(lines: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut headers = Self::default();
        for line in lines {
            let line = line.as_ref();
            if line.is_empty() {
                break;
            }
            headers.push_line(line)?;
        }
        Ok(headers)
    }

    /// Adds a single header line. Returns whether the line matched the header grammar.
    pub(crate) fn push_line(&mut self, line: &str) -> Result<bool> {
        let Some((name, value)) = parse_header(line) else {
            return Ok(false);
        };
        match self.fields.entry(name.to_owned()) {
            Entry::Occupied(entry) => Err(ParseError::DuplicateHeaderField(entry.key().clone())),
            Entry::Vacant(entry) => {
                entry.insert(value.to_owned());
                Ok(true)
            }
        }
    }

    pub fn find_header(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Renders `Name: value` for a present field.
    pub fn pair(&self, name: &str) -> Option<String> {
        self.find_header(name)
            .map(|value| format!("{}: {}", name, value))
    }

    /// `None` when the header is missing or is not a non-negative integer.
    pub fn content_length(&self) -> Option<usize> {
        self.find_header(CONTENT_LENGTH)?.trim().parse().ok()
    }

    pub fn date(&self) -> Option<SystemTime> {
        httpdate::parse_http_date(self.find_header(DATE)?.trim()).ok()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// `[A-Za-z- ]+` then `:`, one optional space, and a non-empty value.
fn parse_header(line: &str) -> Option<(&str, &str)> {
    let (name, value) = line.split_once(':')?;
    let name_ok = !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphabetic() || b == b'-' || b == b' ');
    let value = value.strip_prefix(' ').unwrap_or(value);
    (name_ok && !value.is_empty()).then_some((name, value))
}
