use std::collections::HashMap;

use crate::error::{ParseError, Result};
use crate::Method;

/// `METHOD target VERSION`, with the target split into path and query parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestLine {
    method: Method,
    path: String,
    parameters: HashMap<String, String>,
    protocol_version: String,
}

impl RequestLine {
    pub fn parse(line: &str) -> Result<Self> {
        let mut tokens = line.split_ascii_whitespace();
        let (Some(method), Some(target), Some(protocol_version), None) =
            (tokens.next(), tokens.next(), tokens.next(), tokens.next())
        else {
            return Err(ParseError::MalformedRequestLine(line.to_owned()));
        };
        let method: Method = method.parse()?;
        let (path, query) = target.split_once('?').unwrap_or((target, ""));
        Ok(Self {
            method,
            path: path.to_owned(),
            parameters: parse_query(query),
            protocol_version: protocol_version.to_owned(),
        })
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters.get(name).map(String::as_str)
    }

    pub fn parameters(&self) -> &HashMap<String, String> {
        &self.parameters
    }

    pub fn protocol_version(&self) -> &str {
        &self.protocol_version
    }

    /// Same line with a different path; the query parameters are kept.
    pub fn with_path(&self, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..self.clone()
        }
    }
}

/// Later occurrences of a name overwrite earlier ones; a pair without `=` maps to "".
fn parse_query(query: &str) -> HashMap<String, String> {
    url::form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .collect()
}
