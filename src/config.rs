pub const SESSION_COOKIE_NAME: &str = "JSESSIONID";
const MAX_LINE_LENGTH: usize = 8 * 1024;

/// Knobs for [`HttpRequest::parse_with`](crate::HttpRequest::parse_with).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserConfig {
    /// Cookie that carries the session id.
    pub session_cookie_name: String,
    /// Longest request line or header line accepted, terminator excluded.
    pub max_line_length: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            session_cookie_name: SESSION_COOKIE_NAME.to_owned(),
            max_line_length: MAX_LINE_LENGTH,
        }
    }
}
