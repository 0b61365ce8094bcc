use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::body::RequestBody;
use super::context::RequestContext;
use super::cookie::CookieJar;
use super::headers::{HeaderMap, COOKIE};
use super::request_line::RequestLine;
use crate::bbuf::Buffer;
use crate::error::{ParseError, Result, Stage};
use crate::session::{Session, SessionStore};
use crate::{Method, ParserConfig, Socket};

/// A fully parsed request together with its resolved session.
///
/// The value is never mutated after parsing; [`HttpRequest::redirect_path`] hands out
/// a new request instead.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    line: RequestLine,
    headers: HeaderMap,
    body: RequestBody,
    context: RequestContext,
    store: SessionStore,
}

impl HttpRequest {
    pub async fn parse<S: Socket>(socket: S, store: &SessionStore) -> Result<Self> {
        Self::parse_with(socket, store, &ParserConfig::default()).await
    }

    #[tracing::instrument(level = "debug", skip_all)]
    pub async fn parse_with<S: Socket>(
        socket: S,
        store: &SessionStore,
        config: &ParserConfig,
    ) -> Result<Self> {
        let mut buf = Buffer::new(socket);

        let line = read_request_line(&mut buf, config).await?;
        tracing::debug!(method = %line.method(), path = line.path(), "parsed request line");

        let headers = read_headers(&mut buf, config).await?;
        tracing::debug!(count = headers.len(), "parsed headers");

        let body = RequestBody::read(&mut buf, &headers).await?;
        tracing::debug!(length = body.len(), "read body");

        let context = RequestContext::resolve(
            headers.find_header(COOKIE),
            &config.session_cookie_name,
            store,
        );
        tracing::debug!(
            session_id = %context.session().id(),
            registered = context.is_registered(),
            "resolved session"
        );

        Ok(Self {
            line,
            headers,
            body,
            context,
            store: store.clone(),
        })
    }

    /// Same request aimed at another path, for internal forwarding.
    pub fn redirect_path(&self, path: impl Into<String>) -> Self {
        Self {
            line: self.line.with_path(path),
            ..self.clone()
        }
    }

    pub fn method(&self) -> Method {
        self.line.method()
    }

    pub fn path(&self) -> &str {
        self.line.path()
    }

    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.line.parameter(name)
    }

    pub fn parameters(&self) -> &HashMap<String, String> {
        self.line.parameters()
    }

    pub fn protocol_version(&self) -> &str {
        self.line.protocol_version()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.find_header(name)
    }

    pub fn request_body(&self) -> Cow<'_, str> {
        self.body.as_str()
    }

    pub fn body(&self) -> &RequestBody {
        &self.body
    }

    pub fn context(&self) -> &RequestContext {
        &self.context
    }

    pub fn cookie(&self) -> &CookieJar {
        self.context.cookie()
    }

    /// The store's session for this request's id, if it has been registered.
    pub fn get_existing_session(&self) -> Option<Arc<Session>> {
        self.store.find_session(self.context.session().id())
    }

    /// The store's session for this request's id, registering the context's session
    /// under that id when the store has none.
    pub fn get_or_create_session(&self) -> Arc<Session> {
        self.store.find_or_add(Arc::clone(self.context.session()))
    }
}

impl fmt::Display for HttpRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} {} {}",
            self.method(),
            self.path(),
            self.protocol_version()
        )?;
        for (name, value) in self.headers.iter() {
            writeln!(f, "{}: {}", name, value)?;
        }
        write!(f, "({} body bytes)", self.body.len())
    }
}

async fn read_request_line<S: Socket>(
    buf: &mut Buffer<S>,
    config: &ParserConfig,
) -> Result<RequestLine> {
    let raw = buf
        .read_line(Stage::RequestLine, config.max_line_length)
        .await?;
    match std::str::from_utf8(&raw) {
        Ok(line) => RequestLine::parse(line),
        Err(_) => Err(ParseError::MalformedRequestLine(
            String::from_utf8_lossy(&raw).into_owned(),
        )),
    }
}

async fn read_headers<S: Socket>(buf: &mut Buffer<S>, config: &ParserConfig) -> Result<HeaderMap> {
    let mut headers = HeaderMap::default();
    loop {
        let raw = buf.read_line(Stage::Headers, config.max_line_length).await?;
        if raw.is_empty() {
            break;
        }
        // non-UTF8 lines cannot match the header grammar
        let Ok(line) = std::str::from_utf8(&raw) else {
            continue;
        };
        if !headers.push_line(line)? {
            tracing::trace!(line, "skipping line outside header grammar");
        }
    }
    Ok(headers)
}
