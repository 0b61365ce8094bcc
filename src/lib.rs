mod bbuf;
mod config;
mod error;
pub mod http;
mod method;
pub mod session;
mod socket;

pub use config::{ParserConfig, SESSION_COOKIE_NAME};
pub use error::{ParseError, Result, Stage};
pub use http::{CookieJar, HeaderMap, HttpRequest, RequestBody, RequestContext, RequestLine};
pub use method::Method;
pub use session::{Session, SessionStore};
pub use socket::Socket;
