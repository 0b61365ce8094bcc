mod body;
mod context;
mod cookie;
pub mod headers;
mod request;
mod request_line;

pub use body::RequestBody;
pub use context::RequestContext;
pub use cookie::CookieJar;
pub use headers::HeaderMap;
pub use request::HttpRequest;
pub use request_line::RequestLine;
