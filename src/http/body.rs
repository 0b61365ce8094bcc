use std::borrow::Cow;

use super::headers::HeaderMap;
use crate::bbuf::Buffer;
use crate::error::Result;
use crate::Socket;

/// Request payload: exactly `Content-Length` bytes, or nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestBody {
    bytes: Vec<u8>,
}

impl RequestBody {
    pub fn empty() -> Self {
        Self::default()
    }

    /// A missing or unparsable `Content-Length` reads as zero and nothing is consumed.
    pub async fn read<S: Socket>(buf: &mut Buffer<S>, headers: &HeaderMap) -> Result<Self> {
        let length = headers.content_length().unwrap_or(0);
        if length == 0 {
            return Ok(Self::empty());
        }
        let bytes = buf.read_exact_bytes(length).await?;
        Ok(Self { bytes })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Invalid UTF-8 is replaced rather than rejected.
    pub fn as_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.bytes)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl From<Vec<u8>> for RequestBody {
    fn from(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ParseError;

    fn headers(lines: &[&str]) -> HeaderMap {
        HeaderMap::parse(lines).unwrap()
    }

    #[tokio::test]
    async fn reads_exactly_content_length() {
        let mut buf = Buffer::new(&b"hello worldEXTRA"[..]);
        let body = RequestBody::read(&mut buf, &headers(&["Content-Length: 11"]))
            .await
            .unwrap();
        assert_eq!(body.as_str(), "hello world");
        assert_eq!(buf.buffer(), b"EXTRA");
    }

    #[tokio::test]
    async fn zero_or_missing_length_consumes_nothing() {
        for lines in [&["Content-Length: 0"][..], &[][..], &["Content-Length: abc"][..]] {
            let mut buf = Buffer::new(&b"left alone\n"[..]);
            let body = RequestBody::read(&mut buf, &headers(lines)).await.unwrap();
            assert!(body.is_empty());
            assert_eq!(body.as_str(), "");
            assert_eq!(
                buf.read_line(crate::Stage::Body, 64).await.unwrap(),
                b"left alone"
            );
        }
    }

    #[tokio::test]
    async fn body_is_not_trimmed() {
        let mut buf = Buffer::new(&b"  a\r\n "[..]);
        let body = RequestBody::read(&mut buf, &headers(&["Content-Length: 6"]))
            .await
            .unwrap();
        assert_eq!(body.as_bytes(), b"  a\r\n ");
    }

    #[tokio::test]
    async fn short_stream_is_truncated() {
        let mut buf = Buffer::new(&b"hello"[..]);
        let err = RequestBody::read(&mut buf, &headers(&["Content-Length: 11"]))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ParseError::TruncatedBody {
                expected: 11,
                received: 5
            }
        ));
    }
}
