use crate::error::{ParseError, Result, Stage};
use crate::Socket;
use std::io;
use tokio::io::AsyncReadExt;

const MAX_BUFFER_SIZE: usize = 4096;

/// Read-ahead buffer over a socket.
///
/// Bytes pulled from the socket but not yet handed out stay in `inner[begin..end]`,
/// so a body that arrived in the same segment as the headers is not lost.
#[derive(Debug)]
pub struct Buffer<S: Socket> {
    inner: [u8; MAX_BUFFER_SIZE],
    begin: usize,
    end: usize,
    socket: S,
}

impl<S: Socket> Buffer<S> {
    pub fn new(socket: S) -> Self {
        Self {
            inner: [0; MAX_BUFFER_SIZE],
            begin: 0,
            end: 0,
            socket,
        }
    }

    /// Reads one line terminated by `\n`, with the terminator (and a preceding `\r`)
    /// chopped off. Lines longer than `limit` bytes are rejected.
    pub async fn read_line(&mut self, stage: Stage, limit: usize) -> Result<Vec<u8>> {
        let mut result = vec![];
        loop {
            match self.find(b'\n') {
                Some(end_of_line) => {
                    result.extend_from_slice(&self.buffer()[..end_of_line]);
                    self.shift_buffer(end_of_line + 1);
                    break;
                }
                None => {
                    let has = self.buffer().len();
                    result.extend_from_slice(self.buffer());
                    self.shift_buffer(has);
                    if result.len() > limit {
                        return Err(ParseError::LineTooLong { stage, limit });
                    }
                    if self.refill_buffer(stage).await? == 0 {
                        return Err(ParseError::StreamReadFailure {
                            stage,
                            source: io::Error::new(
                                io::ErrorKind::UnexpectedEof,
                                "stream closed before end of line",
                            ),
                        });
                    }
                }
            }
        }
        if result.last() == Some(&b'\r') {
            result.pop();
        }
        if result.len() > limit {
            return Err(ParseError::LineTooLong { stage, limit });
        }
        Ok(result)
    }

    /// Reads exactly `length` bytes, draining what is already buffered first.
    /// `length` comes from the client, so the result grows with what actually arrives.
    pub async fn read_exact_bytes(&mut self, length: usize) -> Result<Vec<u8>> {
        let mut result = Vec::with_capacity(length.min(MAX_BUFFER_SIZE));
        loop {
            let take = (length - result.len()).min(self.buffer().len());
            result.extend_from_slice(&self.buffer()[..take]);
            self.shift_buffer(take);
            if result.len() == length {
                return Ok(result);
            }
            if self.refill_buffer(Stage::Body).await? == 0 {
                return Err(ParseError::TruncatedBody {
                    expected: length,
                    received: result.len(),
                });
            }
        }
    }

    pub fn buffer(&self) -> &[u8] {
        &self.inner[self.begin..self.end]
    }
}

impl<S: Socket> Buffer<S> {
    async fn refill_buffer(&mut self, stage: Stage) -> Result<usize> {
        self.end = self
            .socket
            .read(&mut self.inner)
            .await
            .map_err(|source| ParseError::StreamReadFailure { stage, source })?;
        self.begin = 0;
        Ok(self.end)
    }

    fn shift_buffer(&mut self, until: usize) {
        debug_assert!(until <= self.end - self.begin, "ask to shift more than have");
        self.begin += until;
    }

    fn find(&self, delim: u8) -> Option<usize> {
        self.buffer().iter().position(|b| *b == delim)
    }
}
