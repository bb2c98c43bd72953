//! Server-Sent Events decoding for the push channel.
//!
//! Only the `data` and `event` fields are kept; `id` and `retry` are ignored
//! since reconnection timing is fixed on the client side.

use super::error::ApiError;
use super::models::PushMessage;
use futures::stream::{self, BoxStream, StreamExt};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// A dispatched SSE message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseMessage {
    pub event: Option<String>,
    pub data: String,
}

/// Incremental SSE parser over any buffered async reader.
pub struct SseReader<R> {
    reader: R,
    data: String,
    has_data: bool,
    event: Option<String>,
}

impl<R: AsyncBufRead + Unpin> SseReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            data: String::new(),
            has_data: false,
            event: None,
        }
    }

    /// Read until the next complete message. `Ok(None)` means the stream ended;
    /// a trailing message without its terminating blank line is dropped.
    pub async fn next_message(&mut self) -> std::io::Result<Option<SseMessage>> {
        let mut line = String::new();
        loop {
            line.clear();
            if self.reader.read_line(&mut line).await? == 0 {
                return Ok(None);
            }

            let trimmed = line.trim_end_matches(['\n', '\r']);
            if trimmed.is_empty() {
                if let Some(message) = self.dispatch() {
                    return Ok(Some(message));
                }
                continue;
            }
            if trimmed.starts_with(':') {
                continue;
            }

            let (field, value) = match trimmed.split_once(':') {
                Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
                None => (trimmed, ""),
            };
            match field {
                "data" => {
                    if self.has_data {
                        self.data.push('\n');
                    }
                    self.data.push_str(value);
                    self.has_data = true;
                }
                "event" => self.event = Some(value.to_string()),
                _ => {}
            }
        }
    }

    fn dispatch(&mut self) -> Option<SseMessage> {
        let event = self.event.take();
        if !self.has_data {
            return None;
        }
        self.has_data = false;
        Some(SseMessage {
            event,
            data: std::mem::take(&mut self.data),
        })
    }
}

/// Turn a raw SSE body into a stream of push messages.
///
/// Undecodable payloads are yielded as errors and the stream keeps going;
/// a read error is yielded once and ends the stream.
pub fn push_messages<R>(reader: R) -> BoxStream<'static, Result<PushMessage, ApiError>>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    stream::unfold(Some(SseReader::new(reader)), |state| async move {
        let mut sse = state?;
        match sse.next_message().await {
            Ok(Some(message)) => {
                let decoded = serde_json::from_str::<PushMessage>(&message.data)
                    .map_err(ApiError::from);
                Some((decoded, Some(sse)))
            }
            Ok(None) => None,
            Err(e) => Some((Err(ApiError::Stream(e)), None)),
        }
    })
    .boxed()
}
