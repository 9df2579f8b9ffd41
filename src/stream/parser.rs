//! Incremental parser for the server-sent-events wire format
//!
//! Feeds on raw body chunks with arbitrary boundaries (mid-line, even
//! mid-UTF-8) and yields complete events. Understands the `event:`, `data:`,
//! `id:` and `retry:` fields, `:` comment lines, and both `\n` and `\r\n`
//! line endings.

use super::types::StreamEvent;

/// Event name used when the wire omits an `event:` field.
const DEFAULT_EVENT_NAME: &str = "message";

/// Incremental SSE parser.
///
/// Bytes go in via [`SseParser::feed`], complete events come out. State
/// between calls is the unconsumed tail of the byte buffer plus the fields
/// of the event under construction.
#[derive(Debug, Default)]
pub struct SseParser {
    buf: Vec<u8>,
    event_name: String,
    data: Vec<String>,
    last_id: Option<String>,
    retry: Option<u64>,
}

impl SseParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume a chunk of body bytes, returning any events it completed.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<StreamEvent> {
        self.buf.extend_from_slice(chunk);

        let mut events = Vec::new();
        while let Some(pos) = self.buf.iter().position(|&b| b == b'\n') {
            let mut line: Vec<u8> = self.buf.drain(..=pos).collect();
            line.pop(); // the \n
            if line.last() == Some(&b'\r') {
                line.pop();
            }

            let line = String::from_utf8_lossy(&line).into_owned();
            if let Some(event) = self.process_line(&line) {
                events.push(event);
            }
        }

        events
    }

    /// Last `retry:` interval suggested by the server, in milliseconds.
    /// Recorded for observability only; the reconnect delay is governed by
    /// the client's own backoff configuration.
    pub fn retry_hint(&self) -> Option<u64> {
        self.retry
    }

    fn process_line(&mut self, line: &str) -> Option<StreamEvent> {
        if line.is_empty() {
            return self.dispatch();
        }

        // Comment line.
        if line.starts_with(':') {
            return None;
        }

        let (field, value) = match line.find(':') {
            Some(idx) => {
                let value = &line[idx + 1..];
                // A single space after the colon is part of the separator.
                (&line[..idx], value.strip_prefix(' ').unwrap_or(value))
            }
            None => (line, ""),
        };

        match field {
            "event" => self.event_name = value.to_string(),
            "data" => self.data.push(value.to_string()),
            "id" => self.last_id = Some(value.to_string()),
            "retry" => {
                if let Ok(ms) = value.parse::<u64>() {
                    self.retry = Some(ms);
                }
            }
            _ => {} // unknown fields are ignored per the wire format
        }

        None
    }

    /// Blank line: emit the pending event, if it has any data.
    fn dispatch(&mut self) -> Option<StreamEvent> {
        if self.data.is_empty() {
            // Without data there is nothing to deliver; the event name still
            // resets.
            self.event_name.clear();
            return None;
        }

        let name = if self.event_name.is_empty() {
            DEFAULT_EVENT_NAME.to_string()
        } else {
            std::mem::take(&mut self.event_name)
        };

        Some(StreamEvent {
            name,
            data: std::mem::take(&mut self.data).join("\n"),
            id: self.last_id.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed_all(parser: &mut SseParser, input: &str) -> Vec<StreamEvent> {
        parser.feed(input.as_bytes())
    }

    #[test]
    fn test_single_event() {
        let mut parser = SseParser::new();
        let events = feed_all(&mut parser, "event: login-status\ndata: {\"ok\":true}\n\n");

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].name, "login-status");
        assert_eq!(events[0].data, "{\"ok\":true}");
        assert_eq!(events[0].id, None);
    }

    #[test]
    fn test_default_event_name() {
        let mut parser = SseParser::new();
        let events = feed_all(&mut parser, "data: hello\n\n");

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].name, "message");
        assert_eq!(events[0].data, "hello");
    }

    #[test]
    fn test_multiline_data_joined() {
        let mut parser = SseParser::new();
        let events = feed_all(&mut parser, "data: line one\ndata: line two\n\n");

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].data, "line one\nline two");
    }

    #[test]
    fn test_crlf_line_endings() {
        let mut parser = SseParser::new();
        let events = feed_all(&mut parser, "event: ping\r\ndata: {}\r\n\r\n");

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].name, "ping");
        assert_eq!(events[0].data, "{}");
    }

    #[test]
    fn test_byte_at_a_time_chunks() {
        let mut parser = SseParser::new();
        let input = "event: connected\ndata: {\"msg\":\"hi\"}\n\nevent: ping\ndata: {}\n\n";

        let mut events = Vec::new();
        for byte in input.as_bytes() {
            events.extend(parser.feed(&[*byte]));
        }

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].name, "connected");
        assert_eq!(events[1].name, "ping");
    }

    #[test]
    fn test_chunk_split_mid_field() {
        let mut parser = SseParser::new();
        assert!(parser.feed(b"eve").is_empty());
        assert!(parser.feed(b"nt: ping\nda").is_empty());
        let events = parser.feed(b"ta: {}\n\n");

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].name, "ping");
    }

    #[test]
    fn test_comments_ignored() {
        let mut parser = SseParser::new();
        let events = feed_all(&mut parser, ": keep-alive\n\ndata: real\n\n");

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].data, "real");
    }

    #[test]
    fn test_retry_field_recorded_not_dispatched() {
        let mut parser = SseParser::new();
        let events = feed_all(&mut parser, "retry: 5000\n\n");

        assert!(events.is_empty());
        assert_eq!(parser.retry_hint(), Some(5000));
    }

    #[test]
    fn test_retry_field_non_numeric_ignored() {
        let mut parser = SseParser::new();
        feed_all(&mut parser, "retry: soon\n\n");
        assert_eq!(parser.retry_hint(), None);
    }

    #[test]
    fn test_event_without_data_not_dispatched() {
        let mut parser = SseParser::new();
        let events = feed_all(&mut parser, "event: ping\n\ndata: next\n\n");

        // The dataless ping is dropped and does not leak its name into the
        // following event.
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].name, "message");
        assert_eq!(events[0].data, "next");
    }

    #[test]
    fn test_id_persists_across_events() {
        let mut parser = SseParser::new();
        let events = feed_all(&mut parser, "id: 7\ndata: a\n\ndata: b\n\n");

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].id.as_deref(), Some("7"));
        assert_eq!(events[1].id.as_deref(), Some("7"));
    }

    #[test]
    fn test_value_without_leading_space() {
        let mut parser = SseParser::new();
        let events = feed_all(&mut parser, "data:packed\n\n");

        assert_eq!(events[0].data, "packed");
    }

    #[test]
    fn test_only_first_space_stripped() {
        let mut parser = SseParser::new();
        let events = feed_all(&mut parser, "data:  spaced\n\n");

        assert_eq!(events[0].data, " spaced");
    }

    #[test]
    fn test_unknown_field_ignored() {
        let mut parser = SseParser::new();
        let events = feed_all(&mut parser, "custom: x\ndata: y\n\n");

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].data, "y");
    }
}
