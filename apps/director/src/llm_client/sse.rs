//! Server-sent event decoding for streamed chat completions.
//!
//! Network chunks do not line up with events: one chunk may carry several
//! events, and an event (or a multi-byte character) may be split across
//! chunks. The decoder buffers raw bytes and only yields complete events.

use bytes::{Buf, BytesMut};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseEvent {
    Data(String),
    /// The `[DONE]` sentinel that terminates an OpenAI-style stream.
    Done,
}

#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: BytesMut,
    pending: Vec<String>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one network chunk and returns every event it completed.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<SseEvent> {
        self.buffer.extend_from_slice(chunk);

        let mut events = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line = self.buffer.split_to(pos);
            self.buffer.advance(1);
            self.take_line(&line, &mut events);
        }
        events
    }

    /// Flushes a trailing event that was not followed by a blank line.
    pub fn finish(&mut self) -> Vec<SseEvent> {
        let mut events = Vec::new();
        if !self.buffer.is_empty() {
            let line = self.buffer.split();
            self.take_line(&line, &mut events);
        }
        self.dispatch(&mut events);
        events
    }

    fn take_line(&mut self, line: &[u8], events: &mut Vec<SseEvent>) {
        // '\n' never occurs inside a multi-byte sequence, so a complete line is complete UTF-8.
        let line = String::from_utf8_lossy(line);
        let line = line.strip_suffix('\r').unwrap_or(&line);

        if line.is_empty() {
            self.dispatch(events);
            return;
        }
        if line.starts_with(':') {
            return;
        }
        if let Some(data) = line.strip_prefix("data:") {
            let data = data.strip_prefix(' ').unwrap_or(data);
            self.pending.push(data.to_string());
        }
        // event:, id: and retry: fields carry nothing for chat completions.
    }

    fn dispatch(&mut self, events: &mut Vec<SseEvent>) {
        if self.pending.is_empty() {
            return;
        }
        let data = self.pending.join("\n");
        self.pending.clear();

        if data.trim() == "[DONE]" {
            events.push(SseEvent::Done);
        } else {
            events.push(SseEvent::Data(data));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_several_events_in_one_chunk() {
        let mut decoder = SseDecoder::new();
        let events = decoder.push(b"data: {\"a\":1}\n\ndata: {\"a\":2}\n\ndata: [DONE]\n\n");
        assert_eq!(
            events,
            vec![
                SseEvent::Data("{\"a\":1}".to_string()),
                SseEvent::Data("{\"a\":2}".to_string()),
                SseEvent::Done,
            ]
        );
    }

    #[test]
    fn test_event_split_across_chunks() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.push(b"data: {\"content\":").is_empty());
        assert!(decoder.push(b"\"hi\"}\n").is_empty());
        let events = decoder.push(b"\n");
        assert_eq!(events, vec![SseEvent::Data("{\"content\":\"hi\"}".to_string())]);
    }

    #[test]
    fn test_multibyte_character_split_across_chunks() {
        let payload = "data: 镜头\n\n".as_bytes();
        // Split inside the first character's three-byte sequence.
        let (head, tail) = payload.split_at(7);
        let mut decoder = SseDecoder::new();
        assert!(decoder.push(head).is_empty());
        assert_eq!(decoder.push(tail), vec![SseEvent::Data("镜头".to_string())]);
    }

    #[test]
    fn test_crlf_and_comments() {
        let mut decoder = SseDecoder::new();
        let events = decoder.push(b": keep-alive\r\n\r\ndata: x\r\n\r\n");
        assert_eq!(events, vec![SseEvent::Data("x".to_string())]);
    }

    #[test]
    fn test_multiline_data_joined() {
        let mut decoder = SseDecoder::new();
        let events = decoder.push(b"data: one\ndata: two\n\n");
        assert_eq!(events, vec![SseEvent::Data("one\ntwo".to_string())]);
    }

    #[test]
    fn test_finish_flushes_unterminated_event() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.push(b"data: last").is_empty());
        assert_eq!(decoder.finish(), vec![SseEvent::Data("last".to_string())]);
        assert!(decoder.finish().is_empty());
    }
}
