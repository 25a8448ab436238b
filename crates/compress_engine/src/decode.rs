use compress_core::ProgressEvent;
use compress_logging::client_debug;
use encoding_rs::{CoderResult, Decoder, UTF_8};

/// What to do with a stream line that is not a valid progress record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MalformedLinePolicy {
    /// Drop the line and keep reading. Partial or garbled lines are expected noise.
    #[default]
    Ignore,
    /// Surface the line as a `DecodeError`.
    Fail,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("malformed stream line {line:?}: {message}")]
    MalformedLine { line: String, message: String },
}

/// Incremental UTF-8 line splitter.
///
/// Bytes are decoded statefully, so a multi-byte character split across two
/// chunks comes out intact. Everything after the last `\n` stays buffered
/// until a later chunk completes it.
pub struct LineDecoder {
    decoder: Decoder,
    buffer: String,
}

impl Default for LineDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl LineDecoder {
    pub fn new() -> Self {
        Self {
            decoder: UTF_8.new_decoder(),
            buffer: String::new(),
        }
    }

    /// Decode `chunk` and return every line it completed, in order.
    ///
    /// Empty lines are returned as-is; callers decide whether to skip them.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        self.decode(chunk, false);

        let Some(end) = self.buffer.rfind('\n') else {
            return Vec::new();
        };
        let rest = self.buffer[end + 1..].to_string();
        self.buffer.truncate(end);
        let complete = std::mem::replace(&mut self.buffer, rest);
        complete.split('\n').map(str::to_owned).collect()
    }

    /// Text held back after the last newline.
    pub fn residual(&self) -> &str {
        &self.buffer
    }

    /// End of stream: returns the unterminated tail, if any, and resets the decoder.
    ///
    /// Incomplete trailing bytes decode to U+FFFD.
    pub fn flush(&mut self) -> Option<String> {
        self.decode(&[], true);
        self.decoder = UTF_8.new_decoder();
        let rest = std::mem::take(&mut self.buffer);
        (!rest.is_empty()).then_some(rest)
    }

    fn decode(&mut self, mut src: &[u8], last: bool) {
        loop {
            let needed = self
                .decoder
                .max_utf8_buffer_length(src.len())
                .unwrap_or(src.len() * 3 + 4);
            self.buffer.reserve(needed);
            let (result, read, _replaced) =
                self.decoder.decode_to_string(src, &mut self.buffer, last);
            src = &src[read..];
            match result {
                CoderResult::InputEmpty => break,
                CoderResult::OutputFull => continue,
            }
        }
    }
}

/// Turns raw stream chunks into `ProgressEvent`s.
pub struct EventDecoder {
    lines: LineDecoder,
    policy: MalformedLinePolicy,
    discarded: usize,
}

impl Default for EventDecoder {
    fn default() -> Self {
        Self::new(MalformedLinePolicy::default())
    }
}

impl EventDecoder {
    pub fn new(policy: MalformedLinePolicy) -> Self {
        Self {
            lines: LineDecoder::new(),
            policy,
            discarded: 0,
        }
    }

    pub fn feed(&mut self, chunk: &[u8]) -> Result<Vec<ProgressEvent>, DecodeError> {
        let lines = self.lines.feed(chunk);
        let mut events = Vec::with_capacity(lines.len());
        for line in lines {
            if let Some(event) = self.parse_line(&line)? {
                events.push(event);
            }
        }
        Ok(events)
    }

    /// End of stream. A final line without a trailing newline is still parsed.
    pub fn finish(&mut self) -> Result<Option<ProgressEvent>, DecodeError> {
        match self.lines.flush() {
            Some(line) => self.parse_line(&line),
            None => Ok(None),
        }
    }

    pub fn residual(&self) -> &str {
        self.lines.residual()
    }

    /// Number of lines dropped under `MalformedLinePolicy::Ignore`.
    pub fn discarded(&self) -> usize {
        self.discarded
    }

    fn parse_line(&mut self, line: &str) -> Result<Option<ProgressEvent>, DecodeError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        match serde_json::from_str::<ProgressEvent>(line) {
            Ok(event) => Ok(Some(event)),
            Err(err) => match self.policy {
                MalformedLinePolicy::Ignore => {
                    self.discarded += 1;
                    client_debug!("Discarding malformed stream line ({}): {:?}", err, line);
                    Ok(None)
                }
                MalformedLinePolicy::Fail => Err(DecodeError::MalformedLine {
                    line: line.to_string(),
                    message: err.to_string(),
                }),
            },
        }
    }
}
