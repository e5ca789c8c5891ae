use compass_gateway::{AdviceStream, GatewayResult};

/// Incremental UTF-8 decoder for a chunked text body.
///
/// A multi-byte character split across two chunks is held back until its tail
/// arrives. Invalid bytes decode to U+FFFD.
#[derive(Debug, Default)]
pub struct TextAccumulator {
    text: String,
    pending: Vec<u8>,
}

impl TextAccumulator {
    pub fn push(&mut self, chunk: &[u8]) {
        self.pending.extend_from_slice(chunk);
        let input = std::mem::take(&mut self.pending);
        let mut rest = input.as_slice();

        while !rest.is_empty() {
            match std::str::from_utf8(rest) {
                Ok(valid) => {
                    self.text.push_str(valid);
                    break;
                }
                Err(error) => {
                    let (valid, after) = rest.split_at(error.valid_up_to());
                    self.text.push_str(&String::from_utf8_lossy(valid));

                    match error.error_len() {
                        Some(invalid_len) => {
                            self.text.push(char::REPLACEMENT_CHARACTER);
                            rest = &after[invalid_len..];
                        }
                        None => {
                            // Truncated sequence at the end: wait for the next chunk.
                            self.pending = after.to_vec();
                            break;
                        }
                    }
                }
            }
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn finish(mut self) -> String {
        if !self.pending.is_empty() {
            self.text.push(char::REPLACEMENT_CHARACTER);
        }
        self.text
    }
}

/// Drains an advice stream into one string, chunks joined in arrival order.
///
/// The stream is released on every exit: after the last chunk, or by drop when a
/// chunk error returns early.
pub async fn read_advice(mut stream: AdviceStream) -> GatewayResult<String> {
    let mut text = TextAccumulator::default();
    let mut chunk_count = 0usize;

    while let Some(chunk) = stream.read().await {
        let chunk = chunk?;
        chunk_count += 1;
        text.push(&chunk);
    }

    stream.release();
    tracing::debug!(chunk_count, "advice stream completed");
    Ok(text.finish())
}
