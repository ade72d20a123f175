//! Incremental state machine over inbound stream deltas.
//!
//! The [`StreamAccumulator`] folds [`StreamDelta`]s into a [`RawResponse`].
//! Text and deliberation deltas append to separate buffers; usage counters
//! are recorded when reported. Deltas arriving after `Done` are a protocol
//! violation, as is a stream that ends without `Done`.

use crate::error::GatewayError;
use crate::types::{RawResponse, StreamDelta, TokenUsage};

/// Accumulator state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    /// No delta seen yet.
    Idle,
    /// Deltas flowing.
    Streaming,
    /// `Done` received.
    Done,
}

/// Folds a delta stream into a complete raw response.
#[derive(Debug)]
pub struct StreamAccumulator {
    state: State,
    text: String,
    deliberation: String,
    usage: TokenUsage,
}

impl Default for StreamAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamAccumulator {
    /// Create an empty accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: State::Idle,
            text: String::new(),
            deliberation: String::new(),
            usage: TokenUsage::default(),
        }
    }

    /// Whether the stream has completed normally.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.state == State::Done
    }

    /// Apply one delta.
    ///
    /// A `Start` while already streaming, or any delta after `Done`, is a
    /// [`GatewayError::Protocol`] violation. Backends that omit `Start` are
    /// tolerated: the first content delta opens the stream implicitly.
    pub fn apply(&mut self, delta: StreamDelta) -> Result<(), GatewayError> {
        if self.state == State::Done {
            return Err(GatewayError::Protocol {
                message: format!("delta after done: {delta:?}"),
            });
        }
        match delta {
            StreamDelta::Start => {
                if self.state == State::Streaming {
                    return Err(GatewayError::Protocol {
                        message: "duplicate start".to_string(),
                    });
                }
                self.state = State::Streaming;
            }
            StreamDelta::Text { text } => {
                self.state = State::Streaming;
                self.text.push_str(&text);
            }
            StreamDelta::Deliberation { text } => {
                self.state = State::Streaming;
                self.deliberation.push_str(&text);
            }
            StreamDelta::Usage { usage } => {
                self.state = State::Streaming;
                self.usage = usage;
            }
            StreamDelta::Done => {
                self.state = State::Done;
            }
        }
        Ok(())
    }

    /// Consume the accumulator and produce the raw response.
    ///
    /// Errors if the stream never reached `Done`.
    pub fn finish(self) -> Result<RawResponse, GatewayError> {
        if self.state != State::Done {
            return Err(GatewayError::Protocol {
                message: "stream ended without done".to_string(),
            });
        }
        Ok(RawResponse {
            text: self.text,
            deliberation_trace: if self.deliberation.is_empty() {
                None
            } else {
                Some(self.deliberation)
            },
            usage: self.usage,
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
