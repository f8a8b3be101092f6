//! Per-entry soft-failure channel.
//!
//! Segment-level errors abort the whole parse (see `jpegmeta::Error`).
//! Failures scoped to a single IFD entry (an unknown type code, an
//! out-of-range value offset, a size overflow) are not fatal: the
//! offending entry is dropped and a `Warning` is both logged via
//! `tracing::warn!` and collected here, so a caller can inspect exactly
//! what was dropped without intercepting the logging sink.

/// A dropped-entry or best-effort-failure notice collected during a parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    /// The tag the warning concerns, if the failure is entry-scoped.
    pub tag: Option<u16>,
    /// Human-readable description of what went wrong.
    pub message: String,
}

impl Warning {
    pub fn for_tag(tag: u16, message: impl Into<String>) -> Self {
        Self {
            tag: Some(tag),
            message: message.into(),
        }
    }

    pub fn general(message: impl Into<String>) -> Self {
        Self {
            tag: None,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.tag {
            Some(tag) => write!(f, "tag 0x{:04X}: {}", tag, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}
