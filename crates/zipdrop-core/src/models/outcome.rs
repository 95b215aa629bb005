use std::fmt;

/// Why a requested file did not make it into the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The entry had no usable URL
    MissingUrl,
    /// The remote host answered with a non-success status
    HttpStatus(u16),
    /// The request failed before a status was received (timeout, DNS, reset, body read)
    Transport(String),
    /// A later file resolved to the same entry name and overwrote this one
    Replaced { by_position: usize },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingUrl => write!(f, "no URL provided"),
            SkipReason::HttpStatus(code) => write!(f, "HTTP {}", code),
            SkipReason::Transport(msg) => write!(f, "transport error: {}", msg),
            SkipReason::Replaced { by_position } => {
                write!(f, "replaced by file {} with the same name", by_position)
            }
        }
    }
}

/// Result of processing one requested file. `position` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Added {
        position: usize,
        name: String,
        size: usize,
    },
    Skipped {
        position: usize,
        reason: SkipReason,
    },
}

impl FileOutcome {
    pub fn position(&self) -> usize {
        match self {
            FileOutcome::Added { position, .. } | FileOutcome::Skipped { position, .. } => {
                *position
            }
        }
    }

    pub fn is_added(&self) -> bool {
        matches!(self, FileOutcome::Added { .. })
    }
}
