//! Status enums.

use serde::{Deserialize, Serialize};

/// Progress of an order submission.
///
/// `Idle -> Submitting -> {Succeeded, Failed}`. A failed submission may be
/// retried, which starts again from `Submitting`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

impl SubmissionStatus {
    /// Whether a new submission may start from this status.
    #[must_use]
    pub const fn can_submit(self) -> bool {
        matches!(self, Self::Idle | Self::Failed)
    }
}

impl std::fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Submitting => write!(f, "submitting"),
            Self::Succeeded => write!(f, "succeeded"),
            Self::Failed => write!(f, "failed"),
        }
    }
}
