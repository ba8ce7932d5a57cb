use serde::{Deserialize, Serialize};

/// How a new dataset relates to the one it replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpdateKind {
    /// The dataset was replaced wholesale.
    Snapshot,
    /// Every series grew by `appended` samples and then lost its `dropped`
    /// oldest samples to the history window.
    Append { appended: usize, dropped: usize },
}

impl UpdateKind {
    #[must_use]
    pub fn is_snapshot(self) -> bool {
        matches!(self, Self::Snapshot)
    }
}
