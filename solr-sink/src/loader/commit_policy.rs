//! Batch commit policy.

/// Default number of successful adds between commits.
pub const DEFAULT_COMMIT_THRESHOLD: usize = 1000;

/// Counts documents added since the last successful commit and decides when
/// a commit is due.
///
/// A commit is due every time the pending count reaches a multiple of the
/// threshold. The count only resets after a successful commit, so a failed
/// commit is attempted again `threshold` adds later, or at drain time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitPolicy {
    pending: usize,
    threshold: usize,
}

impl CommitPolicy {
    /// Create a policy. A threshold of zero is treated as one.
    pub fn new(threshold: usize) -> Self {
        Self {
            pending: 0,
            threshold: threshold.max(1),
        }
    }

    /// Record one successful add. Returns `true` when a commit is due.
    pub fn record_add(&mut self) -> bool {
        self.pending += 1;
        self.pending % self.threshold == 0
    }

    /// Record a successful commit.
    pub fn committed(&mut self) {
        self.pending = 0;
    }

    /// Documents added since the last successful commit.
    pub fn pending(&self) -> usize {
        self.pending
    }

    pub fn has_pending(&self) -> bool {
        self.pending > 0
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }
}

impl Default for CommitPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_COMMIT_THRESHOLD)
    }
}
