/// Forward-only position in the job list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobCursor {
    next: usize,
    total: usize,
}

impl JobCursor {
    pub fn new(total: usize) -> Self {
        Self { next: 0, total }
    }

    /// Index of the job to run next, if any remain.
    pub fn current(&self) -> Option<usize> {
        (self.next < self.total).then_some(self.next)
    }

    pub fn advance(&mut self) {
        self.next = self.next.saturating_add(1).min(self.total);
    }

    /// Number of jobs the cursor has moved past.
    pub fn completed(&self) -> usize {
        self.next
    }

    pub fn remaining(&self) -> usize {
        self.total - self.next
    }

    pub fn is_finished(&self) -> bool {
        self.next >= self.total
    }
}
