use crate::models::Stats;

/// Incrementally maintained completion counters.
///
/// After every engine operation `in_progress` equals the active count and
/// `completed` equals the finished count; [`derive`] recomputes both from the
/// store sizes so the two can be compared.
#[derive(Debug, Default, Clone, Copy)]
pub struct Counters {
    pub completed: usize,
    pub in_progress: usize,
}

impl Counters {
    pub fn started(&mut self) {
        self.in_progress += 1;
    }

    pub fn dropped(&mut self) {
        self.in_progress = self.in_progress.saturating_sub(1);
    }

    pub fn finished(&mut self) {
        self.completed += 1;
        self.in_progress = self.in_progress.saturating_sub(1);
    }

    pub fn reopened(&mut self) {
        self.completed = self.completed.saturating_sub(1);
        self.in_progress += 1;
    }

    pub fn uncounted_finished(&mut self) {
        self.completed = self.completed.saturating_sub(1);
    }

    pub fn snapshot(&self, active: usize) -> Stats {
        Stats {
            total: active,
            completed: self.completed,
            in_progress: self.in_progress,
        }
    }
}

/// Stats computed purely from store sizes.
pub fn derive(active: usize, finished: usize) -> Stats {
    Stats {
        total: active,
        completed: finished,
        in_progress: active,
    }
}
