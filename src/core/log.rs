use super::activity::ActivityRecord;

/// Ordered view of every activity observed so far in the current run.
///
/// Owned exclusively by the consumer side; workers never touch it and reach
/// it only through the activity queue.
#[derive(Debug, Default, Clone)]
pub struct ActivityLog {
    records: Vec<ActivityRecord>,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a drained batch and restore timestamp order.
    ///
    /// The sort is stable, so records with equal timestamps keep the order
    /// they arrived in.
    pub fn absorb(&mut self, batch: Vec<ActivityRecord>) {
        if batch.is_empty() {
            return;
        }
        self.records.extend(batch);
        self.records
            .sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));
    }

    pub fn records(&self) -> &[ActivityRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Reset at the start of a new plan request.
    pub fn clear(&mut self) {
        self.records.clear();
    }
}
