/// Aggregate progress counters for one attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptProgress {
    pub total: usize,
    pub submitted: usize,
    pub not_visited: usize,
    pub visited_unanswered: usize,
    pub is_complete: bool,
}
