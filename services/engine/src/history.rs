//! Append-only round history, newest first, with a display cursor.

use std::collections::VecDeque;

use shared::{SubunitAmount, DEFAULT_HISTORY_CAPACITY, HISTORY_PAGE_STEP};

use crate::domain::RoundResult;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HistoryStats {
    pub rounds: usize,
    pub total_wagered: u64,
    pub biggest_payout: u64,
}

pub struct HistoryLog {
    entries: VecDeque<RoundResult>,
    capacity: usize,
    cursor: usize,
}

impl Default for HistoryLog {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl HistoryLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity: capacity.max(1),
            cursor: HISTORY_PAGE_STEP,
        }
    }

    /// Prepend a settled round; the oldest entry is evicted at capacity.
    pub fn record(&mut self, result: RoundResult) {
        if self.entries.len() == self.capacity {
            self.entries.pop_back();
        }
        self.entries.push_front(result);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn newest(&self) -> Option<&RoundResult> {
        self.entries.front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RoundResult> {
        self.entries.iter()
    }

    /// The currently revealed prefix ("show N of M")
    pub fn visible(&self) -> impl Iterator<Item = &RoundResult> {
        self.entries.iter().take(self.cursor)
    }

    pub fn visible_count(&self) -> usize {
        self.cursor.min(self.entries.len())
    }

    /// Grow the display cursor by `step` entries
    pub fn reveal_more(&mut self, step: usize) {
        self.cursor = self.cursor.saturating_add(step);
    }

    pub fn stats(&self) -> HistoryStats {
        HistoryStats {
            rounds: self.entries.len(),
            total_wagered: self
                .entries
                .iter()
                .map(|r| r.wager_amount.as_u64())
                .sum(),
            biggest_payout: self
                .entries
                .iter()
                .map(|r| r.payout.as_u64())
                .max()
                .unwrap_or(0),
        }
    }

    pub fn total_wagered(&self) -> SubunitAmount {
        SubunitAmount::new(self.stats().total_wagered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use shared::{GameKind, Multiplier};
    use uuid::Uuid;

    fn round(wager: u64, payout: u64) -> RoundResult {
        RoundResult {
            round_id: Uuid::new_v4(),
            settled_at: Utc::now(),
            game: GameKind::Wheel,
            wager_amount: SubunitAmount::new(wager),
            multiplier: Multiplier::from_hundredths(if payout > 0 { 200 } else { 0 }),
            payout: SubunitAmount::new(payout),
            label: None,
        }
    }

    #[test]
    fn test_newest_first() {
        let mut log = HistoryLog::default();
        log.record(round(10, 0));
        log.record(round(20, 40));
        assert_eq!(log.newest().unwrap().wager_amount.as_u64(), 20);
        let wagers: Vec<u64> = log.iter().map(|r| r.wager_amount.as_u64()).collect();
        assert_eq!(wagers, vec![20, 10]);
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut log = HistoryLog::new(3);
        for i in 1..=5 {
            log.record(round(i, 0));
        }
        assert_eq!(log.len(), 3);
        let wagers: Vec<u64> = log.iter().map(|r| r.wager_amount.as_u64()).collect();
        assert_eq!(wagers, vec![5, 4, 3]);
    }

    #[test]
    fn test_display_cursor() {
        let mut log = HistoryLog::default();
        for i in 0..25 {
            log.record(round(i + 1, 0));
        }
        assert_eq!(log.visible().count(), HISTORY_PAGE_STEP);
        log.reveal_more(10);
        assert_eq!(log.visible().count(), 20);
        log.reveal_more(30);
        // Cursor past the end reveals everything
        assert_eq!(log.visible().count(), 25);
        assert_eq!(log.visible_count(), 25);
    }

    #[test]
    fn test_stats() {
        let mut log = HistoryLog::default();
        log.record(round(100, 0));
        log.record(round(50, 200));
        let stats = log.stats();
        assert_eq!(stats.rounds, 2);
        assert_eq!(stats.total_wagered, 150);
        assert_eq!(stats.biggest_payout, 200);
    }
}
