//! The counter screen: a single integer nudged up or down.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Counter {
    count: i64,
}

impl Counter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(self) -> i64 {
        self.count
    }

    /// Saturates at `i64::MAX`.
    pub fn increment(self) -> Self {
        Self {
            count: self.count.saturating_add(1),
        }
    }

    /// Saturates at `i64::MIN`.
    pub fn decrement(self) -> Self {
        Self {
            count: self.count.saturating_sub(1),
        }
    }
}
