use chrono::Utc;

/// Identifies entities that expose a stable integer identifier.
pub trait Identifiable {
    fn id(&self) -> i64;
}

/// Supplies a presentation-ready label for UI or logs.
pub trait Displayable {
    fn display_label(&self) -> String;
}

/// Hands out wall-clock-derived ids (epoch milliseconds) that never repeat.
///
/// Two calls within the same millisecond still yield distinct, increasing ids.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    last: i64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Saturates at `i64::MAX` when a stored or imported id already sits there.
    pub fn next_id(&mut self) -> i64 {
        let now = Utc::now().timestamp_millis();
        self.last = now.max(self.last.saturating_add(1));
        self.last
    }

    /// Records an id that already exists so later ids stay above it.
    pub fn observe(&mut self, id: i64) {
        self.last = self.last.max(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_strictly_increase() {
        let mut ids = IdGenerator::new();
        let first = ids.next_id();
        let second = ids.next_id();
        assert!(second > first);
    }

    #[test]
    fn observed_ids_are_never_reissued() {
        let mut ids = IdGenerator::new();
        let far_future = Utc::now().timestamp_millis() + 1_000_000;
        ids.observe(far_future);
        assert_eq!(ids.next_id(), far_future + 1);
    }

    #[test]
    fn observing_the_largest_id_does_not_overflow() {
        let mut ids = IdGenerator::new();
        ids.observe(i64::MAX);
        assert_eq!(ids.next_id(), i64::MAX);
    }
}
