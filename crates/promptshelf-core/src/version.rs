//! Version id generation for history entries.
//!
//! Ids have the form `<unix-millis>-<sequence>`. The sequence restarts at zero
//! whenever the millisecond advances and counts up otherwise, so two snapshots
//! taken in the same millisecond (or after the wall clock stepped backwards)
//! still get distinct ids.

use chrono::{DateTime, Utc};
use promptshelf_types::{HistoryEntry, PromptSnapshot};

/// Monotonic source of history version ids.
#[derive(Debug, Clone, Default)]
pub struct VersionClock {
    last_millis: i64,
    sequence: u32,
}

impl VersionClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance past an id issued earlier (e.g. one loaded from disk).
    /// Ids that don't follow the `<millis>-<sequence>` form are ignored.
    pub fn observe(&mut self, version_id: &str) {
        let Some((millis, sequence)) = parse_version_id(version_id) else {
            return;
        };
        if (millis, sequence) > (self.last_millis, self.sequence) {
            self.last_millis = millis;
            self.sequence = sequence;
        }
    }

    /// Issue the next id for a snapshot taken at `now`.
    pub fn next_id(&mut self, now: DateTime<Utc>) -> String {
        let millis = now.timestamp_millis();
        if millis > self.last_millis {
            self.last_millis = millis;
            self.sequence = 0;
        } else if let Some(sequence) = self.sequence.checked_add(1) {
            self.sequence = sequence;
        } else {
            // Sequence exhausted within one millisecond: borrow the next one.
            self.last_millis = self.last_millis.saturating_add(1);
            self.sequence = 0;
        }
        format!("{}-{:04}", self.last_millis, self.sequence)
    }

    /// Build a history entry for `snapshot`, stamped with the current time.
    pub fn entry(&mut self, prompt_data: PromptSnapshot) -> HistoryEntry {
        let now = Utc::now();
        HistoryEntry {
            version_id: self.next_id(now),
            created_at: Some(now),
            prompt_data,
        }
    }
}

fn parse_version_id(version_id: &str) -> Option<(i64, u32)> {
    let (millis, sequence) = version_id.split_once('-')?;
    Some((millis.parse().ok()?, sequence.parse().ok()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(millis: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(millis).unwrap()
    }

    #[test]
    fn test_same_millisecond_gets_sequence() {
        let mut clock = VersionClock::new();
        let a = clock.next_id(at(1_700_000_000_000));
        let b = clock.next_id(at(1_700_000_000_000));
        let c = clock.next_id(at(1_700_000_000_001));

        assert_eq!(a, "1700000000000-0000");
        assert_eq!(b, "1700000000000-0001");
        assert_eq!(c, "1700000000001-0000");
    }

    #[test]
    fn test_clock_going_backwards_stays_unique() {
        let mut clock = VersionClock::new();
        let a = clock.next_id(at(2_000));
        let b = clock.next_id(at(1_000));

        assert_ne!(a, b);
        assert_eq!(b, "2000-0001");
    }

    #[test]
    fn test_observe_loaded_ids() {
        let mut clock = VersionClock::new();
        clock.observe("5000-0003");
        clock.observe("4000-0009");
        clock.observe("1718000000000");

        assert_eq!(clock.next_id(at(5_000)), "5000-0004");
    }

    #[test]
    fn test_exhausted_sequence_moves_to_next_millisecond() {
        let mut clock = VersionClock::new();
        clock.observe(&format!("5000-{}", u32::MAX));

        assert_eq!(clock.next_id(at(5_000)), "5001-0000");
        assert_eq!(clock.next_id(at(5_000)), "5001-0001");
    }

    #[test]
    fn test_entry_carries_snapshot() {
        let mut clock = VersionClock::new();
        let snapshot = PromptSnapshot {
            text: "Explain X".into(),
            tool: "GPT-4".into(),
            tags: vec!["edu".into()],
            favorite: false,
        };
        let entry = clock.entry(snapshot.clone());

        assert_eq!(entry.prompt_data, snapshot);
        assert!(entry.created_at.is_some());
        assert!(entry.version_id.contains('-'));
    }
}
