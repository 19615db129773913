use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use facts_schema::{ClassicScore, SprintScore};
use serde::{de::DeserializeOwned, Serialize};

/// A record that can live on a leaderboard.
pub trait Ranked: Serialize + DeserializeOwned {
    /// `Less` means `self` ranks above `other`.
    fn rank_cmp(&self, other: &Self) -> Ordering;

    fn stamp(&mut self, at: DateTime<Utc>);

    fn is_valid(&self) -> bool {
        true
    }
}

impl Ranked for ClassicScore {
    // score desc, accuracy desc, newest first
    fn rank_cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .cmp(&self.score)
            .then_with(|| other.accuracy.cmp(&self.accuracy))
            .then_with(|| other.recorded_at.cmp(&self.recorded_at))
    }

    fn stamp(&mut self, at: DateTime<Utc>) {
        self.recorded_at = at;
    }

    fn is_valid(&self) -> bool {
        self.is_consistent()
    }
}

impl Ranked for SprintScore {
    // fastest first, newest breaks ties
    fn rank_cmp(&self, other: &Self) -> Ordering {
        self.elapsed_secs
            .total_cmp(&other.elapsed_secs)
            .then_with(|| other.recorded_at.cmp(&self.recorded_at))
    }

    fn stamp(&mut self, at: DateTime<Utc>) {
        self.recorded_at = at;
    }

    fn is_valid(&self) -> bool {
        self.is_consistent()
    }
}
