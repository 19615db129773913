use std::marker::PhantomData;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

mod error;
mod rank;
mod storage;

pub use error::{StoreError, StoreErrorKind};
pub use rank::Ranked;
pub use storage::{FileStorage, MemoryStorage, Storage};

/// Entries kept per game.
pub const CAPACITY: usize = 25;

/// Key the first release used for its single, unnamespaced board.
pub const LEGACY_KEY: &str = "mfacts.leaderboard.v1";

/// The only game whose board may be sitting under [`LEGACY_KEY`].
pub const LEGACY_GAME_ID: &str = "multiplication";

pub fn storage_key(game_id: &str) -> String {
    format!("mfacts.leaderboard.{game_id}.v1")
}

/// Ranked, capacity-bounded score list for one game.
///
/// Storage failures never escape: writes report whether they landed and
/// reads fall back to an empty board.
pub struct Leaderboard<E, S> {
    game_id: String,
    key: String,
    storage: S,
    _entry: PhantomData<fn() -> E>,
}

impl<E: Ranked, S: Storage> Leaderboard<E, S> {
    /// Opens the board for `game_id`, moving legacy data into place first.
    pub fn open(game_id: impl Into<String>, storage: S) -> Self {
        let game_id = game_id.into();
        let board = Self {
            key: storage_key(&game_id),
            game_id,
            storage,
            _entry: PhantomData,
        };
        board.migrate_legacy();
        board
    }

    pub fn game_id(&self) -> &str {
        &self.game_id
    }

    pub fn storage_key(&self) -> &str {
        &self.key
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Copies the legacy board under this game's key when this game owns the
    /// legacy data and has no board of its own yet, then deletes the legacy key.
    ///
    /// Returns `true` only on the call that actually moved data.
    pub fn migrate_legacy(&self) -> bool {
        if self.game_id != LEGACY_GAME_ID {
            return false;
        }
        match self.try_migrate() {
            Ok(moved) => {
                if moved {
                    info!(game = %self.game_id, "migrated legacy leaderboard");
                }
                moved
            }
            Err(e) => {
                warn!(game = %self.game_id, error = %e, "failed to migrate legacy leaderboard");
                false
            }
        }
    }

    fn try_migrate(&self) -> Result<bool, StoreError> {
        let Some(old) = self.storage.get_item(LEGACY_KEY)? else {
            return Ok(false);
        };
        if self.storage.get_item(&self.key)?.is_some() {
            return Ok(false);
        }
        self.storage.set_item(&self.key, &old)?;
        self.storage.remove_item(LEGACY_KEY)?;
        Ok(true)
    }

    pub fn save_score(&self, entry: E) -> bool {
        self.save_score_at(entry, Utc::now())
    }

    /// Stamps `entry` with `at`, re-ranks the board and keeps the top [`CAPACITY`].
    pub fn save_score_at(&self, entry: E, at: DateTime<Utc>) -> bool {
        match self.try_save(entry, at) {
            Ok(len) => {
                info!(game = %self.game_id, entries = len, "score saved");
                true
            }
            Err(e) => {
                warn!(game = %self.game_id, error = %e, "score not persisted");
                false
            }
        }
    }

    fn try_save(&self, mut entry: E, at: DateTime<Utc>) -> Result<usize, StoreError> {
        let mut data = self.load_all();
        entry.stamp(at);
        data.push(entry);
        data.sort_by(E::rank_cmp);
        data.truncate(CAPACITY);

        let json = serde_json::to_string(&data).map_err(|e| {
            StoreError::new(StoreErrorKind::Encode, e.to_string()).with_key(&self.key)
        })?;
        self.storage.set_item(&self.key, &json)?;
        Ok(data.len())
    }

    /// Current board in rank order. Empty when nothing is stored or the
    /// stored document cannot be read.
    pub fn load_all(&self) -> Vec<E> {
        match self.try_load() {
            Ok(entries) => entries,
            Err(e) => {
                warn!(game = %self.game_id, error = %e, "treating leaderboard as empty");
                Vec::new()
            }
        }
    }

    fn try_load(&self) -> Result<Vec<E>, StoreError> {
        let Some(raw) = self.storage.get_item(&self.key)? else {
            return Ok(Vec::new());
        };
        let entries: Vec<E> = serde_json::from_str(&raw).map_err(|e| {
            StoreError::new(StoreErrorKind::Corrupt, e.to_string()).with_key(&self.key)
        })?;

        let before = entries.len();
        let entries: Vec<E> = entries.into_iter().filter(E::is_valid).collect();
        if entries.len() != before {
            debug!(
                game = %self.game_id,
                dropped = before - entries.len(),
                "dropped inconsistent leaderboard entries"
            );
        }
        Ok(entries)
    }

    /// Removes every entry for this game. Other games are untouched.
    pub fn clear(&self) -> bool {
        match self.storage.remove_item(&self.key) {
            Ok(()) => {
                info!(game = %self.game_id, "leaderboard cleared");
                true
            }
            Err(e) => {
                warn!(game = %self.game_id, error = %e, "failed to clear leaderboard");
                false
            }
        }
    }
}
