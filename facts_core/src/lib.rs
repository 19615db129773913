pub mod error;
pub mod game;
pub mod gameplay;
pub mod input;
pub mod problem;
pub mod time;

pub use error::{SessionError, UnknownGame};
pub use game::{ClassicGame, FactsGame, GameKind, GameSignal, GridRow, Hud, RunSummary, SprintGame};
pub use gameplay::Phase;
