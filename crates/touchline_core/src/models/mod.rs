pub mod events;
pub mod ids;
pub mod player;
pub mod roster;

pub use events::{EventType, MatchEvent};
pub use ids::{MatchId, PlayerId};
pub use player::{PlayerRef, Position, SportType};
pub use roster::RosterEntry;
