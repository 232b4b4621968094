pub mod bet_stats;
pub mod data;
pub mod fantasy_scoring;
pub mod lineup;
pub mod odds;
pub mod player_match;

pub use bet_stats::*;
pub use fantasy_scoring::*;
pub use lineup::*;
pub use odds::*;
pub use player_match::*;
