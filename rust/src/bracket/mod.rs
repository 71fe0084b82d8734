//! Placement brackets: game roles, skeletons, and dependency wiring.

mod edges;
mod roles;

pub use edges::{bracket_edges, find_game_by_role, try_bracket_edges, BracketError, BracketSources};
pub use roles::{skeleton, BracketRole};
