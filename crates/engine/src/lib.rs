//! finder-engine - piece movement, SRS kicks and placement generation.
//!
//! Provides kick resolution with T-spin detection, candidate generation under
//! the drop rules, reachability checks and a brute-force path enumeration.

pub mod apply;
pub mod config;
pub mod kicks;
pub mod movegen;
pub mod movement;
pub mod perft;
pub mod reachable;

pub use apply::{apply_placement, apply_placement_mut, unapply_placement, UndoInfo};
pub use config::DropType;
pub use kicks::{get_kicks, resolve_rotation, Direction, Kick};
pub use movegen::{count_placements, generate_placements, Placement, Placements};
pub use movement::{detect_tspin, try_drop, try_move, try_rotate, RotationResult};
pub use reachable::{HarddropReachable, Reachable, SoftdropReachable};
