//! Edge-matching tiling domain: tiles, instances and placements

pub mod tile;
pub mod instance;
pub mod placement;
pub mod io;

pub use tile::Tile;
pub use instance::Instance;
pub use placement::{Placement, UNASSIGNED};
pub use io::{load_instance_from_file, parse_instance, load_placement_from_file, create_example_instances};
