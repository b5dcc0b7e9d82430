mod placement_drive;

pub use placement_drive::*;
