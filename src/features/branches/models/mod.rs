mod branch;

pub use branch::Branch;
