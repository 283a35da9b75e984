pub mod bridges;
pub mod interactions;
pub mod lone_pairs;
pub mod midpoints;
