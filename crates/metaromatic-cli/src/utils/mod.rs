pub mod ids;
pub mod progress;
pub mod table;
