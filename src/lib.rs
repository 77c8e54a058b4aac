pub mod config;
pub mod db;
pub mod diagnostic;
pub mod line_range;
pub mod logging;
