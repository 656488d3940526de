pub mod constants;
pub mod duration;

pub use constants::*;
pub use duration::parse_duration;
