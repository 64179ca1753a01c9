//! Common types shared across the upp-graphics crates.

pub mod conversions;
pub mod corners;
pub mod level;
pub mod time;

pub use conversions::Transform;
pub use corners::GridCorners;
pub use level::{Level, LevelUnit};
pub use time::ValidTime;
