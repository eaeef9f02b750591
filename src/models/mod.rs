pub mod assignment;
pub mod schedule;
pub mod time;

pub use assignment::*;
pub use schedule::*;
pub use time::*;
