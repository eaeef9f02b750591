pub mod constraints;
pub mod hours;
pub mod validate;

pub use constraints::*;
pub use hours::*;
pub use validate::*;
