pub mod error;
pub mod week;

pub use error::*;
pub use week::*;
