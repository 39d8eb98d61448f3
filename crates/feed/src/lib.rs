pub mod candidate;
pub mod color;
pub mod error;

pub use candidate::*;
pub use color::*;
pub use error::*;
