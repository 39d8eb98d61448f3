pub mod builder;
pub mod error;
pub mod palette;
pub mod params;
pub mod profile;

pub use builder::*;
pub use error::*;
pub use params::*;
pub use profile::*;
