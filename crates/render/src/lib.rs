pub mod config;
pub mod error;
pub mod events;
pub mod layout;
pub mod strategy;
pub mod surface;
pub mod trace;
pub mod view;

pub use config::*;
pub use error::*;
pub use events::*;
pub use layout::*;
pub use strategy::*;
pub use surface::*;
pub use trace::*;
pub use view::*;
