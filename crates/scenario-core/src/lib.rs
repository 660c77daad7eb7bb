pub mod error;
pub mod model;
pub mod params;
pub mod payload;
pub mod time;

pub use error::*;
pub use model::*;
pub use params::*;
pub use payload::*;
pub use time::*;
