pub mod datum;
pub mod error;
pub mod fieldpath;
pub mod item;
pub mod suite;
mod util;

pub use datum::Datum;
pub use error::{Error, Result};
pub use item::Item;
pub use suite::{DeviceInfo, Suite};
pub use util::*;
