pub use capabilities::*;
pub use common::*;
pub use traits::*;

mod capabilities;
mod common;
mod traits;

#[cfg(test)]
pub(crate) mod mock;
