pub use config::*;
pub use input_combo::*;

#[allow(clippy::module_inception)]
mod config;
mod config_serializer;
mod input_combo;

pub use config_serializer::serialize_config;
