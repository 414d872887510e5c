pub mod config;
pub mod labelled;
pub mod lazy;
pub mod tensor;
pub mod value;

// Re-export commonly used types
pub use config::{Config, ConfigError, OutputFormat, CONFIG_FILE, DEFAULT_CONFIG};
pub use labelled::LabelledArray;
pub use lazy::LazyArray;
pub use tensor::{Shape, Tensor};
pub use value::{ProcessRef, Scalar, Value};
