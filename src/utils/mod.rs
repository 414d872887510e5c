pub mod json;
pub mod temporal;

pub use json::value_from_json;
pub use temporal::parse_rfc3339;
