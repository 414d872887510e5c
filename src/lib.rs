// src/lib.rs

//! openEO processes over plain scalars, dense arrays, labelled arrays and
//! lazily evaluated arrays. Every call is routed at runtime to the
//! implementation matching the kind of data it was given.

pub mod core;

pub mod engine;
pub mod processes;
pub mod utils;

pub use core::tensor;
pub use core::value;

pub use core::{
    Config, ConfigError, LabelledArray, LazyArray, OutputFormat, CONFIG_FILE, DEFAULT_CONFIG,
};
pub use engine::{
    call, call_callback, classify, get_process, has_process, process_ids, processes, Arguments,
    Call, Category, ProcessDef, ProcessError, ProcessKind,
};
pub use tensor::{Shape, Tensor};
pub use utils::value_from_json;
pub use value::{ProcessRef, Scalar, Value};
