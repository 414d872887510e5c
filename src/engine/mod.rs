pub mod args;
pub mod dispatch;
pub mod error;
pub mod kernels;
pub mod registry;

pub use args::Arguments;
pub use dispatch::{classify, Category, Handler, ProcessDef, ProcessKind};
pub use error::ProcessError;
pub use registry::{call, call_callback, get_process, has_process, process_ids, processes, Call};
