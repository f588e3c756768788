#![forbid(unsafe_code)]

mod progress;
mod settings;

pub use progress::progress_line;
pub use settings::{init_tracing, load_file_config, FileConfig, ParamOverrides};
