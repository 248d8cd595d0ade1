//! Configuration for the gofold constant evaluator.
//!
//! # Example
//!
//! ```toml
//! # gofold.toml
//! [evaluator]
//! mode = "lenient"
//! int_size = 64
//! max_shift = 10000
//! redeclaration = "warn"
//!
//! [output]
//! format = "table"
//! float_digits = 30
//! ```

mod config;
mod error;

pub use config::{
    EvaluatorConfig, GofoldConfig, ModeSetting, OutputConfig, OutputFormat, RedeclarationSetting,
    DEFAULT_FILE_NAME,
};
pub use error::{ConfigError, Result};
