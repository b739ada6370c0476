//! AutoMap job descriptors: compile a configuration to XML, read it back,
//! and load the JSON configurations `create-job` accepts.

pub mod config;
pub mod reader;
pub mod writer;

pub use config::{load_config, template_from};
pub use reader::{JobDocument, StationeryStatus, read_job};
pub use writer::{check_config, compile_job};

/// Wire encoding for booleans in job files.
pub(crate) fn encode_bool(value: bool) -> &'static str {
    if value { "True" } else { "False" }
}

/// Only the exact literal `True` is true; everything else is false.
pub(crate) fn decode_bool(raw: Option<&str>, default: bool) -> bool {
    match raw {
        Some(value) => value == "True",
        None => default,
    }
}
