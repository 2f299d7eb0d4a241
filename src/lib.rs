#![doc = include_str!("../README.md")]

/// Forwards to the `tracing` macro of the given level when the `tracing`
/// feature is enabled, and compiles to nothing otherwise.
macro_rules! diag {
    ($level:ident, $($arg:tt)*) => {{
        #[cfg(feature = "tracing")]
        ::tracing::$level!($($arg)*);
    }};
}
pub(crate) use diag;

pub(crate) mod format;
pub(crate) mod options;
pub(crate) mod output;
pub(crate) mod spec;
pub(crate) mod summary;
pub(crate) mod task;


/// Re-exports of all public types and functions.
pub mod prelude {
    pub use crate::format::{format_duration, round_to_millis};
    pub use crate::options::{
        Background, CancelToken, Canceled, Checkable, Step, TaskOption, check, output, quiet, run,
        step,
    };
    pub use crate::output::Output;
    pub use crate::spec::{Spec, SpecFor};
    pub use crate::summary::Summary;
    pub use crate::task::Task;
}

pub use crate::prelude::*;
