mod consts;
mod messages;
mod session;

pub use crate::consts::{DEFAULT_LOGS_DIRECTORY, LOG_FILE_NAME, LOG_PATH_ENV};
pub use messages::{Command, CommandParseError, Response};
pub use session::Session;

/// Writes a line for the user through the `repl` tracing target.
#[macro_export]
macro_rules! repl {
    ($($arg:tt)*) => {
        tracing::info!(target: "repl", $($arg)*)
    };
}
