/// Overrides where the debug log file is written.
pub const LOG_PATH_ENV: &str = "DRAUGHTS_LOG_PATH";

/// Relative to the home directory.
pub const DEFAULT_LOGS_DIRECTORY: &str = ".local/state/draughts";

pub const LOG_FILE_NAME: &str = "draughts.log";
