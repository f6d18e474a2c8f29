mod commands;
mod responses;

pub use commands::{Command, CommandParseError};
pub use responses::Response;
