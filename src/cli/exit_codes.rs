//! exit codes for formfx commands
//!
//! these follow Unix conventions where 0 = success and non-zero = error
//! specific codes help scripts distinguish between failure types

/// command completed successfully
pub const SUCCESS: i32 = 0;

/// general or unknown error
pub const ERROR: i32 = 1;

/// condition text could not be parsed
pub const PARSE_ERROR: i32 = 2;

/// condition references an input that does not exist
pub const UNKNOWN_INPUT: i32 = 3;

/// invalid command-line arguments
pub const INVALID_ARGS: i32 = 4;

/// configuration file error
pub const CONFIG_ERROR: i32 = 5;

/// fixture file missing or malformed
pub const FIXTURE_ERROR: i32 = 6;
