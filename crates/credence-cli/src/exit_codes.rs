//! Process exit codes. Part of the CLI contract.

pub const SUCCESS: i32 = 0;
pub const RUN_ABORTED: i32 = 1; // Fatal model-service error, partial report printed
pub const ANALYSIS_FAILED: i32 = 1;
pub const CONFIG_ERROR: i32 = 2; // Bad flags, config file or dataset
