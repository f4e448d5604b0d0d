//! Stable exit codes for the driver binary.

/// Verdict PASS.
pub const OK: i32 = 0;
/// Verdict FAIL: unexpected issues, unmatched expected failures, or a failed
/// stress run.
pub const FAILED: i32 = 1;
/// Fatal error in an upstream phase (platform, clone, build, malformed JSON).
pub const ERROR: i32 = 2;
