//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract — scripts rely on them.
//!
//! # Exit Codes
//!
//! | Code | Description                                        |
//! |------|----------------------------------------------------|
//! | 0    | Success                                            |
//! | 1    | Unreconciled rows remain (only with strict mode)   |
//! | 2    | CLI usage error (bad args, unknown extension)      |
//! | 3    | I/O error (cannot read input, cannot write output) |
//! | 4    | Parse error decoding an input sheet                |
//! | 5    | Bank sheet has no description column               |
//! | 6    | Invalid run config                                 |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant below
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant command's error handling

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// Unreconciled rows remain on either side and strict mode is on.
/// Like `diff(1)`, exit 1 means "the sheets differ."
pub const EXIT_UNRECONCILED: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

/// I/O error reading inputs or writing outputs.
pub const EXIT_IO: u8 = 3;

/// Parse error decoding an input sheet (CSV or Excel).
pub const EXIT_PARSE: u8 = 4;

/// The bank sheet has no description column in its header scan window.
pub const EXIT_BANK_COLUMNS: u8 = 5;

/// Run config failed to parse or validate.
pub const EXIT_INVALID_CONFIG: u8 = 6;
