//! Subcommands

pub mod new;
pub mod run;
pub mod validate;

/// Pass/fail marker for terminal output
pub fn status_icon(pass: bool) -> &'static str {
    if pass {
        "[OK]"
    } else {
        "[FAIL]"
    }
}
