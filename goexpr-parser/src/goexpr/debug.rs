//! Opt-in tracing for debug builds
//!
//! Set `GOEXPR_DEBUG` to any value to get `[GOEXPR_DEBUG]` lines on stderr describing
//! category selection, wrapped parses and error reconciliation. Release builds compile the
//! checks away.

/// Name of the environment variable that enables tracing
pub const DEBUG_ENV: &str = "GOEXPR_DEBUG";

#[cfg(debug_assertions)]
pub fn enabled() -> bool {
    std::env::var(DEBUG_ENV).is_ok()
}

#[cfg(not(debug_assertions))]
pub fn enabled() -> bool {
    false
}

macro_rules! debug_trace {
    ($($arg:tt)*) => {
        if $crate::goexpr::debug::enabled() {
            eprintln!("[GOEXPR_DEBUG] {}", format_args!($($arg)*));
        }
    };
}

pub(crate) use debug_trace;
