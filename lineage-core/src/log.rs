//! Internal logging shims.
//!
//! Expand to the matching `tracing` macro when the `tracing` feature is on
//! and to nothing otherwise.

macro_rules! log_event {
    ($level:ident, $($arg:tt)*) => {{
        #[cfg(feature = "tracing")]
        {
            ::tracing::$level!($($arg)*);
        }
    }};
}

macro_rules! log_trace {
    ($($arg:tt)*) => { log_event!(trace, $($arg)*) };
}

macro_rules! log_debug {
    ($($arg:tt)*) => { log_event!(debug, $($arg)*) };
}

macro_rules! log_info {
    ($($arg:tt)*) => { log_event!(info, $($arg)*) };
}

macro_rules! log_error {
    ($($arg:tt)*) => { log_event!(error, $($arg)*) };
}
