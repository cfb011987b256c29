//! Crate-private logging hook.

/// Emits a `tracing` event at `$level` when the `tracing` feature is enabled
/// and compiles to nothing otherwise.
///
/// ```text
/// trace_event!(debug, len = 3, "array reset");
/// ```
macro_rules! trace_event {
    ($level:ident, $($arg:tt)+) => {
        #[cfg(feature = "tracing")]
        {
            tracing::$level!(target: "atomint", $($arg)+);
        }
    };
}
