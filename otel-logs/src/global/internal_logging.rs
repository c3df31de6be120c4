#![allow(unused_macros)]
//! Diagnostics emitted by the pipeline itself.
//!
//! `otel_debug!`, `otel_info!`, `otel_warn!` and `otel_error!` are meant for
//! SDK components, exporters and appenders, not for application logging.
//! Every event carries a stable `name` plus optional `key = value` fields.
//!
//! With the `internal-logs` feature enabled in the calling crate the events
//! are forwarded to `tracing` with the calling crate as target. Under
//! `cfg(test)` they are also printed to stdout, visible with `--nocapture`.

// Shared expansion of the level macros below.
#[doc(hidden)]
#[macro_export]
macro_rules! __otel_event {
    ($level:ident, $label:literal, $name:expr $(, $key:ident = $value:expr)*) => {{
        #[cfg(feature = "internal-logs")]
        {
            $crate::_private::$level!(
                name: $name,
                target: env!("CARGO_PKG_NAME"),
                name = $name
                $(, $key = $value)*
            );
        }

        #[cfg(test)]
        {
            print!("{}: name={}", $label, $name);
            $(
                print!(", {}={}", stringify!($key), $value);
            )*
            println!();
        }

        #[cfg(all(not(feature = "internal-logs"), not(test)))]
        {
            let _ = ($name $(, $value)*);
        }
    }};
}

/// Debug level internal event.
///
/// ```rust
/// use otel_logs::otel_debug;
/// otel_debug!(name: "BatchLogProcessor.ThreadStarted", max_queue_size = 2048);
/// ```
#[macro_export]
macro_rules! otel_debug {
    (name: $name:expr $(,)?) => {
        $crate::__otel_event!(debug, "otel_debug", $name)
    };
    (name: $name:expr, $($key:ident = $value:expr),+ $(,)?) => {
        $crate::__otel_event!(debug, "otel_debug", $name $(, $key = $value)+)
    };
}

/// Info level internal event.
///
/// ```rust
/// use otel_logs::otel_info;
/// otel_info!(name: "LoggerProvider.Built", processor_count = 1);
/// ```
#[macro_export]
macro_rules! otel_info {
    (name: $name:expr $(,)?) => {
        $crate::__otel_event!(info, "otel_info", $name)
    };
    (name: $name:expr, $($key:ident = $value:expr),+ $(,)?) => {
        $crate::__otel_event!(info, "otel_info", $name $(, $key = $value)+)
    };
}

/// Warning level internal event.
///
/// ```rust
/// use otel_logs::otel_warn;
/// otel_warn!(name: "BatchLogProcessor.LogDroppingStarted", max_queue_size = 2048);
/// ```
#[macro_export]
macro_rules! otel_warn {
    (name: $name:expr $(,)?) => {
        $crate::__otel_event!(warn, "otel_warn", $name)
    };
    (name: $name:expr, $($key:ident = $value:expr),+ $(,)?) => {
        $crate::__otel_event!(warn, "otel_warn", $name $(, $key = $value)+)
    };
}

/// Error level internal event.
///
/// ```rust
/// use otel_logs::otel_error;
/// otel_error!(name: "BatchLogProcessor.ExportError", error = "connection refused");
/// ```
#[macro_export]
macro_rules! otel_error {
    (name: $name:expr $(,)?) => {
        $crate::__otel_event!(error, "otel_error", $name)
    };
    (name: $name:expr, $($key:ident = $value:expr),+ $(,)?) => {
        $crate::__otel_event!(error, "otel_error", $name $(, $key = $value)+)
    };
}
