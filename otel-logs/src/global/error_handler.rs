use crate::Error;
use once_cell::sync::Lazy;
use std::sync::RwLock;

static GLOBAL_ERROR_HANDLER: Lazy<RwLock<Option<ErrorHandler>>> = Lazy::new(|| RwLock::new(None));

struct ErrorHandler(Box<dyn Fn(Error) + Send + Sync>);

/// Reports a pipeline error to the process-wide error sink.
///
/// Writes to stderr if no handler was installed with [`set_error_handler`].
pub fn handle_error<T: Into<Error>>(err: T) {
    let err = err.into();
    match GLOBAL_ERROR_HANDLER.read() {
        Ok(guard) => match guard.as_ref() {
            Some(handler) => (handler.0)(err),
            None => eprintln!("otel-logs error occurred: {err}"),
        },
        Err(_) => eprintln!("otel-logs error occurred: {err}"),
    }
}

/// Installs the process-wide error sink, replacing any previous one.
pub fn set_error_handler<F>(f: F) -> Result<(), Error>
where
    F: Fn(Error) + Send + Sync + 'static,
{
    GLOBAL_ERROR_HANDLER
        .write()
        .map(|mut handler| *handler = Some(ErrorHandler(Box::new(f))))
        .map_err(Into::into)
}
