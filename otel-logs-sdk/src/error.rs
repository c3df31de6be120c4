//! Errors returned by SDK components.
use std::sync::PoisonError;
use std::time::Duration;
use thiserror::Error;

/// Failures of export, flush and shutdown operations.
///
/// Dropped records are never reported through this type; they are counted
/// by the processor that dropped them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SdkError {
    /// The component was already shut down.
    #[error("Shutdown already invoked")]
    AlreadyShutdown,

    /// The deadline elapsed before the operation completed.
    #[error("Operation timed out after {0:?}")]
    Timeout(Duration),

    /// The exporter reported a failure.
    #[error("Export failed: {0}")]
    ExportFailed(String),

    /// Any other failure, including several errors combined into one.
    #[error("Operation failed: {0}")]
    InternalFailure(String),
}

/// Result of SDK operations that produce no value.
pub type SdkResult = Result<(), SdkError>;

impl<T> From<PoisonError<T>> for SdkError {
    fn from(err: PoisonError<T>) -> Self {
        SdkError::InternalFailure(format!("lock poisoned: {err}"))
    }
}

impl From<SdkError> for otel_logs::Error {
    fn from(err: SdkError) -> Self {
        match err {
            SdkError::ExportFailed(reason) => otel_logs::Error::Export(reason),
            other => otel_logs::Error::Other(other.to_string()),
        }
    }
}

/// Folds the outcome of several operations into one result.
///
/// A single failure is returned unchanged; several are joined with `"; "`.
pub(crate) fn combine_results<I>(results: I) -> SdkResult
where
    I: IntoIterator<Item = SdkResult>,
{
    let mut errors: Vec<SdkError> = results.into_iter().filter_map(Result::err).collect();
    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0)),
        _ => Err(SdkError::InternalFailure(
            errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; "),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combine_keeps_single_error() {
        let result = combine_results([Ok(()), Err(SdkError::AlreadyShutdown), Ok(())]);
        assert_eq!(result, Err(SdkError::AlreadyShutdown));
    }

    #[test]
    fn combine_joins_several_errors() {
        let result = combine_results([
            Err(SdkError::ExportFailed("disk full".into())),
            Ok(()),
            Err(SdkError::Timeout(Duration::from_millis(5))),
        ]);
        assert_eq!(
            result,
            Err(SdkError::InternalFailure(
                "Export failed: disk full; Operation timed out after 5ms".into()
            ))
        );
        assert_eq!(combine_results(Vec::new()), Ok(()));
    }

    #[test]
    fn converts_to_api_error() {
        let api: otel_logs::Error = SdkError::ExportFailed("boom".into()).into();
        assert_eq!(api.to_string(), "export failed: boom");
        let api: otel_logs::Error = SdkError::AlreadyShutdown.into();
        assert_eq!(api.to_string(), "Shutdown already invoked");
    }
}
