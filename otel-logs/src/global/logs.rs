use std::{
    borrow::Cow,
    collections::HashMap,
    fmt,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex, OnceLock, PoisonError, RwLock,
    },
};

use once_cell::sync::Lazy;

use crate::{
    logs::{LogRecord, Logger, LoggerProvider},
    otel_debug, otel_warn, InstrumentationScope,
};

/// Allows a specific [`LoggerProvider`] to be used generically, by mirroring
/// the interface and boxing the returned loggers.
pub trait ObjectSafeLoggerProvider {
    /// Returns a boxed [`Logger`] for `scope` from the underlying provider.
    fn boxed_logger(&self, scope: InstrumentationScope) -> Box<dyn Logger + Send + Sync + 'static>;
}

impl<L, P> ObjectSafeLoggerProvider for P
where
    L: Logger + Send + Sync + 'static,
    P: LoggerProvider<Logger = L>,
{
    fn boxed_logger(&self, scope: InstrumentationScope) -> Box<dyn Logger + Send + Sync + 'static> {
        Box::new(self.logger_with_scope(scope))
    }
}

/// A [`Logger`] trait object handed out by the global provider.
pub struct BoxedLogger(Box<dyn Logger + Send + Sync + 'static>);

impl fmt::Debug for BoxedLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BoxedLogger")
    }
}

impl Logger for BoxedLogger {
    fn emit(&self, record: LogRecord) {
        self.0.emit(record)
    }
}

/// Represents the globally configured [`LoggerProvider`] instance.
#[derive(Clone)]
pub struct GlobalLoggerProvider {
    provider: Arc<dyn ObjectSafeLoggerProvider + Send + Sync>,
}

impl fmt::Debug for GlobalLoggerProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("GlobalLoggerProvider")
    }
}

impl GlobalLoggerProvider {
    fn new<L, P>(provider: P) -> Self
    where
        L: Logger + Send + Sync + 'static,
        P: LoggerProvider<Logger = L> + Send + Sync + 'static,
    {
        GlobalLoggerProvider {
            provider: Arc::new(provider),
        }
    }
}

impl LoggerProvider for GlobalLoggerProvider {
    type Logger = BoxedLogger;

    fn logger_with_scope(&self, scope: InstrumentationScope) -> Self::Logger {
        BoxedLogger(self.provider.boxed_logger(scope))
    }
}

/// Placeholder logger handed out before a real provider is installed.
///
/// Records emitted before the delegate is resolved are discarded.
#[derive(Clone)]
struct DeferredLogger {
    inner: Arc<DeferredLoggerInner>,
}

struct DeferredLoggerInner {
    scope: InstrumentationScope,
    delegate: OnceLock<BoxedLogger>,
}

impl DeferredLogger {
    fn new(scope: InstrumentationScope) -> Self {
        DeferredLogger {
            inner: Arc::new(DeferredLoggerInner {
                scope,
                delegate: OnceLock::new(),
            }),
        }
    }

    fn resolve(&self, provider: &GlobalLoggerProvider) {
        let _ = self
            .inner
            .delegate
            .set(provider.logger_with_scope(self.inner.scope.clone()));
    }
}

impl Logger for DeferredLogger {
    fn emit(&self, record: LogRecord) {
        if let Some(delegate) = self.inner.delegate.get() {
            delegate.emit(record);
        }
    }
}

#[derive(Default)]
struct DeferredState {
    loggers: HashMap<(String, Option<String>), DeferredLogger>,
    delegate: Option<GlobalLoggerProvider>,
}

/// Provider installed until [`set_logger_provider`] is called. It only keeps
/// logger identities, never record content.
#[derive(Clone, Default)]
struct DeferredLoggerProvider {
    state: Arc<Mutex<DeferredState>>,
}

impl DeferredLoggerProvider {
    fn set_delegate(&self, provider: &GlobalLoggerProvider) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let redirected = state.loggers.len();
        for (_, logger) in state.loggers.drain() {
            logger.resolve(provider);
        }
        state.delegate = Some(provider.clone());
        otel_debug!(
            name: "GlobalLoggerProvider.DeferredLoggersRedirected",
            count = redirected
        );
    }
}

impl LoggerProvider for DeferredLoggerProvider {
    type Logger = BoxedLogger;

    fn logger_with_scope(&self, scope: InstrumentationScope) -> Self::Logger {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(delegate) = &state.delegate {
            return delegate.logger_with_scope(scope);
        }
        let key = (
            scope.name().to_owned(),
            scope.version().map(ToOwned::to_owned),
        );
        let logger = state
            .loggers
            .entry(key)
            .or_insert_with(|| DeferredLogger::new(scope))
            .clone();
        BoxedLogger(Box::new(logger))
    }
}

static DEFERRED_LOGGER_PROVIDER: Lazy<DeferredLoggerProvider> = Lazy::new(Default::default);

static GLOBAL_LOGGER_PROVIDER: Lazy<RwLock<GlobalLoggerProvider>> = Lazy::new(|| {
    RwLock::new(GlobalLoggerProvider::new(
        DEFERRED_LOGGER_PROVIDER.clone(),
    ))
});

static DELEGATE_INSTALLED: AtomicBool = AtomicBool::new(false);

/// Returns the current global provider.
///
/// Until [`set_logger_provider`] runs this is a deferred provider whose
/// loggers are redirected once a real provider is installed.
pub fn logger_provider() -> GlobalLoggerProvider {
    GLOBAL_LOGGER_PROVIDER
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// Creates a named [`Logger`] via the global provider.
pub fn logger(name: impl Into<Cow<'static, str>>) -> BoxedLogger {
    logger_provider().logger(name)
}

/// Creates a [`Logger`] for `scope` via the global provider.
pub fn logger_with_scope(scope: InstrumentationScope) -> BoxedLogger {
    logger_provider().logger_with_scope(scope)
}

/// Installs the process-wide provider. Only the first call has an effect.
///
/// Every logger previously obtained from [`logger`], [`logger_with_scope`] or
/// [`logger_provider`] is redirected to `new_provider`, using the scope it was
/// first requested with. Later calls are ignored with a warning.
pub fn set_logger_provider<L, P>(new_provider: P)
where
    L: Logger + Send + Sync + 'static,
    P: LoggerProvider<Logger = L> + Send + Sync + 'static,
{
    if DELEGATE_INSTALLED
        .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
        .is_err()
    {
        otel_warn!(
            name: "GlobalLoggerProvider.AlreadySet",
            message = "a global logger provider is already installed, ignoring the new one"
        );
        return;
    }

    let provider = GlobalLoggerProvider::new(new_provider);
    let mut global = GLOBAL_LOGGER_PROVIDER
        .write()
        .unwrap_or_else(PoisonError::into_inner);
    DEFERRED_LOGGER_PROVIDER.set_delegate(&provider);
    *global = provider;
}
