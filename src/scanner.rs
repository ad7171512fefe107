//! Public scanning facade.

use std::sync::Arc;
use std::time::Duration;

use log::debug;

use crate::config::ScanOptions;
use crate::dispatch::{check_targets_parallel, ResultCallback};
use crate::error_handling::{InitializationError, ScanError};
use crate::evaluation::{evaluate_headers, HeaderEvaluator};
use crate::fetch::{check_target, ProcessingContext, ReqwestTransport, Transport};
use crate::headers::HeaderMap;
use crate::initialization::init_client;
use crate::models::{Finding, Target};

/// Checks security headers of live targets or of header sets supplied directly.
///
/// Holds the batch configuration and the shared transport and evaluator. Every
/// check accepts an optional `&ScanOptions` that replaces the batch
/// configuration for that one call. The TLS trust setting is the exception: it
/// is fixed when the transport is built.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use security_headers::{CheckerRegistry, RegistryEvaluator, ScanOptions, Scanner};
///
/// # async fn run() -> anyhow::Result<()> {
/// let evaluator = Arc::new(RegistryEvaluator::new(CheckerRegistry::new()));
/// let scanner = Scanner::new(ScanOptions::default(), evaluator)?;
///
/// let findings = scanner.check_headers("example.com", None, None).await;
/// let batch = scanner
///     .check_headers_parallel(vec![(1u64, "example.com"), (2, "example.org")], None)
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Scanner {
    options: ScanOptions,
    ctx: ProcessingContext,
}

impl Scanner {
    /// Creates a scanner backed by a `reqwest` client.
    ///
    /// # Errors
    ///
    /// Returns `InitializationError::HttpClientError` if the client cannot be
    /// built.
    pub fn new(
        options: ScanOptions,
        evaluator: Arc<dyn HeaderEvaluator>,
    ) -> Result<Self, InitializationError> {
        let client = init_client(&options)?;
        let transport: Arc<dyn Transport> = Arc::new(ReqwestTransport::new(client));
        Ok(Self::with_transport(options, transport, evaluator))
    }

    /// Creates a scanner with a caller-supplied transport.
    pub fn with_transport(
        options: ScanOptions,
        transport: Arc<dyn Transport>,
        evaluator: Arc<dyn HeaderEvaluator>,
    ) -> Self {
        Self {
            options,
            ctx: ProcessingContext::new(transport, evaluator),
        }
    }

    /// The batch configuration.
    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    /// Sets a checker option in the batch configuration.
    pub fn set_option(&mut self, checker: &str, key: &str, value: impl Into<String>) {
        self.options.set_option(checker, key, value);
    }

    /// Reads a checker option from the batch configuration.
    pub fn get_option(&self, checker: &str, key: &str) -> Option<&str> {
        self.options.get_option(checker, key)
    }

    /// Checker names known to the evaluator.
    pub fn checker_names(&self) -> Vec<String> {
        self.ctx.evaluator.checker_names()
    }

    fn resolve_options<'a>(&'a self, options: Option<&'a ScanOptions>) -> &'a ScanOptions {
        options.unwrap_or(&self.options)
    }

    /// Evaluates a raw multi-line header block.
    pub fn check_headers_from_string(
        &self,
        raw: &str,
        options: Option<&ScanOptions>,
    ) -> Vec<Finding> {
        self.check_headers_with_map(&HeaderMap::from_raw(raw), options)
    }

    /// Evaluates pre-split header lines.
    pub fn check_headers_with_list<S: AsRef<str>>(
        &self,
        lines: &[S],
        options: Option<&ScanOptions>,
    ) -> Vec<Finding> {
        self.check_headers_with_map(&HeaderMap::from_lines(lines), options)
    }

    /// Evaluates an already built header map.
    ///
    /// No URL is involved, so findings are returned without URL or identifier.
    pub fn check_headers_with_map(
        &self,
        headers: &HeaderMap,
        options: Option<&ScanOptions>,
    ) -> Vec<Finding> {
        evaluate_headers(
            self.ctx.evaluator.as_ref(),
            headers,
            self.resolve_options(options),
        )
    }

    /// Fetches one target and evaluates its headers.
    ///
    /// `follow_redirects` defaults to the configured hop budget. The configured
    /// timeout applies.
    pub async fn check_headers(
        &self,
        target: impl Into<Target>,
        follow_redirects: Option<u32>,
        options: Option<&ScanOptions>,
    ) -> Vec<Finding> {
        let options = self.resolve_options(options);
        self.check_headers_with_timeout(
            target,
            follow_redirects,
            options.timeout(),
            Some(options),
        )
        .await
    }

    /// Same as [`Scanner::check_headers`] with an explicit per-request timeout.
    pub async fn check_headers_with_timeout(
        &self,
        target: impl Into<Target>,
        follow_redirects: Option<u32>,
        timeout: Option<Duration>,
        options: Option<&ScanOptions>,
    ) -> Vec<Finding> {
        let options = self.resolve_options(options);
        let target = target.into();
        let hops = follow_redirects.unwrap_or(options.redirects);
        debug!(
            "Checking {} (url_id={}), hop budget {}",
            target.url, target.url_id, hops
        );
        check_target(&self.ctx, target, hops, timeout, options).await
    }

    /// Fetches a batch of targets concurrently.
    ///
    /// Results are aligned with the input order.
    ///
    /// # Errors
    ///
    /// Returns `ScanError::ParallelismUnsupported` if no tokio runtime is
    /// available or the worker pool capacity is zero.
    pub async fn check_headers_parallel<I, T>(
        &self,
        targets: I,
        options: Option<&ScanOptions>,
    ) -> Result<Vec<Vec<Finding>>, ScanError>
    where
        I: IntoIterator<Item = T>,
        T: Into<Target>,
    {
        let targets: Vec<Target> = targets.into_iter().map(Into::into).collect();
        check_targets_parallel(&self.ctx, targets, self.resolve_options(options), None).await
    }

    /// Like [`Scanner::check_headers_parallel`], calling `callback` as each
    /// target completes.
    ///
    /// Callback errors and panics are logged and do not stop the batch.
    pub async fn check_headers_parallel_with_callback<I, T>(
        &self,
        targets: I,
        options: Option<&ScanOptions>,
        callback: &mut ResultCallback<'_>,
    ) -> Result<Vec<Vec<Finding>>, ScanError>
    where
        I: IntoIterator<Item = T>,
        T: Into<Target>,
    {
        let targets: Vec<Target> = targets.into_iter().map(Into::into).collect();
        check_targets_parallel(
            &self.ctx,
            targets,
            self.resolve_options(options),
            Some(callback),
        )
        .await
    }
}
