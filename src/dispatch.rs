//! Parallel dispatcher.
//!
//! Fans a batch of targets out over a bounded pool of tokio tasks. Each task
//! runs the whole single-target pipeline; results come back in submission
//! order while the optional callback sees them in completion order.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use log::{debug, info, warn};
use tokio::runtime::Handle;

use crate::config::ScanOptions;
use crate::error_handling::{error_finding, ScanError};
use crate::fetch::{check_target, normalize_target, ProcessingContext};
use crate::models::{Finding, Target};

/// Per-result callback.
///
/// Called once per target as soon as its findings are ready. Errors and panics
/// are logged and otherwise ignored.
pub type ResultCallback<'a> = dyn FnMut(&Target, &[Finding]) -> anyhow::Result<()> + Send + 'a;

/// Scans every target concurrently and returns their findings in input order.
///
/// At most `options.max_workers` targets are in flight at any time; the rest
/// queue. Redirect budget and timeout come from `options`.
///
/// # Errors
///
/// Returns `ScanError::ParallelismUnsupported` when called outside a tokio
/// runtime or with `max_workers == 0`. No target is fetched in that case.
/// Per-target failures never surface here; they become error findings.
pub async fn check_targets_parallel(
    ctx: &ProcessingContext,
    targets: Vec<Target>,
    options: &ScanOptions,
    mut callback: Option<&mut ResultCallback<'_>>,
) -> Result<Vec<Vec<Finding>>, ScanError> {
    let handle = Handle::try_current()
        .map_err(|e| ScanError::ParallelismUnsupported(e.to_string()))?;
    if options.max_workers == 0 {
        return Err(ScanError::ParallelismUnsupported(
            "worker pool capacity must be at least 1".to_string(),
        ));
    }

    let total = targets.len();
    info!(
        "Scanning {} target(s) with up to {} worker(s)",
        total, options.max_workers
    );

    let options = Arc::new(options.clone());
    let mut results: Vec<Option<Vec<Finding>>> = vec![None; total];

    let mut completed = stream::iter(targets.into_iter().enumerate())
        .map(|(index, target)| {
            let ctx = ctx.clone();
            let options = Arc::clone(&options);
            let handle = handle.clone();
            async move {
                let task_target = target.clone();
                let joined = handle
                    .spawn(async move {
                        check_target(
                            &ctx,
                            task_target,
                            options.redirects,
                            options.timeout(),
                            &options,
                        )
                        .await
                    })
                    .await;
                (index, target, joined)
            }
        })
        .buffer_unordered(options.max_workers);

    while let Some((index, target, joined)) = completed.next().await {
        let findings = match joined {
            Ok(findings) => findings,
            Err(e) => {
                let url = normalize_target(&target.url, &options.default_scheme);
                vec![error_finding(
                    &ScanError::WorkerFailed(e.to_string()),
                    &url,
                    target.url_id,
                )]
            }
        };

        if let Some(cb) = callback.as_mut() {
            invoke_callback(cb, &target, &findings);
        }
        results[index] = Some(findings);
    }

    debug!("Batch of {} target(s) complete", total);
    Ok(results.into_iter().map(Option::unwrap_or_default).collect())
}

fn invoke_callback(callback: &mut ResultCallback<'_>, target: &Target, findings: &[Finding]) {
    match catch_unwind(AssertUnwindSafe(|| callback(target, findings))) {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!(
            "Result callback failed for {} (url_id={}): {:#}",
            target.url, target.url_id, e
        ),
        Err(_) => warn!(
            "Result callback panicked for {} (url_id={})",
            target.url, target.url_id
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::HeaderEvaluator;
    use crate::fetch::{ConnectionRequest, RawResponse, Transport};
    use crate::headers::HeaderMap;
    use crate::models::{FindingKind, Severity};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Sleeps longer for hosts that come earlier in the alphabet and tracks the
    /// peak number of concurrent requests.
    struct SlowTransport {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    impl SlowTransport {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                in_flight: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl Transport for SlowTransport {
        async fn get(&self, request: &ConnectionRequest) -> Result<RawResponse, ScanError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);

            let delay = match request.host.as_str() {
                "a.example" => 200,
                "b.example" => 80,
                _ => 5,
            };
            tokio::time::sleep(Duration::from_millis(delay)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if request.host == "down.example" {
                return Err(ScanError::Connect("connection refused".to_string()));
            }
            Ok(RawResponse {
                status: 200,
                headers: HeaderMap::from_lines(&[format!("x-host: {}", request.host)]),
            })
        }
    }

    struct HostEcho;

    impl HeaderEvaluator for HostEcho {
        fn evaluate(&self, headers: &HeaderMap, _options: &ScanOptions) -> Vec<Finding> {
            if headers.get("x-host") == Some("panic.example") {
                panic!("evaluator blew up");
            }
            vec![Finding::new(
                Some("HostEcho"),
                FindingKind::Info,
                headers.get("x-host").unwrap_or_default(),
                Severity::None,
            )]
        }
    }

    fn context(transport: Arc<SlowTransport>) -> ProcessingContext {
        ProcessingContext::new(transport, Arc::new(HostEcho))
    }

    fn targets(hosts: &[&str]) -> Vec<Target> {
        hosts
            .iter()
            .enumerate()
            .map(|(i, host)| Target::new(i as u64 + 10, *host))
            .collect()
    }

    #[tokio::test]
    async fn test_results_follow_submission_order() {
        let ctx = context(SlowTransport::new());
        let mut order = Vec::new();
        let mut callback = |target: &Target, _: &[Finding]| -> anyhow::Result<()> {
            order.push(target.url.clone());
            Ok(())
        };

        let results = check_targets_parallel(
            &ctx,
            targets(&["a.example", "b.example", "c.example"]),
            &ScanOptions::default(),
            Some(&mut callback),
        )
        .await
        .unwrap();

        let messages: Vec<_> = results.iter().map(|r| r[0].message.as_str()).collect();
        assert_eq!(messages, vec!["a.example", "b.example", "c.example"]);
        let ids: Vec<_> = results.iter().map(|r| r[0].url_id).collect();
        assert_eq!(ids, vec![Some(10), Some(11), Some(12)]);
        // Completion order: the slowest target finishes last
        assert_eq!(order.len(), 3);
        assert_eq!(order.last().map(String::as_str), Some("a.example"));
    }

    #[tokio::test]
    async fn test_pool_capacity_bounds_in_flight_requests() {
        let transport = SlowTransport::new();
        let ctx = context(transport.clone());
        let options = ScanOptions {
            max_workers: 2,
            ..Default::default()
        };
        let hosts: Vec<String> = (0..8).map(|i| format!("h{i}.example")).collect();
        let hosts: Vec<&str> = hosts.iter().map(String::as_str).collect();

        let results = check_targets_parallel(&ctx, targets(&hosts), &options, None)
            .await
            .unwrap();

        assert_eq!(results.len(), 8);
        assert!(transport.peak.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn test_failing_target_does_not_affect_siblings() {
        let ctx = context(SlowTransport::new());
        let results = check_targets_parallel(
            &ctx,
            targets(&["a.example", "down.example", "c.example"]),
            &ScanOptions::default(),
            None,
        )
        .await
        .unwrap();

        assert_eq!(results.len(), 3);
        assert_eq!(results[0][0].message, "a.example");
        assert!(results[1][0].is_transport_error());
        assert_eq!(results[1][0].url.as_deref(), Some("https://down.example"));
        assert_eq!(results[2][0].message, "c.example");
    }

    #[tokio::test]
    async fn test_panicking_worker_becomes_error_finding() {
        let ctx = context(SlowTransport::new());
        let results = check_targets_parallel(
            &ctx,
            targets(&["panic.example", "c.example"]),
            &ScanOptions::default(),
            None,
        )
        .await
        .unwrap();

        assert_eq!(results[0].len(), 1);
        assert!(results[0][0].is_transport_error());
        assert_eq!(results[0][0].url_id, Some(10));
        assert_eq!(results[1][0].message, "c.example");
    }

    #[tokio::test]
    async fn test_callback_errors_and_panics_do_not_abort_batch() {
        let ctx = context(SlowTransport::new());
        let mut calls = 0;
        let mut callback = |target: &Target, _: &[Finding]| -> anyhow::Result<()> {
            calls += 1;
            match target.url.as_str() {
                "a.example" => anyhow::bail!("sink unavailable"),
                "b.example" => panic!("sink crashed"),
                _ => Ok(()),
            }
        };

        let results = check_targets_parallel(
            &ctx,
            targets(&["a.example", "b.example", "c.example"]),
            &ScanOptions::default(),
            Some(&mut callback),
        )
        .await
        .unwrap();

        assert_eq!(results.len(), 3);
        assert_eq!(calls, 3);
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let ctx = context(SlowTransport::new());
        let results = check_targets_parallel(&ctx, Vec::new(), &ScanOptions::default(), None)
            .await
            .unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_zero_workers_is_unsupported() {
        let ctx = context(SlowTransport::new());
        let options = ScanOptions {
            max_workers: 0,
            ..Default::default()
        };
        let result = check_targets_parallel(&ctx, targets(&["a.example"]), &options, None).await;
        assert!(matches!(result, Err(ScanError::ParallelismUnsupported(_))));
    }

    #[test]
    fn test_outside_runtime_is_unsupported() {
        let transport = SlowTransport::new();
        let ctx = context(transport.clone());
        let result = futures::executor::block_on(check_targets_parallel(
            &ctx,
            targets(&["a.example"]),
            &ScanOptions::default(),
            None,
        ));
        assert!(matches!(result, Err(ScanError::ParallelismUnsupported(_))));
        assert_eq!(transport.peak.load(Ordering::SeqCst), 0);
    }
}
