//! End-to-end scan through the public API with a mocked transport.

mod helpers;

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use security_headers::{
    ConnectionRequest, FindingKind, HeaderMap, Protocol, RawResponse, ScanError, Scanner,
    Transport,
};

use helpers::{default_options, evaluator};

/// Answers every request with a fixed status and headers.
struct FixedTransport {
    status: u16,
    headers: Vec<&'static str>,
    requests: Mutex<Vec<ConnectionRequest>>,
}

#[async_trait]
impl Transport for FixedTransport {
    async fn get(&self, request: &ConnectionRequest) -> Result<RawResponse, ScanError> {
        self.requests
            .lock()
            .expect("requests lock poisoned")
            .push(request.clone());
        Ok(RawResponse {
            status: self.status,
            headers: HeaderMap::from_lines(&self.headers),
        })
    }
}

#[tokio::test]
async fn test_bare_host_scan_is_stamped_with_resolved_url_and_default_id() {
    let transport = Arc::new(FixedTransport {
        status: 200,
        headers: vec!["x-frame-options: DENY"],
        requests: Mutex::new(Vec::new()),
    });
    let scanner = Scanner::with_transport(default_options(), transport.clone(), evaluator());

    let findings = scanner.check_headers("example.com", None, None).await;

    assert!(!findings.is_empty());
    for finding in &findings {
        assert_eq!(finding.url.as_deref(), Some("https://example.com"));
        assert_eq!(finding.url_id, Some(1));
    }
    assert_eq!(findings[0].kind, FindingKind::Info);

    let requests = transport.requests.lock().expect("requests lock poisoned");
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].protocol, Protocol::Https);
    assert_eq!(requests[0].host, "example.com");
    assert_eq!(requests[0].path, "/");
    assert!(!requests[0].user_agent.is_empty());
}

#[tokio::test]
async fn test_batch_with_mixed_target_forms() {
    let transport = Arc::new(FixedTransport {
        status: 200,
        headers: vec![],
        requests: Mutex::new(Vec::new()),
    });
    let scanner = Scanner::with_transport(default_options(), transport, evaluator());

    let results = scanner
        .check_headers_parallel(vec!["example.com", "http://example.org"], None)
        .await
        .expect("batch should run inside a tokio runtime");

    assert_eq!(results.len(), 2);
    assert_eq!(results[0][0].url.as_deref(), Some("https://example.com"));
    assert_eq!(results[1][0].url.as_deref(), Some("http://example.org"));
}
