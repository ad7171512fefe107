// Shared test helpers: a small checker set and scanner constructors.
//
// This module is included by several test files; not every file uses every helper.

use std::net::TcpListener;
use std::sync::Arc;

use rustls::pki_types::{PrivateKeyDer, PrivatePkcs8KeyDer};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio_rustls::TlsAcceptor;

use security_headers::{
    Checker, CheckerRegistry, Finding, FindingKind, HeaderMap, RegistryEvaluator, ScanOptions,
    Scanner, Severity,
};

/// Name of the test checker for `X-Frame-Options`.
#[allow(dead_code)]
pub const X_FRAME_OPTIONS_CHECKER: &str = "XFrameOptionsChecker";

/// Reports whether `X-Frame-Options` is present and sensible.
pub struct XFrameOptionsChecker;

impl Checker for XFrameOptionsChecker {
    fn name(&self) -> &str {
        X_FRAME_OPTIONS_CHECKER
    }

    fn check(&self, headers: &HeaderMap, _options: &ScanOptions) -> Vec<Finding> {
        let finding = match headers.get("x-frame-options") {
            Some(value)
                if value.eq_ignore_ascii_case("deny") || value.eq_ignore_ascii_case("sameorigin") =>
            {
                Finding::new(
                    Some(X_FRAME_OPTIONS_CHECKER),
                    FindingKind::Info,
                    "X-Frame-Options is set",
                    Severity::None,
                )
                .with_header("x-frame-options", Some(value.to_string()))
            }
            Some(value) => Finding::new(
                Some(X_FRAME_OPTIONS_CHECKER),
                FindingKind::Warning,
                "X-Frame-Options has an unexpected value",
                Severity::Medium,
            )
            .with_header("x-frame-options", Some(value.to_string())),
            None => Finding::new(
                Some(X_FRAME_OPTIONS_CHECKER),
                FindingKind::Warning,
                "X-Frame-Options header is missing",
                Severity::Medium,
            )
            .with_header("x-frame-options", None),
        };
        vec![finding]
    }
}

/// Evaluator backed by the test checkers.
#[allow(dead_code)]
pub fn evaluator() -> Arc<RegistryEvaluator> {
    let mut registry = CheckerRegistry::new();
    registry.register(Arc::new(XFrameOptionsChecker));
    Arc::new(RegistryEvaluator::new(registry))
}

/// Options running the test checkers with a short timeout.
#[allow(dead_code)]
pub fn default_options() -> ScanOptions {
    ScanOptions {
        checks: vec![X_FRAME_OPTIONS_CHECKER.to_string()],
        timeout_seconds: Some(5),
        ..Default::default()
    }
}

/// Scanner using the real `reqwest` transport.
#[allow(dead_code)]
pub fn scanner() -> Scanner {
    Scanner::new(default_options(), evaluator()).expect("Failed to build scanner")
}

/// Returns a local URL on which nothing is listening.
#[allow(dead_code)]
pub fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind listener");
    let addr = listener.local_addr().expect("Listener has no address");
    drop(listener);
    format!("http://{}/", addr)
}

/// Starts an HTTPS listener on localhost with a freshly generated self-signed
/// certificate. Every connection that completes the handshake gets `response`
/// written back verbatim once the request head has been read.
///
/// Returns the `https://` URL of the listener root.
#[allow(dead_code)]
pub async fn spawn_self_signed_https(response: &'static str) -> String {
    let certified = rcgen::generate_simple_self_signed(vec!["localhost".to_string()])
        .expect("Failed to generate certificate");
    let key = PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(certified.key_pair.serialize_der()));
    let config = rustls::ServerConfig::builder_with_provider(Arc::new(
        rustls::crypto::ring::default_provider(),
    ))
    .with_safe_default_protocol_versions()
    .expect("Failed to select TLS versions")
    .with_no_client_auth()
    .with_single_cert(vec![certified.cert.der().clone()], key)
    .expect("Failed to load certificate");
    let acceptor = TlsAcceptor::from(Arc::new(config));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind listener");
    let addr = listener.local_addr().expect("Listener has no address");

    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            let acceptor = acceptor.clone();
            tokio::spawn(async move {
                // A client that rejects the certificate aborts here
                let Ok(mut tls) = acceptor.accept(stream).await else {
                    return;
                };
                let mut head = Vec::new();
                let mut buf = [0u8; 1024];
                while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                    match tls.read(&mut buf).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => head.extend_from_slice(&buf[..n]),
                    }
                }
                let _ = tls.write_all(response.as_bytes()).await;
                let _ = tls.shutdown().await;
            });
        }
    });

    format!("https://{}/", addr)
}
