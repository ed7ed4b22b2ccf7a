#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::io;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use skydns_core::error::SkyDnsError;
use skydns_core::labels::{ErrorClass, Transport};
use skydns_metrics::config::{self, MetricsConfig};
use skydns_metrics::exposition::{self, FatalHook};
use skydns_metrics::obs::{DnsMetrics, LegacyStats};

/// Records fatal errors instead of exiting.
fn recording_hook() -> (FatalHook, Arc<Mutex<Vec<String>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let hook: FatalHook = Arc::new(move |e: &SkyDnsError| {
        sink.lock().unwrap().push(format!("{}: {}", e.code().as_str(), e))
    });
    (hook, seen)
}

fn free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

fn local_cfg(port: u16) -> MetricsConfig {
    MetricsConfig {
        port: Some(port.to_string()),
        listen_host: "127.0.0.1".into(),
        ..MetricsConfig::default()
    }
}

/// Minimal HTTP/1.0 GET; returns (status line, full response).
async fn get(addr: SocketAddr, path: &str) -> (String, String) {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let req = format!("GET {path} HTTP/1.0\r\nHost: localhost\r\nConnection: close\r\n\r\n");
    stream.write_all(req.as_bytes()).await.unwrap();
    let mut buf = Vec::new();
    stream.read_to_end(&mut buf).await.unwrap();
    let text = String::from_utf8(buf).unwrap();
    let status = text.lines().next().unwrap_or_default().to_string();
    (status, text)
}

#[tokio::test]
async fn no_port_means_no_listener() {
    let (hook, seen) = recording_hook();
    let cfg = config::from_lookup(|_| None).unwrap();
    let exp = exposition::init(&cfg, hook).await.expect("must not fail");

    assert!(exp.server.is_none());
    // registry is still live for in-process callers
    exp.metrics.record_request(Transport::Tcp);
    assert_eq!(exp.metrics.request_count.get(&[("type", "tcp")]), 1);
    assert!(seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn bad_port_is_fatal() {
    let (hook, _) = recording_hook();
    let cfg = config::from_lookup(|k| (k == "PROMETHEUS_PORT").then(|| "notanumber".to_string())).unwrap();
    let err = exposition::init(&cfg, hook).await.err().expect("must fail");
    assert_eq!(err.code().as_str(), "BAD_CONFIG");
    assert!(err.to_string().contains("bad port for prometheus: notanumber"));
}

#[tokio::test]
async fn bind_conflict_is_fatal() {
    let taken = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = taken.local_addr().unwrap().port();

    let (hook, _) = recording_hook();
    let err = exposition::init(&local_cfg(port), hook).await.err().expect("must fail");
    assert_eq!(err.code().as_str(), "BIND_FAILED");
}

#[tokio::test]
async fn scrape_shows_request_count_after_udp_increment() {
    let (hook, seen) = recording_hook();
    let exp = exposition::init(&local_cfg(free_port()), hook).await.expect("init");
    let server = exp.server.as_ref().expect("server must run");
    assert_eq!(server.path(), "/metrics");

    exp.metrics.record_request(Transport::Udp);

    let (status, body) = get(server.local_addr(), "/metrics").await;
    assert!(status.contains("200"), "{status}");
    assert!(body.contains("text/plain; version=0.0.4"));
    assert!(body.lines().any(|l| l.starts_with("skydns_dns_request_count")));
    assert!(body.contains("skydns_dns_request_count{type=\"udp\"} 1\n"));
    assert!(body.contains("# TYPE skydns_dns_response_size histogram\n"));

    let (status, _) = get(server.local_addr(), "/other").await;
    assert!(status.contains("404"), "{status}");

    assert!(seen.lock().unwrap().is_empty());
    server.abort();
}

#[tokio::test]
async fn scrape_honours_path_and_namespace() {
    let (hook, _) = recording_hook();
    let metrics = Arc::new(DnsMetrics::new("edge", "dns").unwrap());
    let server = exposition::serve(
        Arc::clone(&metrics),
        "127.0.0.1:0".parse().unwrap(),
        "/stats",
        hook,
    )
    .await
    .unwrap();

    let stats = LegacyStats::bound_to(&metrics);
    stats.name_error.inc(2);
    metrics.record_error(ErrorClass::Nxdomain);

    let (status, body) = get(server.local_addr(), "/stats").await;
    assert!(status.contains("200"), "{status}");
    assert!(body.contains("edge_dns_dns_error_count{error=\"nxdomain\"} 3\n"));

    let (status, _) = get(server.local_addr(), "/metrics").await;
    assert!(status.contains("404"), "{status}");
    server.abort();
}

#[tokio::test]
async fn serve_error_reaches_fatal_hook() {
    let (hook, seen) = recording_hook();
    let task = exposition::spawn_until_fatal(
        async { Err::<(), _>(io::Error::new(io::ErrorKind::Other, "accept failed")) },
        hook,
    );
    task.await.unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert!(seen[0].starts_with("SERVE_FAILED"), "{}", seen[0]);
    assert!(seen[0].contains("accept failed"));
}

#[tokio::test]
async fn serve_returning_cleanly_is_still_fatal() {
    let (hook, seen) = recording_hook();
    exposition::spawn_until_fatal(async { Ok::<(), io::Error>(()) }, hook).await.unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert!(seen[0].starts_with("SERVE_FAILED: metrics listener stopped: listener exited"));
}
