//! Runs the hyper transport and the resolver against local axum services that
//! stand in for the geolocation and tz-string services.

use auto_timezone::http::{HttpTransport, HyperTransport};
use auto_timezone::services::provider::GeolocationProvider;
use auto_timezone::services::resolver::{ResolverConfig, TimezoneStringResolver};
use auto_timezone::ErrorKind;
use axum::{extract::Query, http::StatusCode, routing::get, Router};
use std::collections::HashMap;
use std::io;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

async fn tzstring_handler(Query(query): Query<HashMap<String, String>>) -> (StatusCode, &'static str) {
    match query.get("timezone").map(String::as_str) {
        None => (StatusCode::BAD_REQUEST, "UTC"),
        Some("Asia/Jerusalem") => (StatusCode::OK, "IST-2IDT,M3.4.4/26,M10.5.0"),
        Some("America/New_York") => (StatusCode::OK, "EST5EDT,M3.2.0,M11.1.0"),
        Some(_) => (StatusCode::NOT_FOUND, "UTC"),
    }
}

async fn spawn_services(timezone: &'static str) -> SocketAddr {
    let app = Router::new()
        .route("/timezone", get(move || async move { format!("{}\n", timezone) }))
        .route("/tzstring", get(tzstring_handler))
        .route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                "late"
            }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read local address");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Test server failed");
    });

    addr
}

/// Collects formatted log output for assertions.
#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    fn install(&self) -> tracing::subscriber::DefaultGuard {
        let buffer = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || buffer.clone())
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    fn count(&self, tag: &str) -> usize {
        let output = String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned();
        output.matches(tag).count()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn local_config(addr: SocketAddr) -> ResolverConfig {
    ResolverConfig {
        provider: GeolocationProvider::Ipapi,
        geolocation_url: format!("http://{}/timezone", addr),
        tz_string_url_template: format!("http://{}/tzstring?timezone={{{{timezone}}}}", addr),
    }
}

#[tokio::test]
async fn test_transport_reads_body_and_status() {
    let addr = spawn_services("Asia/Jerusalem").await;
    let transport = HyperTransport::new(Duration::from_secs(5)).unwrap();

    let response = transport
        .get(&format!("http://{}/timezone", addr))
        .await
        .unwrap();
    assert_eq!(response.status, 200);
    assert_eq!(&response.body[..], b"Asia/Jerusalem\n");

    let response = transport
        .get(&format!("http://{}/tzstring?timezone=Nowhere", addr))
        .await
        .unwrap();
    assert_eq!(response.status, 404);
    assert!(!response.is_success());
}

#[tokio::test]
async fn test_resolver_over_http() {
    let addr = spawn_services("Asia/Jerusalem").await;
    let resolver = TimezoneStringResolver::with_timeout(local_config(addr), Duration::from_secs(5)).unwrap();

    let resolved = resolver.resolve().await.unwrap();

    assert_eq!(resolved.timezone, "Asia/Jerusalem");
    assert_eq!(resolved.tz_string, "IST-2IDT,M3.4.4/26,M10.5.0");
}

#[tokio::test]
async fn test_encoded_name_decoded_by_server() {
    let addr = spawn_services("America/New_York").await;
    let resolver = TimezoneStringResolver::with_timeout(local_config(addr), Duration::from_secs(5)).unwrap();

    assert_eq!(
        resolver.get_tz_string().await.unwrap(),
        "EST5EDT,M3.2.0,M11.1.0"
    );
}

#[tokio::test]
async fn test_unknown_timezone_is_network_error() {
    let addr = spawn_services("Mars/Olympus").await;
    let resolver = TimezoneStringResolver::with_timeout(local_config(addr), Duration::from_secs(5)).unwrap();

    let err = resolver.get_tz_string().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Network);
    assert!(err.to_string().contains("404"));
}

#[tokio::test]
async fn test_slow_service_times_out() {
    let addr = spawn_services("Asia/Jerusalem").await;
    let transport = HyperTransport::new(Duration::from_millis(200)).unwrap();

    let err = transport
        .get(&format!("http://{}/slow", addr))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Network);
    assert!(err.to_string().contains("timed out"));
}

#[tokio::test]
async fn test_connection_refused_is_network_error() {
    let addr = {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };

    // Nothing listens on the port once the listener is dropped
    let resolver = TimezoneStringResolver::with_timeout(local_config(addr), Duration::from_secs(5)).unwrap();

    let err = resolver.get_tz_string().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Network);
}

#[tokio::test]
async fn test_failed_request_logged_once() {
    let logs = LogBuffer::default();
    let _guard = logs.install();

    let addr = {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };
    let resolver = TimezoneStringResolver::with_timeout(local_config(addr), Duration::from_secs(5)).unwrap();

    let err = resolver.get_tz_string().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Network);
    assert_eq!(logs.count("HTTP_ERROR"), 1);
    assert_eq!(logs.count("HTTP_ERROR: geolocation"), 1);
}

#[tokio::test]
async fn test_timeout_logged_with_service_name() {
    let logs = LogBuffer::default();
    let _guard = logs.install();

    let addr = spawn_services("Asia/Jerusalem").await;
    let config = ResolverConfig {
        geolocation_url: format!("http://{}/slow", addr),
        ..local_config(addr)
    };
    let resolver = TimezoneStringResolver::with_timeout(config, Duration::from_millis(200)).unwrap();

    let err = resolver.get_tz_string().await.unwrap_err();
    assert!(err.to_string().contains("timed out"));
    assert_eq!(logs.count("TIMEOUT"), 1);
    assert_eq!(logs.count("HTTP_ERROR"), 1);
    assert_eq!(logs.count("HTTP_ERROR: geolocation"), 1);
}
