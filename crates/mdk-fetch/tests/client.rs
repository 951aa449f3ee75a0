//! Integration tests against a minimal in-process HTTP stub.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread;
use std::time::Duration;

use mdk_fetch::{FetchError, MetadataClient};
use mdk_model::VariableId;
use tempfile::TempDir;

/// Serves exactly one canned response on a loopback port and returns
/// the base URL to reach it.
fn serve_once(status_line: &str, body: &str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let response = format!(
        "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    thread::spawn(move || {
        if let Ok((mut stream, _)) = listener.accept() {
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            loop {
                match stream.read(&mut buf) {
                    Ok(0) => break,
                    Ok(n) => {
                        request.extend_from_slice(&buf[..n]);
                        if request.windows(4).any(|w| w == b"\r\n\r\n") {
                            break;
                        }
                    }
                    Err(_) => break,
                }
            }
            let _ = stream.write_all(response.as_bytes());
        }
    });
    format!("http://{addr}")
}

fn id(name: &str) -> VariableId {
    VariableId::new(name).unwrap()
}

#[test]
fn fetches_and_persists_document() {
    let base = serve_once("200 OK", r#"{"name":"age","dataType":"numeric"}"#);
    let workdir = TempDir::new().unwrap();
    let client = MetadataClient::new(base, Duration::from_secs(5)).unwrap();

    let fetched = client.fetch(&id("age"), workdir.path()).unwrap();
    assert_eq!(fetched.raw["dataType"], "numeric");
    assert_eq!(fetched.path, workdir.path().join("AGE/AGE.json"));

    let on_disk = std::fs::read_to_string(&fetched.path).unwrap();
    assert_eq!(on_disk, r#"{"name":"age","dataType":"numeric"}"#);
}

#[test]
fn non_success_status_is_reported() {
    let base = serve_once("404 Not Found", r#"{"error":"unknown variable"}"#);
    let workdir = TempDir::new().unwrap();
    let client = MetadataClient::new(base, Duration::from_secs(5)).unwrap();

    let err = client.fetch(&id("age"), workdir.path()).unwrap_err();
    match err {
        FetchError::Status { variable, status } => {
            assert_eq!(variable, "age");
            assert_eq!(status, 404);
        }
        other => panic!("unexpected error: {other}"),
    }
    // nothing persisted for a failed fetch
    assert!(!workdir.path().join("AGE").exists());
}

#[test]
fn non_json_body_is_persisted_then_rejected() {
    let base = serve_once("200 OK", "<html>maintenance</html>");
    let workdir = TempDir::new().unwrap();
    let client = MetadataClient::new(base, Duration::from_secs(5)).unwrap();

    let err = client.fetch(&id("age"), workdir.path()).unwrap_err();
    assert!(matches!(err, FetchError::Parse { .. }));
    // the raw body is still on disk for inspection
    let on_disk = std::fs::read_to_string(workdir.path().join("AGE/AGE.json")).unwrap();
    assert_eq!(on_disk, "<html>maintenance</html>");
}

#[test]
fn unreachable_service_is_a_network_error() {
    // bind then drop to get a port nothing listens on
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let workdir = TempDir::new().unwrap();
    let client = MetadataClient::new(
        format!("http://127.0.0.1:{port}"),
        Duration::from_secs(1),
    )
    .unwrap();

    let err = client.fetch(&id("age"), workdir.path()).unwrap_err();
    assert!(matches!(err, FetchError::Network { .. }));
}
