use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{debug, warn};
use reqwest::Client;
use thiserror::Error;
use tokio::fs;

/// Failure to retrieve a remote or local resource.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {reason}")]
    Request { url: String, reason: String },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A single-attempt GET returning the whole body of a successful response.
pub trait Transport: Send + Sync + 'static {
    fn get(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, FetchError>> + Send;
}

#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// `timeout` bounds connecting and each read, not the whole transfer.
    pub fn new(timeout: Duration) -> Self {
        let client = Client::builder()
            .connect_timeout(timeout)
            .read_timeout(timeout)
            .build()
            .unwrap_or_else(|err| {
                warn!("network client: falling back to default HTTP client configuration ({err})");
                Client::new()
            });
        Self { client }
    }
}

impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        debug!("GET {url}");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| request_error(url, &err))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_owned(),
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|err| request_error(url, &err))?;
        Ok(body.to_vec())
    }
}

fn request_error(url: &str, err: &reqwest::Error) -> FetchError {
    let reason = if err.is_timeout() {
        "timed out".to_owned()
    } else {
        err.to_string()
    };
    FetchError::Request {
        url: url.to_owned(),
        reason,
    }
}

/// Whether a location string names an HTTP(S) resource rather than a local file.
#[must_use]
pub fn is_remote(location: &str) -> bool {
    let lowered = location.trim_start().to_ascii_lowercase();
    lowered.starts_with("http://") || lowered.starts_with("https://")
}

/// Read a location that is either an HTTP(S) URL or a local filesystem path.
pub async fn read_location<T: Transport>(
    transport: &T,
    location: &str,
) -> Result<Vec<u8>, FetchError> {
    let location = location.trim();
    if is_remote(location) {
        return transport.get(location).await;
    }
    read_file(Path::new(location)).await
}

pub async fn read_file(path: &Path) -> Result<Vec<u8>, FetchError> {
    fs::read(path).await.map_err(|source| FetchError::Read {
        path: path.to_path_buf(),
        source,
    })
}


#[cfg(test)]
mod tests {
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;
    use std::time::Duration;

    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::testing::{MockReply, MockTransport};
    use super::*;

    #[test]
    fn recognises_remote_locations() {
        assert!(is_remote("https://example.com/apps.json"));
        assert!(is_remote("HTTP://example.com/apps.json"));
        assert!(is_remote("  http://example.com"));
        assert!(!is_remote("apps.json"));
        assert!(!is_remote("/srv/http/apps.json"));
        assert!(!is_remote("httpdocs/apps.json"));
    }

    #[tokio::test]
    async fn reads_local_paths_without_touching_transport() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("apps.json");
        std::fs::write(&file, b"{}").unwrap();

        let transport = MockTransport::new();
        let body = read_location(&transport, file.to_str().unwrap())
            .await
            .unwrap();

        assert_eq!(body, b"{}");
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn missing_local_file_is_a_read_error() {
        let transport = MockTransport::new();
        let result = read_location(&transport, "/definitely/not/here.json").await;
        assert!(matches!(result, Err(FetchError::Read { .. })));
    }

    #[tokio::test]
    async fn remote_locations_go_through_transport() {
        let transport =
            MockTransport::new().respond("http://x/apps.json", MockReply::Body(b"[]".to_vec()));
        let body = read_location(&transport, "http://x/apps.json").await.unwrap();
        assert_eq!(body, b"[]");
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn http_transport_returns_body_on_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/apps.json"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"{\"categories\":{}}"))
            .expect(1)
            .mount(&server)
            .await;

        let transport = HttpTransport::new(Duration::from_secs(5));
        let body = transport
            .get(&format!("{}/apps.json", server.uri()))
            .await
            .unwrap();
        assert_eq!(body, b"{\"categories\":{}}");
    }

    #[tokio::test]
    async fn http_transport_maps_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/broken"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let transport = HttpTransport::new(Duration::from_secs(5));
        let result = transport.get(&format!("{}/broken", server.uri())).await;
        assert!(matches!(result, Err(FetchError::Status { status: 500, .. })));
    }

    #[tokio::test]
    async fn http_transport_reports_timeouts() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/slow"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
            .mount(&server)
            .await;

        let transport = HttpTransport::new(Duration::from_millis(200));
        let result = transport.get(&format!("{}/slow", server.uri())).await;
        match result {
            Err(FetchError::Request { reason, .. }) => assert_eq!(reason, "timed out"),
            other => panic!("expected timeout, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn http_transport_keeps_slow_steady_bodies() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let server = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let read = stream.read(&mut buf).unwrap();
                if read == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..read]);
            }
            stream
                .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 6\r\nConnection: close\r\n\r\n")
                .unwrap();
            for byte in b"abcdef" {
                thread::sleep(Duration::from_millis(400));
                stream.write_all(&[*byte]).unwrap();
                stream.flush().unwrap();
            }
        });

        let transport = HttpTransport::new(Duration::from_secs(1));
        let body = transport
            .get(&format!("http://{addr}/archive.zip"))
            .await
            .unwrap();

        assert_eq!(body, b"abcdef");
        server.join().unwrap();
    }
}
