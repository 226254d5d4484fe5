//! HTTP client for the dashboard backend.

use reqwest::blocking::Client;
use tracing::debug;

use crate::config::{ApiConfig, CHANGE_POINT_PATH, PRICES_PATH};
use crate::data::wire::{parse_change_point, parse_prices};
use crate::data::DataSource;
use crate::domain::{ChangePoint, PriceRecord};
use crate::error::{AppError, FetchError};

pub struct ApiClient {
    client: Client,
    config: ApiConfig,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::new(2, format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn get_text(&self, path: &str) -> Result<String, FetchError> {
        let url = self.config.endpoint(path);
        debug!(%url, "GET");

        let resp = self.client.get(&url).send().map_err(|e| FetchError::Transport {
            endpoint: path.to_string(),
            message: e.to_string(),
        })?;

        if !resp.status().is_success() {
            return Err(FetchError::Status {
                endpoint: path.to_string(),
                status: resp.status().as_u16(),
            });
        }

        resp.text().map_err(|e| FetchError::Transport {
            endpoint: path.to_string(),
            message: format!("failed to read body: {e}"),
        })
    }
}

impl DataSource for ApiClient {
    fn fetch_prices(&self) -> Result<Vec<PriceRecord>, FetchError> {
        let body = self.get_text(PRICES_PATH)?;
        let records = parse_prices(&body).map_err(|e| FetchError::Malformed {
            endpoint: PRICES_PATH.to_string(),
            message: e.to_string(),
        })?;
        debug!(count = records.len(), "decoded price records");
        Ok(records)
    }

    fn fetch_change_point(&self) -> Result<Option<ChangePoint>, FetchError> {
        let body = self.get_text(CHANGE_POINT_PATH)?;
        parse_change_point(&body).map_err(|e| FetchError::Malformed {
            endpoint: CHANGE_POINT_PATH.to_string(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;
    use std::time::Duration;

    use super::*;

    /// Answer a single request with `status_line` and `body`, then close.
    fn serve_once(status_line: &'static str, body: &'static str) -> (String, thread::JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = [0u8; 1024];
            let mut request = Vec::new();
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).unwrap();
        });
        (base_url, handle)
    }

    fn client(base_url: String) -> ApiClient {
        ApiClient::new(ApiConfig {
            base_url,
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    #[test]
    fn non_success_status_is_a_fetch_failure() {
        let (base_url, server) = serve_once("503 Service Unavailable", "");
        let err = client(base_url).fetch_prices().unwrap_err();
        server.join().unwrap();

        assert!(err.is_fetch_failure());
        assert!(matches!(
            err,
            FetchError::Status { ref endpoint, status: 503 } if endpoint == PRICES_PATH
        ));
    }

    #[test]
    fn success_with_bad_body_is_malformed() {
        let (base_url, server) = serve_once("200 OK", "<html>oops</html>");
        let err = client(base_url).fetch_change_point().unwrap_err();
        server.join().unwrap();

        assert!(!err.is_fetch_failure());
        assert_eq!(err.endpoint(), CHANGE_POINT_PATH);
    }

    #[test]
    fn success_decodes_prices() {
        let (base_url, server) = serve_once(
            "200 OK",
            r#"{"prices":[{"Date":"2020-01-01 00:00:00","Log_Returns":0.02}]}"#,
        );
        let records = client(base_url).fetch_prices().unwrap();
        server.join().unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].log_return, 0.02);
    }
}
