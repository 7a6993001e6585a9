use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use crate::error::SuiteAuthError;

/// Query parameters the provider sends back on the redirect.
#[derive(Debug)]
pub struct CallbackParams {
    pub code: String,
    pub state: Option<String>,
}

/// One-shot loopback listener for the OAuth redirect.
///
/// Bound before the user agent is sent to the authorize URL so the redirect
/// cannot race the bind.
pub struct CallbackListener {
    listener: TcpListener,
}

impl CallbackListener {
    pub async fn bind(port: u16) -> Result<Self, SuiteAuthError> {
        let listener = TcpListener::bind(format!("127.0.0.1:{port}")).await?;
        Ok(Self { listener })
    }

    /// Accept a single request, answer it with a small HTML page, and return
    /// the parsed `code`/`state` parameters.
    pub async fn accept(self, timeout: Duration) -> Result<CallbackParams, SuiteAuthError> {
        let accept_future = async {
            let (mut stream, _) = self.listener.accept().await?;

            let mut buf = vec![0u8; 4096];
            let n = stream.read(&mut buf).await?;
            let request = String::from_utf8_lossy(&buf[..n]);

            let params = parse_callback_request(&request)?;

            let body = "<!DOCTYPE html><html><body><h1>NetSuite connected!</h1>\
                         <p>You can close this window and return to the terminal.</p></body></html>";
            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).await?;
            stream.shutdown().await?;

            Ok::<CallbackParams, SuiteAuthError>(params)
        };

        tokio::time::timeout(timeout, accept_future)
            .await
            .map_err(|_| SuiteAuthError::CallbackTimeout(timeout.as_secs()))?
    }
}

fn parse_callback_request(request: &str) -> Result<CallbackParams, SuiteAuthError> {
    // Request line looks like "GET /callback?code=...&state=... HTTP/1.1"
    let query = request
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|path| path.split('?').nth(1))
        .unwrap_or_default();

    let mut code = None;
    let mut state = None;
    let mut error = None;
    for param in query.split('&') {
        if let Some((key, value)) = param.split_once('=') {
            let value = urldecode(value);
            match key {
                "code" if !value.is_empty() => code = Some(value),
                "state" if !value.is_empty() => state = Some(value),
                "error" if !value.is_empty() => error = Some(value),
                _ => {}
            }
        }
    }

    if let Some(error) = error {
        return Err(SuiteAuthError::AuthorizationDenied(error));
    }
    let code = code.ok_or_else(|| {
        SuiteAuthError::CallbackError("No authorization code found in callback request".into())
    })?;
    Ok(CallbackParams { code, state })
}

fn urldecode(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut bytes = s.bytes();
    while let Some(b) = bytes.next() {
        if b == b'%' {
            let hi = bytes.next();
            let lo = bytes.next();
            if let (Some(h), Some(l)) = (hi, lo) {
                let hex = [h, l];
                if let Ok(s) = std::str::from_utf8(&hex) {
                    if let Ok(val) = u8::from_str_radix(s, 16) {
                        result.push(val as char);
                        continue;
                    }
                }
            }
            result.push('%');
        } else if b == b'+' {
            result.push(' ');
        } else {
            result.push(b as char);
        }
    }
    result
}
