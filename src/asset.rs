use std::time::Duration;

use bytes::Bytes;
use http_body_util::{BodyExt, Empty};
use hyper::header::{ACCEPT, USER_AGENT};
use hyper::{Method, Request, StatusCode, Uri};
use hyper_util::client::legacy::connect::{Connect, HttpConnector};
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use serde_json::Value;

pub const DEFAULT_ANIMATION_URL: &str = "https://assets2.lottiefiles.com/packages/lf20_49rdyysj.json";

#[derive(Debug)]
pub struct AssetFetchError {
  pub status: Option<u16>,
  pub message: String,
}

impl std::fmt::Display for AssetFetchError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    if let Some(status) = self.status {
      write!(f, "asset fetch error (status {status}): {}", self.message)
    } else {
      write!(f, "asset fetch error: {}", self.message)
    }
  }
}

impl std::error::Error for AssetFetchError {}

fn fetch_error(message: impl Into<String>) -> AssetFetchError {
  AssetFetchError {
    status: None,
    message: message.into(),
  }
}

async fn request_json<C>(client: &Client<C, Empty<Bytes>>, uri: Uri) -> Result<Value, AssetFetchError>
where
  C: Connect + Clone + Send + Sync + 'static,
{
  let req = Request::builder()
    .method(Method::GET)
    .uri(uri)
    .header(ACCEPT, "application/json")
    .header(USER_AGENT, "fiscal-report")
    .body(Empty::<Bytes>::new())
    .map_err(|e| fetch_error(e.to_string()))?;

  let resp = client.request(req).await.map_err(|e| fetch_error(e.to_string()))?;

  let status = resp.status();
  let body_bytes = resp
    .into_body()
    .collect()
    .await
    .map_err(|e| fetch_error(e.to_string()))?
    .to_bytes();

  if status != StatusCode::OK {
    let snippet = String::from_utf8_lossy(&body_bytes);
    let snippet = snippet.chars().take(200).collect::<String>();
    return Err(AssetFetchError {
      status: Some(status.as_u16()),
      message: snippet,
    });
  }

  serde_json::from_slice::<Value>(&body_bytes).map_err(|e| fetch_error(format!("invalid json body: {e}")))
}

pub async fn fetch_json(url: &str) -> Result<Value, AssetFetchError> {
  let uri: Uri = url.parse().map_err(|e| fetch_error(format!("invalid url '{url}': {e}")))?;

  match uri.scheme_str() {
    Some("https") => {
      let connector = hyper_rustls::HttpsConnectorBuilder::new()
        .with_native_roots()
        .map_err(|e| fetch_error(e.to_string()))?
        .https_only()
        .enable_http1()
        .build();
      let client = Client::builder(TokioExecutor::new()).build(connector);
      request_json(&client, uri).await
    }
    // Plain http is only expected for local mirrors of the asset.
    Some("http") => {
      let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());
      request_json(&client, uri).await
    }
    other => Err(fetch_error(format!("unsupported url scheme: {:?}", other))),
  }
}

/// Fetches the header animation. Any failure, including the timeout, yields `None`.
pub async fn load_animation(url: &str, timeout: Duration) -> Option<Value> {
  match tokio::time::timeout(timeout, fetch_json(url)).await {
    Ok(Ok(value)) => {
      tracing::debug!(url, "animation asset loaded");
      Some(value)
    }
    Ok(Err(err)) => {
      tracing::warn!(url, error = %err, "animation asset unavailable; rendering without it");
      None
    }
    Err(_) => {
      tracing::warn!(url, timeout_secs = timeout.as_secs_f64(), "animation asset timed out; rendering without it");
      None
    }
  }
}
