use crate::errors::BackendError;
use reqwest::blocking::Client;
use reqwest::StatusCode;

/// Ollama answers `/api/tags` with the locally pulled models; the configured
/// model must be among them.
pub fn check_ollama(client: &Client, host: &str, model: &str) -> Result<(), BackendError> {
    let url = format!("{}/api/tags", host.trim_end_matches('/'));
    let resp = client
        .get(url)
        .send()
        .map_err(|e| BackendError::Unavailable(format!("connect {host}: {e}")))?;
    if !resp.status().is_success() {
        return Err(BackendError::Unavailable(format!(
            "status {} from {host}",
            resp.status()
        )));
    }
    let v: serde_json::Value = resp
        .json()
        .map_err(|e| BackendError::InvalidResponse(format!("decode tags: {e}")))?;
    let pulled = v
        .get("models")
        .and_then(|m| m.as_array())
        .map(|models| {
            models.iter().any(|m| {
                m.get("name")
                    .and_then(|n| n.as_str())
                    .is_some_and(|n| n == model || n.split(':').next() == Some(model))
            })
        })
        .unwrap_or(false);
    if pulled {
        Ok(())
    } else {
        Err(BackendError::Unavailable(format!(
            "model {model} not pulled on {host}"
        )))
    }
}

/// The inference endpoint exists and accepts our credentials. Any answer
/// other than auth failure, not-found or a server error counts as reachable.
pub fn check_huggingface(client: &Client, model_url: &str, token: Option<&str>) -> Result<(), BackendError> {
    let mut req = client.get(model_url);
    if let Some(token) = token {
        req = req.bearer_auth(token);
    }
    let resp = req
        .send()
        .map_err(|e| BackendError::Unavailable(format!("connect {model_url}: {e}")))?;
    match resp.status() {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::NOT_FOUND => Err(
            BackendError::Unavailable(format!("status {} from {model_url}", resp.status())),
        ),
        // 503 means the model is still loading
        s if s.is_server_error() && s != StatusCode::SERVICE_UNAVAILABLE => Err(BackendError::Unavailable(format!(
            "status {s} from {model_url}"
        ))),
        _ => Ok(()),
    }
}
