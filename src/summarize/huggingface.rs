use crate::errors::BackendError;
use crate::health;
use crate::summarize::{GenerativeBackend, Summary};
use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;

/// Summarization pipeline served over the Hugging Face inference protocol,
/// either the hosted API or a self-hosted endpoint speaking the same JSON.
pub struct HuggingFaceBackend {
    model_url: String,
    token: Option<String>,
    client: Client,
}

#[derive(Deserialize)]
struct Generated {
    summary_text: String,
}

#[derive(Deserialize)]
struct ApiError {
    error: String,
}

impl HuggingFaceBackend {
    pub fn new(
        api_url: String,
        model: String,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BackendError::Unavailable(format!("http client: {e}")))?;
        let model_url = format!("{}/{}", api_url.trim_end_matches('/'), model);
        Ok(Self {
            model_url,
            token: token.filter(|t| !t.is_empty()),
            client,
        })
    }
}

impl GenerativeBackend for HuggingFaceBackend {
    fn name(&self) -> &str {
        "huggingface"
    }

    fn check_available(&self) -> Result<(), BackendError> {
        health::check_huggingface(&self.client, &self.model_url, self.token.as_deref())
    }

    fn summarize_chunk(
        &self,
        text: &str,
        min_length: usize,
        max_length: usize,
    ) -> Result<Summary, BackendError> {
        let body = serde_json::json!({
            "inputs": text,
            "parameters": {
                "min_length": min_length,
                "max_length": max_length,
                "do_sample": false,
            },
            "options": { "wait_for_model": true },
        });

        let mut req = self.client.post(&self.model_url).json(&body);
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        let resp = req
            .send()
            .map_err(|e| BackendError::Http(format!("connect {}: {e}", self.model_url)))?;

        let status = resp.status();
        if !status.is_success() {
            let detail = resp
                .json::<ApiError>()
                .map(|e| e.error)
                .unwrap_or_else(|_| "no error detail".into());
            return Err(BackendError::Http(format!("status {status}: {detail}")));
        }

        let generated: Vec<Generated> = resp
            .json()
            .map_err(|e| BackendError::InvalidResponse(format!("decode response: {e}")))?;
        let text = generated
            .into_iter()
            .next()
            .map(|g| g.summary_text.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| BackendError::InvalidResponse("no summary_text in response".into()))?;

        let summary = Summary::new(text, min_length, max_length, "huggingface");
        summary.log_deviation();
        Ok(summary)
    }
}
