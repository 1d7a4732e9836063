use crate::errors::BackendError;
use crate::health;
use crate::summarize::{GenerativeBackend, Summary};
use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;

pub struct OllamaBackend {
    host: String,
    model: String,
    client: Client,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

impl OllamaBackend {
    pub fn new(host: String, model: String, timeout: Duration) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BackendError::Unavailable(format!("http client: {e}")))?;
        Ok(Self {
            host,
            model,
            client,
        })
    }
}

impl GenerativeBackend for OllamaBackend {
    fn name(&self) -> &str {
        "ollama"
    }

    fn check_available(&self) -> Result<(), BackendError> {
        health::check_ollama(&self.client, &self.host, &self.model)
    }

    fn summarize_chunk(
        &self,
        text: &str,
        min_length: usize,
        max_length: usize,
    ) -> Result<Summary, BackendError> {
        let prompt = format!(
            "[System]\nYou are a concise, factual summarizer. Summarize the text below in at least {min_length} and at most {max_length} tokens. Reply with the summary only.\n\n[Text]\n{text}"
        );

        let url = format!("{}/api/generate", self.host.trim_end_matches('/'));
        let body = serde_json::json!({
            "model": self.model,
            "prompt": prompt,
            "stream": false,
            "options": { "temperature": 0, "num_predict": max_length },
        });

        let resp = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .map_err(|e| BackendError::Http(format!("connect {}: {e}", self.host)))?;
        if !resp.status().is_success() {
            return Err(BackendError::Http(format!(
                "status {} from {}",
                resp.status(),
                self.host
            )));
        }
        let generated: GenerateResponse = resp
            .json()
            .map_err(|e| BackendError::InvalidResponse(format!("decode response: {e}")))?;
        let text = generated.response.trim();
        if text.is_empty() {
            return Err(BackendError::InvalidResponse("empty response".into()));
        }

        let summary = Summary::new(text, min_length, max_length, "ollama");
        summary.log_deviation();
        Ok(summary)
    }
}
