use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::backend::client::ChatBackend;
use crate::backend::error::BackendError;
use crate::backend::wire::{ChatRequest, ChatResponse, FileUpload, SummaryRequest};
use crate::chat::{ConversationHistory, SessionRole};
use crate::config::BackendConfig;

/// [`ChatBackend`] speaking JSON over HTTP
#[derive(Clone)]
pub struct HttpBackend {
    config: BackendConfig,
    client: Client,
}

impl HttpBackend {
    pub fn new(config: BackendConfig) -> Result<Self, BackendError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, client })
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn timeout_ms(&self) -> u64 {
        self.config.timeout.as_millis() as u64
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Response, BackendError> {
        let response = request
            .send()
            .await
            .map_err(|err| BackendError::from_reqwest(err, self.timeout_ms()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(&self, response: Response) -> Result<T, BackendError> {
        let text = response
            .text()
            .await
            .map_err(|err| BackendError::from_reqwest(err, self.timeout_ms()))?;
        serde_json::from_str(&text).map_err(|err| BackendError::Decode(format!("{err} - {text}")))
    }
}

#[async_trait]
impl ChatBackend for HttpBackend {
    async fn warm_up(&self, role: SessionRole) -> Result<(), BackendError> {
        let url = self.url(&self.config.warmup_path);
        self.send(self.client.get(&url).query(&[("user", role.as_str())]))
            .await?;
        Ok(())
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, BackendError> {
        let url = self.url(&self.config.chat_path);
        let response = self.send(self.client.post(&url).json(&request)).await?;
        self.decode(response).await
    }

    async fn upload(&self, file: FileUpload) -> Result<Value, BackendError> {
        let url = self.url(&self.config.upload_path);
        let part = Part::bytes(file.bytes)
            .file_name(file.file_name)
            .mime_str(&file.mime)?;
        let form = Form::new().part("file", part);
        let response = self.send(self.client.post(&url).multipart(form)).await?;
        self.decode(response).await
    }

    async fn summarize(&self, history: ConversationHistory) -> Result<Value, BackendError> {
        let url = self.url(&self.config.summarize_path);
        let body = SummaryRequest {
            chat_history: history,
        };
        let response = self.send(self.client.post(&url).json(&body)).await?;
        self.decode(response).await
    }
}
