use std::time::Duration;

use async_trait::async_trait;
use ironbeam_application::{FetchHints, PersistenceCollaborator};
use ironbeam_core::{
    AppError, AppResult, CollaboratorError, CollaboratorErrorKind, CollaboratorResult,
};
use ironbeam_domain::{FieldMap, Record, RecordId, RecordKind};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;
use uuid::Uuid;

const IDEMPOTENCY_KEY_HEADER: &str = "Idempotency-Key";

/// HTTP-based persistence collaborator for `/api/admin/<resource>`.
pub struct HttpRecordCollaborator {
    http_client: reqwest::Client,
    collection_url: Url,
    api_token: Option<String>,
    max_attempts: u8,
    retry_backoff_ms: u64,
}

impl HttpRecordCollaborator {
    /// Creates a collaborator for `kind` rooted at `base_url`.
    pub fn new(
        http_client: reqwest::Client,
        base_url: &Url,
        kind: RecordKind,
        max_attempts: u8,
        retry_backoff_ms: u64,
    ) -> AppResult<Self> {
        let mut collection_url = base_url.clone();
        collection_url
            .path_segments_mut()
            .map_err(|()| {
                AppError::Validation(format!("API base URL '{base_url}' cannot be a base"))
            })?
            .pop_if_empty()
            .extend(["api", "admin", kind.resource_path()]);

        Ok(Self {
            http_client,
            collection_url,
            api_token: None,
            max_attempts: max_attempts.max(1),
            retry_backoff_ms: retry_backoff_ms.max(10),
        })
    }

    /// Sends `Authorization: Bearer <token>` with every request.
    #[must_use]
    pub fn with_api_token(mut self, api_token: impl Into<String>) -> Self {
        self.api_token = Some(api_token.into());
        self
    }

    /// Returns the collection endpoint.
    #[must_use]
    pub fn collection_url(&self) -> &Url {
        &self.collection_url
    }

    fn record_url(&self, id: &RecordId) -> Url {
        let mut url = self.collection_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(id.as_str());
        }

        url
    }

    fn list_url(&self, hints: &FetchHints) -> Url {
        let mut url = self.collection_url.clone();
        if hints.search_term.is_none() && hints.predicates.is_empty() {
            return url;
        }

        {
            let mut query = url.query_pairs_mut();
            if let Some(term) = hints.search_term.as_deref() {
                query.append_pair("search", term);
            }
            for (field, value) in &hints.predicates {
                query.append_pair(field, value.to_string().as_str());
            }
        }

        url
    }

    async fn send_with_retry<F>(
        &self,
        operation: &str,
        mut build: F,
    ) -> CollaboratorResult<reqwest::Response>
    where
        F: FnMut(&reqwest::Client) -> reqwest::RequestBuilder,
    {
        let mut attempt = 0_u8;
        let mut last_error: Option<CollaboratorError> = None;

        while attempt < self.max_attempts {
            attempt = attempt.saturating_add(1);
            let mut builder = build(&self.http_client);
            if let Some(token) = self.api_token.as_deref() {
                builder = builder.bearer_auth(token);
            }

            debug!(operation, attempt, "sending admin API request");

            match builder.send().await {
                Ok(response) if response.status().is_success() => return Ok(response),
                Ok(response) if response.status() == reqwest::StatusCode::NOT_FOUND => {
                    return Err(CollaboratorError::not_found(format!(
                        "{operation} returned 404 for {}",
                        response.url()
                    )));
                }
                Ok(response)
                    if response.status().is_server_error()
                        || response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS =>
                {
                    last_error = Some(CollaboratorError::new(
                        CollaboratorErrorKind::Transport,
                        format!(
                            "{operation} exhausted retries; last status {}",
                            response.status()
                        ),
                    ));
                }
                Ok(response) => {
                    let status = response.status();
                    let body = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "<response body unavailable>".to_owned());
                    return Err(CollaboratorError::new(
                        CollaboratorErrorKind::Rejected,
                        format!("{operation} failed with status {status}: {body}"),
                    ));
                }
                Err(error) => {
                    last_error = Some(CollaboratorError::with_source(
                        CollaboratorErrorKind::Transport,
                        format!("{operation} transport error"),
                        error,
                    ));
                }
            }

            if attempt < self.max_attempts {
                let delay = self.retry_backoff_ms.saturating_mul(u64::from(attempt));
                warn!(operation, attempt, delay_ms = delay, "retrying admin API request");
                tokio::time::sleep(Duration::from_millis(delay)).await;
            }
        }

        Err(last_error.unwrap_or_else(|| {
            CollaboratorError::new(
                CollaboratorErrorKind::Transport,
                format!("{operation} exhausted retries"),
            )
        }))
    }

    /// Decodes a response body that either is the payload or wraps it in `data`.
    async fn decode<T: DeserializeOwned>(
        operation: &str,
        response: reqwest::Response,
    ) -> CollaboratorResult<T> {
        let body = response.bytes().await.map_err(|error| {
            CollaboratorError::with_source(
                CollaboratorErrorKind::Transport,
                format!("{operation} response body could not be read"),
                error,
            )
        })?;

        serde_json::from_slice::<Value>(&body)
            .map(unwrap_data_envelope)
            .and_then(serde_json::from_value)
            .map_err(|error| {
                CollaboratorError::with_source(
                    CollaboratorErrorKind::Decode,
                    format!("{operation} returned an undecodable body: {error}"),
                    error,
                )
            })
    }
}

fn unwrap_data_envelope(value: Value) -> Value {
    match value {
        Value::Object(mut object) if object.contains_key("data") && !object.contains_key("id") => {
            object.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

#[async_trait]
impl PersistenceCollaborator for HttpRecordCollaborator {
    async fn fetch_all(&self, hints: &FetchHints) -> CollaboratorResult<Vec<Record>> {
        let url = self.list_url(hints);
        let response = self
            .send_with_retry("fetch_all", |client| client.get(url.clone()))
            .await?;
        Self::decode("fetch_all", response).await
    }

    async fn create_record(&self, draft: FieldMap) -> CollaboratorResult<Record> {
        // One key per logical create; retries reuse it so the server can dedupe.
        let idempotency_key = Uuid::new_v4().to_string();
        let response = self
            .send_with_retry("create_record", |client| {
                client
                    .post(self.collection_url.clone())
                    .header(IDEMPOTENCY_KEY_HEADER, idempotency_key.as_str())
                    .json(&draft)
            })
            .await?;
        Self::decode("create_record", response).await
    }

    async fn update_record(&self, id: &RecordId, partial: FieldMap) -> CollaboratorResult<Record> {
        let url = self.record_url(id);
        let response = self
            .send_with_retry("update_record", |client| {
                client.put(url.clone()).json(&partial)
            })
            .await?;
        Self::decode("update_record", response).await
    }

    async fn delete_record(&self, id: &RecordId) -> CollaboratorResult<()> {
        let url = self.record_url(id);
        self.send_with_retry("delete_record", |client| client.delete(url.clone()))
            .await?;
        Ok(())
    }
}
