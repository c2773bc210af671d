//! HTTP bridge to the mini-app host
//!
//! The host exposes the identity and signing capabilities as two JSON
//! endpoints. Responses are decoded into the tagged enums in [`super::types`]
//! exactly once, here.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use super::errors::HostError;
use super::traits::{IdentityVerifier, ProofValidator, TransactionHost};
use super::types::{
    SendTransactionCommand, SendTransactionResponse, VerifiedProof, VerifyCommand, VerifyResponse,
};

#[derive(Clone)]
pub struct HttpHostBridge {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpHostBridge {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, HostError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: parse_base_url(base_url)?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, HostError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let url = self
            .base_url
            .join(path)
            .map_err(|e| HostError::Encoding(format!("{path}: {e}")))?;
        debug!(url = %url, "Posting to host bridge");

        post_json(&self.client, url, body).await
    }
}

async fn post_json<B, T>(client: &reqwest::Client, url: Url, body: &B) -> Result<T, HostError>
where
    B: Serialize + Sync,
    T: DeserializeOwned,
{
    let response = client
        .post(url.clone())
        .json(body)
        .send()
        .await
        .map_err(|e| {
            if e.is_connect() || e.is_timeout() {
                HostError::Unavailable(format!("{url}: {e}"))
            } else {
                HostError::Http(e)
            }
        })?;

    let status = response.status();
    let text = response.text().await?;
    if !status.is_success() {
        warn!(url = %url, status = %status, "Host bridge returned an error status");
        return Err(HostError::InvalidResponse(format!("{status}: {text}")));
    }

    serde_json::from_str(&text).map_err(|e| HostError::InvalidResponse(format!("{e}: {text}")))
}

/// Directory-style base so `join("verify")` appends instead of replacing the
/// last path segment.
fn parse_base_url(raw: &str) -> Result<Url, HostError> {
    let mut normalized = raw.trim().to_string();
    if !normalized.ends_with('/') {
        normalized.push('/');
    }
    Url::parse(&normalized).map_err(|e| HostError::Encoding(format!("{raw}: {e}")))
}

#[async_trait]
impl IdentityVerifier for HttpHostBridge {
    async fn verify(&self, command: &VerifyCommand) -> Result<VerifyResponse, HostError> {
        self.post("verify", command).await
    }
}

#[async_trait]
impl TransactionHost for HttpHostBridge {
    async fn send_transaction(
        &self,
        command: &SendTransactionCommand,
    ) -> Result<SendTransactionResponse, HostError> {
        self.post("send-transaction", command).await
    }
}

/// Server-side proof check: posts the proof with its action and signal and
/// accepts only a `status: 200` answer.
#[derive(Clone)]
pub struct BackendProofValidator {
    client: reqwest::Client,
    url: Url,
}

impl BackendProofValidator {
    pub fn new(url: &str, timeout: Duration) -> Result<Self, HostError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        let url = Url::parse(url).map_err(|e| HostError::Encoding(format!("{url}: {e}")))?;
        Ok(Self { client, url })
    }
}

#[async_trait]
impl ProofValidator for BackendProofValidator {
    async fn validate(
        &self,
        proof: &VerifiedProof,
        action: &str,
        signal: &str,
    ) -> Result<bool, HostError> {
        let body = json!({
            "payload": proof,
            "action": action,
            "signal": signal,
        });
        let answer: serde_json::Value = post_json(&self.client, self.url.clone(), &body).await?;

        Ok(answer.get("status").and_then(|s| s.as_u64()) == Some(200))
    }
}
