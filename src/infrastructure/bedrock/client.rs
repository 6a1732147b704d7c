use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::{header, Client as ReqwestClient, RequestBuilder, Url};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use super::errors::{normalize_error_type, BedrockApiError};
use crate::domain::errors::ProbeError;
use crate::domain::models::{is_valid_region, ProbeFailure, ProviderConfig};
use crate::domain::ports::{CredentialProbe, ProbeSuccess};
use crate::infrastructure::credentials::sigv4::{self, SigningParams};
use crate::infrastructure::credentials::{
    AwsCredentials, CredentialChain, CredentialProvider, ResolvedCredentials,
};

/// Signing name of the Bedrock control plane
const SERVICE: &str = "bedrock";

const MISSING_CREDENTIALS: &str = "No AWS credentials found. Checked AWS_BEARER_TOKEN_BEDROCK, \
     AWS_ACCESS_KEY_ID/AWS_SECRET_ACCESS_KEY and the shared credentials file";

/// Configuration for the Bedrock probe
#[derive(Debug, Clone)]
pub struct BedrockProbeConfig {
    /// AWS region, also the signing region
    pub region: String,

    /// Base URL replacing `https://bedrock.{region}.amazonaws.com`
    pub endpoint_url: Option<String>,

    /// Whole-request timeout
    pub timeout: Duration,
}

impl BedrockProbeConfig {
    pub fn from_provider(config: &ProviderConfig) -> Self {
        Self {
            region: config.region.clone(),
            endpoint_url: config.endpoint_url.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    /// Base URL of the control plane for this region
    pub fn endpoint(&self) -> String {
        self.endpoint_url.as_ref().map_or_else(
            || format!("https://bedrock.{}.amazonaws.com", self.region),
            |url| url.trim_end_matches('/').to_string(),
        )
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListFoundationModelsResponse {
    #[serde(default)]
    model_summaries: Vec<ModelSummary>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelSummary {
    model_id: String,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(alias = "Message")]
    message: Option<String>,
    #[serde(rename = "__type")]
    error_type: Option<String>,
}

/// Credential probe against the Bedrock `ListFoundationModels` operation.
///
/// Listing models is free and proves both authentication and
/// authorization for the service. One request per probe, no retries.
pub struct BedrockProbe {
    /// HTTP client with the probe timeout applied
    http_client: ReqwestClient,

    config: BedrockProbeConfig,

    credentials: Box<dyn CredentialProvider>,
}

impl BedrockProbe {
    /// Create a probe using the given credential source
    pub fn new(
        config: BedrockProbeConfig,
        credentials: impl CredentialProvider + 'static,
    ) -> Result<Self> {
        let http_client = ReqwestClient::builder()
            .timeout(config.timeout)
            .connect_timeout(config.timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http_client,
            config,
            credentials: Box::new(credentials),
        })
    }

    /// Probe using ambient credentials (environment, then shared credentials file)
    pub fn ambient(provider: &ProviderConfig) -> Result<Self> {
        Self::new(
            BedrockProbeConfig::from_provider(provider),
            CredentialChain::ambient(provider.profile.as_deref()),
        )
    }

    fn models_url(&self) -> Result<Url, ProbeError> {
        let mut url = Url::parse(&format!("{}/foundation-models", self.config.endpoint()))
            .map_err(|e| {
                ProbeError::new(
                    ProbeFailure::RegionMisconfigured,
                    format!("Invalid Bedrock endpoint {}: {e}", self.config.endpoint()),
                )
            })?;
        url.query_pairs_mut().append_pair("byProvider", "anthropic");
        Ok(url)
    }

    fn resolve_credentials(&self) -> Result<ResolvedCredentials, ProbeError> {
        match self.credentials.resolve() {
            Ok(Some(resolved)) => Ok(resolved),
            Ok(None) => Err(ProbeError::new(ProbeFailure::MissingCredentials, MISSING_CREDENTIALS)),
            Err(err) => Err(ProbeError::new(ProbeFailure::MissingCredentials, err.to_string())),
        }
    }

    fn authorize(&self, request: RequestBuilder, url: &Url, credentials: &AwsCredentials) -> RequestBuilder {
        match credentials {
            AwsCredentials::BearerToken(token) => request.bearer_auth(token),
            AwsCredentials::Static {
                access_key_id,
                secret_access_key,
                session_token,
            } => {
                let signed = sigv4::sign(
                    "GET",
                    url,
                    &SigningParams {
                        access_key_id,
                        secret_access_key,
                        session_token: session_token.as_deref(),
                        region: &self.config.region,
                        service: SERVICE,
                        time: Utc::now(),
                    },
                );
                let request = request
                    .header(header::AUTHORIZATION, signed.authorization)
                    .header("x-amz-date", signed.amz_date);
                match signed.security_token {
                    Some(token) => request.header("x-amz-security-token", token),
                    None => request,
                }
            }
        }
    }

    fn transport_error(&self, err: &reqwest::Error) -> ProbeError {
        if err.is_timeout() {
            ProbeError::new(
                ProbeFailure::Timeout,
                format!(
                    "No response from {} within {}s",
                    self.config.endpoint(),
                    self.config.timeout.as_secs_f32()
                ),
            )
        } else if err.is_connect() {
            ProbeError::new(
                ProbeFailure::Network,
                format!("Could not connect to {}: {err}", self.config.endpoint()),
            )
        } else {
            ProbeError::new(ProbeFailure::Network, format!("Request failed: {err}"))
        }
    }
}

#[async_trait]
impl CredentialProbe for BedrockProbe {
    #[instrument(skip(self), fields(region = %self.config.region))]
    async fn probe(&self) -> Result<ProbeSuccess, ProbeError> {
        if !is_valid_region(&self.config.region) {
            return Err(ProbeError::new(
                ProbeFailure::RegionMisconfigured,
                format!("'{}' is not a valid AWS region (expected e.g. us-east-1)", self.config.region),
            ));
        }

        let resolved = self.resolve_credentials()?;
        let url = self.models_url()?;
        debug!(source = %resolved.source, url = %url, "probing Bedrock");

        let request = self.authorize(self.http_client.get(url.clone()), &url, &resolved.credentials);
        let response = request.send().await.map_err(|e| self.transport_error(&e))?;
        let status = response.status();

        if status.is_success() {
            let body: ListFoundationModelsResponse = response.json().await.map_err(|e| {
                if e.is_timeout() {
                    self.transport_error(&e)
                } else {
                    ProbeError::new(
                        ProbeFailure::UnexpectedResponse,
                        format!("Could not decode model list: {e}"),
                    )
                }
            })?;
            let models = body.model_summaries.into_iter().map(|m| m.model_id).collect();
            return Ok(ProbeSuccess {
                credential_source: resolved.source,
                models,
            });
        }

        let header_type = response
            .headers()
            .get("x-amzn-errortype")
            .and_then(|v| v.to_str().ok())
            .map(|v| normalize_error_type(v).to_string());
        let text = match response.text().await {
            Ok(text) => text,
            Err(err) => {
                debug!(%status, error = %err, "could not read error body, classifying by status");
                String::new()
            }
        };
        let body: ErrorBody = serde_json::from_str(&text).unwrap_or_default();

        let error_type = header_type.or_else(|| body.error_type.map(|t| normalize_error_type(&t).to_string()));
        let message = body
            .message
            .unwrap_or_else(|| if text.is_empty() { status.to_string() } else { text });

        warn!(%status, error_type = ?error_type, "Bedrock rejected the probe");
        Err(BedrockApiError::from_response(status, error_type.as_deref(), message).into())
    }
}
