//! Hosting-provider (Vercel) client for project-domain management.
//!
//! Storelane attaches every verified custom domain to one hosting project;
//! this client covers the three project-domain endpoints the registrar needs
//! plus the DNS configuration check.

use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::VercelConfig;

/// Provider API base URL.
const BASE_URL: &str = "https://api.vercel.com";

/// Error codes the add endpoint returns when the domain is already attached.
/// These are folded into the success path: the caller proceeds to a status
/// check instead of failing.
const ALREADY_EXISTS_CODES: &[&str] = &["domain_already_exists", "domain_already_in_use"];

/// Errors that can occur when talking to the provider.
#[derive(Debug, Error)]
pub enum VercelError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} {code} - {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    /// Failed to parse a response.
    #[error("Parse error: {0}")]
    Parse(String),
}

impl VercelError {
    /// The provider's HTTP status, when it produced one.
    #[must_use]
    pub const fn http_status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Http(_) | Self::Parse(_) => None,
        }
    }

    /// The message to surface to the caller.
    #[must_use]
    pub fn provider_message(&self) -> String {
        match self {
            Self::Api { message, .. } => message.clone(),
            Self::Http(_) | Self::Parse(_) => "Hosting provider unavailable".to_string(),
        }
    }
}

/// A project domain as reported by the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainInfo {
    pub name: String,
    #[serde(default)]
    pub apex_name: Option<String>,
    pub verified: bool,
    #[serde(default)]
    pub verification: Vec<VerificationChallenge>,
}

/// One outstanding DNS verification challenge.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationChallenge {
    #[serde(rename = "type")]
    pub kind: String,
    pub domain: String,
    pub value: String,
    #[serde(default)]
    pub reason: Option<String>,
}

/// DNS configuration state for a domain.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainConfig {
    pub misconfigured: bool,
}

/// Provider error envelope: `{"error": {"code": ..., "message": ...}}`.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

/// Outcome of adding a domain to the project.
#[derive(Debug)]
pub enum AddDomainOutcome {
    /// Newly attached.
    Added(DomainInfo),
    /// The provider already had it; proceed to a status check.
    AlreadyExists,
}

/// Client for the provider's project-domain endpoints.
#[derive(Clone)]
pub struct VercelClient {
    client: reqwest::Client,
    project_id: String,
    team_id: Option<String>,
}

impl VercelClient {
    /// Create a new provider client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &VercelConfig) -> Result<Self, VercelError> {
        let mut headers = HeaderMap::new();

        let auth_value = format!("Bearer {}", config.api_token.expose_secret());
        headers.insert(
            "Authorization",
            HeaderValue::from_str(&auth_value)
                .map_err(|e| VercelError::Parse(format!("Invalid API token format: {e}")))?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            project_id: config.project_id.clone(),
            team_id: config.team_id.clone(),
        })
    }

    fn url(&self, version: &str, suffix: &str) -> String {
        let mut url = format!(
            "{BASE_URL}/{version}/projects/{}/domains{suffix}",
            urlencoding::encode(&self.project_id)
        );
        if let Some(team) = &self.team_id {
            url.push_str("?teamId=");
            url.push_str(&urlencoding::encode(team));
        }
        url
    }

    /// Attach a domain to the hosting project.
    ///
    /// An "already exists" error from the provider is not a failure - the
    /// caller continues to a status check.
    ///
    /// # Errors
    ///
    /// Returns error for any other provider failure.
    pub async fn add_domain(&self, name: &str) -> Result<AddDomainOutcome, VercelError> {
        let url = self.url("v10", "");
        let body = serde_json::json!({ "name": name });

        let response = self.client.post(&url).json(&body).send().await?;
        let status = response.status();

        if status.is_success() {
            let info: DomainInfo = response
                .json()
                .await
                .map_err(|e| VercelError::Parse(e.to_string()))?;
            return Ok(AddDomainOutcome::Added(info));
        }

        let err = read_api_error(response, status.as_u16()).await;
        let outcome = fold_already_exists(err)?;
        if matches!(outcome, AddDomainOutcome::AlreadyExists) {
            tracing::debug!(domain = name, "Domain already attached to project");
        }
        Ok(outcome)
    }

    /// Read a domain's registration and verification state.
    ///
    /// # Errors
    ///
    /// Returns error if the provider does not know the domain or the call fails.
    pub async fn get_domain(&self, name: &str) -> Result<DomainInfo, VercelError> {
        let url = self.url("v9", &format!("/{}", urlencoding::encode(name)));

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(read_api_error(response, status.as_u16()).await);
        }

        response
            .json()
            .await
            .map_err(|e| VercelError::Parse(e.to_string()))
    }

    /// Check whether the domain's DNS records point at the platform.
    ///
    /// # Errors
    ///
    /// Returns error if the call fails.
    pub async fn domain_config(&self, name: &str) -> Result<DomainConfig, VercelError> {
        let url = self.url("v6", &format!("/{}/config", urlencoding::encode(name)));

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(read_api_error(response, status.as_u16()).await);
        }

        response
            .json()
            .await
            .map_err(|e| VercelError::Parse(e.to_string()))
    }

    /// Detach a domain from the hosting project.
    ///
    /// # Errors
    ///
    /// Returns error if the call fails.
    pub async fn remove_domain(&self, name: &str) -> Result<(), VercelError> {
        let url = self.url("v9", &format!("/{}", urlencoding::encode(name)));

        let response = self.client.delete(&url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(read_api_error(response, status.as_u16()).await);
        }
        Ok(())
    }
}

/// Fold an "already attached" error from the add endpoint into the success
/// path; every other error stays an error.
fn fold_already_exists(err: VercelError) -> Result<AddDomainOutcome, VercelError> {
    if let VercelError::Api { code, .. } = &err
        && ALREADY_EXISTS_CODES.contains(&code.as_str())
    {
        return Ok(AddDomainOutcome::AlreadyExists);
    }
    Err(err)
}

/// Decode the provider's error envelope, falling back to raw text.
async fn read_api_error(response: reqwest::Response, status: u16) -> VercelError {
    let text = response.text().await.unwrap_or_default();
    decode_api_error(status, &text)
}

fn decode_api_error(status: u16, text: &str) -> VercelError {
    match serde_json::from_str::<ErrorEnvelope>(text) {
        Ok(envelope) => VercelError::Api {
            status,
            code: envelope.error.code,
            message: envelope.error.message,
        },
        Err(_) => VercelError::Api {
            status,
            code: "unknown".to_string(),
            message: text.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_envelope_decode() {
        let body = r#"{"error":{"code":"domain_already_exists","message":"Domain exists"}}"#;
        let envelope: ErrorEnvelope = serde_json::from_str(body).expect("decode");
        assert_eq!(envelope.error.code, "domain_already_exists");
        assert_eq!(envelope.error.message, "Domain exists");
    }

    #[test]
    fn test_domain_info_decode_minimal() {
        // The provider omits `verification` once a domain is verified
        let body = r#"{"name":"shop.example.com","apexName":"example.com","verified":true}"#;
        let info: DomainInfo = serde_json::from_str(body).expect("decode");
        assert!(info.verified);
        assert!(info.verification.is_empty());
        assert_eq!(info.apex_name.as_deref(), Some("example.com"));
    }

    #[test]
    fn test_domain_info_decode_with_challenges() {
        let body = r#"{
            "name": "shop.example.com",
            "verified": false,
            "verification": [
                {"type": "TXT", "domain": "_vercel.shop.example.com", "value": "vc-domain-verify=abc"}
            ]
        }"#;
        let info: DomainInfo = serde_json::from_str(body).expect("decode");
        assert!(!info.verified);
        assert_eq!(info.verification.len(), 1);
        assert_eq!(info.verification[0].kind, "TXT");
    }

    #[test]
    fn test_already_exists_error_folds_to_success() {
        for code in ["domain_already_exists", "domain_already_in_use"] {
            let body = format!(
                r#"{{"error":{{"code":"{code}","message":"Domain is already assigned"}}}}"#
            );
            let err = decode_api_error(409, &body);
            let outcome = fold_already_exists(err).expect("folded");
            assert!(matches!(outcome, AddDomainOutcome::AlreadyExists));
        }
    }

    #[test]
    fn test_other_add_errors_stay_errors() {
        let body = r#"{"error":{"code":"forbidden","message":"Not authorized"}}"#;
        let err = fold_already_exists(decode_api_error(403, body)).unwrap_err();
        assert_eq!(err.http_status(), Some(403));
        assert_eq!(err.provider_message(), "Not authorized");

        let raw = fold_already_exists(decode_api_error(500, "upstream blew up")).unwrap_err();
        match raw {
            VercelError::Api { code, message, .. } => {
                assert_eq!(code, "unknown");
                assert_eq!(message, "upstream blew up");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_http_status_only_for_api_errors() {
        let err = VercelError::Api {
            status: 404,
            code: "not_found".to_string(),
            message: "Domain not found".to_string(),
        };
        assert_eq!(err.http_status(), Some(404));
        assert_eq!(err.provider_message(), "Domain not found");

        let parse = VercelError::Parse("bad json".to_string());
        assert_eq!(parse.http_status(), None);
        assert_eq!(parse.provider_message(), "Hosting provider unavailable");
    }
}
