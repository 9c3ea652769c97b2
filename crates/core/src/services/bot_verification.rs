//! Bot verification for anonymous submissions.

use std::sync::Arc;

use async_trait::async_trait;
use hushboard_common::{AppError, AppResult, config::ModerationConfig};
use serde::Deserialize;
use tracing::{debug, warn};

const TURNSTILE_VERIFY_URL: &str = "https://challenges.cloudflare.com/turnstile/v0/siteverify";

/// Checks a client-supplied challenge token.
#[async_trait]
pub trait BotVerifier: Send + Sync {
    /// Fails with `Forbidden` if the token does not prove a human.
    async fn verify(&self, token: Option<&str>, remote_ip: Option<&str>) -> AppResult<()>;
}

/// Accepts every submission. For local development only.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledVerifier;

#[async_trait]
impl BotVerifier for DisabledVerifier {
    async fn verify(&self, _token: Option<&str>, _remote_ip: Option<&str>) -> AppResult<()> {
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct SiteverifyResponse {
    success: bool,
    #[serde(default)]
    error_codes: Vec<String>,
}

/// Cloudflare Turnstile verifier.
#[derive(Clone)]
pub struct TurnstileVerifier {
    secret: String,
    verify_url: String,
    http_client: reqwest::Client,
}

impl TurnstileVerifier {
    #[must_use]
    pub fn new(secret: String) -> Self {
        Self::with_url(secret, TURNSTILE_VERIFY_URL.to_string())
    }

    /// Verifier against a custom siteverify endpoint.
    #[must_use]
    pub fn with_url(secret: String, verify_url: String) -> Self {
        Self {
            secret,
            verify_url,
            http_client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl BotVerifier for TurnstileVerifier {
    async fn verify(&self, token: Option<&str>, remote_ip: Option<&str>) -> AppResult<()> {
        let Some(token) = token.filter(|t| !t.is_empty()) else {
            return Err(AppError::Forbidden("Bot verification required".to_string()));
        };

        let mut form = vec![("secret", self.secret.as_str()), ("response", token)];
        if let Some(ip) = remote_ip {
            form.push(("remoteip", ip));
        }

        let response = self
            .http_client
            .post(&self.verify_url)
            .form(&form)
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("Turnstile request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::ExternalService(format!(
                "Turnstile returned {}",
                response.status()
            )));
        }

        let body: SiteverifyResponse = response
            .json()
            .await
            .map_err(|e| AppError::ExternalService(format!("Invalid Turnstile response: {e}")))?;

        if body.success {
            debug!("Bot verification passed");
            Ok(())
        } else {
            warn!(error_codes = ?body.error_codes, "Bot verification rejected");
            Err(AppError::Forbidden("Bot verification failed".to_string()))
        }
    }
}

/// Pick the verifier the configuration asks for.
pub fn verifier_from_config(config: &ModerationConfig) -> AppResult<Arc<dyn BotVerifier>> {
    if config.disable_bot_verification {
        warn!("Bot verification is disabled");
        return Ok(Arc::new(DisabledVerifier));
    }

    let secret = config
        .turnstile_secret
        .clone()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            AppError::Config(
                "moderation.turnstile_secret is required unless bot verification is disabled"
                    .to_string(),
            )
        })?;

    Ok(Arc::new(TurnstileVerifier::new(secret)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disabled_verifier_accepts() {
        assert!(DisabledVerifier.verify(None, None).await.is_ok());
    }

    #[tokio::test]
    async fn test_turnstile_requires_token() {
        let verifier = TurnstileVerifier::with_url("secret".to_string(), "http://127.0.0.1:9".to_string());
        let result = verifier.verify(Some(""), None).await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[test]
    fn test_config_requires_secret() {
        let config = ModerationConfig::default();
        assert!(matches!(verifier_from_config(&config), Err(AppError::Config(_))));

        let config = ModerationConfig {
            disable_bot_verification: true,
            ..ModerationConfig::default()
        };
        assert!(verifier_from_config(&config).is_ok());

        let config = ModerationConfig {
            turnstile_secret: Some("0x0000".to_string()),
            ..ModerationConfig::default()
        };
        assert!(verifier_from_config(&config).is_ok());
    }

    #[test]
    fn test_siteverify_response_parsing() {
        let body: SiteverifyResponse =
            serde_json::from_str(r#"{"success":false,"error-codes":["invalid-input-response"]}"#)
                .unwrap();
        assert!(!body.success);
        assert_eq!(body.error_codes, vec!["invalid-input-response"]);
    }
}
