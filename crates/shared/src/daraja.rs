//! Daraja (M-Pesa) gateway client.
//!
//! Initiates STK push payment requests against the Safaricom Daraja API.
//! Only the outbound initiation and the credential derivation live here;
//! callback parsing is pure logic and lives in `pesabank-core`.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

use crate::config::MpesaConfig;

/// Daraja gateway errors.
#[derive(Debug, Error)]
pub enum DarajaError {
    /// HTTP transport failure.
    #[error("Gateway request failed: {0}")]
    Http(String),

    /// The gateway returned an error payload.
    #[error("Gateway rejected request: {code}: {message}")]
    Gateway {
        /// Gateway error code.
        code: String,
        /// Gateway error description.
        message: String,
    },

    /// A required field was missing from the gateway response.
    #[error("Gateway response missing field: {0}")]
    MissingField(&'static str),
}

/// Response to a successful STK push initiation.
///
/// The `checkout_request_id` is the correlation id matched against the
/// asynchronous result callback.
#[derive(Debug, Clone, Deserialize)]
pub struct StkPushResponse {
    /// Merchant-side request id.
    #[serde(rename = "MerchantRequestID")]
    pub merchant_request_id: Option<String>,
    /// Correlation id for the asynchronous callback.
    #[serde(rename = "CheckoutRequestID")]
    pub checkout_request_id: String,
    /// Synchronous acceptance code ("0" on success).
    #[serde(rename = "ResponseCode")]
    pub response_code: Option<String>,
    /// Human-readable acceptance description.
    #[serde(rename = "ResponseDescription")]
    pub response_description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OauthResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct GatewayErrorBody {
    #[serde(rename = "errorCode")]
    error_code: Option<String>,
    #[serde(rename = "errorMessage")]
    error_message: Option<String>,
}

/// Formats a Daraja API timestamp (`YYYYMMDDHHMMSS`).
#[must_use]
pub fn api_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y%m%d%H%M%S").to_string()
}

/// Derives the STK push password: `base64(shortcode + passkey + timestamp)`.
#[must_use]
pub fn stk_password(shortcode: &str, passkey: &str, timestamp: &str) -> String {
    BASE64.encode(format!("{shortcode}{passkey}{timestamp}"))
}

/// Daraja gateway client.
#[derive(Clone)]
pub struct DarajaClient {
    config: MpesaConfig,
    http: reqwest::Client,
}

impl std::fmt::Debug for DarajaClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DarajaClient")
            .field("base_url", &self.config.base_url)
            .field("shortcode", &self.config.shortcode)
            .finish_non_exhaustive()
    }
}

impl DarajaClient {
    /// Creates a new Daraja client.
    #[must_use]
    pub fn new(config: MpesaConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    /// Fetches an OAuth access token via client credentials.
    async fn access_token(&self) -> Result<String, DarajaError> {
        let url = format!(
            "{}/oauth/v1/generate?grant_type=client_credentials",
            self.config.base_url
        );

        let response = self
            .http
            .get(&url)
            .basic_auth(&self.config.consumer_key, Some(&self.config.consumer_secret))
            .send()
            .await
            .map_err(|e| DarajaError::Http(e.to_string()))?;

        if !response.status().is_success() {
            return Err(DarajaError::Gateway {
                code: response.status().as_str().to_string(),
                message: "OAuth token request rejected".to_string(),
            });
        }

        let body: OauthResponse = response
            .json()
            .await
            .map_err(|e| DarajaError::Http(e.to_string()))?;

        Ok(body.access_token)
    }

    /// Initiates an STK push payment request.
    ///
    /// Returns the gateway correlation id used to reconcile the asynchronous
    /// result callback into the ledger.
    ///
    /// # Errors
    ///
    /// Returns `DarajaError` if the gateway is unreachable or rejects the
    /// request synchronously.
    pub async fn stk_push(
        &self,
        phone_number: &str,
        amount: u64,
        account_reference: &str,
        description: &str,
    ) -> Result<StkPushResponse, DarajaError> {
        let token = self.access_token().await?;
        let timestamp = api_timestamp(Utc::now());
        let password = stk_password(&self.config.shortcode, &self.config.passkey, &timestamp);

        let payload = json!({
            "BusinessShortCode": self.config.shortcode,
            "Password": password,
            "Timestamp": timestamp,
            "TransactionType": "CustomerPayBillOnline",
            "Amount": amount,
            "PartyA": phone_number,
            "PartyB": self.config.shortcode,
            "PhoneNumber": phone_number,
            "CallBackURL": self.config.callback_url,
            "AccountReference": account_reference,
            "TransactionDesc": description,
        });

        let url = format!("{}/mpesa/stkpush/v1/processrequest", self.config.base_url);
        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| DarajaError::Http(e.to_string()))?;

        let body = response
            .text()
            .await
            .map_err(|e| DarajaError::Http(e.to_string()))?;

        // Daraja signals errors inside the JSON body rather than by status.
        if let Ok(err) = serde_json::from_str::<GatewayErrorBody>(&body)
            && (err.error_code.is_some() || err.error_message.is_some())
        {
            return Err(DarajaError::Gateway {
                code: err.error_code.unwrap_or_else(|| "unknown".to_string()),
                message: err.error_message.unwrap_or_else(|| "unknown".to_string()),
            });
        }

        serde_json::from_str::<StkPushResponse>(&body)
            .map_err(|_| DarajaError::MissingField("CheckoutRequestID"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_api_timestamp_format() {
        let at = Utc.with_ymd_and_hms(2026, 7, 15, 10, 31, 5).unwrap();
        assert_eq!(api_timestamp(at), "20260715103105");
    }

    #[test]
    fn test_stk_password_is_base64_of_concatenation() {
        let password = stk_password("174379", "passkey", "20260715103105");
        let decoded = BASE64.decode(password).unwrap();
        assert_eq!(decoded, b"174379passkey20260715103105");
    }

    #[test]
    fn test_stk_push_response_parses_gateway_shape() {
        let body = r#"{
            "MerchantRequestID": "29115-34620561-1",
            "CheckoutRequestID": "ws_CO_191220191020363925",
            "ResponseCode": "0",
            "ResponseDescription": "Success. Request accepted for processing"
        }"#;

        let parsed: StkPushResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.checkout_request_id, "ws_CO_191220191020363925");
        assert_eq!(parsed.response_code.as_deref(), Some("0"));
    }
}
