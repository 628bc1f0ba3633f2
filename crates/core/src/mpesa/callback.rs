//! STK-push result callback parsing.
//!
//! The gateway posts a JSON envelope after the customer approves or rejects
//! the payment prompt. Only the correlation id, result code, and receipt
//! number matter to the ledger; everything else is logged and ignored.

use serde::Deserialize;
use thiserror::Error;

/// Result code the gateway sends on success.
pub const RESULT_CODE_SUCCESS: i64 = 0;

/// Phone number error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("phone number must be in the format 2547XXXXXXXX")]
pub struct InvalidMsisdn;

/// Validates a Kenyan mobile number in gateway format (`2547XXXXXXXX`).
///
/// # Errors
///
/// Returns `InvalidMsisdn` if the number is malformed.
pub fn validate_msisdn(phone: &str) -> Result<(), InvalidMsisdn> {
    if phone.len() == 12 && phone.starts_with("2547") && phone.bytes().all(|b| b.is_ascii_digit())
    {
        Ok(())
    } else {
        Err(InvalidMsisdn)
    }
}

/// Top-level callback envelope: `{"Body": {"stkCallback": {...}}}`.
#[derive(Debug, Clone, Deserialize)]
pub struct StkCallbackEnvelope {
    /// Envelope body.
    #[serde(rename = "Body")]
    pub body: StkCallbackBody,
}

/// Envelope body holding the callback payload.
#[derive(Debug, Clone, Deserialize)]
pub struct StkCallbackBody {
    /// The callback payload.
    #[serde(rename = "stkCallback")]
    pub stk_callback: StkCallback,
}

/// The STK-push result callback payload.
#[derive(Debug, Clone, Deserialize)]
pub struct StkCallback {
    /// Merchant-side request id.
    #[serde(rename = "MerchantRequestID")]
    pub merchant_request_id: Option<String>,
    /// Correlation id issued at initiation.
    #[serde(rename = "CheckoutRequestID")]
    pub checkout_request_id: String,
    /// Result code; zero means the payment completed.
    #[serde(rename = "ResultCode")]
    pub result_code: i64,
    /// Human-readable result description.
    #[serde(rename = "ResultDesc")]
    pub result_desc: Option<String>,
    /// Metadata items present on success.
    #[serde(rename = "CallbackMetadata")]
    pub callback_metadata: Option<CallbackMetadata>,
}

/// Name/value metadata list attached to successful callbacks.
#[derive(Debug, Clone, Deserialize)]
pub struct CallbackMetadata {
    /// The metadata items.
    #[serde(rename = "Item")]
    pub item: Vec<MetadataItem>,
}

/// A single metadata name/value pair.
#[derive(Debug, Clone, Deserialize)]
pub struct MetadataItem {
    /// Item name, e.g. `MpesaReceiptNumber`.
    #[serde(rename = "Name")]
    pub name: String,
    /// Item value; numbers and strings both occur.
    #[serde(rename = "Value")]
    pub value: Option<serde_json::Value>,
}

impl StkCallback {
    /// Returns true if the payment completed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.result_code == RESULT_CODE_SUCCESS
    }

    /// Extracts the M-Pesa receipt number from the metadata, if present.
    #[must_use]
    pub fn receipt_number(&self) -> Option<String> {
        self.callback_metadata
            .as_ref()?
            .item
            .iter()
            .find(|item| item.name == "MpesaReceiptNumber")
            .and_then(|item| item.value.as_ref())
            .and_then(|value| value.as_str().map(ToString::to_string))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUCCESS_CALLBACK: &str = r#"{
        "Body": {
            "stkCallback": {
                "MerchantRequestID": "29115-34620561-1",
                "CheckoutRequestID": "ws_CO_191220191020363925",
                "ResultCode": 0,
                "ResultDesc": "The service request is processed successfully.",
                "CallbackMetadata": {
                    "Item": [
                        {"Name": "Amount", "Value": 1500.00},
                        {"Name": "MpesaReceiptNumber", "Value": "NLJ7RT61SV"},
                        {"Name": "TransactionDate", "Value": 20191219102115},
                        {"Name": "PhoneNumber", "Value": 254708374149}
                    ]
                }
            }
        }
    }"#;

    const FAILURE_CALLBACK: &str = r#"{
        "Body": {
            "stkCallback": {
                "MerchantRequestID": "29115-34620561-1",
                "CheckoutRequestID": "ws_CO_191220191020363925",
                "ResultCode": 1032,
                "ResultDesc": "Request cancelled by user."
            }
        }
    }"#;

    #[test]
    fn test_parse_success_callback() {
        let envelope: StkCallbackEnvelope = serde_json::from_str(SUCCESS_CALLBACK).unwrap();
        let callback = envelope.body.stk_callback;

        assert!(callback.is_success());
        assert_eq!(callback.checkout_request_id, "ws_CO_191220191020363925");
        assert_eq!(callback.receipt_number().as_deref(), Some("NLJ7RT61SV"));
    }

    #[test]
    fn test_parse_failure_callback() {
        let envelope: StkCallbackEnvelope = serde_json::from_str(FAILURE_CALLBACK).unwrap();
        let callback = envelope.body.stk_callback;

        assert!(!callback.is_success());
        assert_eq!(callback.result_code, 1032);
        assert_eq!(callback.receipt_number(), None);
    }

    #[test]
    fn test_msisdn_valid() {
        assert!(validate_msisdn("254708374149").is_ok());
    }

    #[test]
    fn test_msisdn_invalid() {
        assert_eq!(validate_msisdn("0708374149"), Err(InvalidMsisdn));
        assert_eq!(validate_msisdn("25470837414"), Err(InvalidMsisdn));
        assert_eq!(validate_msisdn("2547083741499"), Err(InvalidMsisdn));
        assert_eq!(validate_msisdn("2547o8374149"), Err(InvalidMsisdn));
        assert_eq!(validate_msisdn("254108374149"), Err(InvalidMsisdn));
    }
}
