//! Payment gateway callback contract.
//!
//! Pure parsing of the asynchronous STK-push result callback; the outbound
//! HTTP client lives in `pesabank-shared::daraja`.

pub mod callback;

pub use callback::{InvalidMsisdn, StkCallback, StkCallbackEnvelope, validate_msisdn};
