//! Transfer-PIN hashing and authorization predicates.

pub mod capability;
pub mod pin;

pub use capability::{Role, is_admin, is_owner};
pub use pin::{PinError, hash_pin, validate_pin_format, verify_pin};
