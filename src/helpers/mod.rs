pub mod validate;

pub use validate::{REDACTED_PASSWORD, extract_host_from_uri, redact_uri_password, validate_mongodb_uri};
