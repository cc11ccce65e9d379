pub mod backoff;
pub mod error;
pub mod field_error_cache;
pub mod gate;

pub use backoff::backoff_duration;
pub use error::RetryGateError;
pub use field_error_cache::FieldErrorCache;
pub use gate::RetryGate;
