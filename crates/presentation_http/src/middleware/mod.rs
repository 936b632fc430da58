//! HTTP middleware components
//!
//! Request extraction that turns bad form input into a dashboard notice.

pub mod validation;

pub use validation::{ValidatedForm, validation_message};
