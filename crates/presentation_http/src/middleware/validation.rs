//! Form validation
//!
//! Provides a `ValidatedForm` extractor that decodes a URL-encoded body and
//! validates it using the validator crate. Rejected input never reaches the
//! handler; it becomes a warning on the dashboard instead.

use application::Notice;
use axum::{
    Form,
    extract::{FromRequest, Request},
    response::Redirect,
};
use serde::de::DeserializeOwned;
use tracing::warn;
use validator::{Validate, ValidationErrors};

use crate::state::AppState;

/// A form extractor that also validates the request body
///
/// On failure the session gets a warning notice and the client is sent back
/// to the dashboard.
///
/// # Example
///
/// ```ignore
/// use validator::Validate;
/// use serde::Deserialize;
///
/// #[derive(Deserialize, Validate)]
/// struct WaypointForm {
///     #[validate(length(max = 200, message = "Destination name is too long"))]
///     name: String,
/// }
///
/// async fn add_waypoint(ValidatedForm(form): ValidatedForm<WaypointForm>) {
///     // form.name is at most 200 characters
/// }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedForm<T>(pub T);

impl<T> FromRequest<AppState> for ValidatedForm<T>
where
    T: DeserializeOwned + Validate + Send,
{
    type Rejection = Redirect;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let result = match Form::<T>::from_request(req, state).await {
            Ok(Form(value)) => value
                .validate()
                .map(|()| value)
                .map_err(|e| validation_message(&e)),
            Err(rejection) => Err(rejection.body_text()),
        };

        match result {
            Ok(value) => Ok(Self(value)),
            Err(message) => {
                warn!(%message, "Rejected form submission");
                state
                    .session
                    .lock()
                    .await
                    .push_notice(Notice::warning(message));
                Err(Redirect::to("/"))
            },
        }
    }
}

/// Join field errors into one line, using each rule's message when it has one
#[must_use]
pub fn validation_message(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                error.message.as_ref().map_or_else(
                    || format!("{field}: {}", error.code),
                    ToString::to_string,
                )
            })
        })
        .collect();
    messages.sort();
    messages.join("; ")
}
