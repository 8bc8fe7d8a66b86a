//! Conversions from external infrastructure errors into domain errors.

use arize_domain::ArizeError;
use reqwest::Error as HttpError;
use reqwest::StatusCode;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub ArizeError);

impl From<InfraError> for ArizeError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<ArizeError> for InfraError {
    fn from(value: ArizeError) -> Self {
        InfraError(value)
    }
}

trait IntoArizeError {
    fn into_arize(self) -> ArizeError;
}

/// Map a non-success HTTP status (plus response body) to a domain error.
pub fn status_error(status: StatusCode, body: &str) -> ArizeError {
    let code = status.as_u16();
    let mut message =
        format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));
    let body = body.trim();
    if !body.is_empty() {
        message.push_str(": ");
        message.push_str(body);
    }

    match code {
        401 | 403 => ArizeError::Auth(message),
        _ => ArizeError::Network(message),
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → ArizeError */
/* -------------------------------------------------------------------------- */

impl IntoArizeError for HttpError {
    fn into_arize(self) -> ArizeError {
        if self.is_timeout() {
            return ArizeError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return ArizeError::Network("HTTP connection failure".into());
        }

        if self.is_decode() {
            return ArizeError::Serialization(format!("invalid response body: {self}"));
        }

        if let Some(status) = self.status() {
            return status_error(status, "");
        }

        ArizeError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_arize())
    }
}

/* -------------------------------------------------------------------------- */
/* std::io::Error / toml::de::Error → ArizeError */
/* -------------------------------------------------------------------------- */

impl From<std::io::Error> for InfraError {
    fn from(value: std::io::Error) -> Self {
        InfraError(ArizeError::Io(value.to_string()))
    }
}

impl From<toml::de::Error> for InfraError {
    fn from(value: toml::de::Error) -> Self {
        InfraError(ArizeError::Config(format!("invalid TOML: {}", value.message())))
    }
}

impl From<toml::ser::Error> for InfraError {
    fn from(value: toml::ser::Error) -> Self {
        InfraError(ArizeError::Serialization(value.to_string()))
    }
}

/// `map_err` helper: route any convertible error through [`InfraError`].
pub fn to_domain<E>(error: E) -> ArizeError
where
    InfraError: From<E>,
{
    InfraError::from(error).into()
}
