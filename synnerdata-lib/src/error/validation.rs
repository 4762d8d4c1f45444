//! Validation error types

use serde::Deserialize;

/// Error information for a specific field that failed validation.
///
/// The backend reports these alongside a 400/422 answer; form code shows
/// them next to the matching input.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FieldValidationError {
    /// The field that failed validation.
    #[serde(alias = "path", alias = "property")]
    pub field: String,
    /// Human-readable validation error message.
    pub message: String,
    /// Optional error code.
    #[serde(default)]
    pub code: Option<String>,
}

impl FieldValidationError {
    /// Creates a new field validation error.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            code: None,
        }
    }
}

impl std::fmt::Display for FieldValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(code) = &self.code {
            write!(f, "{}: {} ({})", self.field, self.message, code)
        } else {
            write!(f, "{}: {}", self.field, self.message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_code_is_displayed() {
        let err: FieldValidationError = serde_json::from_str(
            r#"{"path": "cpf", "message": "CPF inválido", "code": "invalid_cpf"}"#,
        )
        .unwrap();
        assert_eq!(err.field, "cpf");
        assert_eq!(err.to_string(), "cpf: CPF inválido (invalid_cpf)");
        assert_eq!(
            FieldValidationError::new("cpf", "CPF inválido").to_string(),
            "cpf: CPF inválido"
        );
    }
}
