//! Error types for the license expression service.

use license_expression::LicenseError;
use thiserror::Error;

/// Errors that can occur while serving license expressions.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Error from parsing or querying an expression.
    #[error("License expression error: {0}")]
    Expression(#[from] LicenseError),

    /// The expression was empty where a license was required.
    #[error("Empty license expression")]
    EmptyExpression,
}

/// Result type for service operations.
pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;
    use license_expression::{ParseError, ParseErrorCode};

    #[test]
    fn test_error_display_empty_expression() {
        assert_eq!(
            ServiceError::EmptyExpression.to_string(),
            "Empty license expression"
        );
    }

    #[test]
    fn test_error_from_license_error() {
        let err: ServiceError = LicenseError::from(
            ParseError::new(ParseErrorCode::InvalidExpression).at_position(4),
        )
        .into();
        assert!(matches!(err, ServiceError::Expression(_)));
        assert!(err.to_string().starts_with("License expression error: "));
    }
}
