//! Types returned by the license service.

/// Result of validating one expression against the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExpressionReport {
    /// The expression as submitted.
    pub expression: String,
    /// The simplified expression rendered with keys, if it parsed and was
    /// not empty.
    pub normalized: Option<String>,
    /// Keys missing from the registry, in first-appearance order.
    pub unknown_keys: Vec<String>,
    /// The parse error message, if parsing failed.
    pub error: Option<String>,
}

impl ExpressionReport {
    /// True if the expression parsed and uses only registered keys.
    pub fn is_valid(&self) -> bool {
        self.error.is_none() && self.unknown_keys.is_empty()
    }

    /// True if the expression parsed to nothing.
    pub fn is_empty(&self) -> bool {
        self.error.is_none() && self.normalized.is_none()
    }
}
