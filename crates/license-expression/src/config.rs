//! Configuration types for parsing and for the symbol registry.

/// Options for [`Licensing::parse`](crate::Licensing::parse) and
/// [`Licensing::tokenize`](crate::Licensing::tokenize).
///
/// # Example
///
/// ```rust
/// use license_expression::ParseOptions;
///
/// let options = ParseOptions::new()
///     .with_validate(true)
///     .with_strict(true);
///
/// assert!(options.validate);
/// assert!(options.strict);
/// assert!(!options.simple);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ParseOptions {
    /// Fail when the expression uses keys missing from the registry.
    pub validate: bool,
    /// Enforce exception polarity: only exceptions after `WITH`, and no
    /// exception used as a plain license.
    pub strict: bool,
    /// Use the whitespace tokenizer instead of the multi-word matcher.
    pub simple: bool,
}

impl ParseOptions {
    /// Default options: lenient, multi-word tokenizer, no validation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables validation against the registry.
    pub fn with_validate(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }

    /// Enables or disables strict exception checks.
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Selects the whitespace tokenizer.
    pub fn with_simple(mut self, simple: bool) -> Self {
        self.simple = simple;
        self
    }
}

/// Configuration for a [`Licensing`](crate::Licensing) registry.
///
/// # Example
///
/// ```rust
/// use license_expression::LicensingConfig;
///
/// let config = LicensingConfig::builder()
///     .with_quiet(false)
///     .with_warnings_as_errors(true)
///     .build();
///
/// assert!(!config.quiet);
/// assert!(config.warnings_as_errors);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LicensingConfig {
    /// Do not log registry warnings and errors.
    pub quiet: bool,
    /// Refuse a registry that only has warnings.
    pub warnings_as_errors: bool,
}

impl Default for LicensingConfig {
    fn default() -> Self {
        Self {
            quiet: true,
            warnings_as_errors: false,
        }
    }
}

impl LicensingConfig {
    /// Creates a new builder for LicensingConfig.
    pub fn builder() -> LicensingConfigBuilder {
        LicensingConfigBuilder::default()
    }
}

/// Builder for LicensingConfig.
#[derive(Debug, Clone)]
pub struct LicensingConfigBuilder {
    quiet: bool,
    warnings_as_errors: bool,
}

impl Default for LicensingConfigBuilder {
    fn default() -> Self {
        let defaults = LicensingConfig::default();
        Self {
            quiet: defaults.quiet,
            warnings_as_errors: defaults.warnings_as_errors,
        }
    }
}

impl LicensingConfigBuilder {
    /// Enables or disables logging of registry problems.
    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Treats registry warnings as errors.
    pub fn with_warnings_as_errors(mut self, warnings_as_errors: bool) -> Self {
        self.warnings_as_errors = warnings_as_errors;
        self
    }

    /// Builds the LicensingConfig.
    pub fn build(self) -> LicensingConfig {
        LicensingConfig {
            quiet: self.quiet,
            warnings_as_errors: self.warnings_as_errors,
        }
    }
}
