//! Diagnostic rule metadata.
//!
//! A [`CompatibilityDescriptor`] describes one compatibility rule - its
//! identifier, title, message template, category and default severity - the
//! way a reporting layer wants to render it. The mapping engine never
//! constructs or consumes these records; it supplies the raw mapping facts
//! (unmapped, ambiguous-with-reasons, unique) and the layer above pairs them
//! with a descriptor to produce a human-facing message.

use std::fmt;

/// Severity level of a compatibility rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Informational finding, not indicating a compatibility problem
    Info,
    /// Potentially breaking change that some consumers tolerate
    Warning,
    /// Breaking change
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "INFO"),
            Severity::Warning => write!(f, "WARNING"),
            Severity::Error => write!(f, "ERROR"),
        }
    }
}

/// Metadata describing one compatibility rule.
///
/// Plain data with accessors; formatting the message with the facts of a
/// particular mapping outcome is the reporting layer's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompatibilityDescriptor {
    rule_id: String,
    title: String,
    message_format: String,
    category: String,
    default_severity: Severity,
    description: Option<String>,
}

impl CompatibilityDescriptor {
    /// Create a descriptor without a long description
    #[must_use]
    pub fn new(
        rule_id: impl Into<String>,
        title: impl Into<String>,
        message_format: impl Into<String>,
        category: impl Into<String>,
        default_severity: Severity,
    ) -> Self {
        CompatibilityDescriptor {
            rule_id: rule_id.into(),
            title: title.into(),
            message_format: message_format.into(),
            category: category.into(),
            default_severity,
            description: None,
        }
    }

    /// Attach an optional long description
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Stable identifier of the rule, e.g. `CC0002`
    #[must_use]
    pub fn rule_id(&self) -> &str {
        &self.rule_id
    }

    /// Short human-readable title
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Message template the reporting layer fills with mapping facts
    #[must_use]
    pub fn message_format(&self) -> &str {
        &self.message_format
    }

    /// Grouping category, e.g. `Field` or `Signature`
    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Severity assigned when the consumer does not override it
    #[must_use]
    pub fn default_severity(&self) -> Severity {
        self.default_severity
    }

    /// Optional long description of the rule
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_accessors() {
        let descriptor = CompatibilityDescriptor::new(
            "CC0004",
            "Field removed",
            "Field '{0}' exists in the old version but not in the new version.",
            "Field",
            Severity::Error,
        );
        assert_eq!(descriptor.rule_id(), "CC0004");
        assert_eq!(descriptor.category(), "Field");
        assert_eq!(descriptor.default_severity(), Severity::Error);
        assert_eq!(descriptor.description(), None);
    }

    #[test]
    fn test_descriptor_with_description() {
        let descriptor = CompatibilityDescriptor::new(
            "CC0007",
            "Constant value changed",
            "Constant '{0}' changed value.",
            "Constant",
            Severity::Warning,
        )
        .with_description("Consumers compile constant values into their own binaries.");
        assert!(descriptor.description().is_some());
    }

    #[test]
    fn test_severity_display() {
        assert_eq!(Severity::Info.to_string(), "INFO");
        assert_eq!(Severity::Warning.to_string(), "WARNING");
        assert_eq!(Severity::Error.to_string(), "ERROR");
    }
}
