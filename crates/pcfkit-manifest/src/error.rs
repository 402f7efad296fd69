//! # Validation Issues and the Crate Error Type
//!
//! Validation never stops at the first problem: the validator walks the
//! whole document and accumulates every issue into a [`ValidationReport`],
//! each entry carrying the dotted/bracketed path of the offending field
//! (e.g. `control.property[2].of-type`). Paths use the external hyphenated
//! spellings exactly as they appear in YAML/JSON/XML.

use thiserror::Error;

/// Classification of a single validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssueKind {
    /// A key that is not part of the schema at this node.
    UnknownField,
    /// A required key that is absent.
    MissingField,
    /// A value of the wrong primitive kind, an empty required string, or a
    /// keyword outside its vocabulary.
    TypeMismatch {
        /// Description of the accepted form (e.g. `"non-empty string"`).
        expected: String,
        /// Rendering of the value actually found.
        actual: String,
    },
    /// A cross-field rule violated by otherwise well-typed values.
    InvariantViolation {
        /// Human-readable statement of the broken rule.
        rule: String,
    },
}

/// One validation failure at one field path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Path of the offending field, in external spelling.
    pub path: String,
    /// What went wrong.
    pub kind: ValidationIssueKind,
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            ValidationIssueKind::UnknownField => {
                write!(f, "{}: unknown field", self.path)
            }
            ValidationIssueKind::MissingField => {
                write!(f, "{}: missing required field", self.path)
            }
            ValidationIssueKind::TypeMismatch { expected, actual } => {
                write!(f, "{}: expected {expected}, found {actual}", self.path)
            }
            ValidationIssueKind::InvariantViolation { rule } => {
                write!(f, "{}: {rule}", self.path)
            }
        }
    }
}

/// The complete set of issues found in one validation pass.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationReport {
    issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn new(issues: Vec<ValidationIssue>) -> Self {
        Self { issues }
    }

    /// Record an issue at the given path.
    pub fn add(&mut self, path: impl Into<String>, kind: ValidationIssueKind) {
        self.issues.push(ValidationIssue {
            path: path.into(),
            kind,
        });
    }

    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Whether any issue sits at exactly this path.
    pub fn has_issue_at(&self, path: &str) -> bool {
        self.issues.iter().any(|i| i.path == path)
    }
}

impl std::fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, issue) in self.issues.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}

/// Errors produced while loading, validating, or importing a manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// The document could not be parsed at all (broken YAML/JSON/XML, a
    /// non-mapping root, or an XML root other than `<manifest>`).
    #[error("malformed document: {0}")]
    MalformedDocument(String),

    /// The document parsed but violates the manifest schema. The report
    /// lists every issue found.
    #[error("invalid manifest:\n{0}")]
    Invalid(ValidationReport),
}

impl ManifestError {
    /// The validation report, when this error carries one.
    pub fn report(&self) -> Option<&ValidationReport> {
        match self {
            Self::Invalid(report) => Some(report),
            Self::MalformedDocument(_) => None,
        }
    }
}

/// Convenience alias used across the crate.
pub type ManifestResult<T> = Result<T, ManifestError>;
