//! Upload validation
//!
//! The engine is an ordered list of [`ValidationRule`]s evaluated top to bottom;
//! the first rule that rejects the candidate decides the verdict. The default
//! order (see [`ValidationEngine::from_policy`]) is the console's tie-break
//! policy:
//!
//! 1. missing type
//! 2. unsupported type
//! 3. too large
//! 4. duplicate name (against the existing catalog)
//! 5. unsupported tabular format
//!
//! Validation is pure: no I/O, no shared state.

pub mod rules;

use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::config::UploadPolicy;
use crate::models::{extension_of, ExistingDocument, UploadStatus};

pub use rules::{
    AcceptedTypeRule, DuplicateNameRule, MissingTypeRule, SizeLimitRule, TabularFormatRule,
};

/// Size in megabytes rounded to two decimals: `round(100 * bytes / 1024 / 1024) / 100`.
pub fn size_in_mb(size_bytes: usize) -> f64 {
    ((100.0 * size_bytes as f64) / 1024.0 / 1024.0).round() / 100.0
}

/// Why a candidate was turned down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    MissingType,
    UnsupportedType,
    TooLarge,
    DuplicateName,
    UnsupportedFormat,
}

impl Rejection {
    pub fn message(&self) -> &'static str {
        match self {
            Rejection::MissingType => "Error: File type not found",
            Rejection::UnsupportedType => "Error: File type not accepted",
            Rejection::TooLarge => "Error: File size too large",
            Rejection::DuplicateName => "Error: File with this name already exists",
            Rejection::UnsupportedFormat => "Error: Tabular data is not yet supported",
        }
    }
}

impl Display for Rejection {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Rejection::MissingType => write!(f, "missing-type"),
            Rejection::UnsupportedType => write!(f, "unsupported-type"),
            Rejection::TooLarge => write!(f, "too-large"),
            Rejection::DuplicateName => write!(f, "duplicate-name"),
            Rejection::UnsupportedFormat => write!(f, "unsupported-format"),
        }
    }
}

/// Result of validating one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Ready,
    Rejected(Rejection),
}

impl Verdict {
    pub fn is_ready(&self) -> bool {
        matches!(self, Verdict::Ready)
    }

    pub fn message(&self) -> &'static str {
        match self {
            Verdict::Ready => "Ready to upload",
            Verdict::Rejected(rejection) => rejection.message(),
        }
    }
}

impl From<Verdict> for UploadStatus {
    fn from(verdict: Verdict) -> Self {
        match verdict {
            Verdict::Ready => UploadStatus::Ready,
            Verdict::Rejected(rejection) => UploadStatus::error(rejection.message()),
        }
    }
}

/// Everything a rule may look at for one candidate.
#[derive(Debug, Clone, Copy)]
pub struct ValidationInput<'a> {
    pub filename: &'a str,
    pub extension: Option<&'a str>,
    pub size_bytes: usize,
    pub catalog: &'a [ExistingDocument],
}

impl<'a> ValidationInput<'a> {
    pub fn new(filename: &'a str, size_bytes: usize, catalog: &'a [ExistingDocument]) -> Self {
        Self {
            filename,
            extension: extension_of(filename),
            size_bytes,
            catalog,
        }
    }
}

/// The contract every rule must fulfill
pub trait ValidationRule: Send + Sync {
    fn rule_id(&self) -> &str;

    /// `Some` when the rule rejects the candidate.
    fn check(&self, input: &ValidationInput<'_>) -> Option<Rejection>;
}

/// Ordered registry of rules; first match wins.
pub struct ValidationEngine {
    rules: Vec<Box<dyn ValidationRule>>,
}

impl ValidationEngine {
    /// Engine with no rules: everything is `Ready`.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Engine with the console's five rules in tie-break order.
    pub fn from_policy(policy: &UploadPolicy) -> Self {
        Self::new()
            .add_rule(MissingTypeRule)
            .add_rule(AcceptedTypeRule::new(policy.accepted_extensions.clone()))
            .add_rule(SizeLimitRule::new(policy.max_file_size_mb))
            .add_rule(DuplicateNameRule)
            .add_rule(TabularFormatRule::new(policy.tabular_extensions.clone()))
    }

    pub fn add_rule<R: ValidationRule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    pub fn rule_ids(&self) -> Vec<&str> {
        self.rules.iter().map(|rule| rule.rule_id()).collect()
    }

    pub fn run(&self, input: &ValidationInput<'_>) -> Verdict {
        for rule in &self.rules {
            if let Some(rejection) = rule.check(input) {
                tracing::debug!(
                    filename = %input.filename,
                    rule = rule.rule_id(),
                    rejection = %rejection,
                    "Candidate rejected"
                );
                return Verdict::Rejected(rejection);
            }
        }
        Verdict::Ready
    }

    /// Validate one file by name and size against the current catalog.
    pub fn validate(
        &self,
        filename: &str,
        size_bytes: usize,
        catalog: &[ExistingDocument],
    ) -> Verdict {
        self.run(&ValidationInput::new(filename, size_bytes, catalog))
    }
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::from_policy(&UploadPolicy::default())
    }
}
