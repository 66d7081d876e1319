use super::{size_in_mb, Rejection, ValidationInput, ValidationRule};

// =========================================================================
// RULE: missing-type
// The filename has no extension at all.
// =========================================================================
pub struct MissingTypeRule;

impl ValidationRule for MissingTypeRule {
    fn rule_id(&self) -> &str {
        "missing-type"
    }

    fn check(&self, input: &ValidationInput<'_>) -> Option<Rejection> {
        input.extension.is_none().then_some(Rejection::MissingType)
    }
}

// =========================================================================
// RULE: unsupported-type
// The extension is outside the accepted set.
// =========================================================================
pub struct AcceptedTypeRule {
    accepted: Vec<String>,
}

impl AcceptedTypeRule {
    pub fn new(accepted: Vec<String>) -> Self {
        Self { accepted }
    }
}

impl ValidationRule for AcceptedTypeRule {
    fn rule_id(&self) -> &str {
        "unsupported-type"
    }

    fn check(&self, input: &ValidationInput<'_>) -> Option<Rejection> {
        let extension = input.extension?;
        (!self.accepted.iter().any(|accepted| accepted == extension))
            .then_some(Rejection::UnsupportedType)
    }
}

// =========================================================================
// RULE: too-large
// Rounded size in MB exceeds the ceiling.
// =========================================================================
pub struct SizeLimitRule {
    max_mb: f64,
}

impl SizeLimitRule {
    pub fn new(max_mb: f64) -> Self {
        Self { max_mb }
    }
}

impl ValidationRule for SizeLimitRule {
    fn rule_id(&self) -> &str {
        "too-large"
    }

    fn check(&self, input: &ValidationInput<'_>) -> Option<Rejection> {
        (size_in_mb(input.size_bytes) > self.max_mb).then_some(Rejection::TooLarge)
    }
}

// =========================================================================
// RULE: duplicate-name
// Exact filename match against the existing catalog. Sibling candidates are
// not considered here.
// =========================================================================
pub struct DuplicateNameRule;

impl ValidationRule for DuplicateNameRule {
    fn rule_id(&self) -> &str {
        "duplicate-name"
    }

    fn check(&self, input: &ValidationInput<'_>) -> Option<Rejection> {
        input
            .catalog
            .iter()
            .any(|doc| doc.filename == input.filename)
            .then_some(Rejection::DuplicateName)
    }
}

// =========================================================================
// RULE: unsupported-format
// Tabular data is not ingested yet.
// =========================================================================
pub struct TabularFormatRule {
    tabular: Vec<String>,
}

impl TabularFormatRule {
    pub fn new(tabular: Vec<String>) -> Self {
        Self { tabular }
    }
}

impl ValidationRule for TabularFormatRule {
    fn rule_id(&self) -> &str {
        "unsupported-format"
    }

    fn check(&self, input: &ValidationInput<'_>) -> Option<Rejection> {
        let extension = input.extension?;
        self.tabular
            .iter()
            .any(|tabular| tabular == extension)
            .then_some(Rejection::UnsupportedFormat)
    }
}
