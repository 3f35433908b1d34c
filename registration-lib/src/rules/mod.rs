//! Per-field validation rules and the registry holding them.

pub mod checks;
pub mod patterns;
mod prefecture;

pub use checks::{CheckOutcome, CustomCheck, sync_check};
pub use prefecture::{PREFECTURES, is_prefecture};

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use regex::Regex;

use crate::collab::PostcodeLookup;
use crate::field::FieldName;

/// A regex with its failure message and optional normalizer.
#[derive(Clone)]
pub struct Pattern {
    regex: Regex,
    message: &'static str,
    normalize: Option<fn(&str) -> String>,
}

impl Pattern {
    pub fn new(regex: Regex, message: &'static str) -> Self {
        Self {
            regex,
            message,
            normalize: None,
        }
    }

    /// Sets the normalizer applied before matching.
    pub fn normalized_by(mut self, normalize: fn(&str) -> String) -> Self {
        self.normalize = Some(normalize);
        self
    }

    /// Message reported when the normalized value does not match.
    pub fn message(&self) -> &'static str {
        self.message
    }

    /// Applies the normalizer, or returns the value unchanged.
    pub fn normalize(&self, value: &str) -> String {
        match self.normalize {
            Some(normalize) => normalize(value),
            None => value.to_string(),
        }
    }

    /// Whether the normalized value matches.
    pub fn matches(&self, value: &str) -> bool {
        self.regex.is_match(&self.normalize(value))
    }

    /// Whether an already normalized value matches.
    pub(crate) fn matches_normalized(&self, normalized: &str) -> bool {
        self.regex.is_match(normalized)
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pattern")
            .field("regex", &self.regex.as_str())
            .field("message", &self.message)
            .field("normalizes", &self.normalize.is_some())
            .finish()
    }
}

/// Validation rules for one field.
///
/// # Example
///
/// ```
/// use registration_lib::rules::{FieldRule, patterns};
///
/// let rule = FieldRule::required()
///     .max_length(30)
///     .pattern(patterns::name());
/// assert!(rule.is_required());
/// assert_eq!(rule.max_len(), Some(30));
/// ```
#[derive(Clone, Default)]
pub struct FieldRule {
    required: bool,
    max_length: Option<usize>,
    pattern: Option<Pattern>,
    custom: Option<Arc<dyn CustomCheck>>,
}

impl FieldRule {
    /// A rule for a field that must not be blank.
    pub fn required() -> Self {
        Self {
            required: true,
            ..Default::default()
        }
    }

    /// A rule for a field that may be left empty.
    pub fn optional() -> Self {
        Self::default()
    }

    /// Sets the maximum length in characters.
    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    /// Sets the pattern.
    pub fn pattern(mut self, pattern: Pattern) -> Self {
        self.pattern = Some(pattern);
        self
    }

    /// Sets the custom check.
    pub fn custom(mut self, check: Arc<dyn CustomCheck>) -> Self {
        self.custom = Some(check);
        self
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn max_len(&self) -> Option<usize> {
        self.max_length
    }

    pub fn pattern_ref(&self) -> Option<&Pattern> {
        self.pattern.as_ref()
    }

    pub fn custom_check(&self) -> Option<&Arc<dyn CustomCheck>> {
        self.custom.as_ref()
    }
}

impl fmt::Debug for FieldRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldRule")
            .field("required", &self.required)
            .field("max_length", &self.max_length)
            .field("pattern", &self.pattern)
            .field("custom", &self.custom.is_some())
            .finish()
    }
}

/// Immutable table of rules for the registration form.
#[derive(Debug, Clone)]
pub struct RuleRegistry {
    rules: BTreeMap<FieldName, FieldRule>,
}

impl RuleRegistry {
    /// The registration form's rules, without a postcode existence lookup.
    pub fn standard() -> Self {
        Self::build(None)
    }

    /// The registration form's rules, checking postcodes with `lookup`.
    pub fn with_postcode_lookup(lookup: Arc<dyn PostcodeLookup>) -> Self {
        Self::build(Some(lookup))
    }

    fn build(lookup: Option<Arc<dyn PostcodeLookup>>) -> Self {
        use FieldName as F;

        let rules = BTreeMap::from([
            (
                F::Name,
                FieldRule::required()
                    .max_length(30)
                    // Unreachable while the pattern requires the separator.
                    .pattern(patterns::name())
                    .custom(checks::separator(checks::NAME_SEPARATOR_MESSAGE)),
            ),
            (
                F::Furigana,
                FieldRule::required()
                    .max_length(30)
                    .pattern(patterns::furigana())
                    .custom(checks::separator(checks::FURIGANA_SEPARATOR_MESSAGE)),
            ),
            (
                F::Email,
                FieldRule::required()
                    .pattern(patterns::email())
                    .custom(checks::email_domain_typo()),
            ),
            (
                F::Password,
                FieldRule::required()
                    .pattern(patterns::password())
                    .custom(checks::password_diversity()),
            ),
            (F::Phone, FieldRule::required().pattern(patterns::phone())),
            (
                F::Postcode,
                FieldRule::required()
                    .pattern(patterns::postcode())
                    .custom(Arc::new(checks::PostcodeExists::new(lookup))),
            ),
            (
                F::Prefecture,
                FieldRule::required().custom(checks::prefecture_option()),
            ),
            (F::City, FieldRule::required().max_length(30)),
            (F::Address, FieldRule::required().max_length(50)),
            (F::Remarks, FieldRule::optional().max_length(255)),
        ]);

        Self { rules }
    }

    /// Rule for a field.
    pub fn lookup(&self, field: FieldName) -> Option<&FieldRule> {
        self.rules.get(&field)
    }

    /// Rule for a field id; `None` for ids outside the form.
    pub fn lookup_name(&self, name: &str) -> Option<&FieldRule> {
        name.parse().ok().and_then(|field| self.lookup(field))
    }

    /// Fields with a rule, in form order.
    pub fn fields(&self) -> impl Iterator<Item = FieldName> + '_ {
        self.rules.keys().copied()
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_field_has_a_rule() {
        let registry = RuleRegistry::standard();
        let fields: Vec<_> = registry.fields().collect();
        assert_eq!(fields, FieldName::ALL);
    }

    #[test]
    fn only_remarks_is_optional() {
        let registry = RuleRegistry::standard();
        for field in FieldName::ALL {
            let rule = registry.lookup(field).unwrap();
            assert_eq!(rule.is_required(), field != FieldName::Remarks, "{field}");
        }
        assert_eq!(registry.lookup(FieldName::Remarks).unwrap().max_len(), Some(255));
        assert_eq!(registry.lookup(FieldName::Address).unwrap().max_len(), Some(50));
    }

    #[test]
    fn lookup_by_name() {
        let registry = RuleRegistry::standard();
        assert!(registry.lookup_name("email").is_some());
        assert!(registry.lookup_name("nickname").is_none());
    }
}
