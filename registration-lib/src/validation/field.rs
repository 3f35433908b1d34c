//! Evaluation of a single field against its rule.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;

use super::ValidationOutcome;
use crate::error::ValidationErrorKind;
use crate::field::FieldName;
use crate::rules::{CheckOutcome, FieldRule, RuleRegistry};

pub const REQUIRED_MESSAGE: &str = "この項目は必須です";
pub const INTERNAL_ERROR_MESSAGE: &str = "検証中にエラーが発生しました";

/// Message for a value longer than `max` characters.
pub fn length_message(max: usize, actual: usize) -> String {
    format!("{max}文字以内で入力してください（現在{actual}文字）")
}

/// Evaluates one field's value against its rule.
///
/// Steps run in a fixed order and stop at the first failure: touched gate,
/// required, empty optional, length, pattern, custom check. Errors and panics
/// from custom checks are contained here and reported as
/// [`ValidationErrorKind::ValidationInternalError`].
#[derive(Debug, Clone)]
pub struct FieldValidator {
    registry: Arc<RuleRegistry>,
}

impl FieldValidator {
    pub fn new(registry: Arc<RuleRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Validates a field's raw value.
    ///
    /// `touched` is false only while the user has never finished interacting
    /// with the field; such calls pass without evaluation.
    pub async fn validate(&self, field: FieldName, raw: &str, touched: bool) -> ValidationOutcome {
        match self.registry.lookup(field) {
            Some(rule) => evaluate(field, rule, raw, touched).await,
            None => ValidationOutcome::pass(),
        }
    }

    /// Validates by field id. Ids outside the form always pass.
    pub async fn validate_name(&self, name: &str, raw: &str, touched: bool) -> ValidationOutcome {
        match name.parse::<FieldName>() {
            Ok(field) => self.validate(field, raw, touched).await,
            Err(_) => ValidationOutcome::pass(),
        }
    }
}

async fn evaluate(field: FieldName, rule: &FieldRule, raw: &str, touched: bool) -> ValidationOutcome {
    if !touched {
        return ValidationOutcome::pass();
    }

    let blank = raw.trim().is_empty();
    if rule.is_required() && blank {
        return ValidationOutcome::fail(ValidationErrorKind::RequiredFieldMissing, REQUIRED_MESSAGE);
    }
    if blank {
        return ValidationOutcome::pass_with(raw);
    }

    if let Some(max) = rule.max_len() {
        let len = raw.chars().count();
        if len > max {
            return ValidationOutcome::fail(ValidationErrorKind::LengthExceeded, length_message(max, len));
        }
    }

    let normalized = match rule.pattern_ref() {
        Some(pattern) => {
            let normalized = pattern.normalize(raw);
            if !pattern.matches_normalized(&normalized) {
                return ValidationOutcome::fail(ValidationErrorKind::PatternMismatch, pattern.message());
            }
            normalized
        }
        None => raw.to_string(),
    };

    let Some(check) = rule.custom_check() else {
        return ValidationOutcome::pass_with(normalized);
    };

    match AssertUnwindSafe(check.check(&normalized)).catch_unwind().await {
        Ok(Ok(CheckOutcome::Pass)) => ValidationOutcome::pass_with(normalized),
        Ok(Ok(CheckOutcome::Fail { message, suggestion })) => {
            ValidationOutcome::fail(ValidationErrorKind::CustomRuleFailed, message)
                .with_suggestion(suggestion)
                .with_normalized(normalized)
        }
        Ok(Err(e)) => {
            log::error!("Validation error ({field}): {e}");
            ValidationOutcome::fail(ValidationErrorKind::ValidationInternalError, INTERNAL_ERROR_MESSAGE)
        }
        Err(panic) => {
            log::error!("Validation error ({field}): check panicked: {}", panic_message(&panic));
            ValidationOutcome::fail(ValidationErrorKind::ValidationInternalError, INTERNAL_ERROR_MESSAGE)
        }
    }
}

fn panic_message(panic: &Box<dyn Any + Send>) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}
