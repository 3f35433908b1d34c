//! Custom checks run after a field's pattern has matched.
//!
//! Every check implements the same asynchronous [`CustomCheck`] contract.
//! Synchronous checks are wrapped with [`sync_check`] so the field validator
//! never needs to know how a check is implemented.

use std::sync::Arc;

use async_trait::async_trait;

use super::prefecture::is_prefecture;
use crate::collab::PostcodeLookup;
use crate::error::CheckError;
use crate::validation::CharClasses;

pub const NAME_SEPARATOR_MESSAGE: &str = "姓と名の間にスペースを入れてください";
pub const FURIGANA_SEPARATOR_MESSAGE: &str = "セイとメイの間にスペースを入れてください";
pub const PASSWORD_DIVERSITY_MESSAGE: &str = "大文字、小文字、数字、記号のうち3種類以上を含めてください";
pub const POSTCODE_UNKNOWN_MESSAGE: &str = "存在しない郵便番号です";
pub const PREFECTURE_MESSAGE: &str = "選択肢から都道府県を選択してください";

/// Frequently mistyped email domains and their likely intended spelling.
pub const COMMON_DOMAIN_TYPOS: &[(&str, &str)] = &[
    ("gmail.co.jp", "gmail.com"),
    ("gmial.com", "gmail.com"),
    ("gmai.com", "gmail.com"),
    ("outlook.co.jp", "outlook.com"),
    ("yahoo.co.jo", "yahoo.co.jp"),
];

/// Result of a custom check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    Pass,
    Fail {
        message: String,
        /// A corrected value the user probably meant.
        suggestion: Option<String>,
    },
}

impl CheckOutcome {
    pub fn fail(message: impl Into<String>) -> Self {
        Self::Fail {
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn fail_with_suggestion(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self::Fail {
            message: message.into(),
            suggestion: Some(suggestion.into()),
        }
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }
}

/// A field-specific check that may need to wait on I/O.
///
/// Receives the normalized value. Returning `Err` (or panicking) is reported
/// to the user as a generic validation error.
#[async_trait]
pub trait CustomCheck: Send + Sync {
    async fn check(&self, value: &str) -> Result<CheckOutcome, CheckError>;
}

/// Adapter running a synchronous closure behind the async contract.
pub struct SyncCheck<F>(F);

#[async_trait]
impl<F> CustomCheck for SyncCheck<F>
where
    F: Fn(&str) -> Result<CheckOutcome, CheckError> + Send + Sync,
{
    async fn check(&self, value: &str) -> Result<CheckOutcome, CheckError> {
        (self.0)(value)
    }
}

/// Wraps a synchronous check.
pub fn sync_check<F>(f: F) -> Arc<dyn CustomCheck>
where
    F: Fn(&str) -> Result<CheckOutcome, CheckError> + Send + Sync + 'static,
{
    Arc::new(SyncCheck(f))
}

/// Requires a half-width space between two non-empty segments.
///
/// The registry pairs this with a name pattern that enforces the same shape;
/// on its own it serves rules without a pattern.
pub fn separator(message: &'static str) -> Arc<dyn CustomCheck> {
    sync_check(move |value| {
        let ok = value
            .split_once(' ')
            .is_some_and(|(family, given)| !family.trim().is_empty() && !given.trim().is_empty());
        Ok(if ok {
            CheckOutcome::Pass
        } else {
            CheckOutcome::fail(message)
        })
    })
}

/// Suggests a correction for commonly mistyped email domains.
pub fn email_domain_typo() -> Arc<dyn CustomCheck> {
    sync_check(|value| {
        let Some((local, domain)) = value.rsplit_once('@') else {
            return Ok(CheckOutcome::Pass);
        };
        let correction = COMMON_DOMAIN_TYPOS
            .iter()
            .find(|(typo, _)| *typo == domain)
            .map(|(_, intended)| *intended);

        Ok(match correction {
            Some(intended) => {
                let suggestion = format!("{local}@{intended}");
                CheckOutcome::fail_with_suggestion(format!("もしかして: {suggestion}?"), suggestion)
            }
            None => CheckOutcome::Pass,
        })
    })
}

/// Requires at least three of upper case, lower case, digit and symbol.
pub fn password_diversity() -> Arc<dyn CustomCheck> {
    sync_check(|value| {
        Ok(if CharClasses::of(value).count() >= 3 {
            CheckOutcome::Pass
        } else {
            CheckOutcome::fail(PASSWORD_DIVERSITY_MESSAGE)
        })
    })
}

/// Requires the value to be one of the 47 prefectures.
pub fn prefecture_option() -> Arc<dyn CustomCheck> {
    sync_check(|value| {
        Ok(if is_prefecture(value) {
            CheckOutcome::Pass
        } else {
            CheckOutcome::fail(PREFECTURE_MESSAGE)
        })
    })
}

/// Asks an external service whether a postcode exists.
///
/// Lookup failures never block: they are logged and the check passes. Without
/// a lookup the check always passes.
pub struct PostcodeExists {
    lookup: Option<Arc<dyn PostcodeLookup>>,
}

impl PostcodeExists {
    pub fn new(lookup: Option<Arc<dyn PostcodeLookup>>) -> Self {
        Self { lookup }
    }
}

#[async_trait]
impl CustomCheck for PostcodeExists {
    async fn check(&self, value: &str) -> Result<CheckOutcome, CheckError> {
        let Some(lookup) = &self.lookup else {
            return Ok(CheckOutcome::Pass);
        };

        match lookup.exists(value).await {
            Ok(true) => Ok(CheckOutcome::Pass),
            Ok(false) => Ok(CheckOutcome::fail(POSTCODE_UNKNOWN_MESSAGE)),
            Err(e) => {
                log::warn!("Postcode lookup unavailable, skipping existence check for {value}: {e}");
                Ok(CheckOutcome::Pass)
            }
        }
    }
}
