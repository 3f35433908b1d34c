mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{StubLookup, valid_snapshot};
use registration_lib::collab::memory::MemoryErrorSink;
use registration_lib::error::ValidationErrorKind;
use registration_lib::field::{FieldName, FormSnapshot};
use registration_lib::rules::RuleRegistry;
use registration_lib::rules::checks::POSTCODE_UNKNOWN_MESSAGE;
use registration_lib::validation::{FormValidator, REQUIRED_MESSAGE};

fn validator() -> FormValidator {
    FormValidator::new(Arc::new(RuleRegistry::standard()))
}

fn validator_with_lookup(lookup: Arc<StubLookup>) -> FormValidator {
    FormValidator::new(Arc::new(RuleRegistry::with_postcode_lookup(lookup)))
}

// =============================================================================
// Whole-form validation
// =============================================================================

#[tokio::test]
async fn test_valid_snapshot_passes_with_no_errors() {
    let form = validator();
    assert!(form.validate_form(&valid_snapshot()).await);
    assert!(form.all_errors().is_empty());
}

#[tokio::test]
async fn test_empty_snapshot_fails_every_required_field() {
    let form = validator();
    assert!(!form.validate_form(&FormSnapshot::new()).await);

    let errors = form.all_errors();
    assert_eq!(errors.len(), 9);
    assert!(!errors.contains_key(&FieldName::Remarks));
    for messages in errors.values() {
        assert_eq!(messages, &vec![REQUIRED_MESSAGE.to_string()]);
    }
}

#[tokio::test]
async fn test_every_field_is_touched_after_form_validation() {
    let form = validator();
    form.validate_form(&valid_snapshot()).await;
    for field in FieldName::ALL {
        assert!(form.is_touched(field), "{field} not touched");
    }
}

#[tokio::test]
async fn test_form_validation_is_idempotent() {
    let form = validator();
    let snapshot = valid_snapshot()
        .with(FieldName::Email, "user@gmial.com")
        .with(FieldName::Phone, "12345");

    assert!(!form.validate_form(&snapshot).await);
    let first = form.all_errors();
    assert!(!form.validate_form(&snapshot).await);
    assert_eq!(form.all_errors(), first);
    assert_eq!(first.len(), 2);
}

#[tokio::test]
async fn test_valid_pass_clears_previous_errors() {
    let form = validator();
    assert!(!form.validate_form(&FormSnapshot::new()).await);
    assert!(!form.all_errors().is_empty());

    assert!(form.validate_form(&valid_snapshot()).await);
    assert!(form.all_errors().is_empty());
    assert!(form.field_errors(FieldName::Name).is_empty());
}

#[tokio::test]
async fn test_report_lists_failures_in_form_order() {
    let form = validator();
    let snapshot = valid_snapshot()
        .with(FieldName::Address, "")
        .with(FieldName::Name, "田中太郎")
        .with(FieldName::Password, "abcdefgh");

    let report = form.validate_snapshot(&snapshot).await;
    assert!(!report.is_valid());

    let failing: Vec<FieldName> = report.errors().iter().map(|e| e.field).collect();
    assert_eq!(failing, [FieldName::Name, FieldName::Password, FieldName::Address]);

    let address = report.outcome(FieldName::Address).unwrap();
    assert_eq!(address.kind, Some(ValidationErrorKind::RequiredFieldMissing));
}

#[tokio::test]
async fn test_normalized_values_are_reported() {
    let form = validator();
    let snapshot = valid_snapshot()
        .with(FieldName::Furigana, "たなか　たろう")
        .with(FieldName::Email, "  Taro@Example.COM ");

    let report = form.validate_snapshot(&snapshot).await;
    assert!(report.is_valid());
    assert_eq!(
        report.outcome(FieldName::Furigana).unwrap().normalized_value.as_deref(),
        Some("タナカ タロウ")
    );
    assert_eq!(
        report.outcome(FieldName::Email).unwrap().normalized_value.as_deref(),
        Some("taro@example.com")
    );
}

#[tokio::test]
async fn test_length_counts_characters_not_bytes() {
    let form = validator();
    let ok = valid_snapshot().with(FieldName::City, "あ".repeat(30));
    assert!(form.validate_form(&ok).await);

    let long = valid_snapshot().with(FieldName::City, "あ".repeat(31));
    let report = form.validate_snapshot(&long).await;
    assert_eq!(
        report.outcome(FieldName::City).unwrap().kind,
        Some(ValidationErrorKind::LengthExceeded)
    );
}

#[tokio::test]
async fn test_prefecture_must_be_an_option() {
    let form = validator();
    let snapshot = valid_snapshot().with(FieldName::Prefecture, "東京");
    assert!(!form.validate_form(&snapshot).await);
    assert_eq!(form.field_errors(FieldName::Prefecture).len(), 1);
}

// =============================================================================
// Single-field validation and the touched gate
// =============================================================================

#[tokio::test]
async fn test_input_before_blur_shows_nothing() {
    let sink = Arc::new(MemoryErrorSink::new());
    let form = validator().with_error_sink(sink.clone());

    let outcome = form.validate_field(FieldName::Email, "not-an-email", false).await;
    assert!(outcome.is_valid());
    assert!(!form.is_touched(FieldName::Email));
    assert!(form.field_errors(FieldName::Email).is_empty());
    assert_eq!(sink.shown(FieldName::Email), None);
}

#[tokio::test]
async fn test_blur_touches_and_later_input_is_evaluated() {
    let sink = Arc::new(MemoryErrorSink::new());
    let form = validator().with_error_sink(sink.clone());

    let blurred = form.validate_field(FieldName::Email, "not-an-email", true).await;
    assert!(!blurred.is_valid());
    assert!(form.is_touched(FieldName::Email));
    assert!(sink.shown(FieldName::Email).is_some());

    let typed = form.validate_field(FieldName::Email, "taro@example.com", false).await;
    assert!(typed.is_valid());
    assert!(form.field_errors(FieldName::Email).is_empty());
    assert_eq!(sink.shown(FieldName::Email), None);
}

#[tokio::test]
async fn test_field_errors_hold_at_most_one_message() {
    let form = validator();
    form.validate_field(FieldName::Phone, "abc", true).await;
    form.validate_field(FieldName::Phone, "", true).await;
    assert_eq!(form.field_errors(FieldName::Phone), vec![REQUIRED_MESSAGE.to_string()]);
}

#[tokio::test]
async fn test_clear_errors_forgets_touched_state() {
    let sink = Arc::new(MemoryErrorSink::new());
    let form = validator().with_error_sink(sink.clone());

    assert!(!form.validate_form(&FormSnapshot::new()).await);
    assert!(!sink.all().is_empty());

    form.clear_errors();
    assert!(form.all_errors().is_empty());
    assert!(sink.all().is_empty());
    for field in FieldName::ALL {
        assert!(!form.is_touched(field));
    }

    let outcome = form.validate_field(FieldName::Name, "", false).await;
    assert!(outcome.is_valid());
}

#[tokio::test]
async fn test_sink_mirrors_whole_form_pass() {
    let sink = Arc::new(MemoryErrorSink::new());
    let form = validator().with_error_sink(sink.clone());

    let snapshot = valid_snapshot().with(FieldName::Email, "user@gmail.co.jp");
    assert!(!form.validate_form(&snapshot).await);

    let shown = sink.all();
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].0, FieldName::Email);
    assert!(shown[0].1.contains("user@gmail.com"));
}

// =============================================================================
// Postcode existence lookup
// =============================================================================

#[tokio::test]
async fn test_unknown_postcode_is_rejected() {
    let lookup = Arc::new(StubLookup::answering(false));
    let form = validator_with_lookup(lookup.clone());

    assert!(!form.validate_form(&valid_snapshot()).await);
    assert_eq!(
        form.field_errors(FieldName::Postcode),
        vec![POSTCODE_UNKNOWN_MESSAGE.to_string()]
    );
    assert_eq!(lookup.calls(), 1);
}

#[tokio::test]
async fn test_lookup_failure_does_not_block_registration() {
    let lookup = Arc::new(StubLookup::failing("service down"));
    let form = validator_with_lookup(lookup.clone());

    assert!(form.validate_form(&valid_snapshot()).await);
    assert_eq!(lookup.calls(), 1);
}

#[tokio::test]
async fn test_lookup_is_skipped_when_pattern_fails() {
    let lookup = Arc::new(StubLookup::answering(true));
    let form = validator_with_lookup(lookup.clone());

    let snapshot = valid_snapshot().with(FieldName::Postcode, "12-34");
    assert!(!form.validate_form(&snapshot).await);
    assert_eq!(lookup.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_passes_do_not_interleave() {
    let lookup = Arc::new(StubLookup::answering(true).with_delay(Duration::from_millis(200)));
    let form = validator_with_lookup(lookup.clone());

    let valid = valid_snapshot();
    let invalid = valid_snapshot().with(FieldName::Name, "");

    let (first, second) = tokio::join!(form.validate_form(&valid), form.validate_form(&invalid));
    assert!(first);
    assert!(!second);
    assert_eq!(lookup.calls(), 2);
    assert_eq!(lookup.peak_concurrency(), 1);

    // State reflects the pass that finished last.
    assert_eq!(form.all_errors().keys().copied().collect::<Vec<_>>(), [FieldName::Name]);
}
