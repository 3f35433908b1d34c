//! Command implementations.

use std::path::Path;
use std::sync::Arc;

use registration_lib::collab::http::{HttpPostcodeLookup, HttpSubmission};
use registration_lib::collab::memory::{
    MemoryErrorSink, MemoryHintStore, MemoryStatus, MemoryValues, RecordingPresenter,
};
use registration_lib::config::{RegistrationConfig, TransitionConfig};
use registration_lib::field::{FieldName, FormSnapshot};
use registration_lib::flow::{Collaborators, RegistrationFlow};
use registration_lib::rules::{PREFECTURES, RuleRegistry};
use registration_lib::validation::FormValidator;

use crate::cli::{SnapshotArgs, SubmitArgs};
use crate::error::CliError;

const MASKED: &str = "********";

pub fn load_config(path: Option<&Path>) -> Result<RegistrationConfig, CliError> {
    let mut config = match path {
        Some(path) => RegistrationConfig::load(path)?,
        None => RegistrationConfig::default(),
    };
    // Nothing is drawn, so transitions need no window.
    config.transition = TransitionConfig::instant();
    Ok(config)
}

fn read_snapshot(path: &Path) -> Result<FormSnapshot, CliError> {
    let text = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| CliError::Snapshot {
        path: path.to_path_buf(),
        source,
    })
}

fn registry(config: &RegistrationConfig, offline: bool) -> Result<RuleRegistry, CliError> {
    if offline {
        return Ok(RuleRegistry::standard());
    }
    let lookup = HttpPostcodeLookup::new(&config.postcode)?;
    Ok(RuleRegistry::with_postcode_lookup(Arc::new(lookup)))
}

/// Validates a snapshot and prints one line per field. Returns whether the
/// snapshot is valid.
pub async fn run_validate(args: &SnapshotArgs, config: &RegistrationConfig) -> Result<bool, CliError> {
    let snapshot = read_snapshot(&args.snapshot)?;
    let validator = FormValidator::new(Arc::new(registry(config, args.offline)?));

    let report = validator.validate_snapshot(&snapshot).await;
    for field in FieldName::ALL {
        match report.outcome(field) {
            Some(outcome) if !outcome.is_valid() => {
                println!(
                    "  ✗ {:<10} {}",
                    field.as_str(),
                    outcome.message.as_deref().unwrap_or_default()
                );
            }
            _ => println!("  ✓ {}", field.as_str()),
        }
    }

    if report.is_valid() {
        println!("\nAll fields are valid.");
    } else {
        println!("\n{} field(s) need attention.", report.errors().len());
    }
    Ok(report.is_valid())
}

/// Runs the full flow: validate, confirm, register. Returns whether the
/// registration was accepted.
pub async fn run_submit(args: &SubmitArgs, config: &RegistrationConfig) -> Result<bool, CliError> {
    let snapshot = read_snapshot(&args.input.snapshot)?;
    let status = Arc::new(MemoryStatus::new());
    let errors = Arc::new(MemoryErrorSink::new());

    let collab = Collaborators {
        values: Arc::new(MemoryValues::from_snapshot(&snapshot)),
        errors: errors.clone(),
        presenter: Arc::new(RecordingPresenter::new()),
        hints: Arc::new(MemoryHintStore::new()),
        status: status.clone(),
        transport: Arc::new(HttpSubmission::new(&config.submission)?),
    };
    let flow = RegistrationFlow::new(Arc::new(registry(config, args.input.offline)?), collab, config);

    if !flow.submit_form().await {
        println!("The registration has errors:");
        for (field, message) in errors.all() {
            println!("  ✗ {:<10} {message}", field.as_str());
        }
        return Ok(false);
    }

    if !args.yes {
        println!("Submitting:");
        match flow.confirmation_rows() {
            Ok(rows) => {
                for (field, (label, value)) in FieldName::ALL.into_iter().zip(rows) {
                    let shown = if field == FieldName::Password { MASKED } else { value.as_str() };
                    println!("  {label}: {shown}");
                }
            }
            Err(e) => log::error!("Confirmation rows unavailable after a valid submit: {e}"),
        }
        println!();
    }

    let accepted = match flow.register().await {
        Ok(()) => true,
        Err(e) => {
            log::error!("Registration not accepted: {e}");
            false
        }
    };

    for notification in status.notifications() {
        println!("{}", notification.message);
    }
    Ok(accepted)
}

pub fn run_prefectures() {
    for prefecture in PREFECTURES {
        println!("{prefecture}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::Duration;

    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    // =========================================================================
    // Helpers
    // =========================================================================

    fn snapshot_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("registration-cli-{}-{name}.json", std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    fn valid_json() -> String {
        let snapshot = FormSnapshot::new()
            .with(FieldName::Name, "田中 太郎")
            .with(FieldName::Furigana, "タナカ タロウ")
            .with(FieldName::Email, "taro@example.com")
            .with(FieldName::Password, "Abc12345")
            .with(FieldName::Phone, "090-1234-5678")
            .with(FieldName::Postcode, "100-0001")
            .with(FieldName::Prefecture, "東京都")
            .with(FieldName::City, "千代田区")
            .with(FieldName::Address, "千代田1-1")
            .with(FieldName::Remarks, "");
        serde_json::to_string(&snapshot).unwrap()
    }

    fn offline(snapshot: PathBuf) -> SnapshotArgs {
        SnapshotArgs { snapshot, offline: true }
    }

    fn config_for(server: &MockServer) -> RegistrationConfig {
        let mut config = load_config(None).unwrap();
        config.submission = config
            .submission
            .with_endpoint(format!("{}/api/register", server.uri()));
        config.flow = config.flow.with_min_submit_duration(Duration::ZERO);
        config
    }

    // =========================================================================
    // Snapshot files
    // =========================================================================

    #[test]
    fn test_snapshot_with_unknown_field_is_rejected() {
        let path = snapshot_file("unknown-key", r#"{"name": "田中 太郎", "nickname": "taro"}"#);
        let result = read_snapshot(&path);
        assert!(matches!(result, Err(CliError::Snapshot { .. })), "{result:?}");
    }

    #[test]
    fn test_malformed_snapshot_is_rejected() {
        let path = snapshot_file("malformed", r#"{"name": "田中 太郎""#);
        assert!(matches!(read_snapshot(&path), Err(CliError::Snapshot { .. })));
    }

    #[test]
    fn test_missing_snapshot_file_is_a_read_error() {
        let path = std::env::temp_dir().join("registration-cli-does-not-exist.json");
        assert!(matches!(read_snapshot(&path), Err(CliError::Read { .. })));
    }

    #[test]
    fn test_snapshot_keeps_known_fields() {
        let path = snapshot_file("known", &valid_json());
        let snapshot = read_snapshot(&path).unwrap();
        assert_eq!(snapshot.get(FieldName::Email), "taro@example.com");
    }

    // =========================================================================
    // validate
    // =========================================================================

    #[tokio::test]
    async fn test_validate_offline_accepts_valid_snapshot() {
        let args = offline(snapshot_file("validate-ok", &valid_json()));
        let config = load_config(None).unwrap();
        assert!(run_validate(&args, &config).await.unwrap());
    }

    #[tokio::test]
    async fn test_validate_offline_reports_invalid_snapshot() {
        let args = offline(snapshot_file(
            "validate-bad",
            r#"{"name": "田中太郎", "email": "not-an-email"}"#,
        ));
        let config = load_config(None).unwrap();
        assert!(!run_validate(&args, &config).await.unwrap());
    }

    // =========================================================================
    // submit
    // =========================================================================

    #[tokio::test]
    async fn test_submit_accepted_registration() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/register"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "message": "ok" })))
            .expect(1)
            .mount(&server)
            .await;

        let args = SubmitArgs {
            input: offline(snapshot_file("submit-ok", &valid_json())),
            yes: false,
        };
        assert!(run_submit(&args, &config_for(&server)).await.unwrap());
    }

    #[tokio::test]
    async fn test_submit_refused_registration() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/register"))
            .respond_with(
                ResponseTemplate::new(409).set_body_json(serde_json::json!({ "message": "登録済みのメールアドレスです" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let args = SubmitArgs {
            input: offline(snapshot_file("submit-409", &valid_json())),
            yes: true,
        };
        assert!(!run_submit(&args, &config_for(&server)).await.unwrap());
    }

    #[tokio::test]
    async fn test_submit_invalid_snapshot_never_posts() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let args = SubmitArgs {
            input: offline(snapshot_file("submit-invalid", r#"{"email": "taro@example.com"}"#)),
            yes: true,
        };
        assert!(!run_submit(&args, &config_for(&server)).await.unwrap());
    }
}
