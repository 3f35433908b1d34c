#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use registration_lib::collab::memory::{
    MemoryErrorSink, MemoryHintStore, MemoryStatus, MemoryValues, RecordingPresenter,
};
use registration_lib::collab::{PostcodeLookup, SubmissionTransport, SubmitReceipt};
use registration_lib::error::{LookupError, SubmissionError};
use registration_lib::field::{FieldName, FormSnapshot};

/// A snapshot that passes every rule.
pub fn valid_snapshot() -> FormSnapshot {
    FormSnapshot::new()
        .with(FieldName::Name, "田中 太郎")
        .with(FieldName::Furigana, "タナカ タロウ")
        .with(FieldName::Email, "taro@example.com")
        .with(FieldName::Password, "Abc12345")
        .with(FieldName::Phone, "090-1234-5678")
        .with(FieldName::Postcode, "100-0001")
        .with(FieldName::Prefecture, "東京都")
        .with(FieldName::City, "千代田区")
        .with(FieldName::Address, "千代田1-1")
        .with(FieldName::Remarks, "")
}

/// Postcode lookup with a fixed answer and an optional delay.
///
/// Tracks how many lookups run at once.
pub struct StubLookup {
    answer: Result<bool, String>,
    delay: Duration,
    active: AtomicUsize,
    peak: AtomicUsize,
    calls: AtomicUsize,
}

impl StubLookup {
    pub fn answering(exists: bool) -> Self {
        Self::new(Ok(exists))
    }

    pub fn failing(reason: &str) -> Self {
        Self::new(Err(reason.to_string()))
    }

    fn new(answer: Result<bool, String>) -> Self {
        Self {
            answer,
            delay: Duration::ZERO,
            active: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn peak_concurrency(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PostcodeLookup for StubLookup {
    async fn exists(&self, _postcode: &str) -> Result<bool, LookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.active.fetch_sub(1, Ordering::SeqCst);
        self.answer.clone().map_err(LookupError::Response)
    }
}

/// Transport returning a fixed result after an optional delay.
pub struct StubTransport {
    result: Result<SubmitReceipt, fn() -> SubmissionError>,
    delay: Duration,
    calls: AtomicUsize,
}

impl StubTransport {
    pub fn accepting() -> Self {
        Self {
            result: Ok(SubmitReceipt {
                message: Some("ok".to_string()),
                ..Default::default()
            }),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(error: fn() -> SubmissionError) -> Self {
        Self {
            result: Err(error),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SubmissionTransport for StubTransport {
    async fn submit(&self, _snapshot: &FormSnapshot) -> Result<SubmitReceipt, SubmissionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match &self.result {
            Ok(receipt) => Ok(receipt.clone()),
            Err(make) => Err(make()),
        }
    }
}

/// In-memory collaborators with handles kept for assertions.
pub struct Harness {
    pub values: Arc<MemoryValues>,
    pub errors: Arc<MemoryErrorSink>,
    pub presenter: Arc<RecordingPresenter>,
    pub hints: Arc<MemoryHintStore>,
    pub status: Arc<MemoryStatus>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_hints(MemoryHintStore::new())
    }

    pub fn with_hints(hints: MemoryHintStore) -> Self {
        Self {
            values: Arc::new(MemoryValues::new()),
            errors: Arc::new(MemoryErrorSink::new()),
            presenter: Arc::new(RecordingPresenter::new()),
            hints: Arc::new(hints),
            status: Arc::new(MemoryStatus::new()),
        }
    }

    pub fn fill(&self, snapshot: &FormSnapshot) {
        use registration_lib::collab::ValueSource;
        for (field, value) in snapshot.iter() {
            self.values.set_value(field, value);
        }
    }
}
