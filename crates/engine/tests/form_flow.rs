use async_trait::async_trait;
use forms_engine::{
    ensure_answer, BackendError, BackendResult, EngineError, FieldPatch, FormEngine, FormsBackend,
    LocalFile,
};
use forms_protocol::{
    AnswerPayload, AnswerRecord, ControlNode, DashboardEnvelope, DomainNode, Framework,
    FrameworkRef, ProgressValue, QuestionNode, SubmissionItem, SubmissionStatus, TemplateDetail,
    TemplateRef,
};
use std::sync::{Arc, Mutex};

const SUBMISSION_ID: i64 = 7;

#[derive(Debug, Default)]
struct MockState {
    next_id: i64,
    answers: Vec<AnswerRecord>,
    status: Option<SubmissionStatus>,
    calls: Vec<String>,
}

/// In-memory stand-in for the REST backend. The store is shared through an
/// `Arc` so tests can inspect writes after the backend moves into the engine.
#[derive(Debug)]
struct MockBackend {
    domains: Vec<DomainNode>,
    inner: Arc<Mutex<MockState>>,
    fail_upsert: bool,
    fail_create: bool,
    fail_uploads: Vec<String>,
    no_submission: bool,
}

impl MockBackend {
    fn new(domains: Vec<DomainNode>) -> Self {
        Self {
            domains,
            inner: Arc::new(Mutex::new(MockState {
                next_id: 1,
                status: Some(SubmissionStatus::Draft),
                ..MockState::default()
            })),
            fail_upsert: false,
            fail_create: false,
            fail_uploads: Vec::new(),
            no_submission: false,
        }
    }

    fn with_status(self, status: SubmissionStatus) -> Self {
        self.inner.lock().expect("lock").status = Some(status);
        self
    }

    fn store(&self) -> Arc<Mutex<MockState>> {
        Arc::clone(&self.inner)
    }

    fn seed_answer(&self, question: i64, value: serde_json::Value) -> i64 {
        let mut state = self.inner.lock().expect("lock");
        let id = state.next_id;
        state.next_id += 1;
        state.answers.push(AnswerRecord {
            id,
            submission: SUBMISSION_ID,
            question,
            value,
            evidence: None,
            attachment: None,
            created_at: None,
            updated_at: None,
        });
        id
    }

    fn calls(&self) -> Vec<String> {
        self.inner.lock().expect("lock").calls.clone()
    }

    fn record_call(&self, call: &str) {
        self.inner.lock().expect("lock").calls.push(call.to_string());
    }

    fn item(&self) -> SubmissionItem {
        let status = self.inner.lock().expect("lock").status.expect("status");
        SubmissionItem {
            id: SUBMISSION_ID,
            status,
            progress: ProgressValue::Number(0.0),
            version: 1,
            created_at: String::new(),
            updated_at: String::new(),
            template: TemplateRef {
                id: 5,
                name: "CSF 2.0 Assessment".into(),
                slug: "csf-2".into(),
                version: "2.0".into(),
            },
            framework: FrameworkRef {
                id: 1,
                name: "NIST CSF".into(),
                slug: "nist-csf".into(),
                version: "2.0".into(),
            },
        }
    }
}

#[async_trait]
impl FormsBackend for MockBackend {
    async fn ensure_submission(
        &self,
        client_id: i64,
        _template_slug: &str,
    ) -> BackendResult<DashboardEnvelope> {
        Ok(DashboardEnvelope {
            client_id,
            submission: if self.no_submission { None } else { Some(self.item()) },
            retrieved_at: String::new(),
        })
    }

    async fn template_detail(&self, id: i64) -> BackendResult<TemplateDetail> {
        Ok(TemplateDetail {
            id,
            name: "CSF 2.0 Assessment".into(),
            slug: "csf-2".into(),
            version: "2.0".into(),
            description: String::new(),
            framework: Framework {
                id: 1,
                slug: "nist-csf".into(),
                name: "NIST CSF".into(),
                version: "2.0".into(),
                description: String::new(),
                active: true,
            },
        })
    }

    async fn domains_by_framework(&self, _framework_id: i64) -> BackendResult<Vec<DomainNode>> {
        Ok(self.domains.clone())
    }

    async fn list_answers(&self, submission: i64) -> BackendResult<Vec<AnswerRecord>> {
        Ok(self
            .inner
            .lock()
            .expect("lock")
            .answers
            .iter()
            .filter(|a| a.submission == submission)
            .cloned()
            .collect())
    }

    async fn find_answers(
        &self,
        submission: i64,
        question: i64,
    ) -> BackendResult<Vec<AnswerRecord>> {
        self.record_call("find");
        Ok(self
            .inner
            .lock()
            .expect("lock")
            .answers
            .iter()
            .filter(|a| a.submission == submission && a.question == question)
            .cloned()
            .collect())
    }

    async fn upsert_answer(&self, payload: &AnswerPayload) -> BackendResult<AnswerRecord> {
        self.record_call("upsert");
        if self.fail_upsert {
            return Err(BackendError::msg("upsert endpoint unavailable"));
        }
        let mut state = self.inner.lock().expect("lock");
        if let Some(existing) = state
            .answers
            .iter_mut()
            .find(|a| a.submission == payload.submission && a.question == payload.question)
        {
            existing.value = payload.value.clone();
            return Ok(existing.clone());
        }
        let id = state.next_id;
        state.next_id += 1;
        let record = AnswerRecord {
            id,
            submission: payload.submission,
            question: payload.question,
            value: payload.value.clone(),
            evidence: payload.evidence.clone(),
            attachment: None,
            created_at: None,
            updated_at: None,
        };
        state.answers.push(record.clone());
        Ok(record)
    }

    async fn create_answer(&self, payload: &AnswerPayload) -> BackendResult<AnswerRecord> {
        self.record_call("create");
        if self.fail_create {
            return Err(BackendError::msg("validation error: duplicate answer"));
        }
        let mut state = self.inner.lock().expect("lock");
        let id = state.next_id;
        state.next_id += 1;
        let record = AnswerRecord {
            id,
            submission: payload.submission,
            question: payload.question,
            value: payload.value.clone(),
            evidence: payload.evidence.clone(),
            attachment: None,
            created_at: None,
            updated_at: None,
        };
        state.answers.push(record.clone());
        Ok(record)
    }

    async fn patch_answer(&self, id: i64, payload: &AnswerPayload) -> BackendResult<AnswerRecord> {
        self.record_call("patch");
        let mut state = self.inner.lock().expect("lock");
        let record = state
            .answers
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| BackendError::msg("answer not found"))?;
        record.value = payload.value.clone();
        Ok(record.clone())
    }

    async fn attach_file(
        &self,
        answer_id: i64,
        filename: &str,
        _bytes: Vec<u8>,
    ) -> BackendResult<AnswerRecord> {
        self.record_call("attach");
        if self.fail_uploads.iter().any(|name| name == filename) {
            return Err(BackendError::msg("upload rejected"));
        }
        let mut state = self.inner.lock().expect("lock");
        let record = state
            .answers
            .iter_mut()
            .find(|a| a.id == answer_id)
            .ok_or_else(|| BackendError::msg("answer not found"))?;
        record.attachment = Some(format!("media/answers/{answer_id}/{filename}"));
        Ok(record.clone())
    }

    async fn start_review(&self, _submission: i64) -> BackendResult<SubmissionItem> {
        self.inner.lock().expect("lock").status = Some(SubmissionStatus::InReview);
        Ok(self.item())
    }

    async fn submit(&self, _submission: i64) -> BackendResult<SubmissionItem> {
        self.inner.lock().expect("lock").status = Some(SubmissionStatus::Submitted);
        Ok(self.item())
    }
}

fn question(id: i64, control: i64, local_code: &str) -> QuestionNode {
    QuestionNode {
        id,
        control,
        local_code: local_code.to_string(),
        prompt: String::new(),
        required: false,
        order: 0,
    }
}

/// One "GV" section with one control mapped to policy+practice+score+anexo.
fn one_control_catalog() -> Vec<DomainNode> {
    vec![DomainNode {
        id: 1,
        framework: 1,
        code: "GV".into(),
        title: "Governar".into(),
        parent: None,
        order: 0,
        children: Vec::new(),
        controls: vec![ControlNode {
            id: 10,
            domain: 1,
            code: "GV.OC-01".into(),
            title: "Organizational context".into(),
            order: 0,
            questions: vec![
                question(100, 10, "politica"),
                question(101, 10, "practice"),
                question(102, 10, "score"),
                question(103, 10, "anexo"),
            ],
        }],
    }]
}

#[tokio::test]
async fn one_control_form_reaches_full_progress() {
    let backend = MockBackend::new(one_control_catalog());
    let mut engine = FormEngine::boot(backend, 2, "csf-2").await.expect("boot");

    assert_eq!(engine.sections().len(), 1);
    assert_eq!(engine.sections()[0].title, "GV. Governar");
    assert_eq!(engine.progress().pct, 0);

    engine
        .save_field(10, FieldPatch::policy("Definido"))
        .await
        .expect("policy saves");
    assert_eq!(engine.progress().pct, 0);

    engine
        .save_field(10, FieldPatch::practice("Gerenciado"))
        .await
        .expect("practice saves");

    let progress = engine.progress();
    assert_eq!((progress.done, progress.total, progress.pct), (1, 1, 100));

    let state = engine.state(10).expect("state kept");
    assert_eq!(state.policy.as_deref(), Some("Definido"));
    assert_eq!(state.practice.as_deref(), Some("Gerenciado"));
    assert!(state.ids.policy.is_some());
    assert!(state.ids.practice.is_some());
}

#[tokio::test]
async fn practice_save_mirrors_the_score_question() {
    let backend = MockBackend::new(one_control_catalog());
    let store = backend.store();
    let mut engine = FormEngine::boot(backend, 2, "csf-2").await.expect("boot");

    engine
        .save_field(10, FieldPatch::practice("Otimizado"))
        .await
        .expect("saves");

    let score_value = stored_value(&store, 102);
    assert_eq!(score_value, Some(serde_json::json!("Otimizado")));
}

#[tokio::test]
async fn repeated_edits_update_in_place() {
    let backend = MockBackend::new(one_control_catalog());
    let mut engine = FormEngine::boot(backend, 2, "csf-2").await.expect("boot");

    engine.save_field(10, FieldPatch::policy("Inicial")).await.expect("first");
    engine.save_field(10, FieldPatch::policy("Definido")).await.expect("second");

    let state = engine.state(10).expect("state");
    assert_eq!(state.policy.as_deref(), Some("Definido"));
}

#[tokio::test]
async fn fallback_chain_patches_the_existing_record() {
    let backend = MockBackend {
        fail_upsert: true,
        fail_create: true,
        ..MockBackend::new(one_control_catalog())
    };
    let existing = backend.seed_answer(100, serde_json::json!("Inicial"));

    let payload = AnswerPayload::text(SUBMISSION_ID, 100, "Definido");
    let saved = ensure_answer(&backend, &payload).await.expect("patched");

    assert_eq!(saved.id, existing);
    assert_eq!(saved.value, serde_json::json!("Definido"));
    assert_eq!(backend.calls(), vec!["upsert", "create", "find", "patch"]);
}

#[tokio::test]
async fn fallback_chain_propagates_when_nothing_exists() {
    let backend = MockBackend {
        fail_upsert: true,
        fail_create: true,
        ..MockBackend::new(one_control_catalog())
    };

    let payload = AnswerPayload::text(SUBMISSION_ID, 100, "Definido");
    let err = ensure_answer(&backend, &payload).await.expect_err("no record to patch");
    assert!(matches!(err, EngineError::Backend(_)));
    assert_eq!(backend.calls(), vec!["upsert", "create", "find"]);
}

#[tokio::test]
async fn fallback_chain_skips_create_when_upsert_works() {
    let backend = MockBackend::new(one_control_catalog());
    let payload = AnswerPayload::text(SUBMISSION_ID, 100, "Definido");
    ensure_answer(&backend, &payload).await.expect("upsert works");
    assert_eq!(backend.calls(), vec!["upsert"]);
}

#[tokio::test]
async fn attachments_upload_sequentially_and_reconcile() {
    let backend = MockBackend {
        fail_uploads: vec!["broken.pdf".to_string()],
        ..MockBackend::new(one_control_catalog())
    };
    let mut engine = FormEngine::boot(backend, 2, "csf-2").await.expect("boot");

    engine
        .add_files(
            10,
            vec![
                LocalFile::new("diagram.png", vec![1, 2, 3]),
                LocalFile::new("broken.pdf", vec![4, 5]),
            ],
        )
        .await
        .expect("add_files is silent about per-file failures");

    let state = engine.state(10).expect("state");
    assert_eq!(state.attachments.len(), 1);
    let thumb = &state.attachments[0];
    assert_eq!(thumb.name, "diagram.png");
    assert!(thumb.url.as_deref().expect("confirmed url").contains("diagram.png"));
    assert!(thumb.is_image);
    assert!(!thumb.pending);
    assert_eq!(state.primary_attachment(), Some("diagram.png"));
    assert!(state.ids.attachment.is_some());
}

#[tokio::test]
async fn second_batch_reuses_the_attachment_record() {
    let backend = MockBackend::new(one_control_catalog());
    let mut engine = FormEngine::boot(backend, 2, "csf-2").await.expect("boot");

    engine
        .add_files(10, vec![LocalFile::new("a.png", vec![1])])
        .await
        .expect("first batch");
    let first_id = engine.state(10).expect("state").ids.attachment;

    engine
        .add_files(10, vec![LocalFile::new("b.png", vec![2])])
        .await
        .expect("second batch");
    assert_eq!(engine.state(10).expect("state").ids.attachment, first_id);
    assert_eq!(engine.state(10).expect("state").attachments.len(), 2);
}

#[tokio::test]
async fn read_only_submissions_reject_writes_but_navigate() {
    let backend =
        MockBackend::new(one_control_catalog()).with_status(SubmissionStatus::Submitted);
    let mut engine = FormEngine::boot(backend, 2, "csf-2").await.expect("boot");

    assert!(engine.is_read_only());

    let err = engine
        .save_field(10, FieldPatch::policy("Definido"))
        .await
        .expect_err("writes are locked");
    assert!(matches!(err, EngineError::ReadOnly(SubmissionStatus::Submitted)));

    let err = engine
        .add_files(10, vec![LocalFile::new("a.png", vec![1])])
        .await
        .expect_err("uploads are locked");
    assert!(matches!(err, EngineError::ReadOnly(_)));

    // Navigation remains functional.
    engine.next();
    engine.prev();
    assert!(engine.current_control().is_some());
}

#[tokio::test]
async fn review_workflow_locks_the_form() {
    let backend = MockBackend::new(one_control_catalog());
    let mut engine = FormEngine::boot(backend, 2, "csf-2").await.expect("boot");

    let updated = engine.start_review().await.expect("review starts");
    assert_eq!(updated.status, SubmissionStatus::InReview);
    assert!(engine.is_read_only());

    let err = engine
        .save_field(10, FieldPatch::policy("Definido"))
        .await
        .expect_err("locked after review starts");
    assert!(matches!(err, EngineError::ReadOnly(_)));
}

#[tokio::test]
async fn boot_hydrates_previously_saved_answers() {
    let backend = MockBackend::new(one_control_catalog());
    backend.seed_answer(100, serde_json::json!("Repetido"));

    let engine = FormEngine::boot(backend, 2, "csf-2").await.expect("boot");
    let state = engine.state(10).expect("hydrated");
    assert_eq!(state.policy.as_deref(), Some("Repetido"));
    assert!(state.practice.is_none());
}

#[tokio::test]
async fn missing_submission_is_reported() {
    let backend = MockBackend {
        no_submission: true,
        ..MockBackend::new(one_control_catalog())
    };
    let err = FormEngine::boot(backend, 2, "csf-2").await.expect_err("no form");
    assert!(matches!(err, EngineError::NoSubmission));
}

#[tokio::test]
async fn score_mirror_prefers_practice_over_policy() {
    let backend = MockBackend::new(one_control_catalog());
    let store = backend.store();
    let mut engine = FormEngine::boot(backend, 2, "csf-2").await.expect("boot");

    engine.save_field(10, FieldPatch::policy("Definido")).await.expect("policy");
    assert_eq!(stored_value(&store, 102), Some(serde_json::json!("Definido")));

    engine.save_field(10, FieldPatch::practice("Otimizado")).await.expect("practice");
    assert_eq!(stored_value(&store, 102), Some(serde_json::json!("Otimizado")));
}

fn stored_value(store: &Arc<Mutex<MockState>>, question: i64) -> Option<serde_json::Value> {
    store
        .lock()
        .expect("lock")
        .answers
        .iter()
        .find(|a| a.question == question)
        .map(|a| a.value.clone())
}
