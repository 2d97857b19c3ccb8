use crate::backend::FormsBackend;
use crate::error::{EngineError, Result};
use crate::hydrate::hydrate_answers;
use crate::persist::{ensure_answer, FieldPatch};
use crate::progress::{
    control_done, next_cursor, overall_progress, prev_cursor, section_done, Cursor, ProgressSummary,
};
use crate::section::{build_sections, Section, UiControl};
use crate::state::{ControlState, PartIds};
use crate::upload::{confirm_preview, drop_preview, push_previews, LocalFile};
use forms_protocol::{AnswerPayload, PartKind, SubmissionItem, TemplateDetail};
use std::collections::HashMap;

/// The questionnaire engine: a flat, navigable wizard over the nested
/// framework/domain/control/question catalog, with per-control answer state,
/// partial saves and attachment upload.
///
/// State flows one direction at boot (catalog -> sections -> hydrated state)
/// and bidirectionally afterwards: edits update local state optimistically
/// and then write through to the backend. Field saves are not serialized
/// against each other; for rapid edits of the same field the last network
/// response to land wins.
#[derive(Debug)]
pub struct FormEngine<B: FormsBackend> {
    backend: B,
    submission: SubmissionItem,
    template: TemplateDetail,
    sections: Vec<Section>,
    states: HashMap<i64, ControlState>,
    cursor: Cursor,
}

impl<B: FormsBackend> FormEngine<B> {
    /// Load everything the wizard needs: ensure the submission exists, fetch
    /// the template and its domain tree, build sections and hydrate prior
    /// answers. Any failure here surfaces as one page-level error.
    pub async fn boot(backend: B, client_id: i64, template_slug: &str) -> Result<Self> {
        let dashboard = backend
            .ensure_submission(client_id, template_slug)
            .await
            .map_err(EngineError::Boot)?;
        let submission = dashboard.submission.ok_or(EngineError::NoSubmission)?;

        let template = backend
            .template_detail(submission.template.id)
            .await
            .map_err(EngineError::Boot)?;
        let domains = backend
            .domains_by_framework(template.framework.id)
            .await
            .map_err(EngineError::Boot)?;
        let sections = build_sections(&domains);

        let answers = backend
            .list_answers(submission.id)
            .await
            .map_err(EngineError::Boot)?;
        let states = hydrate_answers(&sections, &answers);

        Ok(Self {
            backend,
            submission,
            template,
            sections,
            states,
            cursor: Cursor::default(),
        })
    }

    pub fn submission(&self) -> &SubmissionItem {
        &self.submission
    }

    pub fn template(&self) -> &TemplateDetail {
        &self.template
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn state(&self, control_id: i64) -> Option<&ControlState> {
        self.states.get(&control_id)
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn current_section(&self) -> Option<&Section> {
        self.sections.get(self.cursor.section)
    }

    pub fn current_control(&self) -> Option<&UiControl> {
        self.current_section()
            .and_then(|section| section.controls.get(self.cursor.control))
    }

    pub fn is_read_only(&self) -> bool {
        self.submission.status.is_read_only()
    }

    pub fn progress(&self) -> ProgressSummary {
        overall_progress(&self.sections, &self.states)
    }

    pub fn is_control_done(&self, control: &UiControl) -> bool {
        control_done(control, self.states.get(&control.id))
    }

    pub fn is_section_done(&self, section: &Section) -> bool {
        section_done(section, &self.states)
    }

    /// Navigation stays available even on read-only submissions.
    pub fn next(&mut self) {
        self.cursor = next_cursor(&self.sections, self.cursor);
    }

    pub fn prev(&mut self) {
        self.cursor = prev_cursor(&self.sections, self.cursor);
    }

    /// Jump to a section (and control) by display index. Out-of-range
    /// indices leave the cursor untouched.
    pub fn goto(&mut self, section: usize, control: usize) -> bool {
        let valid = self
            .sections
            .get(section)
            .map(|s| control < s.controls.len())
            .unwrap_or(false);
        if valid {
            self.cursor = Cursor { section, control };
        }
        valid
    }

    /// Persist a partial field edit: local state updates first, then one
    /// upsert per changed field, plus a mirrored score write when the
    /// control has a score question and policy or practice changed.
    pub async fn save_field(&mut self, control_id: i64, patch: FieldPatch) -> Result<()> {
        self.ensure_writable()?;
        if patch.is_empty() {
            return Ok(());
        }
        let control = self.find_control(control_id)?.clone();

        // Optimistic update before any network round trip.
        let state = self.states.entry(control_id).or_default();
        if let Some(value) = &patch.policy {
            state.policy = Some(value.clone());
        }
        if let Some(value) = &patch.practice {
            state.practice = Some(value.clone());
        }
        if let Some(value) = &patch.info {
            state.info = Some(value.clone());
        }

        let submission = self.submission.id;
        let mut ids = self
            .states
            .get(&control_id)
            .map(|state| state.ids)
            .unwrap_or_default();

        if let (Some(value), Some(question)) = (&patch.policy, control.parts.get(PartKind::Policy))
        {
            let saved =
                ensure_answer(&self.backend, &AnswerPayload::text(submission, question, value))
                    .await?;
            ids.policy = Some(saved.id);
        }
        if let (Some(value), Some(question)) =
            (&patch.practice, control.parts.get(PartKind::Practice))
        {
            let saved =
                ensure_answer(&self.backend, &AnswerPayload::text(submission, question, value))
                    .await?;
            ids.practice = Some(saved.id);
        }
        if let (Some(value), Some(question)) = (&patch.info, control.parts.get(PartKind::Info)) {
            let saved =
                ensure_answer(&self.backend, &AnswerPayload::text(submission, question, value))
                    .await?;
            ids.info = Some(saved.id);
        }

        // Mirror the maturity score when one is mapped: practice wins over
        // policy, empty when both are empty.
        if let Some(question) = control.parts.get(PartKind::Score) {
            if patch.policy.is_some() || patch.practice.is_some() {
                let score = patch
                    .practice
                    .clone()
                    .filter(|value| !value.is_empty())
                    .or_else(|| patch.policy.clone().filter(|value| !value.is_empty()))
                    .unwrap_or_default();
                ensure_answer(&self.backend, &AnswerPayload::text(submission, question, &score))
                    .await?;
            }
        }

        if let Some(state) = self.states.get_mut(&control_id) {
            state.ids = ids;
        }
        Ok(())
    }

    /// Attach files to a control. An attachment answer record is ensured
    /// first so uploads have a stable id; previews for every file render
    /// before the first upload starts; uploads then run one at a time.
    /// A failed upload removes its preview and is otherwise silent.
    pub async fn add_files(&mut self, control_id: i64, files: Vec<LocalFile>) -> Result<()> {
        self.ensure_writable()?;
        let control = self.find_control(control_id)?.clone();
        let Some(question) = control.parts.get(PartKind::Attachment) else {
            return Err(EngineError::NoAttachmentPart(control_id));
        };
        if files.is_empty() {
            return Ok(());
        }

        let answer_id = match self.states.get(&control_id).and_then(|state| state.ids.attachment)
        {
            Some(id) => id,
            None => {
                let created = ensure_answer(
                    &self.backend,
                    &AnswerPayload::text(self.submission.id, question, ""),
                )
                .await?;
                self.states.entry(control_id).or_default().ids.attachment = Some(created.id);
                created.id
            }
        };

        push_previews(
            &mut self.states.entry(control_id).or_default().attachments,
            &files,
        );

        for file in files {
            match self.backend.attach_file(answer_id, &file.name, file.bytes).await {
                Ok(updated) => {
                    if let Some(stored) = updated.attachment.as_deref().filter(|s| !s.is_empty()) {
                        if let Some(state) = self.states.get_mut(&control_id) {
                            confirm_preview(&mut state.attachments, &file.name, stored);
                        }
                    }
                }
                Err(err) => {
                    log::warn!("upload of {} failed: {err}", file.name);
                    if let Some(state) = self.states.get_mut(&control_id) {
                        drop_preview(&mut state.attachments, &file.name);
                    }
                }
            }
        }
        Ok(())
    }

    pub async fn start_review(&mut self) -> Result<&SubmissionItem> {
        self.ensure_writable()?;
        self.submission = self.backend.start_review(self.submission.id).await?;
        Ok(&self.submission)
    }

    pub async fn submit(&mut self) -> Result<&SubmissionItem> {
        self.ensure_writable()?;
        self.submission = self.backend.submit(self.submission.id).await?;
        Ok(&self.submission)
    }

    fn ensure_writable(&self) -> Result<()> {
        if self.is_read_only() {
            return Err(EngineError::ReadOnly(self.submission.status));
        }
        Ok(())
    }

    fn find_control(&self, control_id: i64) -> Result<&UiControl> {
        self.sections
            .iter()
            .flat_map(|section| section.controls.iter())
            .find(|control| control.id == control_id)
            .ok_or(EngineError::UnknownControl(control_id))
    }
}
