use forms_protocol::PartKind;

/// One attachment as shown in the gallery. `pending` entries are local
/// previews that have not been confirmed by the server yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentThumb {
    pub name: String,
    pub url: Option<String>,
    pub is_image: bool,
    pub pending: bool,
}

/// Answer-record ids per field, used to route later edits as updates
/// instead of duplicate creates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PartIds {
    pub policy: Option<i64>,
    pub practice: Option<i64>,
    pub info: Option<i64>,
    pub attachment: Option<i64>,
}

/// Per-control aggregate of answered fields. A control absent from the state
/// map was never answered; present with empty strings means answered-empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ControlState {
    pub policy: Option<String>,
    pub practice: Option<String>,
    pub info: Option<String>,
    pub attachments: Vec<AttachmentThumb>,
    pub ids: PartIds,
}

impl ControlState {
    pub fn field(&self, kind: PartKind) -> Option<&str> {
        match kind {
            PartKind::Policy => self.policy.as_deref(),
            PartKind::Practice => self.practice.as_deref(),
            PartKind::Info => self.info.as_deref(),
            _ => None,
        }
    }

    /// Name shown in compact views: the first gallery entry.
    pub fn primary_attachment(&self) -> Option<&str> {
        self.attachments.first().map(|thumb| thumb.name.as_str())
    }

    /// True when hydration found nothing worth keeping: no non-empty field
    /// and no attachments.
    pub(crate) fn is_blank(&self) -> bool {
        let no_text = [&self.policy, &self.practice, &self.info]
            .into_iter()
            .all(|field| field.as_deref().is_none_or_empty());
        no_text && self.attachments.is_empty()
    }
}

trait EmptyOrNone {
    fn is_none_or_empty(self) -> bool;
}

impl EmptyOrNone for Option<&str> {
    fn is_none_or_empty(self) -> bool {
        self.map(str::is_empty).unwrap_or(true)
    }
}
