use forms_protocol::{DomainNode, PartKind};
use once_cell::sync::Lazy;
use regex::Regex;
use std::cmp::Ordering;

/// Fixed display priority for domain-code prefixes. Domains whose title does
/// not start with a listed code sort after all of these, alphabetically.
pub const DOMAIN_ORDER: [&str; 6] = ["GV", "ID", "PR", "DE", "RS", "RC"];

static DOMAIN_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Z]{2})\b").expect("domain prefix pattern compiles"));

/// Question ids per part kind for one control.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PartsMap {
    score: Option<i64>,
    policy: Option<i64>,
    practice: Option<i64>,
    info: Option<i64>,
    attachment: Option<i64>,
    evidence: Option<i64>,
}

impl PartsMap {
    pub fn get(&self, kind: PartKind) -> Option<i64> {
        match kind {
            PartKind::Score => self.score,
            PartKind::Policy => self.policy,
            PartKind::Practice => self.practice,
            PartKind::Info => self.info,
            PartKind::Attachment => self.attachment,
            PartKind::Evidence => self.evidence,
        }
    }

    pub fn set(&mut self, kind: PartKind, question_id: i64) {
        let slot = match kind {
            PartKind::Score => &mut self.score,
            PartKind::Policy => &mut self.policy,
            PartKind::Practice => &mut self.practice,
            PartKind::Info => &mut self.info,
            PartKind::Attachment => &mut self.attachment,
            PartKind::Evidence => &mut self.evidence,
        };
        *slot = Some(question_id);
    }

    pub fn is_empty(&self) -> bool {
        PartKind::ALL.iter().all(|kind| self.get(*kind).is_none())
    }
}

/// One control as the wizard presents it.
#[derive(Debug, Clone)]
pub struct UiControl {
    pub id: i64,
    pub code: String,
    pub prompt: String,
    pub parts: PartsMap,
}

/// One domain as the wizard presents it: ordered controls under a title like
/// "GV. Governance".
#[derive(Debug, Clone)]
pub struct Section {
    pub id: i64,
    pub title: String,
    pub controls: Vec<UiControl>,
}

/// Flatten the catalog tree into display sections: build part maps, drop
/// controls with no recognized parts, drop emptied domains, then apply
/// control and section ordering.
pub fn build_sections(domains: &[DomainNode]) -> Vec<Section> {
    let mut sections: Vec<Section> = domains
        .iter()
        .map(|dom| {
            let title = if dom.code.is_empty() {
                dom.title.clone()
            } else {
                format!("{}. {}", dom.code, dom.title)
            };

            let mut controls: Vec<UiControl> = dom
                .controls
                .iter()
                .filter_map(|control| {
                    let mut parts = PartsMap::default();
                    for question in &control.questions {
                        if let Some(kind) = PartKind::normalize(&question.local_code) {
                            parts.set(kind, question.id);
                        }
                    }
                    if parts.is_empty() {
                        return None;
                    }
                    Some(UiControl {
                        id: control.id,
                        code: control.code.clone(),
                        prompt: control.title.clone(),
                        parts,
                    })
                })
                .collect();

            controls.sort_by(|a, b| natural_cmp(&a.code, &b.code));

            Section {
                id: dom.id,
                title,
                controls,
            }
        })
        .filter(|section| !section.controls.is_empty())
        .collect();

    sections.sort_by(|a, b| {
        domain_rank(&a.title)
            .cmp(&domain_rank(&b.title))
            .then_with(|| natural_cmp(&a.title, &b.title))
    });

    sections
}

fn domain_rank(title: &str) -> usize {
    DOMAIN_PREFIX
        .captures(title)
        .and_then(|caps| caps.get(1))
        .and_then(|code| DOMAIN_ORDER.iter().position(|known| *known == code.as_str()))
        .unwrap_or(usize::MAX)
}

/// Case-insensitive comparison that orders embedded digit runs numerically,
/// so "GV.OC-2" sorts before "GV.OC-10".
pub(crate) fn natural_cmp(a: &str, b: &str) -> Ordering {
    let left = a.as_bytes();
    let right = b.as_bytes();
    let (mut i, mut j) = (0usize, 0usize);

    while i < left.len() && j < right.len() {
        if left[i].is_ascii_digit() && right[j].is_ascii_digit() {
            let start_i = i;
            while i < left.len() && left[i].is_ascii_digit() {
                i += 1;
            }
            let start_j = j;
            while j < right.len() && right[j].is_ascii_digit() {
                j += 1;
            }
            let num_a = trim_leading_zeros(&left[start_i..i]);
            let num_b = trim_leading_zeros(&right[start_j..j]);
            let ord = num_a
                .len()
                .cmp(&num_b.len())
                .then_with(|| num_a.cmp(num_b));
            if ord != Ordering::Equal {
                return ord;
            }
        } else {
            let ord = left[i]
                .to_ascii_lowercase()
                .cmp(&right[j].to_ascii_lowercase());
            if ord != Ordering::Equal {
                return ord;
            }
            i += 1;
            j += 1;
        }
    }

    (left.len() - i).cmp(&(right.len() - j))
}

fn trim_leading_zeros(digits: &[u8]) -> &[u8] {
    let first = digits.iter().position(|b| *b != b'0').unwrap_or(digits.len() - 1);
    &digits[first..]
}
