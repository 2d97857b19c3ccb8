use serde::{Deserialize, Serialize};

/// Semantic sub-field of a control. Every question in the catalog carries a
/// free-form `local_code`; only codes that normalize to one of these six
/// kinds are surfaced in the questionnaire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartKind {
    Score,
    Policy,
    Practice,
    Info,
    Attachment,
    Evidence,
}

impl PartKind {
    pub const ALL: [PartKind; 6] = [
        PartKind::Score,
        PartKind::Policy,
        PartKind::Practice,
        PartKind::Info,
        PartKind::Attachment,
        PartKind::Evidence,
    ];

    /// Normalize a question's local code. The catalog is authored in two
    /// locales (en and pt-BR), so both spellings map to the same kind.
    /// Unknown codes return `None` and the question is dropped.
    pub fn normalize(code: &str) -> Option<PartKind> {
        match code.trim().to_lowercase().as_str() {
            "policy" | "politica" => Some(PartKind::Policy),
            "practice" | "pratica" => Some(PartKind::Practice),
            "score" | "maturity" => Some(PartKind::Score),
            "attachment" | "anexo" | "anexos" => Some(PartKind::Attachment),
            "evidence" | "evidencia" | "evidências" | "evidencias" => Some(PartKind::Evidence),
            "info" | "informacoes" | "informações" => Some(PartKind::Info),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            PartKind::Score => "score",
            PartKind::Policy => "policy",
            PartKind::Practice => "practice",
            PartKind::Info => "info",
            PartKind::Attachment => "attachment",
            PartKind::Evidence => "evidence",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_is_idempotent_over_canonical_codes() {
        for kind in PartKind::ALL {
            assert_eq!(PartKind::normalize(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn both_locales_converge() {
        assert_eq!(PartKind::normalize("politica"), Some(PartKind::Policy));
        assert_eq!(PartKind::normalize("policy"), Some(PartKind::Policy));
        assert_eq!(PartKind::normalize("pratica"), Some(PartKind::Practice));
        assert_eq!(PartKind::normalize("maturity"), Some(PartKind::Score));
        assert_eq!(PartKind::normalize("anexos"), Some(PartKind::Attachment));
        assert_eq!(PartKind::normalize("evidências"), Some(PartKind::Evidence));
        assert_eq!(PartKind::normalize("informações"), Some(PartKind::Info));
    }

    #[test]
    fn normalize_trims_and_ignores_case() {
        assert_eq!(PartKind::normalize("  Policy "), Some(PartKind::Policy));
        assert_eq!(PartKind::normalize("PRATICA"), Some(PartKind::Practice));
    }

    #[test]
    fn unknown_codes_are_dropped() {
        assert_eq!(PartKind::normalize("comments"), None);
        assert_eq!(PartKind::normalize(""), None);
    }
}
