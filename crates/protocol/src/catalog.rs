use serde::{Deserialize, Serialize};

/// A named maturity/compliance standard being assessed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Framework {
    pub id: i64,
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub active: bool,
}

/// One semantic sub-question of a control. `local_code` is raw as authored;
/// see `PartKind::normalize`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionNode {
    pub id: i64,
    pub control: i64,
    pub local_code: String,
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub order: i64,
}

/// A single assessable requirement, identified by a dotted code ("GV.OC-01").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlNode {
    pub id: i64,
    pub domain: i64,
    pub code: String,
    pub title: String,
    #[serde(default)]
    pub order: i64,
    #[serde(default)]
    pub questions: Vec<QuestionNode>,
}

/// Top-level grouping of controls within a framework.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainNode {
    pub id: i64,
    pub framework: i64,
    #[serde(default)]
    pub code: String,
    pub title: String,
    #[serde(default)]
    pub parent: Option<i64>,
    #[serde(default)]
    pub order: i64,
    #[serde(default)]
    pub children: Vec<DomainNode>,
    #[serde(default)]
    pub controls: Vec<ControlNode>,
}

/// Template detail with its framework descriptor expanded by the serializer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateDetail {
    pub id: i64,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub description: String,
    pub framework: Framework,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateRef {
    pub id: i64,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameworkRef {
    pub id: i64,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_tree_decodes_with_missing_optionals() {
        let raw = r#"{
            "id": 3,
            "framework": 1,
            "title": "Governar (GV)",
            "controls": [{
                "id": 10,
                "domain": 3,
                "code": "GV.OC-01",
                "title": "Organizational context",
                "questions": [
                    {"id": 100, "control": 10, "local_code": "politica"},
                    {"id": 101, "control": 10, "local_code": "practice"}
                ]
            }]
        }"#;
        let dom: DomainNode = serde_json::from_str(raw).expect("decodes");
        assert_eq!(dom.code, "");
        assert!(dom.parent.is_none());
        assert_eq!(dom.controls[0].questions.len(), 2);
    }
}
