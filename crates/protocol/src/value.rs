use serde_json::Value;

const IMAGE_EXTENSIONS: [&str; 7] = [".png", ".jpg", ".jpeg", ".gif", ".webp", ".bmp", ".svg"];

/// Extract a display string from a stored answer value. Answers are free-form
/// JSON: strings pass through, numbers are stringified, objects surface a
/// `label` or `value` field, and anything else is serialized as a last resort.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Object(map) => {
            if let Some(Value::String(label)) = map.get("label") {
                return label.clone();
            }
            match map.get("value") {
                Some(Value::String(s)) => s.clone(),
                Some(other) => other.to_string(),
                None => value.to_string(),
            }
        }
        other => other.to_string(),
    }
}

/// Last path segment of a stored attachment reference.
pub fn file_name_from_path(path: &str) -> &str {
    path.rsplit('/').next().filter(|s| !s.is_empty()).unwrap_or(path)
}

pub fn is_image_filename(name: &str) -> bool {
    let lower = name.to_lowercase();
    IMAGE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn strings_pass_through() {
        assert_eq!(display_value(&json!("Definido")), "Definido");
        assert_eq!(display_value(&json!("")), "");
    }

    #[test]
    fn numbers_are_stringified() {
        assert_eq!(display_value(&json!(4)), "4");
        assert_eq!(display_value(&json!(2.5)), "2.5");
    }

    #[test]
    fn objects_surface_label_then_value() {
        assert_eq!(display_value(&json!({"label": "3 - Definido", "value": 3})), "3 - Definido");
        assert_eq!(display_value(&json!({"value": 3})), "3");
        assert_eq!(display_value(&json!({"value": "Gerenciado"})), "Gerenciado");
    }

    #[test]
    fn other_shapes_serialize_as_json() {
        assert_eq!(display_value(&json!({"weight": 1})), r#"{"weight":1}"#);
        assert_eq!(display_value(&json!([1, 2])), "[1,2]");
        assert_eq!(display_value(&Value::Null), "");
    }

    #[test]
    fn file_name_takes_last_segment() {
        assert_eq!(file_name_from_path("media/answers/7/evidence.PDF"), "evidence.PDF");
        assert_eq!(file_name_from_path("plain.txt"), "plain.txt");
        assert_eq!(file_name_from_path("media/answers/"), "media/answers/");
    }

    #[test]
    fn image_detection_by_extension() {
        assert!(is_image_filename("shot.PNG"));
        assert!(is_image_filename("diagram.svg"));
        assert!(!is_image_filename("report.pdf"));
        assert!(!is_image_filename(""));
    }
}
