/// Validate a required text field with a max length.
pub fn validate_required(value: &str, field_name: &str, max_len: usize) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Some(format!("{field_name} is required"));
    }
    if trimmed.chars().count() > max_len {
        return Some(format!("{field_name} must be at most {max_len} characters"));
    }
    None
}

/// Validate an optional text field with a max length (empty is OK).
pub fn validate_optional(value: &str, field_name: &str, max_len: usize) -> Option<String> {
    if value.trim().chars().count() > max_len {
        return Some(format!("{field_name} must be at most {max_len} characters"));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_rejects_blank() {
        assert_eq!(
            validate_required("   ", "Name", 10),
            Some("Name is required".to_string())
        );
        assert!(validate_required("Landing", "Name", 10).is_none());
    }

    #[test]
    fn length_counts_characters() {
        assert!(validate_required("ééééé", "Name", 5).is_none());
        assert!(validate_required("éééééé", "Name", 5).is_some());
        assert!(validate_optional("", "Description", 5).is_none());
        assert!(validate_optional("toolong", "Description", 5).is_some());
    }
}
