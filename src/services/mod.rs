pub mod auth_service;
pub mod class_service;
pub mod combination_service;
pub mod grading;
pub mod notice_service;
pub mod result_service;
pub mod student_service;
pub mod subject_service;
pub mod validation;

/// Trimmed value, or `None` when absent or blank.
pub(crate) fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Pushes `message` when `value` is blank and returns the trimmed value.
pub(crate) fn required(
    value: Option<String>,
    message: &str,
    errors: &mut Vec<String>,
) -> Option<String> {
    let value = trimmed(value);
    if value.is_none() {
        errors.push(message.to_string());
    }
    value
}
