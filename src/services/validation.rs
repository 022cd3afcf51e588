//! Field-level rules for result payloads.
//!
//! Every rule is evaluated and the messages are returned together, so a
//! client sees all problems with a submission at once.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::sea_orm_active_enums::ExamType;
use crate::errors::AppError;

pub const VALID_EXAM_TYPES: [&str; 3] = ["Final Term", "Mid Term", "Monthly Test"];

pub const MSG_MARKS_INVALID: &str = "Marks must be a non-negative number";
pub const MSG_MAX_MARKS_INVALID: &str = "Maximum marks must be a positive number";
pub const MSG_MAX_MARKS_MIN: &str = "Maximum marks must be at least 1";
pub const MSG_MARKS_EXCEED_MAX: &str = "Marks cannot exceed maximum marks";

/// A number that may arrive either as a JSON number or as a numeric string.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, ToSchema)]
#[serde(untagged)]
pub enum NumberInput {
    Number(f64),
    Text(String),
}

impl NumberInput {
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            NumberInput::Number(value) => *value,
            NumberInput::Text(text) => text.trim().parse::<f64>().ok()?,
        };
        value.is_finite().then_some(value)
    }

    /// Zero and the empty string count as "not supplied" for maximum marks.
    fn is_truthy(&self) -> bool {
        match self {
            NumberInput::Number(value) => *value != 0.0 && !value.is_nan(),
            NumberInput::Text(text) => !text.is_empty(),
        }
    }
}

impl From<f64> for NumberInput {
    fn from(value: f64) -> Self {
        NumberInput::Number(value)
    }
}

/// Candidate result as submitted by a client.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResultInput {
    #[schema(example = "5f0c6f4e-2a4b-4bde-9a53-0a8a2b7d6a11")]
    pub student_id: Option<String>,
    #[schema(example = "10A001")]
    pub roll_id: Option<String>,
    pub class_id: Option<String>,
    pub subject_id: Option<String>,
    #[schema(value_type = Option<f64>, example = 72)]
    pub marks: Option<NumberInput>,
    #[schema(value_type = Option<f64>, example = 100)]
    pub max_marks: Option<NumberInput>,
    #[schema(example = "Final Term")]
    pub exam_type: Option<String>,
    #[schema(example = "2025-2026")]
    pub academic_year: Option<String>,
}

/// Result input after every rule has passed.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidResultInput {
    pub student_id: Uuid,
    pub roll_id: String,
    pub class_id: Uuid,
    pub subject_id: Uuid,
    pub marks: f64,
    pub max_marks: f64,
    pub exam_type: ExamType,
    pub academic_year: Option<String>,
}

/// Partial update of a stored result.
///
/// Identity fields are accepted so a client can echo the record back, but the
/// service rejects any attempt to change them.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResultUpdate {
    pub student_id: Option<String>,
    pub roll_id: Option<String>,
    pub class_id: Option<String>,
    pub subject_id: Option<String>,
    #[schema(value_type = Option<f64>)]
    pub marks: Option<NumberInput>,
    #[schema(value_type = Option<f64>)]
    pub max_marks: Option<NumberInput>,
    pub exam_type: Option<String>,
    pub academic_year: Option<String>,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn check_id(field: &str, value: &Option<String>, errors: &mut Vec<String>) {
    if let Some(raw) = present(value) {
        if Uuid::parse_str(raw).is_err() {
            errors.push(format!("Invalid {field} format"));
        }
    }
}

fn check_exam_type(exam_type: Option<&str>, errors: &mut Vec<String>) {
    if let Some(exam_type) = exam_type {
        if ExamType::parse(exam_type).is_none() {
            errors.push(format!(
                "Exam type must be one of: {}",
                VALID_EXAM_TYPES.join(", ")
            ));
        }
    }
}

/// Checks a full result submission; an empty list means valid.
pub fn validate_result_input(input: &ResultInput) -> Vec<String> {
    let mut errors = Vec::new();

    if present(&input.student_id).is_none() {
        errors.push("Student ID is required".to_string());
    }
    if present(&input.roll_id).is_none() {
        errors.push("Roll ID is required".to_string());
    }
    if present(&input.class_id).is_none() {
        errors.push("Class ID is required".to_string());
    }
    if present(&input.subject_id).is_none() {
        errors.push("Subject ID is required".to_string());
    }
    if input.marks.is_none() {
        errors.push("Marks are required".to_string());
    }
    if !input.max_marks.as_ref().is_some_and(NumberInput::is_truthy) {
        errors.push("Maximum marks are required".to_string());
    }
    if present(&input.exam_type).is_none() {
        errors.push("Exam type is required".to_string());
    }

    check_id("studentId", &input.student_id, &mut errors);
    check_id("classId", &input.class_id, &mut errors);
    check_id("subjectId", &input.subject_id, &mut errors);

    let marks = check_marks(input.marks.as_ref(), &mut errors);
    let max_marks = check_max_marks(input.max_marks.as_ref(), &mut errors);
    check_pair(marks, max_marks, &mut errors);

    check_exam_type(present(&input.exam_type), &mut errors);

    errors
}

/// Checks only the fields present in `update`. When exactly one of marks and
/// maximum marks is supplied it is compared against the stored other value.
pub fn validate_result_update(
    update: &ResultUpdate,
    stored_marks: f64,
    stored_max_marks: f64,
) -> Vec<String> {
    let mut errors = Vec::new();

    let marks = check_marks(update.marks.as_ref(), &mut errors);
    let max_marks = check_max_marks(update.max_marks.as_ref(), &mut errors);

    if update.marks.is_some() || update.max_marks.is_some() {
        let marks = if update.marks.is_some() { marks } else { Some(stored_marks) };
        let max_marks = if update.max_marks.is_some() {
            max_marks
        } else {
            Some(stored_max_marks)
        };
        check_pair(marks, max_marks, &mut errors);
    }

    check_exam_type(present(&update.exam_type), &mut errors);

    errors
}

fn check_marks(marks: Option<&NumberInput>, errors: &mut Vec<String>) -> Option<f64> {
    let marks = marks?;
    match marks.as_f64() {
        Some(value) if value >= 0.0 => Some(value),
        _ => {
            errors.push(MSG_MARKS_INVALID.to_string());
            None
        }
    }
}

fn check_max_marks(max_marks: Option<&NumberInput>, errors: &mut Vec<String>) -> Option<f64> {
    let max_marks = max_marks?;
    match max_marks.as_f64() {
        Some(value) if value >= 1.0 => Some(value),
        Some(value) if value > 0.0 => {
            errors.push(MSG_MAX_MARKS_MIN.to_string());
            None
        }
        _ => {
            errors.push(MSG_MAX_MARKS_INVALID.to_string());
            None
        }
    }
}

fn check_pair(marks: Option<f64>, max_marks: Option<f64>, errors: &mut Vec<String>) {
    if let (Some(marks), Some(max_marks)) = (marks, max_marks) {
        if marks > max_marks {
            errors.push(MSG_MARKS_EXCEED_MAX.to_string());
        }
    }
}

impl ResultInput {
    /// Runs [`validate_result_input`] and returns the typed values.
    pub fn into_valid(self) -> Result<ValidResultInput, AppError> {
        let errors = validate_result_input(&self);
        if !errors.is_empty() {
            return Err(AppError::ValidationFailure(errors));
        }

        let parsed = (|| {
            Some(ValidResultInput {
                student_id: Uuid::parse_str(present(&self.student_id)?).ok()?,
                roll_id: present(&self.roll_id)?.to_string(),
                class_id: Uuid::parse_str(present(&self.class_id)?).ok()?,
                subject_id: Uuid::parse_str(present(&self.subject_id)?).ok()?,
                marks: self.marks.as_ref()?.as_f64()?,
                max_marks: self.max_marks.as_ref()?.as_f64()?,
                exam_type: ExamType::parse(present(&self.exam_type)?)?,
                academic_year: present(&self.academic_year).map(str::to_string),
            })
        })();

        parsed.ok_or_else(|| AppError::ValidationFailure(vec!["Invalid result input".to_string()]))
    }
}

impl ResultUpdate {
    pub fn marks_value(&self) -> Option<f64> {
        self.marks.as_ref().and_then(NumberInput::as_f64)
    }

    pub fn max_marks_value(&self) -> Option<f64> {
        self.max_marks.as_ref().and_then(NumberInput::as_f64)
    }

    pub fn exam_type_value(&self) -> Option<ExamType> {
        present(&self.exam_type).and_then(ExamType::parse)
    }

    pub fn academic_year_value(&self) -> Option<&str> {
        present(&self.academic_year)
    }
}

/// Trimmed, non-empty value of an optional string field.
pub fn non_blank(value: &Option<String>) -> Option<&str> {
    present(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_input() -> ResultInput {
        ResultInput {
            student_id: Some(Uuid::new_v4().to_string()),
            roll_id: Some("10a001".to_string()),
            class_id: Some(Uuid::new_v4().to_string()),
            subject_id: Some(Uuid::new_v4().to_string()),
            marks: Some(72.0.into()),
            max_marks: Some(100.0.into()),
            exam_type: Some("Final Term".to_string()),
            academic_year: None,
        }
    }

    #[test]
    fn test_complete_input_is_valid() {
        assert!(validate_result_input(&complete_input()).is_empty());
    }

    #[test]
    fn test_every_missing_field_is_reported() {
        let errors = validate_result_input(&ResultInput::default());
        assert_eq!(
            errors,
            vec![
                "Student ID is required",
                "Roll ID is required",
                "Class ID is required",
                "Subject ID is required",
                "Marks are required",
                "Maximum marks are required",
                "Exam type is required",
            ]
        );
    }

    #[test]
    fn test_zero_marks_are_valid() {
        let mut input = complete_input();
        input.marks = Some(0.0.into());
        assert!(validate_result_input(&input).is_empty());
    }

    #[test]
    fn test_zero_max_marks_is_rejected_twice() {
        let mut input = complete_input();
        input.max_marks = Some(0.0.into());
        let errors = validate_result_input(&input);
        assert!(errors.contains(&"Maximum marks are required".to_string()));
        assert!(errors.contains(&MSG_MAX_MARKS_INVALID.to_string()));
    }

    #[test]
    fn test_numeric_strings_are_accepted() {
        let mut input = complete_input();
        input.marks = Some(NumberInput::Text("45.5".to_string()));
        input.max_marks = Some(NumberInput::Text("50".to_string()));
        let valid = input.into_valid().unwrap();
        assert_eq!(valid.marks, 45.5);
        assert_eq!(valid.max_marks, 50.0);
    }

    #[test]
    fn test_non_numeric_and_negative_marks() {
        let mut input = complete_input();
        input.marks = Some(NumberInput::Text("abc".to_string()));
        assert_eq!(validate_result_input(&input), vec![MSG_MARKS_INVALID]);

        input.marks = Some((-1.0).into());
        assert_eq!(validate_result_input(&input), vec![MSG_MARKS_INVALID]);
    }

    #[test]
    fn test_marks_above_maximum() {
        let mut input = complete_input();
        input.marks = Some(101.0.into());
        assert_eq!(validate_result_input(&input), vec![MSG_MARKS_EXCEED_MAX]);
    }

    #[test]
    fn test_unknown_exam_type() {
        let mut input = complete_input();
        input.exam_type = Some("Quiz".to_string());
        assert_eq!(
            validate_result_input(&input),
            vec!["Exam type must be one of: Final Term, Mid Term, Monthly Test"]
        );
    }

    #[test]
    fn test_malformed_ids() {
        let mut input = complete_input();
        input.student_id = Some("not-an-id".to_string());
        input.subject_id = Some("123".to_string());
        assert_eq!(
            validate_result_input(&input),
            vec!["Invalid studentId format", "Invalid subjectId format"]
        );
    }

    #[test]
    fn test_errors_accumulate() {
        let mut input = complete_input();
        input.roll_id = None;
        input.marks = Some((-5.0).into());
        input.exam_type = Some("Finals".to_string());
        assert_eq!(validate_result_input(&input).len(), 3);
    }

    #[test]
    fn test_update_ignores_absent_fields() {
        assert!(validate_result_update(&ResultUpdate::default(), 50.0, 100.0).is_empty());
    }

    #[test]
    fn test_update_compares_against_stored_values() {
        let update = ResultUpdate {
            marks: Some(60.0.into()),
            ..Default::default()
        };
        assert_eq!(
            validate_result_update(&update, 40.0, 50.0),
            vec![MSG_MARKS_EXCEED_MAX]
        );

        let update = ResultUpdate {
            max_marks: Some(30.0.into()),
            ..Default::default()
        };
        assert_eq!(
            validate_result_update(&update, 40.0, 50.0),
            vec![MSG_MARKS_EXCEED_MAX]
        );

        let update = ResultUpdate {
            max_marks: Some(40.0.into()),
            ..Default::default()
        };
        assert!(validate_result_update(&update, 40.0, 50.0).is_empty());
    }

    #[test]
    fn test_update_rejects_bad_values() {
        let update = ResultUpdate {
            max_marks: Some(0.0.into()),
            exam_type: Some("Weekly".to_string()),
            ..Default::default()
        };
        let errors = validate_result_update(&update, 10.0, 20.0);
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0], MSG_MAX_MARKS_INVALID);
    }

    #[test]
    fn test_fractional_maximum_below_one_rejected() {
        let update = ResultUpdate {
            max_marks: Some(NumberInput::Text("0.5".to_string())),
            ..Default::default()
        };
        assert_eq!(validate_result_update(&update, 0.3, 10.0), vec![MSG_MAX_MARKS_MIN]);

        let update = ResultUpdate {
            max_marks: Some(1.0.into()),
            marks: Some(1.0.into()),
            ..Default::default()
        };
        assert!(validate_result_update(&update, 0.0, 10.0).is_empty());
    }
}
