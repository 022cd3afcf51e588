//! Derived fields of a result: percentage, grade and default academic year.

use chrono::{DateTime, Datelike, Local, TimeZone};

use crate::entities::sea_orm_active_enums::Grade;

/// Lower bound (inclusive) of each grade, checked from the top.
const GRADE_THRESHOLDS: [(f64, Grade); 6] = [
    (90.0, Grade::APlus),
    (80.0, Grade::A),
    (70.0, Grade::BPlus),
    (60.0, Grade::B),
    (50.0, Grade::C),
    (40.0, Grade::D),
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Derived {
    pub percentage: f64,
    pub grade: Grade,
}

/// Caller guarantees `max_marks > 0`.
pub fn derive(marks: f64, max_marks: f64) -> Derived {
    let percentage = round_to_cents((marks / max_marks) * 100.0);
    Derived {
        percentage,
        grade: grade_for(percentage),
    }
}

pub fn grade_for(percentage: f64) -> Grade {
    GRADE_THRESHOLDS
        .iter()
        .find(|(lower, _)| percentage >= *lower)
        .map(|(_, grade)| *grade)
        .unwrap_or(Grade::F)
}

fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn default_academic_year<Tz: TimeZone>(now: &DateTime<Tz>) -> String {
    let year = now.year();
    format!("{}-{}", year, year + 1)
}

pub fn current_academic_year() -> String {
    default_academic_year(&Local::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_percentage_is_rounded_to_two_decimals() {
        let derived = derive(2.0, 3.0);
        assert_eq!(derived.percentage, 66.67);
        assert_eq!(derived.grade, Grade::B);

        let derived = derive(72.0, 100.0);
        assert_eq!(derived.percentage, 72.0);
        assert_eq!(derived.grade, Grade::BPlus);
    }

    #[test]
    fn test_grade_boundaries_are_inclusive() {
        let cases = [
            (90.0, Grade::APlus),
            (89.99, Grade::A),
            (80.0, Grade::A),
            (79.99, Grade::BPlus),
            (70.0, Grade::BPlus),
            (69.99, Grade::B),
            (60.0, Grade::B),
            (59.99, Grade::C),
            (50.0, Grade::C),
            (49.99, Grade::D),
            (40.0, Grade::D),
            (39.99, Grade::F),
            (0.0, Grade::F),
            (100.0, Grade::APlus),
        ];

        for (percentage, expected) in cases {
            assert_eq!(grade_for(percentage), expected, "percentage {percentage}");
        }
    }

    #[test]
    fn test_boundary_reached_through_marks() {
        assert_eq!(derive(9.0, 10.0).grade, Grade::APlus);
        assert_eq!(derive(8999.0, 10000.0).grade, Grade::A);
        assert_eq!(derive(40.0, 100.0).grade, Grade::D);
        assert_eq!(derive(0.0, 100.0).grade, Grade::F);
    }

    #[test]
    fn test_grade_never_improves_as_marks_drop() {
        let max_marks = 250.0;
        let mut previous = derive(max_marks, max_marks).grade;
        let mut marks = max_marks;
        while marks >= 0.0 {
            let grade = derive(marks, max_marks).grade;
            // Grade orders best first, so a worse grade compares greater.
            assert!(grade >= previous, "{marks}/{max_marks} gave {grade} after {previous}");
            previous = grade;
            marks -= 0.5;
        }
    }

    #[test]
    fn test_derive_is_pure() {
        assert_eq!(derive(47.5, 60.0), derive(47.5, 60.0));
    }

    #[test]
    fn test_default_academic_year() {
        let now = Utc.with_ymd_and_hms(2024, 1, 15, 8, 0, 0).unwrap();
        assert_eq!(default_academic_year(&now), "2024-2025");

        let now = Utc.with_ymd_and_hms(2030, 12, 31, 23, 59, 59).unwrap();
        assert_eq!(default_academic_year(&now), "2030-2031");
    }
}
