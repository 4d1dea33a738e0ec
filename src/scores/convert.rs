//! Grade conversions from foreign exam systems into the 0-100 matura domain.

use super::ExamSystem;

pub const IB_MAX_GRADE: f64 = 7.0;
pub const EB_MAX_GRADE: f64 = 10.0;

/// International Baccalaureate grade (1-7) as a percentage.
pub fn ib_to_percentage(grade: f64) -> f64 {
    grade * 100.0 / IB_MAX_GRADE
}

/// European Baccalaureate grade (1-10) as a percentage.
pub fn eb_to_percentage(grade: f64) -> f64 {
    grade * 10.0
}

impl ExamSystem {
    /// Converts a grade from this system into a matura percentage. Polish and
    /// foreign results are assumed to be percentages already.
    pub fn to_percentage(self, grade: f64) -> f64 {
        match self {
            ExamSystem::Ib => ib_to_percentage(grade),
            ExamSystem::Eb => eb_to_percentage(grade),
            ExamSystem::Polish | ExamSystem::Foreign => grade,
        }
    }

    /// Valid grade range for the system.
    pub fn grade_range(self) -> (f64, f64) {
        match self {
            ExamSystem::Ib => (1.0, IB_MAX_GRADE),
            ExamSystem::Eb => (1.0, EB_MAX_GRADE),
            ExamSystem::Polish | ExamSystem::Foreign => (0.0, 100.0),
        }
    }
}
