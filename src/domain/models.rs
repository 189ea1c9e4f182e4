use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which of the day's class blocks a lesson belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassShift {
    Morning,
    Afternoon,
    Night,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub student_id: Uuid,
    pub name: String,
    pub email: String,
    pub course_id: Uuid,
    /// Enrolled discipline ids flattened into the semicolon wire form
    /// (see `crate::idlist`).
    #[serde(default)]
    pub disciplines: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coordinator {
    pub coordinator_id: Uuid,
    pub name: String,
    pub email: String,
    pub course_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discipline {
    pub discipline_id: Uuid,
    pub name: String,
    #[serde(default)]
    pub teacher: Option<String>,
    pub course_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    pub lesson_id: Uuid,
    /// Recording location for the lesson, unique per lesson.
    pub uri: String,
    pub date: DateTime<Utc>,
    pub shift: ClassShift,
    pub discipline_id: Uuid,
}

/// Read model: a student joined with the disciplines named by its flattened
/// id list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentWithDisciplines {
    pub student: Student,
    pub disciplines: Vec<Discipline>,
}

/// Read model: a lesson joined with its discipline by foreign key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonWithDiscipline {
    pub lesson: Lesson,
    pub discipline: Discipline,
}
