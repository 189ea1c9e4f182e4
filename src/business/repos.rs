//! Seams to the external collaborators: relational storage (per-entity
//! repositories), email delivery and the recording/collab API. All are
//! black boxes to the services; tests plug in in-memory fakes.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{ClassShift, Coordinator, Discipline, Lesson, Student};
use crate::error::AppResult;

#[async_trait]
pub trait StudentRepository: Send + Sync {
    async fn add(&self, student: Student) -> AppResult<Student>;
    async fn exists_by_email(&self, email: &str) -> AppResult<bool>;
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Student>>;
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Student>>;
    async fn find_all_by_course_id(&self, course_id: Uuid) -> AppResult<Vec<Student>>;
    async fn update(&self, current: Student, new: Student) -> AppResult<Student>;
    async fn delete(&self, student: Student) -> AppResult<()>;
}

#[async_trait]
pub trait DisciplineRepository: Send + Sync {
    async fn add(&self, discipline: Discipline) -> AppResult<Discipline>;
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Discipline>>;
    /// One slot per requested id, in request order; `None` where the id does
    /// not exist. Callers decide whether a missing id is an error.
    async fn find_by_range_ids(&self, ids: &[Uuid]) -> AppResult<Vec<Option<Discipline>>>;
    async fn find_by_course_id(&self, course_id: Uuid) -> AppResult<Vec<Discipline>>;
    async fn update(&self, new: Discipline) -> AppResult<Discipline>;
    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

#[async_trait]
pub trait LessonRepository: Send + Sync {
    async fn add(&self, lesson: Lesson) -> AppResult<Lesson>;
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Lesson>>;
    async fn find_by_uri(&self, uri: &str) -> AppResult<Option<Lesson>>;
    async fn find_by_date(&self, date: DateTime<Utc>, shift: ClassShift) -> AppResult<Option<Lesson>>;
    async fn find_all_by_discipline_ids(&self, ids: &[Uuid]) -> AppResult<Vec<Lesson>>;
    async fn update(&self, current: Lesson, new: Lesson) -> AppResult<Lesson>;
    async fn delete(&self, lesson: Lesson) -> AppResult<()>;
}

#[async_trait]
pub trait CoordinatorRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Coordinator>>;
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Coordinator>>;
}

/// Email delivery seam (welcome mail on enrollment).
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send_welcome(&self, email: &str) -> AppResult<()>;
}

/// Recording/collab API seam: completes a lesson with its recording
/// information before it is persisted.
#[async_trait]
pub trait RecordingInfoProvider: Send + Sync {
    async fn recording_info(&self, lesson: &Lesson) -> AppResult<Lesson>;
}
