use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use crate::domain::{ClassShift, Lesson, LessonWithDiscipline};
use crate::error::{AppError, AppResult};
use crate::idlist;

use super::repos::{DisciplineRepository, LessonRepository, RecordingInfoProvider};

pub struct LessonService {
    lessons: Arc<dyn LessonRepository>,
    disciplines: Arc<dyn DisciplineRepository>,
    recordings: Arc<dyn RecordingInfoProvider>,
}

impl LessonService {
    pub fn new(
        lessons: Arc<dyn LessonRepository>,
        disciplines: Arc<dyn DisciplineRepository>,
        recordings: Arc<dyn RecordingInfoProvider>,
    ) -> Self {
        Self { lessons, disciplines, recordings }
    }

    /// Complete the lesson with its recording info, then persist it.
    pub async fn add(&self, lesson: Lesson) -> AppResult<Lesson> {
        let completed = self.recordings.recording_info(&lesson).await?;
        let added = self.lessons.add(completed).await?;
        info!(target: "campuslink::lessons", "lesson added id={} discipline={}", added.lesson_id, added.discipline_id);
        Ok(added)
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Lesson> {
        self.lessons
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("lesson_not_found", "no lesson with that id"))
    }

    pub async fn find_by_uri(&self, uri: &str) -> AppResult<Lesson> {
        self.lessons
            .find_by_uri(uri)
            .await?
            .ok_or_else(|| AppError::not_found("lesson_not_found", "no lesson at that uri"))
    }

    pub async fn find_by_date(&self, date: DateTime<Utc>, shift: ClassShift) -> AppResult<Lesson> {
        self.lessons
            .find_by_date(date, shift)
            .await?
            .ok_or_else(|| AppError::not_found("lesson_not_found", "no lesson on that date and shift"))
    }

    /// All lessons of the listed disciplines, each paired with its discipline
    /// by foreign key. The pairing is a linear scan over the fetched
    /// disciplines; both collections are small.
    pub async fn find_all_by_discipline_ids(&self, list: &str) -> AppResult<Vec<LessonWithDiscipline>> {
        let ids = idlist::parse(list).ok_or_else(|| {
            AppError::user("bad_discipline_list", "disciplines must be a semicolon-delimited id list")
        })?;

        let found = self.disciplines.find_by_range_ids(&ids).await?;
        let disciplines: Vec<_> = found.into_iter().flatten().collect();
        let lessons = self.lessons.find_all_by_discipline_ids(&ids).await?;

        let mut out = Vec::with_capacity(lessons.len());
        for lesson in lessons {
            let discipline = disciplines
                .iter()
                .find(|d| d.discipline_id == lesson.discipline_id)
                .cloned()
                .ok_or_else(|| {
                    AppError::not_found("discipline_not_found", "lesson references an unknown discipline")
                })?;
            out.push(LessonWithDiscipline { lesson, discipline });
        }
        Ok(out)
    }

    pub async fn update(&self, new: Lesson) -> AppResult<Lesson> {
        let current = self
            .lessons
            .find_by_id(new.lesson_id)
            .await?
            .ok_or_else(|| AppError::not_found("lesson_not_found", "no lesson with that id"))?;
        self.lessons.update(current, new).await
    }

    /// Deleting an id that does not exist is a no-op.
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        if let Some(lesson) = self.lessons.find_by_id(id).await? {
            self.lessons.delete(lesson).await?;
            info!(target: "campuslink::lessons", "lesson deleted id={}", id);
        }
        Ok(())
    }
}
