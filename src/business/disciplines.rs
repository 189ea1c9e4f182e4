use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::domain::Discipline;
use crate::error::{AppError, AppResult};
use crate::idlist;

use super::repos::DisciplineRepository;

pub struct DisciplineService {
    disciplines: Arc<dyn DisciplineRepository>,
}

impl DisciplineService {
    pub fn new(disciplines: Arc<dyn DisciplineRepository>) -> Self {
        Self { disciplines }
    }

    /// Resolve a flattened id list to its disciplines; every id must exist.
    pub async fn find_many(&self, list: &str) -> AppResult<Vec<Discipline>> {
        let ids = idlist::parse(list).ok_or_else(|| {
            AppError::user("bad_discipline_list", "disciplines must be a semicolon-delimited id list")
        })?;
        let found = self.disciplines.find_by_range_ids(&ids).await?;
        let mut out = Vec::with_capacity(found.len());
        for slot in found {
            match slot {
                Some(d) => out.push(d),
                None => {
                    return Err(AppError::not_found(
                        "discipline_not_found",
                        "one or more disciplines do not exist",
                    ))
                }
            }
        }
        Ok(out)
    }

    pub async fn find_by_course_id(&self, course_id: Uuid) -> AppResult<Vec<Discipline>> {
        self.disciplines.find_by_course_id(course_id).await
    }

    pub async fn add(&self, discipline: Discipline) -> AppResult<Discipline> {
        let added = self.disciplines.add(discipline).await?;
        info!(target: "campuslink::disciplines", "discipline added id={}", added.discipline_id);
        Ok(added)
    }

    pub async fn update(&self, new: Discipline) -> AppResult<Discipline> {
        self.disciplines
            .find_by_id(new.discipline_id)
            .await?
            .ok_or_else(|| AppError::not_found("discipline_not_found", "no discipline with that id"))?;
        self.disciplines.update(new).await
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.disciplines.delete(id).await
    }
}
