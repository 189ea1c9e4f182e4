use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::config::JwtSettings;
use crate::domain::{Discipline, Student, StudentWithDisciplines};
use crate::error::{AppError, AppResult};
use crate::identity::{issue_token, StudentAuth, UserRole};
use crate::idlist;

use super::repos::{DisciplineRepository, EmailSender, StudentRepository};

pub struct StudentService {
    students: Arc<dyn StudentRepository>,
    disciplines: Arc<dyn DisciplineRepository>,
    email: Arc<dyn EmailSender>,
    jwt: JwtSettings,
}

impl StudentService {
    pub fn new(
        students: Arc<dyn StudentRepository>,
        disciplines: Arc<dyn DisciplineRepository>,
        email: Arc<dyn EmailSender>,
        jwt: JwtSettings,
    ) -> Self {
        Self { students, disciplines, email, jwt }
    }

    /// Enroll a student: the flattened discipline list must parse, carry no
    /// repeated ids, and every id must name an existing discipline. On
    /// success the student is persisted and a welcome mail goes out.
    pub async fn add(&self, student: Student) -> AppResult<StudentWithDisciplines> {
        let ids = idlist::parse(&student.disciplines).ok_or_else(|| {
            AppError::user("bad_discipline_list", "disciplines must be a semicolon-delimited id list")
        })?;
        if idlist::has_duplicates(&ids) {
            return Err(AppError::user("duplicate_disciplines", "discipline list contains repeated ids"));
        }

        let disciplines = self.resolve_disciplines(&ids).await?;
        let added = self.students.add(student).await?;
        self.email.send_welcome(&added.email).await?;
        info!(target: "campuslink::students", "student added id={} course={}", added.student_id, added.course_id);

        Ok(StudentWithDisciplines { student: added, disciplines })
    }

    /// Login lookup: find the student by email and issue a signed token.
    pub async fn auth(&self, email: &str) -> AppResult<StudentAuth> {
        let student = self
            .students
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::not_found("student_not_found", "no student with that email"))?;

        let token = issue_token(&self.jwt, student.student_id, UserRole::Student)?;
        // Rows predating enrollment lists may carry an empty field.
        let disciplines = idlist::parse(&student.disciplines).unwrap_or_default();

        Ok(StudentAuth {
            student_id: student.student_id,
            name: student.name,
            email: student.email,
            course_id: student.course_id,
            disciplines,
            token,
        })
    }

    pub async fn exists_by_email(&self, email: &str) -> AppResult<bool> {
        self.students.exists_by_email(email).await
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Student> {
        self.students
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("student_not_found", "no student with that id"))
    }

    /// All students of a course, each joined in memory with the disciplines
    /// named by its flattened id list.
    pub async fn find_all_by_course_id(&self, course_id: Uuid) -> AppResult<Vec<StudentWithDisciplines>> {
        let students = self.students.find_all_by_course_id(course_id).await?;

        let mut out = Vec::with_capacity(students.len());
        for student in students {
            let ids = idlist::parse(&student.disciplines).ok_or_else(|| {
                AppError::internal(
                    "corrupt_discipline_list".to_string(),
                    format!("student {} has an unparseable discipline list", student.student_id),
                )
            })?;
            let disciplines = self.resolve_disciplines(&ids).await?;
            out.push(StudentWithDisciplines { student, disciplines });
        }
        Ok(out)
    }

    pub async fn update(&self, new: Student) -> AppResult<Student> {
        let current = self
            .students
            .find_by_id(new.student_id)
            .await?
            .ok_or_else(|| AppError::not_found("student_not_found", "no student with that id"))?;
        self.students.update(current, new).await
    }

    /// Deleting an id that does not exist is a no-op.
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        if let Some(student) = self.students.find_by_id(id).await? {
            self.students.delete(student).await?;
            info!(target: "campuslink::students", "student deleted id={}", id);
        }
        Ok(())
    }

    async fn resolve_disciplines(&self, ids: &[Uuid]) -> AppResult<Vec<Discipline>> {
        let found = self.disciplines.find_by_range_ids(ids).await?;
        let mut resolved = Vec::with_capacity(found.len());
        for slot in found {
            match slot {
                Some(d) => resolved.push(d),
                None => {
                    return Err(AppError::not_found(
                        "discipline_not_found",
                        "one or more disciplines do not exist",
                    ))
                }
            }
        }
        Ok(resolved)
    }
}
