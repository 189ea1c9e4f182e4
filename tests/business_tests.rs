//! Business service integration tests over in-memory repository fakes:
//! enrollment validation, login token issuance and the in-memory joins.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use parking_lot::Mutex;
use uuid::Uuid;

use campuslink::business::{
    CoordinatorRepository, CoordinatorService, DisciplineRepository, DisciplineService,
    EmailSender, LessonRepository, LessonService, RecordingInfoProvider, StudentRepository,
    StudentService,
};
use campuslink::config::JwtSettings;
use campuslink::domain::{ClassShift, Coordinator, Discipline, Lesson, Student};
use campuslink::error::AppResult;
use campuslink::identity::{validate_token, UserRole};
use campuslink::idlist;

fn settings() -> JwtSettings {
    JwtSettings::new("business-signing-key", "campuslink-test", "campuslink-issuer")
}

#[derive(Default)]
struct MemStudents {
    rows: Mutex<Vec<Student>>,
}

#[async_trait]
impl StudentRepository for MemStudents {
    async fn add(&self, student: Student) -> AppResult<Student> {
        self.rows.lock().push(student.clone());
        Ok(student)
    }
    async fn exists_by_email(&self, email: &str) -> AppResult<bool> {
        Ok(self.rows.lock().iter().any(|s| s.email == email))
    }
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Student>> {
        Ok(self.rows.lock().iter().find(|s| s.student_id == id).cloned())
    }
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Student>> {
        Ok(self
            .rows
            .lock()
            .iter()
            .find(|s| s.email.eq_ignore_ascii_case(email))
            .cloned())
    }
    async fn find_all_by_course_id(&self, course_id: Uuid) -> AppResult<Vec<Student>> {
        Ok(self
            .rows
            .lock()
            .iter()
            .filter(|s| s.course_id == course_id)
            .cloned()
            .collect())
    }
    async fn update(&self, current: Student, new: Student) -> AppResult<Student> {
        let mut rows = self.rows.lock();
        if let Some(slot) = rows.iter_mut().find(|s| s.student_id == current.student_id) {
            *slot = new.clone();
        }
        Ok(new)
    }
    async fn delete(&self, student: Student) -> AppResult<()> {
        self.rows.lock().retain(|s| s.student_id != student.student_id);
        Ok(())
    }
}

#[derive(Default)]
struct MemDisciplines {
    rows: Mutex<Vec<Discipline>>,
}

#[async_trait]
impl DisciplineRepository for MemDisciplines {
    async fn add(&self, discipline: Discipline) -> AppResult<Discipline> {
        self.rows.lock().push(discipline.clone());
        Ok(discipline)
    }
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Discipline>> {
        Ok(self.rows.lock().iter().find(|d| d.discipline_id == id).cloned())
    }
    async fn find_by_range_ids(&self, ids: &[Uuid]) -> AppResult<Vec<Option<Discipline>>> {
        let rows = self.rows.lock();
        Ok(ids
            .iter()
            .map(|id| rows.iter().find(|d| d.discipline_id == *id).cloned())
            .collect())
    }
    async fn find_by_course_id(&self, course_id: Uuid) -> AppResult<Vec<Discipline>> {
        Ok(self
            .rows
            .lock()
            .iter()
            .filter(|d| d.course_id == course_id)
            .cloned()
            .collect())
    }
    async fn update(&self, new: Discipline) -> AppResult<Discipline> {
        let mut rows = self.rows.lock();
        if let Some(slot) = rows.iter_mut().find(|d| d.discipline_id == new.discipline_id) {
            *slot = new.clone();
        }
        Ok(new)
    }
    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.rows.lock().retain(|d| d.discipline_id != id);
        Ok(())
    }
}

#[derive(Default)]
struct MemLessons {
    rows: Mutex<Vec<Lesson>>,
}

#[async_trait]
impl LessonRepository for MemLessons {
    async fn add(&self, lesson: Lesson) -> AppResult<Lesson> {
        self.rows.lock().push(lesson.clone());
        Ok(lesson)
    }
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Lesson>> {
        Ok(self.rows.lock().iter().find(|l| l.lesson_id == id).cloned())
    }
    async fn find_by_uri(&self, uri: &str) -> AppResult<Option<Lesson>> {
        Ok(self.rows.lock().iter().find(|l| l.uri == uri).cloned())
    }
    async fn find_by_date(&self, date: DateTime<Utc>, shift: ClassShift) -> AppResult<Option<Lesson>> {
        Ok(self
            .rows
            .lock()
            .iter()
            .find(|l| l.date == date && l.shift == shift)
            .cloned())
    }
    async fn find_all_by_discipline_ids(&self, ids: &[Uuid]) -> AppResult<Vec<Lesson>> {
        Ok(self
            .rows
            .lock()
            .iter()
            .filter(|l| ids.contains(&l.discipline_id))
            .cloned()
            .collect())
    }
    async fn update(&self, current: Lesson, new: Lesson) -> AppResult<Lesson> {
        let mut rows = self.rows.lock();
        if let Some(slot) = rows.iter_mut().find(|l| l.lesson_id == current.lesson_id) {
            *slot = new.clone();
        }
        Ok(new)
    }
    async fn delete(&self, lesson: Lesson) -> AppResult<()> {
        self.rows.lock().retain(|l| l.lesson_id != lesson.lesson_id);
        Ok(())
    }
}

#[derive(Default)]
struct MemCoordinators {
    rows: Mutex<Vec<Coordinator>>,
}

#[async_trait]
impl CoordinatorRepository for MemCoordinators {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Coordinator>> {
        Ok(self.rows.lock().iter().find(|c| c.coordinator_id == id).cloned())
    }
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Coordinator>> {
        Ok(self
            .rows
            .lock()
            .iter()
            .find(|c| c.email.eq_ignore_ascii_case(email))
            .cloned())
    }
}

#[derive(Default)]
struct RecordingEmail {
    sent: Mutex<Vec<String>>,
}

#[async_trait]
impl EmailSender for RecordingEmail {
    async fn send_welcome(&self, email: &str) -> AppResult<()> {
        self.sent.lock().push(email.to_string());
        Ok(())
    }
}

/// Fills the recording uri like the external collab API would.
struct StubRecordings;

#[async_trait]
impl RecordingInfoProvider for StubRecordings {
    async fn recording_info(&self, lesson: &Lesson) -> AppResult<Lesson> {
        let mut completed = lesson.clone();
        completed.uri = format!("https://recordings.example.edu/{}", lesson.lesson_id);
        Ok(completed)
    }
}

fn discipline(course_id: Uuid, name: &str) -> Discipline {
    Discipline {
        discipline_id: Uuid::new_v4(),
        name: name.to_string(),
        teacher: None,
        course_id,
    }
}

fn student(course_id: Uuid, email: &str, disciplines: &[Uuid]) -> Student {
    Student {
        student_id: Uuid::new_v4(),
        name: "Carla Dias".to_string(),
        email: email.to_string(),
        course_id,
        disciplines: idlist::join(disciplines),
    }
}

struct Fixture {
    students: Arc<MemStudents>,
    disciplines: Arc<MemDisciplines>,
    email: Arc<RecordingEmail>,
    service: StudentService,
}

fn student_fixture() -> Fixture {
    let students = Arc::new(MemStudents::default());
    let disciplines = Arc::new(MemDisciplines::default());
    let email = Arc::new(RecordingEmail::default());
    let service = StudentService::new(
        students.clone(),
        disciplines.clone(),
        email.clone(),
        settings(),
    );
    Fixture { students, disciplines, email, service }
}

#[tokio::test]
async fn add_student_joins_disciplines_and_sends_mail() -> Result<()> {
    let f = student_fixture();
    let course = Uuid::new_v4();
    let d1 = discipline(course, "Algorithms");
    let d2 = discipline(course, "Databases");
    f.disciplines.add(d1.clone()).await?;
    f.disciplines.add(d2.clone()).await?;

    let added = f
        .service
        .add(student(course, "carla@example.edu", &[d1.discipline_id, d2.discipline_id]))
        .await?;

    assert_eq!(added.disciplines, vec![d1, d2]);
    assert_eq!(f.email.sent.lock().as_slice(), ["carla@example.edu"]);
    assert_eq!(f.students.rows.lock().len(), 1);
    Ok(())
}

#[tokio::test]
async fn add_student_rejects_duplicate_disciplines() -> Result<()> {
    let f = student_fixture();
    let course = Uuid::new_v4();
    let d = discipline(course, "Algorithms");
    f.disciplines.add(d.clone()).await?;

    let err = f
        .service
        .add(student(course, "carla@example.edu", &[d.discipline_id, d.discipline_id]))
        .await
        .unwrap_err();

    assert_eq!(err.code_str(), "duplicate_disciplines");
    assert!(f.email.sent.lock().is_empty());
    assert!(f.students.rows.lock().is_empty());
    Ok(())
}

#[tokio::test]
async fn add_student_rejects_unknown_discipline() -> Result<()> {
    let f = student_fixture();
    let course = Uuid::new_v4();
    let known = discipline(course, "Algorithms");
    f.disciplines.add(known.clone()).await?;

    let err = f
        .service
        .add(student(course, "carla@example.edu", &[known.discipline_id, Uuid::new_v4()]))
        .await
        .unwrap_err();

    assert_eq!(err.code_str(), "discipline_not_found");
    assert!(f.students.rows.lock().is_empty());
    Ok(())
}

#[tokio::test]
async fn student_auth_issues_validatable_token() -> Result<()> {
    let f = student_fixture();
    let course = Uuid::new_v4();
    let d = discipline(course, "Algorithms");
    f.disciplines.add(d.clone()).await?;
    let s = student(course, "carla@example.edu", &[d.discipline_id]);
    f.students.add(s.clone()).await?;

    let auth = f.service.auth("carla@example.edu").await?;
    assert_eq!(auth.student_id, s.student_id);
    assert_eq!(auth.disciplines, vec![d.discipline_id]);

    let principal = validate_token(&settings(), &auth.token)?;
    assert_eq!(principal.user_id, s.student_id);
    assert_eq!(principal.role, UserRole::Student);
    Ok(())
}

#[tokio::test]
async fn unknown_student_auth_is_not_found() {
    let f = student_fixture();
    let err = f.service.auth("nobody@example.edu").await.unwrap_err();
    assert_eq!(err.http_status(), 404);
}

#[tokio::test]
async fn find_all_by_course_id_joins_each_student() -> Result<()> {
    let f = student_fixture();
    let course = Uuid::new_v4();
    let d1 = discipline(course, "Algorithms");
    let d2 = discipline(course, "Databases");
    f.disciplines.add(d1.clone()).await?;
    f.disciplines.add(d2.clone()).await?;

    let s1 = student(course, "a@example.edu", &[d1.discipline_id]);
    let s2 = student(course, "b@example.edu", &[d1.discipline_id, d2.discipline_id]);
    f.students.add(s1.clone()).await?;
    f.students.add(s2.clone()).await?;
    // A student from another course must not appear.
    f.students
        .add(student(Uuid::new_v4(), "c@example.edu", &[d1.discipline_id]))
        .await?;

    let joined = f.service.find_all_by_course_id(course).await?;
    assert_eq!(joined.len(), 2);
    assert_eq!(joined[0].disciplines, vec![d1.clone()]);
    assert_eq!(joined[1].disciplines, vec![d1, d2]);
    Ok(())
}

#[tokio::test]
async fn delete_missing_student_is_noop() -> Result<()> {
    let f = student_fixture();
    f.service.delete(Uuid::new_v4()).await?;
    Ok(())
}

#[tokio::test]
async fn discipline_find_many_requires_all_ids_to_exist() -> Result<()> {
    let repo = Arc::new(MemDisciplines::default());
    let service = DisciplineService::new(repo.clone());
    let course = Uuid::new_v4();
    let d = discipline(course, "Algorithms");
    repo.add(d.clone()).await?;

    let found = service.find_many(&idlist::join(&[d.discipline_id])).await?;
    assert_eq!(found, vec![d.clone()]);

    let err = service
        .find_many(&idlist::join(&[d.discipline_id, Uuid::new_v4()]))
        .await
        .unwrap_err();
    assert_eq!(err.code_str(), "discipline_not_found");

    let err = service.find_many("not-a-list").await.unwrap_err();
    assert_eq!(err.code_str(), "bad_discipline_list");
    Ok(())
}

fn lesson(discipline_id: Uuid, date: DateTime<Utc>) -> Lesson {
    Lesson {
        lesson_id: Uuid::new_v4(),
        uri: String::new(),
        date,
        shift: ClassShift::Morning,
        discipline_id,
    }
}

#[tokio::test]
async fn add_lesson_takes_uri_from_recording_provider() -> Result<()> {
    let lessons = Arc::new(MemLessons::default());
    let disciplines = Arc::new(MemDisciplines::default());
    let service = LessonService::new(lessons.clone(), disciplines, Arc::new(StubRecordings));

    let date = Utc.with_ymd_and_hms(2026, 3, 9, 8, 0, 0).unwrap();
    let added = service.add(lesson(Uuid::new_v4(), date)).await?;

    assert!(added.uri.starts_with("https://recordings.example.edu/"));
    assert_eq!(lessons.rows.lock().len(), 1);
    assert_eq!(service.find_by_uri(&added.uri).await?, added);
    assert_eq!(service.find_by_date(date, ClassShift::Morning).await?, added);
    Ok(())
}

#[tokio::test]
async fn lessons_join_with_their_disciplines() -> Result<()> {
    let lessons = Arc::new(MemLessons::default());
    let disciplines = Arc::new(MemDisciplines::default());
    let service = LessonService::new(lessons.clone(), disciplines.clone(), Arc::new(StubRecordings));

    let course = Uuid::new_v4();
    let d1 = discipline(course, "Algorithms");
    let d2 = discipline(course, "Databases");
    disciplines.add(d1.clone()).await?;
    disciplines.add(d2.clone()).await?;

    let date = Utc.with_ymd_and_hms(2026, 3, 9, 8, 0, 0).unwrap();
    let l1 = service.add(lesson(d1.discipline_id, date)).await?;
    let l2 = service.add(lesson(d2.discipline_id, date)).await?;

    let joined = service
        .find_all_by_discipline_ids(&idlist::join(&[d1.discipline_id, d2.discipline_id]))
        .await?;

    assert_eq!(joined.len(), 2);
    let for_l1 = joined.iter().find(|j| j.lesson == l1).expect("l1 present");
    assert_eq!(for_l1.discipline, d1);
    let for_l2 = joined.iter().find(|j| j.lesson == l2).expect("l2 present");
    assert_eq!(for_l2.discipline, d2);
    Ok(())
}

#[tokio::test]
async fn update_missing_lesson_is_not_found_and_delete_is_noop() -> Result<()> {
    let lessons = Arc::new(MemLessons::default());
    let service = LessonService::new(
        lessons,
        Arc::new(MemDisciplines::default()),
        Arc::new(StubRecordings),
    );

    let date = Utc.with_ymd_and_hms(2026, 3, 9, 8, 0, 0).unwrap();
    let err = service.update(lesson(Uuid::new_v4(), date)).await.unwrap_err();
    assert_eq!(err.http_status(), 404);

    service.delete(Uuid::new_v4()).await?;
    Ok(())
}

#[tokio::test]
async fn coordinator_auth_issues_coordinator_token() -> Result<()> {
    let repo = Arc::new(MemCoordinators::default());
    let coordinator = Coordinator {
        coordinator_id: Uuid::new_v4(),
        name: "Ana Souza".to_string(),
        email: "ana@example.edu".to_string(),
        course_id: Uuid::new_v4(),
    };
    repo.rows.lock().push(coordinator.clone());
    let service = CoordinatorService::new(repo, settings());

    let auth = service.auth("ANA@example.edu").await?;
    assert_eq!(auth.coordinator_id, coordinator.coordinator_id);

    let principal = validate_token(&settings(), &auth.token)?;
    assert_eq!(principal.user_id, coordinator.coordinator_id);
    assert_eq!(principal.role, UserRole::Coordinator);
    Ok(())
}
