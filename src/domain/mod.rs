//! Domain entities shared by the business services and the identity layer.

mod models;

pub use models::{
    ClassShift, Coordinator, Discipline, Lesson, LessonWithDiscipline, Student,
    StudentWithDisciplines,
};
