//! Business services: pass-through CRUD over the repository seams, with the
//! light validation and in-memory joins the domain needs. Storage, email and
//! the recording API stay behind traits.

mod coordinators;
mod disciplines;
mod lessons;
mod repos;
mod students;

pub use coordinators::CoordinatorService;
pub use disciplines::DisciplineService;
pub use lessons::LessonService;
pub use repos::{
    CoordinatorRepository, DisciplineRepository, EmailSender, LessonRepository,
    RecordingInfoProvider, StudentRepository,
};
pub use students::StudentService;
