//! 教师端页面

mod chapter_create;
mod chapter_edit;
mod course_detail;
mod course_form;
mod courses;

pub use chapter_create::CreateChapterPage;
pub use chapter_edit::EditChapterPage;
pub use course_detail::InstructorCoursePage;
pub use course_form::CourseFormPage;
pub use courses::InstructorCoursesPage;
