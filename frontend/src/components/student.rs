//! 学生端页面

mod chapter;
mod course_detail;
mod courses;
mod enrolled;

pub use chapter::StudentChapterPage;
pub use course_detail::StudentCoursePage;
pub use courses::StudentCoursesPage;
pub use enrolled::EnrolledPage;
