//! Lectern 共享层
//!
//! 与浏览器无关的部分都放在这里，可以直接在宿主机上测试：
//! - 领域模型（用户、课程、章节、选课记录）
//! - `protocol`: 强类型的 API 端点定义
//! - `client`: 带 Token 刷新拦截的 API 客户端
//! - `session`: 登录 / 注册 / 注销 / 会话恢复
//! - `document`: 章节富文本文档模型、渲染与编辑

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod client;
pub mod document;
pub mod error;
pub mod protocol;
pub mod session;

pub use document::Content;
pub use error::{ApiError, ApiResult};

// =========================================================
// 常量定义 (Constants)
// =========================================================

pub const COOKIE_ACCESS_TOKEN: &str = "access_token";
pub const COOKIE_REFRESH_TOKEN: &str = "refresh_token";
pub const STORAGE_USER_KEY: &str = "user";
pub const HEADER_AUTHORIZATION: &str = "Authorization";

// =========================================================
// 领域模型 (Domain Models)
// =========================================================

pub type UserId = u64;
pub type CourseId = u64;
pub type ChapterId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    Student,
    Instructor,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Instructor => "instructor",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub username: String,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub instructor: User,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Private => "private",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Visibility::Public => "Public",
            Visibility::Private => "Private",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "public" => Some(Visibility::Public),
            "private" => Some(Visibility::Private),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chapter {
    pub id: ChapterId,
    pub course: CourseId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course_title: Option<String>,
    pub title: String,
    #[serde(default)]
    pub content: Content,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: u64,
    pub student: User,
    pub course: Course,
    pub enrolled_at: DateTime<Utc>,
}

impl Enrollment {
    /// 选课日期（仅日期部分）
    pub fn enrolled_on(&self) -> String {
        self.enrolled_at.format("%Y-%m-%d").to_string()
    }
}

/// 登录 / 注册成功后返回的凭据
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// 按章节顺序排序，`order` 相同时保持原有顺序
pub fn sort_chapters(chapters: &mut [Chapter]) {
    chapters.sort_by_key(|c| c.order);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn instructor_json() -> serde_json::Value {
        json!({"id": 7, "email": "ada@example.com", "username": "ada", "role": "instructor"})
    }

    #[test]
    fn test_course_decodes_backend_payload() {
        let course: Course = serde_json::from_value(json!({
            "id": 1,
            "title": "Intro",
            "description": "",
            "instructor": instructor_json(),
            "created_at": "2024-03-01T10:00:00.123456Z",
            "updated_at": "2024-03-01T10:00:00Z"
        }))
        .unwrap();

        assert_eq!(course.title, "Intro");
        assert_eq!(course.instructor.role, Role::Instructor);
    }

    #[test]
    fn test_chapter_with_object_content_is_malformed_not_rejected() {
        let chapter: Chapter = serde_json::from_value(json!({
            "id": 3,
            "course": 1,
            "course_title": "Intro",
            "title": "Empty",
            "content": {},
            "visibility": "private",
            "order": 2,
            "created_at": "2024-03-01T10:00:00Z",
            "updated_at": "2024-03-01T10:00:00Z"
        }))
        .unwrap();

        assert!(matches!(chapter.content, Content::Malformed(_)));
        assert_eq!(chapter.visibility, Visibility::Private);
    }

    #[test]
    fn test_enrolled_on_formats_date_only() {
        let enrollment: Enrollment = serde_json::from_value(json!({
            "id": 1,
            "student": {"id": 2, "email": "s@example.com", "username": "s", "role": "student"},
            "course": {
                "id": 1, "title": "Intro", "description": "d",
                "instructor": instructor_json(),
                "created_at": "2024-03-01T10:00:00Z",
                "updated_at": "2024-03-01T10:00:00Z"
            },
            "enrolled_at": "2024-04-02T23:59:00Z"
        }))
        .unwrap();

        assert_eq!(enrollment.enrolled_on(), "2024-04-02");
    }

    #[test]
    fn test_sort_chapters_is_stable_by_order() {
        let make = |id: u64, order: i32| Chapter {
            id,
            course: 1,
            course_title: None,
            title: format!("c{}", id),
            content: Content::default(),
            visibility: Visibility::Public,
            order,
            created_at: DateTime::<Utc>::default(),
            updated_at: DateTime::<Utc>::default(),
        };
        let mut chapters = vec![make(1, 2), make(2, 0), make(3, 2), make(4, 1)];
        sort_chapters(&mut chapters);
        let ids: Vec<_> = chapters.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![2, 4, 1, 3]);
    }

    #[test]
    fn test_visibility_parse() {
        assert_eq!(Visibility::parse("public"), Some(Visibility::Public));
        assert_eq!(Visibility::parse("private"), Some(Visibility::Private));
        assert_eq!(Visibility::parse("hidden"), None);
    }
}
