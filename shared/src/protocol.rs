use crate::{
    Chapter, ChapterId, Content, Course, CourseId, Enrollment, Role, TokenPair, User, Visibility,
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }

    fn carries_body(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put)
    }
}

/// A trait that defines the request-response relationship and metadata for an API endpoint.
pub trait ApiRequest: Serialize {
    /// The response type returned by this request.
    type Response: DeserializeOwned;
    /// The HTTP method.
    const METHOD: HttpMethod;
    /// Sent without a bearer token and never intercepted for a token refresh.
    const ANONYMOUS: bool = false;

    /// The URL path relative to the API base, with leading and trailing slash.
    fn path(&self) -> String;

    /// JSON body. POST and PUT serialize `self`; other methods send nothing.
    fn body(&self) -> Result<Option<String>, serde_json::Error> {
        if Self::METHOD.carries_body() {
            serde_json::to_string(self).map(Some)
        } else {
            Ok(None)
        }
    }
}

/// List endpoints return either a bare array or a paginated envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ListResponse<T> {
    Plain(Vec<T>),
    Paginated {
        results: Vec<T>,
        #[serde(default)]
        count: Option<u64>,
        #[serde(default)]
        next: Option<String>,
        #[serde(default)]
        previous: Option<String>,
    },
}

impl<T> ListResponse<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            ListResponse::Paginated { results, .. } => results,
            ListResponse::Plain(items) => items,
        }
    }
}

impl<T> From<ListResponse<T>> for Vec<T> {
    fn from(list: ListResponse<T>) -> Self {
        list.into_vec()
    }
}

// =========================================================
// Authentication
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: User,
    pub access: String,
    pub refresh: String,
}

impl AuthResponse {
    pub fn tokens(&self) -> TokenPair {
        TokenPair {
            access: self.access.clone(),
            refresh: self.refresh.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl ApiRequest for LoginRequest {
    type Response = AuthResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    const ANONYMOUS: bool = true;

    fn path(&self) -> String {
        "/login/".to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
    pub password2: String,
    pub role: Role,
}

impl ApiRequest for RegisterRequest {
    type Response = AuthResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    const ANONYMOUS: bool = true;

    fn path(&self) -> String {
        "/register/".to_string()
    }
}

/// Sent by the client itself when an access token expires.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshTokenResponse {
    pub access: String,
    /// Present only when the backend rotates refresh tokens.
    #[serde(default)]
    pub refresh: Option<String>,
}

pub const REFRESH_PATH: &str = "/token/refresh/";

// =========================================================
// Courses
// =========================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct ListCoursesRequest;

impl ApiRequest for ListCoursesRequest {
    type Response = ListResponse<Course>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/courses/".to_string()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GetCourseRequest {
    #[serde(skip)]
    pub id: CourseId,
}

impl ApiRequest for GetCourseRequest {
    type Response = Course;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        format!("/courses/{}/", self.id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCourseRequest {
    pub title: String,
    pub description: String,
}

impl ApiRequest for CreateCourseRequest {
    type Response = Course;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/courses/".to_string()
    }
}

/// Full-record replace of a course.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateCourseRequest {
    #[serde(skip)]
    pub id: CourseId,
    pub title: String,
    pub description: String,
}

impl ApiRequest for UpdateCourseRequest {
    type Response = Course;
    const METHOD: HttpMethod = HttpMethod::Put;

    fn path(&self) -> String {
        format!("/courses/{}/", self.id)
    }
}

/// Body of a join response; the backend reports duplicates here too.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinCourseResponse {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JoinCourseRequest {
    #[serde(skip)]
    pub id: CourseId,
}

impl ApiRequest for JoinCourseRequest {
    type Response = Option<JoinCourseResponse>;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        format!("/courses/{}/join/", self.id)
    }

    fn body(&self) -> Result<Option<String>, serde_json::Error> {
        Ok(None)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListCourseChaptersRequest {
    #[serde(skip)]
    pub course_id: CourseId,
}

impl ApiRequest for ListCourseChaptersRequest {
    type Response = ListResponse<Chapter>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        format!("/courses/{}/chapters/", self.course_id)
    }
}

// =========================================================
// Chapters
// =========================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct ListChaptersRequest;

impl ApiRequest for ListChaptersRequest {
    type Response = ListResponse<Chapter>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/chapters/".to_string()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GetChapterRequest {
    #[serde(skip)]
    pub id: ChapterId,
}

impl ApiRequest for GetChapterRequest {
    type Response = Chapter;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        format!("/chapters/{}/", self.id)
    }
}

/// Editable fields of a chapter, shared by create and full-record update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChapterFields {
    pub course: CourseId,
    pub title: String,
    pub content: Content,
    pub visibility: Visibility,
    pub order: i32,
}

impl From<&Chapter> for ChapterFields {
    fn from(chapter: &Chapter) -> Self {
        Self {
            course: chapter.course,
            title: chapter.title.clone(),
            content: chapter.content.clone(),
            visibility: chapter.visibility,
            order: chapter.order,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateChapterRequest {
    #[serde(flatten)]
    pub fields: ChapterFields,
}

impl ApiRequest for CreateChapterRequest {
    type Response = Chapter;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/chapters/".to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateChapterRequest {
    #[serde(skip)]
    pub id: ChapterId,
    #[serde(flatten)]
    pub fields: ChapterFields,
}

impl ApiRequest for UpdateChapterRequest {
    type Response = Chapter;
    const METHOD: HttpMethod = HttpMethod::Put;

    fn path(&self) -> String {
        format!("/chapters/{}/", self.id)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteChapterRequest {
    #[serde(skip)]
    pub id: ChapterId,
}

impl ApiRequest for DeleteChapterRequest {
    type Response = ();
    const METHOD: HttpMethod = HttpMethod::Delete;

    fn path(&self) -> String {
        format!("/chapters/{}/", self.id)
    }
}

// =========================================================
// Enrollments
// =========================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct ListEnrollmentsRequest;

impl ApiRequest for ListEnrollmentsRequest {
    type Response = ListResponse<Enrollment>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/enrollments/".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use serde_json::json;

    #[test]
    fn test_list_response_accepts_both_shapes() {
        let plain: ListResponse<u32> = serde_json::from_value(json!([1, 2, 3])).unwrap();
        assert_eq!(plain.into_vec(), vec![1, 2, 3]);

        let paged: ListResponse<u32> = serde_json::from_value(json!({
            "count": 2, "next": null, "previous": null, "results": [4, 5]
        }))
        .unwrap();
        assert_eq!(paged.into_vec(), vec![4, 5]);
    }

    #[test]
    fn test_path_ids_are_not_serialized_into_body() {
        let req = UpdateCourseRequest {
            id: 42,
            title: "Intro".to_string(),
            description: String::new(),
        };
        assert_eq!(req.path(), "/courses/42/");
        let body: serde_json::Value = serde_json::from_str(&req.body().unwrap().unwrap()).unwrap();
        assert_eq!(body, json!({"title": "Intro", "description": ""}));
    }

    #[test]
    fn test_get_and_delete_send_no_body() {
        assert_eq!(GetCourseRequest { id: 1 }.body().unwrap(), None);
        assert_eq!(DeleteChapterRequest { id: 1 }.body().unwrap(), None);
        assert_eq!(JoinCourseRequest { id: 1 }.body().unwrap(), None);
    }

    #[test]
    fn test_update_chapter_body_carries_full_record() {
        let req = UpdateChapterRequest {
            id: 9,
            fields: ChapterFields {
                course: 1,
                title: "One".to_string(),
                content: Content::Document(Document::empty()),
                visibility: Visibility::Private,
                order: 3,
            },
        };
        let body: serde_json::Value = serde_json::from_str(&req.body().unwrap().unwrap()).unwrap();
        assert_eq!(
            body,
            json!({
                "course": 1,
                "title": "One",
                "content": [{"type": "p", "children": [{"text": ""}]}],
                "visibility": "private",
                "order": 3
            })
        );
    }

    #[test]
    fn test_register_serializes_role_lowercase() {
        let req = RegisterRequest {
            email: "a@b.c".to_string(),
            username: "a".to_string(),
            password: "pw".to_string(),
            password2: "pw".to_string(),
            role: Role::Instructor,
        };
        let body: serde_json::Value = serde_json::from_str(&req.body().unwrap().unwrap()).unwrap();
        assert_eq!(body["role"], "instructor");
        assert!(RegisterRequest::ANONYMOUS);
        assert!(!ListCoursesRequest::ANONYMOUS);
    }
}
