//! 路由定义模块 - 领域模型
//!
//! 这是纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。
//! 定义了应用的所有路由及其访问规则。

use std::fmt::Display;

use lectern_shared::{ChapterId, CourseId, Role};

/// 连续重定向的上限
const MAX_REDIRECTS: usize = 4;

/// 应用路由枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppRoute {
    /// 首页：按角色分流
    #[default]
    Home,
    Login,
    Register,
    InstructorCourses,
    CreateCourse,
    InstructorCourse(CourseId),
    EditCourse(CourseId),
    CreateChapter(CourseId),
    EditChapter(ChapterId),
    StudentCourses,
    StudentCourse(CourseId),
    Enrolled,
    StudentChapter(ChapterId),
    /// 页面未找到
    NotFound,
}

fn parse_id(segment: &str, route: fn(u64) -> AppRoute) -> AppRoute {
    segment.parse().map(route).unwrap_or(AppRoute::NotFound)
}

impl AppRoute {
    /// 将 URL path 解析为路由枚举，末尾的 `/` 可有可无
    pub fn from_path(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Self::Home,
            ["login"] => Self::Login,
            ["register"] => Self::Register,
            ["instructor", "courses"] => Self::InstructorCourses,
            ["instructor", "courses", "create"] => Self::CreateCourse,
            ["instructor", "courses", id] => parse_id(id, Self::InstructorCourse),
            ["instructor", "courses", id, "edit"] => parse_id(id, Self::EditCourse),
            ["instructor", "courses", id, "chapters", "create"] => {
                parse_id(id, Self::CreateChapter)
            }
            ["instructor", "chapters", id, "edit"] => parse_id(id, Self::EditChapter),
            ["student", "courses"] => Self::StudentCourses,
            ["student", "courses", id] => parse_id(id, Self::StudentCourse),
            ["student", "enrolled"] => Self::Enrolled,
            ["student", "chapters", id] => parse_id(id, Self::StudentChapter),
            _ => Self::NotFound,
        }
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> String {
        match self {
            Self::Home => "/".to_string(),
            Self::Login => "/login".to_string(),
            Self::Register => "/register".to_string(),
            Self::InstructorCourses => "/instructor/courses".to_string(),
            Self::CreateCourse => "/instructor/courses/create".to_string(),
            Self::InstructorCourse(id) => format!("/instructor/courses/{}", id),
            Self::EditCourse(id) => format!("/instructor/courses/{}/edit", id),
            Self::CreateChapter(id) => format!("/instructor/courses/{}/chapters/create", id),
            Self::EditChapter(id) => format!("/instructor/chapters/{}/edit", id),
            Self::StudentCourses => "/student/courses".to_string(),
            Self::StudentCourse(id) => format!("/student/courses/{}", id),
            Self::Enrolled => "/student/enrolled".to_string(),
            Self::StudentChapter(id) => format!("/student/chapters/{}", id),
            Self::NotFound => "/404".to_string(),
        }
    }

    /// **核心守卫逻辑：定义该路由要求的角色**
    pub fn required_role(&self) -> Option<Role> {
        match self {
            Self::InstructorCourses
            | Self::CreateCourse
            | Self::InstructorCourse(_)
            | Self::EditCourse(_)
            | Self::CreateChapter(_)
            | Self::EditChapter(_) => Some(Role::Instructor),
            Self::StudentCourses
            | Self::StudentCourse(_)
            | Self::Enrolled
            | Self::StudentChapter(_) => Some(Role::Student),
            Self::Home | Self::Login | Self::Register | Self::NotFound => None,
        }
    }

    /// 已登录用户不应停留的页面
    pub fn is_guest_only(&self) -> bool {
        matches!(self, Self::Login | Self::Register)
    }

    /// 各角色的首页
    pub fn home_for(role: Role) -> Self {
        match role {
            Role::Instructor => Self::InstructorCourses,
            Role::Student => Self::StudentCourses,
        }
    }

    /// 单步守卫：返回需要重定向到的路由
    ///
    /// 未登录访问受保护页面去登录页，角色不符回到首页。
    pub fn guard(&self, role: Option<Role>) -> Option<Self> {
        match (self, role) {
            (Self::Home, None) => Some(Self::Login),
            (Self::Home, Some(role)) => Some(Self::home_for(role)),
            (route, Some(role)) if route.is_guest_only() => Some(Self::home_for(role)),
            _ => match (self.required_role(), role) {
                (Some(_), None) => Some(Self::Login),
                (Some(required), Some(role)) if required != role => Some(Self::Home),
                _ => None,
            },
        }
    }

    /// 沿守卫链解析出最终可渲染的路由
    pub fn resolve(self, role: Option<Role>) -> Self {
        let mut route = self;
        for _ in 0..MAX_REDIRECTS {
            match route.guard(role) {
                Some(next) => route = next,
                None => break,
            }
        }
        route
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_round_trip() {
        let routes = [
            AppRoute::Home,
            AppRoute::Login,
            AppRoute::Register,
            AppRoute::InstructorCourses,
            AppRoute::CreateCourse,
            AppRoute::InstructorCourse(3),
            AppRoute::EditCourse(3),
            AppRoute::CreateChapter(3),
            AppRoute::EditChapter(8),
            AppRoute::StudentCourses,
            AppRoute::StudentCourse(3),
            AppRoute::Enrolled,
            AppRoute::StudentChapter(8),
        ];
        for route in routes {
            assert_eq!(AppRoute::from_path(&route.to_path()), route);
        }
    }

    #[test]
    fn test_from_path_tolerates_trailing_slash_and_query() {
        assert_eq!(
            AppRoute::from_path("/instructor/courses/12/"),
            AppRoute::InstructorCourse(12)
        );
        assert_eq!(
            AppRoute::from_path("/student/courses?page=2"),
            AppRoute::StudentCourses
        );
    }

    #[test]
    fn test_invalid_ids_and_unknown_paths_are_not_found() {
        assert_eq!(AppRoute::from_path("/student/chapters/abc"), AppRoute::NotFound);
        assert_eq!(AppRoute::from_path("/admin"), AppRoute::NotFound);
        assert_eq!(AppRoute::from_path("/instructor/courses/-1"), AppRoute::NotFound);
    }

    #[test]
    fn test_anonymous_is_sent_to_login() {
        assert_eq!(AppRoute::InstructorCourse(1).resolve(None), AppRoute::Login);
        assert_eq!(AppRoute::Enrolled.resolve(None), AppRoute::Login);
        assert_eq!(AppRoute::Home.resolve(None), AppRoute::Login);
        assert_eq!(AppRoute::Register.resolve(None), AppRoute::Register);
    }

    #[test]
    fn test_student_on_instructor_route_goes_home_first() {
        let route = AppRoute::EditChapter(4);
        assert_eq!(route.guard(Some(Role::Student)), Some(AppRoute::Home));
        assert_eq!(route.resolve(Some(Role::Student)), AppRoute::StudentCourses);
    }

    #[test]
    fn test_instructor_on_student_route_is_redirected() {
        assert_eq!(
            AppRoute::StudentChapter(2).resolve(Some(Role::Instructor)),
            AppRoute::InstructorCourses
        );
    }

    #[test]
    fn test_signed_in_users_leave_login_and_register() {
        assert_eq!(
            AppRoute::Login.resolve(Some(Role::Instructor)),
            AppRoute::InstructorCourses
        );
        assert_eq!(
            AppRoute::Register.resolve(Some(Role::Student)),
            AppRoute::StudentCourses
        );
    }

    #[test]
    fn test_matching_role_and_public_routes_are_allowed() {
        assert_eq!(AppRoute::CreateChapter(1).guard(Some(Role::Instructor)), None);
        assert_eq!(AppRoute::StudentCourse(1).guard(Some(Role::Student)), None);
        assert_eq!(AppRoute::NotFound.guard(None), None);
    }
}
