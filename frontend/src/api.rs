//! 浏览器环境下的 API 客户端
//!
//! 刷新拦截逻辑在 `lectern_shared::client` 中，这里只负责装配浏览器适配器。

use futures::future::try_join;
use lectern_shared::client::ApiClient;
use lectern_shared::protocol::{GetCourseRequest, ListCourseChaptersRequest};
use lectern_shared::{ApiResult, Chapter, Course, CourseId, sort_chapters};
use leptos::prelude::*;

use crate::config::AppConfig;
use crate::web::router::LocationRedirect;
use crate::web::{CookieTokens, FetchTransport};

pub type Api = ApiClient<FetchTransport, CookieTokens, LocationRedirect>;

pub fn create_api(config: &AppConfig) -> Api {
    ApiClient::new(&config.api_url, FetchTransport, CookieTokens, LocationRedirect)
}

/// 从 Context 获取 API 客户端
pub fn use_api() -> Api {
    use_context::<Api>().expect("Api should be provided")
}

/// 并行加载课程与其章节，两者都成功后才返回；章节按 `order` 排序
pub async fn load_course_with_chapters(api: &Api, id: CourseId) -> ApiResult<(Course, Vec<Chapter>)> {
    let (course, chapters) = try_join(
        api.send(&GetCourseRequest { id }),
        api.send(&ListCourseChaptersRequest { course_id: id }),
    )
    .await?;

    let mut chapters = chapters.into_vec();
    sort_chapters(&mut chapters);
    Ok((course, chapters))
}
