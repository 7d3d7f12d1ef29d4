//! 页面与表单的状态机
//!
//! - 页面：`Loading -> Ready | NotFound | Failed`
//! - 表单：`Idle -> Submitting -> Idle | Failed`，失败后保留输入以便重试

use lectern_shared::ApiError;

#[derive(Debug, Clone, PartialEq)]
pub enum PageState<T> {
    Loading,
    Ready(T),
    NotFound,
    Failed(String),
}

impl<T> Default for PageState<T> {
    fn default() -> Self {
        PageState::Loading
    }
}

impl<T> PageState<T> {
    /// 由加载结果得到页面状态，`fallback` 为后端没有给出消息时的文案
    pub fn from_result(result: Result<T, ApiError>, fallback: &str) -> Self {
        match result {
            Ok(value) => PageState::Ready(value),
            Err(e) if e.is_not_found() => PageState::NotFound,
            Err(e) => {
                tracing::warn!(error = %e, "{}", fallback);
                PageState::Failed(e.user_message(fallback))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FormStatus {
    #[default]
    Idle,
    Submitting,
    Failed(String),
}

impl FormStatus {
    /// 进入提交状态；已经在提交中时返回 `false`
    pub fn begin(&mut self) -> bool {
        if self.is_submitting() {
            return false;
        }
        *self = FormStatus::Submitting;
        true
    }

    pub fn fail(&mut self, error: &ApiError, fallback: &str) {
        tracing::warn!(error = %error, "{}", fallback);
        *self = FormStatus::Failed(error.user_message(fallback));
    }

    pub fn fail_with(&mut self, message: impl Into<String>) {
        *self = FormStatus::Failed(message.into());
    }

    pub fn finish(&mut self) {
        *self = FormStatus::Idle;
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self, FormStatus::Submitting)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            FormStatus::Failed(message) => Some(message),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_state_starts_loading() {
        let state: PageState<u32> = PageState::default();
        assert_eq!(state, PageState::Loading);
    }

    #[test]
    fn test_page_state_from_ok() {
        let state = PageState::from_result(Ok(5), "Failed to load course");
        assert_eq!(state, PageState::Ready(5));
    }

    #[test]
    fn test_page_state_not_found_is_distinct() {
        let state: PageState<u32> = PageState::from_result(
            Err(ApiError::from_response(404, r#"{"detail": "Not found."}"#)),
            "Failed to load chapter",
        );
        assert_eq!(state, PageState::NotFound);
    }

    #[test]
    fn test_page_state_failure_prefers_backend_message() {
        let state: PageState<u32> = PageState::from_result(
            Err(ApiError::from_response(403, r#"{"error": "Not enrolled"}"#)),
            "Failed to load chapter",
        );
        assert_eq!(state, PageState::Failed("Not enrolled".to_string()));

        let state: PageState<u32> = PageState::from_result(
            Err(ApiError::Network("offline".to_string())),
            "Failed to load chapter",
        );
        assert_eq!(state, PageState::Failed("Failed to load chapter".to_string()));
    }

    #[test]
    fn test_form_status_transitions() {
        let mut status = FormStatus::default();
        assert!(status.begin());
        assert!(status.is_submitting());
        // 重复提交被拒绝
        assert!(!status.begin());

        status.fail(
            &ApiError::from_response(400, r#"{"title": ["This field is required."]}"#),
            "Failed to create course",
        );
        assert_eq!(status.error(), Some("title: This field is required."));

        // 失败后可以重新提交
        assert!(status.begin());
        status.finish();
        assert_eq!(status, FormStatus::Idle);
    }
}
