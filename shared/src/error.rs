use std::collections::BTreeMap;

use serde_json::Value;
use thiserror::Error;

// =========================================================
// 传输层错误
// =========================================================

/// 请求未能到达服务器（或响应无法读取）
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("failed to build request: {0}")]
    RequestBuild(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("failed to read response: {0}")]
    ResponseRead(String),
}

// =========================================================
// 核心错误类型
// =========================================================

/// API 调用失败的分类
///
/// 页面组件在本地捕获这些错误并渲染内联消息，不会冒泡到全局处理器。
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// 请求从未到达服务器
    #[error("network error: {0}")]
    Network(String),
    /// 401：凭据无效或已过期（刷新失败后同样归为此类）
    #[error("authentication failed: {message}")]
    Authentication { message: String },
    /// 403
    #[error("permission denied: {message}")]
    Forbidden { message: String },
    /// 4xx 且带有字段级错误
    #[error("validation failed: {message}")]
    Validation {
        message: String,
        fields: BTreeMap<String, Vec<String>>,
    },
    /// 404
    #[error("not found: {message}")]
    NotFound { message: String },
    #[error("server error {status}: {message}")]
    Server { status: u16, message: String },
    #[error("failed to decode response: {0}")]
    Decode(String),
    #[error("failed to encode request: {0}")]
    Encode(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl From<TransportError> for ApiError {
    fn from(e: TransportError) -> Self {
        ApiError::Network(e.to_string())
    }
}

impl ApiError {
    /// 根据非 2xx 响应构造错误
    pub fn from_response(status: u16, body: &str) -> Self {
        let parsed: Option<Value> = serde_json::from_str(body).ok();
        let fields = parsed.as_ref().map(field_errors).unwrap_or_default();
        let message = parsed
            .as_ref()
            .and_then(backend_message)
            .or_else(|| first_field_message(&fields))
            .unwrap_or_default();

        match status {
            401 => ApiError::Authentication { message },
            403 => ApiError::Forbidden { message },
            404 => ApiError::NotFound { message },
            400..=499 if status != 408 && status != 429 => ApiError::Validation { message, fields },
            _ => ApiError::Server { status, message },
        }
    }

    /// 后端返回的可读消息（如果有）
    pub fn server_message(&self) -> Option<&str> {
        let message = match self {
            ApiError::Authentication { message }
            | ApiError::Forbidden { message }
            | ApiError::Validation { message, .. }
            | ApiError::NotFound { message }
            | ApiError::Server { message, .. } => message.as_str(),
            ApiError::Network(_) | ApiError::Decode(_) | ApiError::Encode(_) => return None,
        };
        (!message.is_empty()).then_some(message)
    }

    /// 用于界面显示：优先使用后端消息，否则使用页面提供的默认文案
    pub fn user_message(&self, fallback: &str) -> String {
        self.server_message().unwrap_or(fallback).to_string()
    }

    /// 字段级错误（仅 Validation）
    pub fn field_errors(&self) -> Option<&BTreeMap<String, Vec<String>>> {
        match self {
            ApiError::Validation { fields, .. } if !fields.is_empty() => Some(fields),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound { .. })
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation {
            message: message.into(),
            fields: BTreeMap::new(),
        }
    }
}

const MESSAGE_KEYS: [&str; 3] = ["error", "detail", "message"];

fn backend_message(body: &Value) -> Option<String> {
    match body {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Object(map) => MESSAGE_KEYS
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_str))
            .filter(|s| !s.is_empty())
            .map(str::to_string),
        _ => None,
    }
}

/// 解析 `{"field": ["msg", ...]}` 或 `{"field": "msg"}` 形式的字段错误
fn field_errors(body: &Value) -> BTreeMap<String, Vec<String>> {
    let Value::Object(map) = body else {
        return BTreeMap::new();
    };

    map.iter()
        .filter(|(key, _)| !MESSAGE_KEYS.contains(&key.as_str()))
        .filter_map(|(key, value)| {
            let messages: Vec<String> = match value {
                Value::String(s) => vec![s.clone()],
                Value::Array(items) => items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect(),
                _ => Vec::new(),
            };
            (!messages.is_empty()).then(|| (key.clone(), messages))
        })
        .collect()
}

fn first_field_message(fields: &BTreeMap<String, Vec<String>>) -> Option<String> {
    if let Some(messages) = fields.get("non_field_errors") {
        return messages.first().cloned();
    }
    fields
        .iter()
        .find_map(|(field, messages)| messages.first().map(|m| format!("{}: {}", field, m)))
}
