//! 运行时配置
//!
//! API 地址在构建时通过 `LECTERN_API_URL` 注入，未定义时使用本地开发地址。

/// 默认值，如果构建环境中没有定义 `LECTERN_API_URL`，则使用该值
const DEFAULT_API_URL: &str = "http://localhost:8000/api";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub api_url: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::with_api_url(option_env!("LECTERN_API_URL"))
    }

    fn with_api_url(url: Option<&str>) -> Self {
        let url = url
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .unwrap_or(DEFAULT_API_URL);
        Self {
            api_url: url.trim_end_matches('/').to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_api_url() {
        assert_eq!(AppConfig::with_api_url(None).api_url, DEFAULT_API_URL);
        assert_eq!(AppConfig::with_api_url(Some("  ")).api_url, DEFAULT_API_URL);
    }

    #[test]
    fn test_custom_api_url_is_trimmed() {
        let config = AppConfig::with_api_url(Some("https://lms.example.com/api/ "));
        assert_eq!(config.api_url, "https://lms.example.com/api");
    }
}
