//! 带 Token 刷新拦截的 API 客户端
//!
//! 浏览器相关的部分（fetch、Cookie、页面跳转）通过三个 trait 注入，
//! 这样刷新策略可以在宿主机上用内存实现完整测试。

use std::cell::RefCell;
use std::rc::Rc;

use async_trait::async_trait;
use futures::future::{FutureExt, LocalBoxFuture, Shared};
use serde::de::DeserializeOwned;

use crate::error::{ApiError, ApiResult, TransportError};
use crate::protocol::{
    ApiRequest, HttpMethod, REFRESH_PATH, RefreshTokenRequest, RefreshTokenResponse,
};
use crate::{HEADER_AUTHORIZATION, TokenPair};

// =========================================================
// 核心抽象层 (HTTP Interface Abstraction)
// =========================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// 设置请求头，同名的旧值会被替换
    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(key));
        self.headers.push((key.to_string(), value.to_string()));
        self
    }

    pub fn with_json_body(self, body: String) -> Self {
        let mut req = self.with_header("Content-Type", "application/json");
        req.body = Some(body);
        req
    }

    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// 解析 JSON 响应体；空响应体按 `null` 处理
    pub fn json<T: DeserializeOwned>(&self) -> ApiResult<T> {
        let body = if self.body.trim().is_empty() {
            "null"
        } else {
            self.body.as_str()
        };
        serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[async_trait(?Send)]
pub trait HttpTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Access / Refresh Token 的持久化位置
pub trait TokenStore {
    fn access_token(&self) -> Option<String>;
    fn refresh_token(&self) -> Option<String>;
    fn store_tokens(&self, tokens: &TokenPair);
    fn store_access_token(&self, access: &str);
    fn clear_tokens(&self);
}

/// 刷新失败后把用户送回登录入口
pub trait LoginRedirect {
    fn redirect_to_login(&self);
}

// =========================================================
// 待发送请求
// =========================================================

/// 带有显式刷新标记的请求
///
/// 每个原始请求最多触发一次刷新：标记一旦置位，再次收到 401 直接返回。
#[derive(Debug, Clone)]
pub struct PendingRequest {
    request: HttpRequest,
    refresh_attempted: bool,
}

impl PendingRequest {
    pub fn new(request: HttpRequest) -> Self {
        Self {
            request,
            refresh_attempted: false,
        }
    }

    pub fn refresh_attempted(&self) -> bool {
        self.refresh_attempted
    }

    #[must_use]
    pub fn mark_refresh_attempted(self) -> Self {
        Self {
            refresh_attempted: true,
            ..self
        }
    }

    /// 附加当前的 Bearer Token（如果有）后得到实际发送的请求
    pub fn authorized(&self, access: Option<&str>) -> HttpRequest {
        match access {
            Some(token) => self
                .request
                .clone()
                .with_header(HEADER_AUTHORIZATION, &format!("Bearer {}", token)),
            None => self.request.clone(),
        }
    }
}

// =========================================================
// API Client
// =========================================================

/// 正在进行的 Token 刷新；同时收到 401 的请求共享这一次刷新
type InflightRefresh = Shared<LocalBoxFuture<'static, ApiResult<()>>>;

#[derive(Clone)]
pub struct ApiClient<T, S, R> {
    base_url: String,
    transport: T,
    tokens: S,
    redirect: R,
    refreshing: Rc<RefCell<Option<InflightRefresh>>>,
}

impl<T, S, R> ApiClient<T, S, R>
where
    T: HttpTransport + Clone + 'static,
    S: TokenStore + Clone + 'static,
    R: LoginRedirect,
{
    pub fn new(base_url: &str, transport: T, tokens: S, redirect: R) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            transport,
            tokens,
            redirect,
            refreshing: Rc::new(RefCell::new(None)),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn tokens(&self) -> &S {
        &self.tokens
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// 发送强类型请求并获取解析后的响应
    pub async fn send<Q: ApiRequest>(&self, req: &Q) -> ApiResult<Q::Response> {
        // 1. 序列化请求
        let body = req.body().map_err(|e| ApiError::Encode(e.to_string()))?;
        let path = req.path();

        // 2. 构造请求
        let mut request =
            HttpRequest::new(Q::METHOD, self.url(&path)).with_header("Accept", "application/json");
        if let Some(body) = body {
            request = request.with_json_body(body);
        }

        // 3. 发送（匿名请求不带 Token，也不参与刷新）
        let response = if Q::ANONYMOUS {
            self.transport.send(request).await?
        } else {
            self.execute(PendingRequest::new(request)).await?
        };

        // 4. 检查状态码
        if !response.is_success() {
            tracing::warn!(
                method = Q::METHOD.as_str(),
                path = %path,
                status = response.status,
                "api request failed"
            );
            return Err(ApiError::from_response(response.status, &response.body));
        }

        response.json()
    }

    async fn execute(&self, mut pending: PendingRequest) -> ApiResult<HttpResponse> {
        loop {
            let access = self.tokens.access_token();
            let request = pending.authorized(access.as_deref());
            tracing::debug!(
                method = request.method.as_str(),
                url = %request.url,
                authorized = access.is_some(),
                "sending request"
            );

            let response = self.transport.send(request).await?;
            if response.status != 401 || pending.refresh_attempted() {
                return Ok(response);
            }

            pending = pending.mark_refresh_attempted();
            if let Err(e) = self.refresh().await {
                tracing::warn!(error = %e, "token refresh failed, redirecting to login");
                self.tokens.clear_tokens();
                self.redirect.redirect_to_login();
                return Ok(response);
            }
            tracing::debug!("token refreshed, replaying request");
        }
    }

    /// 发起刷新，已有刷新在进行时加入它
    fn refresh(&self) -> InflightRefresh {
        let mut slot = self.refreshing.borrow_mut();
        if let Some(inflight) = slot.as_ref() {
            tracing::debug!("joining in-flight token refresh");
            return inflight.clone();
        }

        let transport = self.transport.clone();
        let tokens = self.tokens.clone();
        let url = self.url(REFRESH_PATH);
        let refreshing = Rc::clone(&self.refreshing);
        let inflight = async move {
            let result = refresh_tokens(&transport, &tokens, url).await;
            refreshing.borrow_mut().take();
            result
        }
        .boxed_local()
        .shared();

        *slot = Some(inflight.clone());
        inflight
    }
}

/// 用 Refresh Token 换取新的 Access Token
async fn refresh_tokens<T: HttpTransport, S: TokenStore>(
    transport: &T,
    tokens: &S,
    url: String,
) -> ApiResult<()> {
    let refresh = tokens
        .refresh_token()
        .ok_or_else(|| ApiError::Authentication {
            message: "no refresh token".to_string(),
        })?;

    let body = serde_json::to_string(&RefreshTokenRequest { refresh })
        .map_err(|e| ApiError::Encode(e.to_string()))?;
    let request = HttpRequest::new(HttpMethod::Post, url)
        .with_header("Accept", "application/json")
        .with_json_body(body);

    let response = transport.send(request).await?;
    if !response.is_success() {
        return Err(ApiError::from_response(response.status, &response.body));
    }

    let pair: RefreshTokenResponse = response.json()?;
    match pair.refresh {
        Some(refresh) => tokens.store_tokens(&TokenPair {
            access: pair.access,
            refresh,
        }),
        None => tokens.store_access_token(&pair.access),
    }
    Ok(())
}
