//! HTTP 传输层
//!
//! 基于 `gloo-net` 的 fetch 实现，供共享层的 `ApiClient` 使用。

use async_trait::async_trait;
use gloo_net::http::{Request, RequestBuilder};
use lectern_shared::client::{HttpRequest, HttpResponse, HttpTransport};
use lectern_shared::error::TransportError;
use lectern_shared::protocol::HttpMethod;

#[derive(Debug, Clone, Copy, Default)]
pub struct FetchTransport;

fn builder(method: HttpMethod, url: &str) -> RequestBuilder {
    match method {
        HttpMethod::Get => Request::get(url),
        HttpMethod::Post => Request::post(url),
        HttpMethod::Put => Request::put(url),
        HttpMethod::Delete => Request::delete(url),
    }
}

#[async_trait(?Send)]
impl HttpTransport for FetchTransport {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = builder(req.method, &req.url);
        for (key, value) in &req.headers {
            builder = builder.header(key, value);
        }

        let request = match req.body {
            Some(body) => builder.body(body),
            None => builder.build(),
        }
        .map_err(|e| TransportError::RequestBuild(e.to_string()))?;

        let response = request
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::ResponseRead(e.to_string()))?;

        Ok(HttpResponse { status, body })
    }
}
