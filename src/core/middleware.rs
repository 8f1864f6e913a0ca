//! 核心中间件模块

use std::{sync::Arc, time::Instant};

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use tracing::info;

use super::error::CoreError;

/// 请求头中携带 API key 的字段
pub const API_KEY_HEADER: &str = "x-api-key";

/// 请求日志中间件，每个请求结束后记录一条结构化日志
pub async fn request_logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    let query = req.uri().query().map(str::to_owned);
    let user_agent = req
        .headers()
        .get(header::USER_AGENT)
        .and_then(|h| h.to_str().ok())
        .map(str::to_owned);

    let response = next.run(req).await;
    let status = response.status();

    info!(
        method = %method,
        path = %path,
        query = query.as_deref().unwrap_or(""),
        status = status.as_u16(),
        latency_ms = start.elapsed().as_millis() as u64,
        user_agent = user_agent.as_deref().unwrap_or("-"),
        "请求完成"
    );

    response
}

/// 期望的 API key
#[derive(Clone)]
pub struct ApiKey(pub Arc<str>);

impl ApiKey {
    pub fn new(key: impl Into<Arc<str>>) -> Self {
        Self(key.into())
    }
}

/// API key 认证中间件
pub async fn require_api_key(
    State(expected): State<ApiKey>,
    req: Request,
    next: Next,
) -> Result<Response, CoreError> {
    let provided = req
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|h| h.to_str().ok());

    match provided {
        Some(key) if key == &*expected.0 => Ok(next.run(req).await),
        _ => Err(CoreError::Unauthorized(
            "Unauthorized: Invalid or missing API key".to_string(),
        )),
    }
}
