//! API 客户端
//!
//! 所有请求都经过 `ApiClient::call`：拼接地址、附加 Bearer 令牌、
//! 解析统一的响应信封，并在这里（且只在这里）处理 401。

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult, ErrorKind};
use crate::session::SessionStore;
use crate::transport::{HttpRequest, HttpResponse, HttpTransport};
use ideahub_shared::protocol::{ApiRequest, ResponseData};
use ideahub_shared::{Envelope, HEADER_AUTHORIZATION, HEADER_CONTENT_TYPE};
use log::debug;
use serde_json::Value;
use std::rc::Rc;

pub struct ApiClient<T> {
    base_url: Rc<str>,
    transport: Rc<T>,
    session: SessionStore,
}

// 手动实现，避免要求 T: Clone
impl<T> Clone for ApiClient<T> {
    fn clone(&self) -> Self {
        Self {
            base_url: self.base_url.clone(),
            transport: self.transport.clone(),
            session: self.session.clone(),
        }
    }
}

impl<T: HttpTransport> ApiClient<T> {
    pub fn new(config: &ClientConfig, transport: Rc<T>, session: SessionStore) -> Self {
        let base_url = config.api_base.trim_end_matches('/');
        Self {
            base_url: Rc::from(base_url),
            transport,
            session,
        }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    fn build<R: ApiRequest>(&self, req: &R) -> ClientResult<HttpRequest> {
        let mut http = HttpRequest::new(&self.url(&req.path()), R::METHOD);

        if R::METHOD.has_body() {
            let body = serde_json::to_value(req)?;
            http = http
                .with_header(HEADER_CONTENT_TYPE, "application/json")
                .with_body(body);
        }

        if R::AUTHENTICATED {
            if let Some(token) = self.session.token() {
                http = http.with_header(HEADER_AUTHORIZATION, &format!("Bearer {}", token));
            }
        }

        Ok(http)
    }

    /// 发送请求并返回信封中的 `data`
    pub async fn call<R: ApiRequest>(&self, req: &R) -> ClientResult<R::Response> {
        self.call_with_message(req).await.map(|reply| reply.data)
    }

    /// 同 `call`，额外保留信封中的 `message`
    pub async fn call_with_message<R: ApiRequest>(&self, req: &R) -> ClientResult<Reply<R::Response>> {
        let http = self.build(req)?;
        let (method, path) = (R::METHOD.as_str(), req.path());
        debug!("[Api] {} {}", method, path);

        let resp = self
            .transport
            .send(http)
            .await
            .map_err(|e| ClientError::from(e).in_op_with("api.call", format!("{} {}", method, path)))?;

        self.handle::<R>(resp)
            .map_err(|e| e.in_op_with("api.call", format!("{} {}", method, path)))
    }

    fn handle<R: ApiRequest>(&self, resp: HttpResponse) -> ClientResult<Reply<R::Response>> {
        let message = server_message(&resp.body);

        if resp.status == 401 {
            if R::AUTHENTICATED {
                // 全局唯一的 401 处理点：清除会话并回到登录页
                self.session.expire();
                return Err(error_with(ErrorKind::SessionExpired, message, "Session expired"));
            }
            return Err(error_with(
                ErrorKind::InvalidCredentials,
                message,
                "Invalid email or password",
            ));
        }

        if !resp.ok() {
            let fallback = format!("Request failed with status {}", resp.status);
            return Err(error_with(ErrorKind::from_status(resp.status), message, &fallback));
        }

        let envelope: Envelope<Value> = if resp.body.trim().is_empty() {
            Envelope {
                success: true,
                data: None,
                message: None,
            }
        } else {
            serde_json::from_str(&resp.body)?
        };

        if !envelope.success {
            return Err(error_with(
                ErrorKind::Rejected,
                envelope.message,
                "Request was not successful",
            ));
        }

        let data = match envelope.data {
            Some(Value::Null) | None => R::Response::absent()
                .ok_or_else(|| ClientError::serialization("Response carried no data"))?,
            Some(data) => serde_json::from_value(data)?,
        };
        Ok(Reply {
            data,
            message: envelope.message,
        })
    }
}

/// 成功响应：数据和可选的提示消息
#[derive(Debug)]
pub struct Reply<D> {
    pub data: D,
    pub message: Option<String>,
}

fn error_with(kind: ErrorKind, message: Option<String>, fallback: &str) -> ClientError {
    match message {
        Some(message) => ClientError::from_server(kind, message),
        None => ClientError::new(kind, fallback),
    }
}

/// 从错误响应体中取出服务端的 message
fn server_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}
