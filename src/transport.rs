use crate::error::TransportError;
use ideahub_shared::protocol::HttpMethod;
use std::collections::HashMap;

// =========================================================
// 核心抽象层 (HTTP Interface Abstraction)
// =========================================================

/// 通用 HTTP 请求结构
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: HashMap<String, String>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn new(url: &str, method: HttpMethod) -> Self {
        Self {
            url: url.to_string(),
            method,
            headers: HashMap::new(),
            body: None,
        }
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body.to_string());
        self
    }

    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.get(key).map(String::as_str)
    }
}

/// 通用 HTTP 响应结构
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP 传输特性 (Trait)
///
/// (?Send) 是因为浏览器环境下 fetch 相关类型不是 Send 的。
/// 浏览器实现基于 fetch，测试使用 MockTransport，原生环境可启用 reqwest 实现。
#[async_trait::async_trait(?Send)]
pub trait HttpTransport {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, TransportError>;
}

// =========================================================
// 实现层: reqwest 客户端 (Native)
// =========================================================

#[cfg(feature = "native")]
#[derive(Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

#[cfg(feature = "native")]
impl ReqwestTransport {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

#[cfg(feature = "native")]
#[async_trait::async_trait(?Send)]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, TransportError> {
        let method = match req.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.client.request(method, &req.url);

        for (k, v) in req.headers {
            builder = builder.header(k, v);
        }

        if let Some(body) = req.body {
            builder = builder.body(body);
        }

        let resp = builder
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .map_err(|e| TransportError::Body(e.to_string()))?;

        Ok(HttpResponse { status, body })
    }
}

// =========================================================
// 测试用 Mock 客户端
// =========================================================

#[cfg(test)]
pub mod tests {
    use super::*;
    use futures::channel::oneshot;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    pub const BASE: &str = "http://api.test";

    #[derive(Clone)]
    enum Canned {
        Respond(u16, String),
        Fail(TransportError),
    }

    type Key = (&'static str, String);

    fn key(method: HttpMethod, path: &str) -> Key {
        (method.as_str(), format!("{}{}", BASE, path))
    }

    /// 按「方法 + 路径」返回预设响应，并记录所有请求
    ///
    /// 同一路径预设多个响应时按顺序消费；队列耗尽后重复最后一次的响应。
    #[derive(Default)]
    pub struct MockTransport {
        pub requests: RefCell<Vec<HttpRequest>>,
        responses: RefCell<HashMap<Key, VecDeque<Canned>>>,
        served: RefCell<HashMap<Key, Canned>>,
        gates: RefCell<HashMap<Key, VecDeque<oneshot::Receiver<()>>>>,
    }

    impl MockTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn mock_response(&self, method: HttpMethod, path: &str, status: u16, body: serde_json::Value) {
            self.push(method, path, Canned::Respond(status, body.to_string()));
        }

        pub fn mock_raw(&self, method: HttpMethod, path: &str, status: u16, body: &str) {
            self.push(method, path, Canned::Respond(status, body.to_string()));
        }

        pub fn mock_failure(&self, method: HttpMethod, path: &str, error: TransportError) {
            self.push(method, path, Canned::Fail(error));
        }

        /// 让下一次匹配的请求挂起，直到返回的 Sender 被触发（或被丢弃）
        pub fn hold(&self, method: HttpMethod, path: &str) -> oneshot::Sender<()> {
            let (tx, rx) = oneshot::channel();
            self.gates
                .borrow_mut()
                .entry(key(method, path))
                .or_default()
                .push_back(rx);
            tx
        }

        /// 已发出请求的 "METHOD path" 列表
        pub fn calls(&self) -> Vec<String> {
            self.requests
                .borrow()
                .iter()
                .map(|r| {
                    format!(
                        "{} {}",
                        r.method.as_str(),
                        r.url.strip_prefix(BASE).unwrap_or(&r.url)
                    )
                })
                .collect()
        }

        pub fn last_request(&self) -> Option<HttpRequest> {
            self.requests.borrow().last().cloned()
        }

        fn push(&self, method: HttpMethod, path: &str, canned: Canned) {
            self.responses
                .borrow_mut()
                .entry(key(method, path))
                .or_default()
                .push_back(canned);
        }

        fn next_response(&self, key: &Key) -> Option<Canned> {
            let next = self
                .responses
                .borrow_mut()
                .get_mut(key)
                .and_then(|queue| queue.pop_front());
            match next {
                Some(canned) => {
                    self.served.borrow_mut().insert(key.clone(), canned.clone());
                    Some(canned)
                }
                None => self.served.borrow().get(key).cloned(),
            }
        }
    }

    #[async_trait::async_trait(?Send)]
    impl HttpTransport for MockTransport {
        async fn send(&self, req: HttpRequest) -> Result<HttpResponse, TransportError> {
            let key: Key = (req.method.as_str(), req.url.clone());
            self.requests.borrow_mut().push(req);

            let gate = self
                .gates
                .borrow_mut()
                .get_mut(&key)
                .and_then(|q| q.pop_front());
            if let Some(gate) = gate {
                let _ = gate.await;
            }

            match self.next_response(&key) {
                Some(Canned::Respond(status, body)) => Ok(HttpResponse { status, body }),
                Some(Canned::Fail(error)) => Err(error),
                None => Err(TransportError::Network(format!("no mock for {} {}", key.0, key.1))),
            }
        }
    }
}
