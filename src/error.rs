use std::fmt;

// =========================================================
// 错误分类
// =========================================================

/// 错误分类
///
/// 每一类对应界面上不同的处理方式：校验错误在本地拦截，
/// 会话失效由客户端统一清理，其余转换为行内提示。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// 本地校验失败，请求从未发出
    Validation,
    /// 登录/注册接口返回 401：账号或密码错误
    InvalidCredentials,
    /// 已认证请求返回 401：会话过期或缺失
    SessionExpired,
    /// 403: 角色无权执行该操作
    Forbidden,
    /// 404: 资源未找到
    NotFound,
    /// 409: 资源冲突（如标题重复）
    Conflict,
    /// 400: 服务端校验失败
    InvalidInput,
    /// 2xx 但信封中 `success: false`
    Rejected,
    /// 其他非 2xx 响应
    Server,
    /// 网络层失败，没有拿到响应
    Network,
    /// 响应体无法解析
    Serialization,
}

impl ErrorKind {
    /// 根据 HTTP 状态码归类（401 需要结合请求是否已认证，由调用方决定）
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => ErrorKind::InvalidInput,
            401 => ErrorKind::SessionExpired,
            403 => ErrorKind::Forbidden,
            404 => ErrorKind::NotFound,
            409 => ErrorKind::Conflict,
            _ => ErrorKind::Server,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "VALIDATION",
            ErrorKind::InvalidCredentials => "INVALID_CREDENTIALS",
            ErrorKind::SessionExpired => "SESSION_EXPIRED",
            ErrorKind::Forbidden => "FORBIDDEN",
            ErrorKind::NotFound => "RESOURCE_NOT_FOUND",
            ErrorKind::Conflict => "RESOURCE_CONFLICT",
            ErrorKind::InvalidInput => "INVALID_INPUT",
            ErrorKind::Rejected => "REJECTED",
            ErrorKind::Server => "SERVER_ERROR",
            ErrorKind::Network => "NETWORK_ERROR",
            ErrorKind::Serialization => "BAD_RESPONSE",
        }
    }
}

// =========================================================
// 错误上下文追踪
// =========================================================

/// 结构化的错误追踪片段
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorSpan {
    /// 操作名称，如 "board.create", "chat.send"
    pub operation: String,
    pub detail: Option<String>,
}

impl ErrorSpan {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            detail: None,
        }
    }

    pub fn with_detail(operation: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            detail: Some(detail.into()),
        }
    }
}

// =========================================================
// 核心错误类型
// =========================================================

/// 客户端错误
///
/// - kind: 错误分类
/// - message: 面向用户的消息（优先使用服务端返回的 message）
/// - spans: 结构化的调用追踪栈
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientError {
    pub kind: ErrorKind,
    pub message: String,
    /// message 是否来自服务端响应
    from_server: bool,
    spans: Vec<ErrorSpan>,
}

impl ClientError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            from_server: false,
            spans: Vec::new(),
        }
    }

    /// 使用服务端返回的消息构造
    pub fn from_server(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            from_server: true,
            ..Self::new(kind, message)
        }
    }

    // --- Convenience constructors ---

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Network, message)
    }

    pub fn serialization(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Serialization, message)
    }

    // --- Context builders ---

    pub fn in_op(mut self, operation: impl Into<String>) -> Self {
        self.spans.push(ErrorSpan::new(operation));
        self
    }

    pub fn in_op_with(mut self, operation: impl Into<String>, detail: impl Into<String>) -> Self {
        self.spans.push(ErrorSpan::with_detail(operation, detail));
        self
    }

    // --- Accessors ---

    pub fn error_code(&self) -> &'static str {
        self.kind.error_code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// 服务端给出的消息；本地生成的通用消息返回 None
    pub fn server_message(&self) -> Option<&str> {
        self.from_server.then_some(self.message.as_str())
    }

    pub fn spans(&self) -> &[ErrorSpan] {
        &self.spans
    }

    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind == kind
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.error_code(), self.message)?;

        if !self.spans.is_empty() {
            write!(f, " | trace: ")?;
            for (i, span) in self.spans.iter().enumerate() {
                if i > 0 {
                    write!(f, " -> ")?;
                }
                write!(f, "{}", span.operation)?;
                if let Some(detail) = &span.detail {
                    write!(f, "({})", detail)?;
                }
            }
        }
        Ok(())
    }
}

impl std::error::Error for ClientError {}

pub type ClientResult<T> = std::result::Result<T, ClientError>;

// =========================================================
// 传输层错误
// =========================================================

/// HTTP 传输层错误（没有拿到可用响应）
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("request build failed: {0}")]
    RequestBuild(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("failed to read response body: {0}")]
    Body(String),
}

impl From<TransportError> for ClientError {
    fn from(e: TransportError) -> Self {
        ClientError::network(e.to_string())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_code_and_trace() {
        let err = ClientError::new(ErrorKind::Conflict, "duplicate title")
            .in_op("client.call")
            .in_op_with("board.create", "Solar kiosk");
        assert_eq!(
            err.to_string(),
            "[RESOURCE_CONFLICT] duplicate title | trace: client.call -> board.create(Solar kiosk)"
        );
        assert_eq!(err.spans().len(), 2);
    }

    #[test]
    fn status_mapping() {
        assert_eq!(ErrorKind::from_status(400), ErrorKind::InvalidInput);
        assert_eq!(ErrorKind::from_status(409), ErrorKind::Conflict);
        assert_eq!(ErrorKind::from_status(503), ErrorKind::Server);
    }

    #[test]
    fn transport_errors_become_network_errors() {
        let err: ClientError = TransportError::Network("offline".into()).into();
        assert!(err.is(ErrorKind::Network));
        assert_eq!(err.message(), "network error: offline");
        assert_eq!(err.server_message(), None);
    }

    #[test]
    fn server_messages_are_marked() {
        let err = ClientError::from_server(ErrorKind::NotFound, "Idea not found").in_op("board.delete");
        assert_eq!(err.server_message(), Some("Idea not found"));
    }
}
