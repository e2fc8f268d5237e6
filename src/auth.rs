//! 登录与注册
//!
//! 本地校验通过后才会发起请求；成功时把服务端签发的会话交给
//! `SessionStore`，由它负责持久化和按角色跳转。

use crate::client::ApiClient;
use crate::error::{ClientError, ClientResult, ErrorKind};
use crate::route::{AppRoute, Navigator};
use crate::transport::HttpTransport;
use ideahub_shared::{Credentials, RegisterForm, Session};
use log::{error, info};
use std::rc::Rc;

/// 注册结果
#[derive(Debug, Clone, PartialEq)]
pub enum RegisterOutcome {
    /// 服务端直接返回了会话，已登录
    SignedIn(Session),
    /// 注册成功但需要再登录一次，携带服务端的提示
    PendingLogin(Option<String>),
}

pub struct AuthService<T> {
    client: ApiClient<T>,
    navigator: Rc<dyn Navigator>,
}

impl<T> Clone for AuthService<T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            navigator: self.navigator.clone(),
        }
    }
}

impl<T: HttpTransport> AuthService<T> {
    pub fn new(client: ApiClient<T>, navigator: Rc<dyn Navigator>) -> Self {
        Self { client, navigator }
    }

    /// 登录
    ///
    /// 失败时不触碰现有会话；错误消息优先使用服务端返回的内容。
    pub async fn login(&self, credentials: Credentials) -> ClientResult<Session> {
        let credentials = Credentials {
            email: credentials.email.trim().to_string(),
            password: credentials.password,
        };
        if credentials.email.is_empty() || credentials.password.is_empty() {
            return Err(ClientError::validation("Please fill in all fields").in_op("auth.login"));
        }

        let session = match self.client.call(&credentials).await {
            Ok(session) if session.is_valid() => session,
            Ok(_) => {
                return Err(ClientError::new(ErrorKind::Serialization, "Login failed")
                    .in_op("auth.login"));
            }
            Err(e) => {
                error!("[Auth] Login failed: {}", e);
                return Err(login_failure(e).in_op("auth.login"));
            }
        };

        self.client.session().sign_in(session.clone());
        Ok(session)
    }

    /// 注册
    pub async fn register(&self, form: RegisterForm) -> ClientResult<RegisterOutcome> {
        let form = RegisterForm {
            username: form.username.trim().to_string(),
            email: form.email.trim().to_string(),
            password: form.password,
            role: form.role,
        };
        validate_registration(&form).map_err(|e| e.in_op("auth.register"))?;

        let reply = self.client.call_with_message(&form).await.map_err(|e| {
            error!("[Auth] Registration failed: {}", e);
            e.in_op("auth.register")
        })?;

        match reply.data.into_option().and_then(|u| u.into_session()) {
            Some(session) => {
                self.client.session().sign_in(session.clone());
                Ok(RegisterOutcome::SignedIn(session))
            }
            None => {
                info!("[Auth] Registered {}, login required.", form.email);
                self.navigator.navigate(AppRoute::Login);
                Ok(RegisterOutcome::PendingLogin(reply.message))
            }
        }
    }

    pub fn logout(&self) {
        self.client.session().logout();
    }
}

/// 服务端没有给出消息时统一显示 "Login failed"
fn login_failure(e: ClientError) -> ClientError {
    match e.server_message() {
        Some(_) => e,
        None => ClientError::new(e.kind, "Login failed"),
    }
}

fn validate_registration(form: &RegisterForm) -> ClientResult<()> {
    if form.username.is_empty() || form.email.is_empty() || form.password.is_empty() {
        return Err(ClientError::validation("Please fill in all fields"));
    }
    if !form.email.contains('@') {
        return Err(ClientError::validation("Please enter a valid email address"));
    }
    Ok(())
}
