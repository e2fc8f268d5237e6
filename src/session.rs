//! 会话状态管理
//!
//! `SessionStore` 是显式传递的应用级上下文：持有当前会话、负责持久化、
//! 启动时恢复，并在会话变化时通知订阅者（界面层据此驱动路由守卫）。
//! 读写接口刻意保持很窄：读取阶段/会话/令牌，登录写入，登出或失效清除。

use crate::route::{AppRoute, Navigator};
use crate::storage::SessionStorage;
use ideahub_shared::{Role, Session};
use log::{info, warn};
use std::cell::RefCell;
use std::rc::Rc;

/// 认证阶段（路由守卫的三个状态）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPhase {
    /// 尚未完成会话恢复
    Initializing,
    Unauthenticated,
    Authorized(Role),
}

impl AuthPhase {
    pub fn is_initializing(&self) -> bool {
        matches!(self, AuthPhase::Initializing)
    }

    pub fn role(&self) -> Option<Role> {
        match self {
            AuthPhase::Authorized(role) => Some(*role),
            _ => None,
        }
    }
}

struct SessionState {
    /// 只会从 true 变为 false 一次
    initializing: bool,
    session: Option<Session>,
}

type Listener = Rc<dyn Fn(AuthPhase, Option<&Session>)>;

struct Inner {
    state: RefCell<SessionState>,
    storage: Rc<dyn SessionStorage>,
    navigator: Rc<dyn Navigator>,
    storage_key: String,
    listeners: RefCell<Vec<Listener>>,
}

/// 会话上下文，克隆开销很小（共享同一份状态）
#[derive(Clone)]
pub struct SessionStore {
    inner: Rc<Inner>,
}

impl SessionStore {
    pub fn new(
        storage: Rc<dyn SessionStorage>,
        navigator: Rc<dyn Navigator>,
        storage_key: impl Into<String>,
    ) -> Self {
        Self {
            inner: Rc::new(Inner {
                state: RefCell::new(SessionState {
                    initializing: true,
                    session: None,
                }),
                storage,
                navigator,
                storage_key: storage_key.into(),
                listeners: RefCell::new(Vec::new()),
            }),
        }
    }

    pub fn phase(&self) -> AuthPhase {
        let state = self.inner.state.borrow();
        if state.initializing {
            return AuthPhase::Initializing;
        }
        match &state.session {
            Some(session) => AuthPhase::Authorized(session.role),
            None => AuthPhase::Unauthenticated,
        }
    }

    pub fn session(&self) -> Option<Session> {
        self.inner.state.borrow().session.clone()
    }

    pub fn token(&self) -> Option<String> {
        self.inner
            .state
            .borrow()
            .session
            .as_ref()
            .map(|s| s.token.clone())
    }

    /// 订阅会话变化，回调收到新的阶段和当前会话
    pub fn subscribe(&self, listener: impl Fn(AuthPhase, Option<&Session>) + 'static) {
        self.inner.listeners.borrow_mut().push(Rc::new(listener));
    }

    /// 从持久化存储恢复会话
    ///
    /// 数据缺失或无法解析都视为「无会话」，损坏的数据会被清除。
    /// 只有第一次调用生效，之后直接返回当前阶段。
    pub fn restore(&self) -> AuthPhase {
        if !self.inner.state.borrow().initializing {
            return self.phase();
        }

        let key = &self.inner.storage_key;
        let restored = match self.inner.storage.get(key) {
            None => None,
            Some(raw) => match serde_json::from_str::<Session>(&raw) {
                Ok(session) if session.is_valid() => Some(session),
                Ok(_) => {
                    warn!("[Session] Stored session has no token, discarding it.");
                    self.inner.storage.delete(key);
                    None
                }
                Err(e) => {
                    warn!("[Session] Failed to parse stored session: {}", e);
                    self.inner.storage.delete(key);
                    None
                }
            },
        };

        if let Some(session) = &restored {
            info!(
                "[Session] Restored session for {} ({}).",
                session.display_name(),
                session.role
            );
        }

        {
            let mut state = self.inner.state.borrow_mut();
            state.session = restored;
            state.initializing = false;
        }
        self.notify();
        self.phase()
    }

    /// 建立新会话：持久化、更新内存状态，并按角色跳转到对应首页
    pub fn sign_in(&self, session: Session) {
        match serde_json::to_string(&session) {
            Ok(raw) => {
                if !self.inner.storage.set(&self.inner.storage_key, &raw) {
                    warn!("[Session] Failed to persist session; it will not survive a reload.");
                }
            }
            Err(e) => warn!("[Session] Failed to serialize session: {}", e),
        }

        let role = session.role;
        info!("[Session] Signed in as {} ({}).", session.display_name(), role);
        {
            let mut state = self.inner.state.borrow_mut();
            state.session = Some(session);
            state.initializing = false;
        }
        self.notify();
        self.inner.navigator.navigate(AppRoute::home_for(role));
    }

    /// 注销：清除内存和持久化的会话并回到登录页，可重复调用
    pub fn logout(&self) {
        info!("[Session] Logging out.");
        self.clear();
    }

    /// 收到 401 时由客户端调用，行为与注销一致
    pub fn expire(&self) {
        warn!("[Session] Unauthorized response: clearing user session.");
        self.clear();
    }

    fn clear(&self) {
        {
            let mut state = self.inner.state.borrow_mut();
            state.session = None;
            state.initializing = false;
        }
        self.inner.storage.delete(&self.inner.storage_key);
        self.notify();
        self.inner.navigator.navigate(AppRoute::auth_failure_redirect());
    }

    fn notify(&self) {
        let phase = self.phase();
        let session = self.session();
        let listeners: Vec<Listener> = self.inner.listeners.borrow().clone();
        for listener in listeners {
            listener(phase, session.as_ref());
        }
    }
}
