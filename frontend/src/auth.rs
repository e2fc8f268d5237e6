//! 认证模块
//!
//! 核心库的 `SessionStore` 持有真正的会话；这里把它的阶段和会话
//! 镜像到 Leptos 信号中，供路由守卫和各页面响应式读取。

use crate::web::router::RouterNavigator;
use crate::web::{BrowserConfirm, BrowserStorage, FetchTransport};
use ideahub::board::Confirm;
use ideahub::{ApiClient, AuthPhase, AuthService, ClientConfig, SessionStore};
use ideahub_shared::Session;
use leptos::prelude::*;
use std::rc::Rc;

/// 页面共用的服务对象
pub struct Services {
    pub client: ApiClient<FetchTransport>,
    pub auth: AuthService<FetchTransport>,
    pub confirm: Rc<dyn Confirm>,
}

impl Services {
    pub fn session(&self) -> &SessionStore {
        self.client.session()
    }
}

/// 认证上下文
///
/// 全部字段都是 `Copy` 的句柄，可以在闭包间自由传递。
#[derive(Clone, Copy)]
pub struct AuthContext {
    /// 认证阶段（路由守卫读取）
    pub phase: RwSignal<AuthPhase>,
    /// 当前会话
    pub session: RwSignal<Option<Session>>,
    /// 跨页面的一次性提示（如注册成功后跳转登录页）
    pub flash: RwSignal<Option<String>>,
    services: StoredValue<Rc<Services>, LocalStorage>,
}

impl AuthContext {
    /// 创建认证上下文
    ///
    /// `phase` 需要事先创建，因为路由服务也依赖它。
    pub fn new(config: &ClientConfig, phase: RwSignal<AuthPhase>, navigator: RouterNavigator) -> Self {
        let navigator = Rc::new(navigator);
        let session = RwSignal::new(None);

        let store = SessionStore::new(
            Rc::new(BrowserStorage),
            navigator.clone(),
            config.session_key.clone(),
        );
        store.subscribe(move |next, current| {
            phase.set(next);
            session.set(current.cloned());
        });

        let client = ApiClient::new(config, Rc::new(FetchTransport), store);
        let auth = AuthService::new(client.clone(), navigator);

        Self {
            phase,
            session,
            flash: RwSignal::new(None),
            services: StoredValue::new_local(Rc::new(Services {
                client,
                auth,
                confirm: Rc::new(BrowserConfirm),
            })),
        }
    }

    pub fn services(&self) -> Rc<Services> {
        self.services.get_value()
    }

    /// 启动时恢复会话
    pub fn restore(&self) {
        self.services().session().restore();
    }

    /// 确认后注销
    pub fn confirm_logout(&self) {
        let services = self.services();
        if services.confirm.confirm("Are you sure you want to logout?") {
            services.auth.logout();
        }
    }
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}
