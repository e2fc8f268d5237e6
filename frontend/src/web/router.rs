//! 路由服务模块 - 核心引擎
//!
//! 封装了 web_sys 的 History API，实现高内聚：
//! 所有对 window.history 的操作都集中在此模块。
//! 守卫判定来自核心库的 `guard::settle`，这里只负责执行跳转和渲染。

use ideahub::guard::{GuardDecision, resolve, settle};
use ideahub::route::{AppRoute, Navigator};
use ideahub::session::AuthPhase;
use leptos::prelude::*;
use wasm_bindgen::prelude::*;

/// 获取当前浏览器路径
fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

/// 写入 History 状态：push 用于用户导航，replace 用于重定向
fn write_history(path: &str, use_push: bool) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = if use_push {
                history.push_state_with_url(&JsValue::NULL, "", Some(path))
            } else {
                history.replace_state_with_url(&JsValue::NULL, "", Some(path))
            };
        }
    }
}

/// 路由器服务
///
/// 封装所有路由操作，通过 Signal 驱动界面更新。
/// 认证阶段由外部注入，路由服务本身不了解会话的来源。
#[derive(Clone, Copy)]
pub struct RouterService {
    current_route: ReadSignal<AppRoute>,
    set_route: WriteSignal<AppRoute>,
    phase: Signal<AuthPhase>,
}

impl RouterService {
    fn new(phase: Signal<AuthPhase>) -> Self {
        let initial_route = AppRoute::from_path(&current_path());
        let (current_route, set_route) = signal(initial_route);

        Self {
            current_route,
            set_route,
            phase,
        }
    }

    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current_route
    }

    pub fn phase(&self) -> Signal<AuthPhase> {
        self.phase
    }

    /// **核心方法：导航与守卫**
    ///
    /// 流程：请求 -> 守卫判定(settle) -> 写 History -> 更新路由信号
    pub fn navigate_to_route(&self, target: AppRoute, use_push: bool) {
        let phase = self.phase.get_untracked();
        let (route, decision) = settle(target, &phase);

        if route != target {
            log::info!("[Router] {} is not available ({:?}), going to {}.", target, phase, route);
        } else if decision == GuardDecision::Loading {
            log::debug!("[Router] Holding {} until the session is restored.", target);
        }

        write_history(route.to_path(), use_push);
        self.set_route.set(route);
    }

    /// 初始化浏览器后退/前进按钮监听
    fn init_popstate_listener(&self) {
        let router = *self;

        let closure = Closure::<dyn Fn()>::new(move || {
            // popstate 时也执行守卫逻辑，重定向不新增历史记录
            router.navigate_to_route(AppRoute::from_path(&current_path()), false);
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }

    /// 认证阶段变化时重新判定当前路由
    ///
    /// 会话恢复完成、登录、登出或 401 清除都会触发。
    fn setup_auth_redirect(&self) {
        let current_route = self.current_route;
        let set_route = self.set_route;
        let phase = self.phase;

        Effect::new(move |_| {
            let phase = phase.get();
            let route = current_route.get_untracked();
            let (settled, _) = settle(route, &phase);

            if settled != route {
                log::info!("[Router] Auth state changed ({:?}), redirecting to {}.", phase, settled);
                write_history(settled.to_path(), false);
                set_route.set(settled);
            }
        });
    }
}

/// 会话层使用的导航器
#[derive(Clone, Copy)]
pub struct RouterNavigator(pub RouterService);

impl Navigator for RouterNavigator {
    fn navigate(&self, route: AppRoute) {
        self.0.navigate_to_route(route, true);
    }
}

/// 提供路由服务到 Context 并初始化
pub fn provide_router(phase: Signal<AuthPhase>) -> RouterService {
    let router = RouterService::new(phase);

    router.init_popstate_listener();
    router.setup_auth_redirect();

    provide_context(router);
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure provide_router was called.")
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由出口组件
///
/// 守卫放行时渲染对应的组件；会话恢复期间或等待重定向时渲染占位。
#[component]
pub fn RouterOutlet(
    /// 路由匹配函数：接收当前路由，返回对应视图
    matcher: fn(AppRoute) -> AnyView,
    /// 占位视图
    placeholder: fn() -> AnyView,
) -> impl IntoView {
    let router = use_router();
    let decision = Memo::new(move |_| {
        let route = router.current_route().get();
        (route, resolve(route, &router.phase().get()))
    });

    move || match decision.get() {
        (route, GuardDecision::Render) => matcher(route),
        (_, GuardDecision::Loading | GuardDecision::Redirect(_)) => placeholder(),
    }
}

/// 站内链接
#[component]
pub fn Link(
    to: AppRoute,
    #[prop(optional, into)] class: String,
    children: Children,
) -> impl IntoView {
    let router = use_router();
    let on_click = move |ev: web_sys::MouseEvent| {
        ev.prevent_default();
        router.navigate_to_route(to, true);
    };

    view! {
        <a href=to.to_path() class=class on:click=on_click>
            {children()}
        </a>
    }
}
