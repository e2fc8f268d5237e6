//! IdeaHub 前端应用
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `ideahub`: 路由定义、守卫、会话与各面板的视图模型
//! - `web::router`: 路由服务（核心引擎）
//! - `auth`: 会话状态到 Leptos 信号的镜像
//! - `components`: UI 组件层

mod auth;
mod components {
    pub mod admin;
    mod chat_overlay;
    pub mod entrepreneur_dashboard;
    mod idea_card;
    mod idea_form;
    pub mod investor_dashboard;
    pub mod login;
    mod navbar;
    pub mod register;
}

// 原生 Web API 封装模块
pub(crate) mod web;

use crate::auth::AuthContext;
use crate::components::admin::AdminPage;
use crate::components::entrepreneur_dashboard::EntrepreneurDashboard;
use crate::components::investor_dashboard::InvestorDashboard;
use crate::components::login::LoginPage;
use crate::components::register::RegisterPage;
use crate::web::router::{Link, RouterNavigator, RouterOutlet, provide_router};

use ideahub::{AppRoute, AuthPhase, ClientConfig};
use leptos::prelude::*;

/// 路由匹配函数
///
/// 根据 AppRoute 枚举返回对应的视图组件。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::Register => view! { <RegisterPage /> }.into_any(),
        AppRoute::Entrepreneur => view! { <EntrepreneurDashboard /> }.into_any(),
        AppRoute::Investor => view! { <InvestorDashboard /> }.into_any(),
        AppRoute::Admin => view! { <AdminPage /> }.into_any(),
        AppRoute::NotFound => view! {
            <div class="flex items-center justify-center min-h-screen bg-base-200">
                <div class="text-center">
                    <h1 class="text-6xl font-bold text-error">"404"</h1>
                    <p class="text-xl mt-4">"Page not found"</p>
                    <Link to=AppRoute::Login class="btn btn-primary mt-6">"Back to login"</Link>
                </div>
            </div>
        }
        .into_any(),
    }
}

/// 会话恢复期间以及等待重定向时的占位
fn loading_placeholder() -> AnyView {
    view! {
        <div class="flex items-center justify-center min-h-screen">
            <span class="loading loading-spinner loading-lg text-primary"></span>
        </div>
    }
    .into_any()
}

/// 安装控制台日志；发布构建只保留 info 及以上
pub fn init_logging() {
    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    web::logger::init(level);
}

#[component]
pub fn App() -> impl IntoView {
    let config = ClientConfig::from_build_env();
    log::info!("[App] Using backend {}.", config.api_base);

    // 1. 认证阶段信号：路由服务和会话层共用
    let phase = RwSignal::new(AuthPhase::Initializing);

    // 2. 路由服务只读取阶段，不了解会话来源
    let router = provide_router(phase.into());

    // 3. 创建认证上下文
    let auth_ctx = AuthContext::new(&config, phase, RouterNavigator(router));
    provide_context(auth_ctx);

    // 4. 从 LocalStorage 恢复会话
    auth_ctx.restore();

    view! { <RouterOutlet matcher=route_matcher placeholder=loading_placeholder /> }
}
