//! 路由守卫
//!
//! 守卫判定是同步、无副作用的纯函数：只依赖当前认证阶段和目标路由，
//! 从不发起网络请求。执行跳转由路由服务负责。

use crate::route::{Access, AppRoute};
use crate::session::AuthPhase;
use ideahub_shared::Role;

/// 守卫判定结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// 会话尚在恢复，显示加载占位，不做跳转
    Loading,
    /// 允许渲染
    Render,
    /// 需要跳转
    Redirect(AppRoute),
}

/// 受保护视图的判定
///
/// `required` 为 `None` 时只要求已登录。
pub fn evaluate(phase: &AuthPhase, required: Option<Role>) -> GuardDecision {
    match phase {
        AuthPhase::Initializing => GuardDecision::Loading,
        AuthPhase::Unauthenticated => GuardDecision::Redirect(AppRoute::auth_failure_redirect()),
        AuthPhase::Authorized(role) => match required {
            Some(required) if required != *role => {
                GuardDecision::Redirect(AppRoute::auth_failure_redirect())
            }
            _ => GuardDecision::Render,
        },
    }
}

/// 针对整条路由的判定
pub fn resolve(route: AppRoute, phase: &AuthPhase) -> GuardDecision {
    match route.access() {
        Access::Open => GuardDecision::Render,
        Access::PublicEntry => match phase {
            AuthPhase::Initializing => GuardDecision::Loading,
            // 已登录用户访问登录/注册页时送回自己的首页
            AuthPhase::Authorized(role) => GuardDecision::Redirect(AppRoute::home_for(*role)),
            AuthPhase::Unauthenticated => GuardDecision::Render,
        },
        Access::Role(role) => evaluate(phase, Some(role)),
    }
}

/// 沿着重定向链走到不再跳转的路由
///
/// 返回最终路由及其判定（`Render` 或 `Loading`）。
pub fn settle(route: AppRoute, phase: &AuthPhase) -> (AppRoute, GuardDecision) {
    let mut current = route;
    // 上限防止路由表出环
    for _ in 0..4 {
        match resolve(current, phase) {
            GuardDecision::Redirect(next) if next != current => current = next,
            GuardDecision::Redirect(_) => break,
            decision => return (current, decision),
        }
    }
    (current, resolve(current, phase))
}
