//! 路由定义模块 - 领域模型
//!
//! 纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。
//! 定义了应用的所有路由及其访问要求。

use ideahub_shared::Role;
use std::fmt::Display;

/// 应用路由枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppRoute {
    /// 登录页面 (默认路由)
    #[default]
    Login,
    /// 注册页面
    Register,
    /// 创业者面板
    Entrepreneur,
    /// 投资人面板
    Investor,
    /// 管理员面板
    Admin,
    /// 页面未找到
    NotFound,
}

/// 路由的访问要求
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// 公开入口（登录/注册），已认证用户会被送回自己的首页
    PublicEntry,
    /// 任何人都可以访问
    Open,
    /// 需要指定角色
    Role(Role),
}

impl AppRoute {
    /// 将 URL path 解析为路由枚举
    pub fn from_path(path: &str) -> Self {
        match path.trim_end_matches('/') {
            "" | "/login" => Self::Login,
            "/register" => Self::Register,
            "/entrepreneur" => Self::Entrepreneur,
            "/investor" => Self::Investor,
            "/admin" => Self::Admin,
            _ => Self::NotFound,
        }
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Register => "/register",
            Self::Entrepreneur => "/entrepreneur",
            Self::Investor => "/investor",
            Self::Admin => "/admin",
            Self::NotFound => "/404",
        }
    }

    /// **核心守卫信息：该路由的访问要求**
    pub fn access(&self) -> Access {
        match self {
            Self::Login | Self::Register => Access::PublicEntry,
            Self::Entrepreneur => Access::Role(Role::Entrepreneur),
            Self::Investor => Access::Role(Role::Investor),
            Self::Admin => Access::Role(Role::Admin),
            Self::NotFound => Access::Open,
        }
    }

    /// 各角色登录后的首页
    pub fn home_for(role: Role) -> Self {
        match role {
            Role::Investor => Self::Investor,
            Role::Admin => Self::Admin,
            Role::Entrepreneur => Self::Entrepreneur,
        }
    }

    /// 认证失败或角色不符时的重定向目标
    pub fn auth_failure_redirect() -> Self {
        Self::Login
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

/// 导航能力
///
/// 会话层只需要「跳转到某个路由」，具体如何操作 History 由界面层决定。
pub trait Navigator {
    fn navigate(&self, route: AppRoute);
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::cell::RefCell;

    /// 记录所有导航请求
    #[derive(Default)]
    pub struct RecordingNavigator {
        pub visited: RefCell<Vec<AppRoute>>,
    }

    impl RecordingNavigator {
        pub fn last(&self) -> Option<AppRoute> {
            self.visited.borrow().last().copied()
        }
    }

    impl Navigator for RecordingNavigator {
        fn navigate(&self, route: AppRoute) {
            self.visited.borrow_mut().push(route);
        }
    }

    #[test]
    fn paths_round_trip() {
        for route in [
            AppRoute::Login,
            AppRoute::Register,
            AppRoute::Entrepreneur,
            AppRoute::Investor,
            AppRoute::Admin,
        ] {
            assert_eq!(AppRoute::from_path(route.to_path()), route);
        }
        assert_eq!(AppRoute::from_path("/"), AppRoute::Login);
        assert_eq!(AppRoute::from_path("/investor/"), AppRoute::Investor);
        assert_eq!(AppRoute::from_path("/nowhere"), AppRoute::NotFound);
    }

    #[test]
    fn role_homes() {
        assert_eq!(AppRoute::home_for(Role::Investor), AppRoute::Investor);
        assert_eq!(AppRoute::home_for(Role::Admin), AppRoute::Admin);
        assert_eq!(AppRoute::home_for(Role::Entrepreneur), AppRoute::Entrepreneur);
        assert_eq!(AppRoute::Investor.access(), Access::Role(Role::Investor));
    }
}
