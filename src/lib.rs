//! IdeaHub 客户端核心
//!
//! 与界面框架无关的客户端逻辑：会话、路由守卫、HTTP 客户端、
//! 创意面板和会话浮层的视图模型。浏览器相关的能力（fetch、
//! LocalStorage、History、确认框）都通过 trait 注入。

pub mod auth;
pub mod board;
pub mod chat;
pub mod client;
pub mod config;
pub mod error;
pub mod guard;
pub mod route;
pub mod session;
pub mod storage;
pub mod transport;
pub mod view;

pub use auth::{AuthService, RegisterOutcome};
pub use client::ApiClient;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult, ErrorKind};
pub use route::{AppRoute, Navigator};
pub use session::{AuthPhase, SessionStore};
pub use transport::HttpTransport;
