//! 客户端配置
//!
//! 与运行时配置一样采用「读变量，读不到用默认值」的方式，
//! 变量来源由调用方注入：原生环境读进程环境变量，浏览器构建读编译期环境变量。

use ideahub_shared::STORAGE_SESSION_KEY;
use serde::{Deserialize, Serialize};

/// 后端默认地址
pub const DEFAULT_API_BASE: &str = "https://localhost:7244";

pub const VAR_API_BASE: &str = "IDEAHUB_API_BASE";
pub const VAR_SESSION_KEY: &str = "IDEAHUB_SESSION_KEY";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClientConfig {
    /// 后端地址（不带末尾斜杠）
    pub api_base: String,
    /// 会话持久化使用的存储键
    pub session_key: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            session_key: STORAGE_SESSION_KEY.to_string(),
        }
    }
}

impl ClientConfig {
    /// 通过查找函数读取配置，空值按未设置处理
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Self {
            api_base: normalize_base(&read(VAR_API_BASE).unwrap_or(defaults.api_base)),
            session_key: read(VAR_SESSION_KEY).unwrap_or(defaults.session_key),
        }
    }

    /// 从进程环境变量读取
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 从编译期环境变量读取（浏览器构建没有进程环境）
    pub fn from_build_env() -> Self {
        Self::from_lookup(|key| match key {
            VAR_API_BASE => option_env!("IDEAHUB_API_BASE").map(str::to_string),
            VAR_SESSION_KEY => option_env!("IDEAHUB_SESSION_KEY").map(str::to_string),
            _ => None,
        })
    }

    pub fn with_api_base(mut self, api_base: impl AsRef<str>) -> Self {
        self.api_base = normalize_base(api_base.as_ref());
        self
    }
}

fn normalize_base(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_when_unset() {
        let config = ClientConfig::from_lookup(|_| None);
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.session_key, "user");
    }

    #[test]
    fn reads_vars_and_trims_trailing_slash() {
        let vars: HashMap<&str, &str> = [
            (VAR_API_BASE, "https://api.example.com/ "),
            (VAR_SESSION_KEY, "ideahub_session"),
        ]
        .into_iter()
        .collect();
        let config = ClientConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(config.api_base, "https://api.example.com");
        assert_eq!(config.session_key, "ideahub_session");
    }

    #[test]
    fn blank_values_fall_back() {
        let config = ClientConfig::from_lookup(|_| Some("  ".to_string()));
        assert_eq!(config, ClientConfig::default());
    }
}
