//! 创意面板
//!
//! 创业者面板管理自己的创意（增删改），投资人面板浏览、点赞、收藏。
//! 两者都以服务端为准：本地只保存最近一次加载的结果和界面状态。

pub mod entrepreneur;
pub mod investor;

use crate::error::{ClientError, ErrorKind};
use ideahub_shared::Idea;

/// 用户确认能力（浏览器中是 `window.confirm`）
pub trait Confirm {
    fn confirm(&self, message: &str) -> bool;
}

/// 本地筛选条件：关键字搜索与分类精确匹配同时生效
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdeaFilter {
    pub search: String,
    pub category: Option<String>,
}

impl IdeaFilter {
    pub fn is_active(&self) -> bool {
        !self.search.trim().is_empty() || self.category.is_some()
    }

    pub fn matches(&self, idea: &Idea) -> bool {
        if let Some(category) = &self.category {
            if idea.category != *category {
                return false;
            }
        }

        let needle = self.search.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        [&idea.title, &idea.description, &idea.category]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }

    pub fn apply<'a>(&self, ideas: &'a [Idea]) -> Vec<&'a Idea> {
        ideas.iter().filter(|idea| self.matches(idea)).collect()
    }
}

/// 失败时显示给用户的消息：有服务端消息就用，否则用给定的通用消息
pub(crate) fn failure_message(e: &ClientError, generic: &str) -> String {
    match e.kind {
        ErrorKind::Network | ErrorKind::Serialization => generic.to_string(),
        _ => e.server_message().unwrap_or(generic).to_string(),
    }
}
