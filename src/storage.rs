//! 会话持久化存储抽象
//!
//! 浏览器端由 LocalStorage 实现，原生环境和测试使用内存实现。

use std::cell::RefCell;
use std::collections::HashMap;

/// 键值存储（与 LocalStorage 的语义保持一致）
pub trait SessionStorage {
    /// 获取存储的字符串值，键不存在或发生错误时返回 `None`
    fn get(&self, key: &str) -> Option<String>;

    /// 设置存储值，返回操作是否成功
    fn set(&self, key: &str, value: &str) -> bool;

    /// 删除键值对，返回操作是否成功（键本不存在也算成功）
    fn delete(&self, key: &str) -> bool;
}

/// 内存存储
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// 预置一条数据
    pub fn with_entry(key: &str, value: &str) -> Self {
        let storage = Self::new();
        storage.set(key, value);
        storage
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.borrow().contains_key(key)
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> bool {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        true
    }

    fn delete(&self, key: &str) -> bool {
        self.entries.borrow_mut().remove(key);
        true
    }
}
