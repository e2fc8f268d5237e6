//! 表单状态管理模块
//!
//! 将零散的 signal 整合为 `FormState` 结构体，负责：
//! - 数据的持有
//! - 数据的重置与回填
//! - 数据到提交对象的转换

use ideahub_shared::{Id, IdeaDraft};
use leptos::prelude::*;

/// 表单状态结构体
///
/// 使用 `RwSignal` 因为它实现了 `Copy` trait，非常适合作为 Props 在组件间传递。
#[derive(Clone, Copy)]
pub struct FormState {
    pub title: RwSignal<String>,
    pub description: RwSignal<String>,
    pub tags: RwSignal<String>,
    pub category: RwSignal<String>,
    /// 保留原始输入，提交时再解析
    pub budget: RwSignal<String>,
    /// 正在编辑的创意；为 None 时表示新建
    pub editing: RwSignal<Option<Id>>,
}

impl FormState {
    pub fn new() -> Self {
        Self {
            title: RwSignal::new(String::new()),
            description: RwSignal::new(String::new()),
            tags: RwSignal::new(String::new()),
            category: RwSignal::new(String::new()),
            budget: RwSignal::new(String::new()),
            editing: RwSignal::new(None),
        }
    }

    /// 重置表单到初始状态
    pub fn reset(&self) {
        self.title.set(String::new());
        self.description.set(String::new());
        self.tags.set(String::new());
        self.category.set(String::new());
        self.budget.set(String::new());
        self.editing.set(None);
    }

    /// 用已有创意回填表单，进入编辑模式
    pub fn fill(&self, id: Id, draft: IdeaDraft) {
        self.title.set(draft.title);
        self.description.set(draft.description);
        self.tags.set(draft.tags);
        self.category.set(draft.category);
        self.budget.set(if draft.budget == 0.0 {
            String::new()
        } else {
            draft.budget.to_string()
        });
        self.editing.set(Some(id));
    }

    /// 转换为提交对象；预算无法解析时交给看板校验拒绝
    pub fn to_draft(&self) -> IdeaDraft {
        IdeaDraft {
            title: self.title.get_untracked(),
            description: self.description.get_untracked(),
            tags: self.tags.get_untracked(),
            category: self.category.get_untracked(),
            budget: IdeaDraft::parse_budget(&self.budget.get_untracked()).unwrap_or(f64::NAN),
        }
    }
}

impl Default for FormState {
    fn default() -> Self {
        Self::new()
    }
}
