use super::{Confirm, failure_message};
use crate::client::ApiClient;
use crate::error::{ClientError, ClientResult, ErrorKind};
use crate::transport::HttpTransport;
use crate::view::ViewState;
use ideahub_shared::protocol::{DeleteIdeaRequest, MyIdeasRequest, UpdateIdeaRequest};
use ideahub_shared::{Id, Idea, IdeaDraft};
use log::{debug, error, info};
use std::rc::Rc;

pub const DELETE_PROMPT: &str = "Are you sure you want to delete this idea?";

/// 创业者面板的界面状态
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntrepreneurState {
    pub ideas: Vec<Idea>,
    pub loading: bool,
    /// 创建/更新请求进行中
    pub saving: bool,
    pub error: Option<String>,
    pub notice: Option<String>,
}

/// 创建还是更新（决定失败消息的措辞）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SaveAction {
    Create,
    Update,
}

impl SaveAction {
    fn verb(&self) -> &'static str {
        match self {
            SaveAction::Create => "create",
            SaveAction::Update => "update",
        }
    }
}

pub struct EntrepreneurBoard<T> {
    client: ApiClient<T>,
    confirm: Rc<dyn Confirm>,
    view: Rc<ViewState<EntrepreneurState>>,
}

impl<T> Clone for EntrepreneurBoard<T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            confirm: self.confirm.clone(),
            view: self.view.clone(),
        }
    }
}

impl<T: HttpTransport> EntrepreneurBoard<T> {
    pub fn new(client: ApiClient<T>, confirm: Rc<dyn Confirm>) -> Self {
        Self {
            client,
            confirm,
            view: Rc::new(ViewState::new(EntrepreneurState::default())),
        }
    }

    pub fn state(&self) -> EntrepreneurState {
        self.view.snapshot()
    }

    pub fn subscribe(&self, listener: impl Fn(&EntrepreneurState) + 'static) {
        self.view.subscribe(listener);
    }

    pub fn unmount(&self) {
        self.view.unmount();
    }

    /// 只清除成功提示，错误保持显示
    pub fn dismiss_notice(&self) {
        self.view.update(|s| s.notice = None);
    }

    pub fn dismiss_messages(&self) {
        self.view.update(|s| {
            s.error = None;
            s.notice = None;
        });
    }

    /// 加载自己发布的创意
    pub async fn load(&self) -> ClientResult<()> {
        let ticket = self.view.begin_load();
        self.view.update(|s| {
            s.loading = true;
            s.error = None;
        });

        let result = self.client.call(&MyIdeasRequest).await;
        if !self.view.is_current(ticket) {
            debug!("[Board] Dropping superseded idea list.");
            return Ok(());
        }

        match result {
            Ok(ideas) => {
                self.view.update(|s| {
                    s.ideas = ideas;
                    s.loading = false;
                });
                Ok(())
            }
            Err(e) => {
                error!("[Board] Failed to load ideas: {}", e);
                let message = failure_message(&e, "Failed to load ideas");
                self.view.update(|s| {
                    s.loading = false;
                    s.error = Some(message);
                });
                Err(e.in_op("board.load"))
            }
        }
    }

    /// 创建创意，成功后插入列表最前面
    ///
    /// 失败时返回错误，调用方据此保留表单内容。
    pub async fn create(&self, draft: &IdeaDraft) -> ClientResult<Idea> {
        let draft = self.validate(draft).map_err(|e| e.in_op("board.create"))?;

        self.begin_save();
        let result = self.client.call(&draft).await;
        match result {
            Ok(idea) => {
                info!("[Board] Created idea {}.", idea.id);
                self.view.update(|s| {
                    s.saving = false;
                    s.ideas.insert(0, idea.clone());
                    s.notice = Some("Idea created successfully!".to_string());
                });
                Ok(idea)
            }
            Err(e) => Err(self.save_failed(SaveAction::Create, e, &draft.title)),
        }
    }

    /// 更新创意，成功后原位替换
    pub async fn update(&self, id: &Id, draft: &IdeaDraft) -> ClientResult<Idea> {
        let draft = self.validate(draft).map_err(|e| e.in_op("board.update"))?;

        self.begin_save();
        let request = UpdateIdeaRequest {
            id: id.clone(),
            draft,
        };
        let result = self.client.call(&request).await;
        match result {
            Ok(returned) => {
                // 部分后端更新后不返回记录，此时用提交的字段合并本地记录
                let merged = returned.or_else(|| {
                    self.view.with(|s| {
                        s.ideas
                            .iter()
                            .find(|idea| idea.id == *id)
                            .map(|idea| merge_draft(idea, &request.draft))
                    })
                });
                let Some(updated) = merged else {
                    // 本地没有该记录，重新加载
                    self.view.update(|s| s.saving = false);
                    self.load().await?;
                    return self.find(id).ok_or_else(|| {
                        ClientError::new(ErrorKind::NotFound, "Idea not found").in_op("board.update")
                    });
                };
                info!("[Board] Updated idea {}.", id);
                self.view.update(|s| {
                    s.saving = false;
                    if let Some(slot) = s.ideas.iter_mut().find(|idea| idea.id == *id) {
                        *slot = updated.clone();
                    }
                    s.notice = Some("Idea updated successfully!".to_string());
                });
                Ok(updated)
            }
            Err(e) => Err(self.save_failed(SaveAction::Update, e, &request.draft.title)),
        }
    }

    /// 删除创意
    ///
    /// 用户取消时返回 `Ok(false)` 且不发请求；服务端确认后才从列表移除。
    pub async fn delete(&self, id: &Id) -> ClientResult<bool> {
        if !self.confirm.confirm(DELETE_PROMPT) {
            return Ok(false);
        }

        self.view.update(|s| s.error = None);
        match self.client.call(&DeleteIdeaRequest { id: id.clone() }).await {
            Ok(_) => {
                info!("[Board] Deleted idea {}.", id);
                self.view.update(|s| {
                    s.ideas.retain(|idea| idea.id != *id);
                    s.notice = Some("Idea deleted successfully".to_string());
                });
                Ok(true)
            }
            Err(e) => {
                error!("[Board] Failed to delete idea {}: {}", id, e);
                self.view
                    .update(|s| s.error = Some("Failed to delete idea".to_string()));
                Err(e.in_op_with("board.delete", id.to_string()))
            }
        }
    }

    pub fn find(&self, id: &Id) -> Option<Idea> {
        self.view
            .with(|s| s.ideas.iter().find(|idea| idea.id == *id).cloned())
    }

    fn validate(&self, draft: &IdeaDraft) -> ClientResult<IdeaDraft> {
        let draft = draft.trimmed();
        if draft.title.is_empty() || draft.description.is_empty() {
            let message = "Title and description are required";
            self.view.update(|s| s.error = Some(message.to_string()));
            return Err(ClientError::validation(message));
        }
        if !draft.budget.is_finite() {
            let message = "Budget must be a valid number";
            self.view.update(|s| s.error = Some(message.to_string()));
            return Err(ClientError::validation(message));
        }
        Ok(draft)
    }

    fn begin_save(&self) {
        self.view.update(|s| {
            s.saving = true;
            s.error = None;
            s.notice = None;
        });
    }

    fn save_failed(&self, action: SaveAction, e: ClientError, title: &str) -> ClientError {
        error!("[Board] Failed to {} idea: {}", action.verb(), e);
        let message = save_failure_message(action, &e);
        self.view.update(|s| {
            s.saving = false;
            s.error = Some(message);
        });
        e.in_op_with(format!("board.{}", action.verb()), title.to_string())
    }
}

fn save_failure_message(action: SaveAction, e: &ClientError) -> String {
    match e.kind {
        ErrorKind::Conflict => {
            "An idea with this title already exists. Please use a different title.".to_string()
        }
        ErrorKind::InvalidInput => "Invalid data. Please check your input and try again.".to_string(),
        ErrorKind::SessionExpired => format!("Please login again to {} ideas.", action.verb()),
        _ => failure_message(
            e,
            &format!("Failed to {} idea. Please try again.", action.verb()),
        ),
    }
}

fn merge_draft(idea: &Idea, draft: &IdeaDraft) -> Idea {
    Idea {
        title: draft.title.clone(),
        description: draft.description.clone(),
        tags: draft.tags.clone(),
        category: draft.category.clone(),
        budget: draft.budget,
        ..idea.clone()
    }
}

#[cfg(test)]
mod tests;
