use super::{IdeaFilter, failure_message};
use crate::client::ApiClient;
use crate::error::{ClientError, ClientResult, ErrorKind};
use crate::transport::HttpTransport;
use crate::view::ViewState;
use ideahub_shared::protocol::{
    ApiRequest, CategorySearchRequest, IdeaFeed, ListIdeasRequest, Reaction, ReactionRequest,
};
use ideahub_shared::{Id, Idea};
use log::{debug, error};
use std::rc::Rc;

/// 投资人面板的界面状态
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvestorState {
    pub feed: IdeaFeed,
    /// 最近一次加载的集合（未筛选）
    pub ideas: Vec<Idea>,
    pub filter: IdeaFilter,
    pub loading: bool,
    pub error: Option<String>,
}

impl InvestorState {
    /// 当前筛选条件下可见的创意
    pub fn visible(&self) -> Vec<&Idea> {
        self.filter.apply(&self.ideas)
    }

    /// 已加载集合中出现过的分类，按首次出现的顺序
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for idea in &self.ideas {
            let category = idea.category.as_str();
            if !category.is_empty() && !seen.contains(&category) {
                seen.push(category);
            }
        }
        seen
    }

    pub fn liked_count(&self) -> usize {
        self.ideas.iter().filter(|i| i.liked_by_current_user).count()
    }

    pub fn saved_count(&self) -> usize {
        self.ideas.iter().filter(|i| i.saved_by_current_user).count()
    }

    /// 没有可见创意时显示的提示
    pub fn empty_message(&self) -> &'static str {
        match self.feed {
            IdeaFeed::Liked => "You haven't liked any ideas yet.",
            IdeaFeed::Saved => "You haven't saved any ideas yet.",
            IdeaFeed::All if self.filter.is_active() => "Try adjusting your search criteria.",
            IdeaFeed::All => "No ideas available at the moment.",
        }
    }
}

/// 点赞或收藏
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Toggle {
    Like,
    Save,
}

impl Toggle {
    fn reaction(&self, idea: &Idea) -> Reaction {
        match self {
            Toggle::Like if idea.liked_by_current_user => Reaction::Unlike,
            Toggle::Like => Reaction::Like,
            Toggle::Save if idea.saved_by_current_user => Reaction::Unsave,
            Toggle::Save => Reaction::Save,
        }
    }

    fn failure(&self) -> &'static str {
        match self {
            Toggle::Like => "Failed to update like status.",
            Toggle::Save => "Failed to update save status.",
        }
    }
}

pub struct InvestorBoard<T> {
    client: ApiClient<T>,
    view: Rc<ViewState<InvestorState>>,
}

impl<T> Clone for InvestorBoard<T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            view: self.view.clone(),
        }
    }
}

impl<T: HttpTransport> InvestorBoard<T> {
    pub fn new(client: ApiClient<T>) -> Self {
        Self {
            client,
            view: Rc::new(ViewState::new(InvestorState::default())),
        }
    }

    pub fn state(&self) -> InvestorState {
        self.view.snapshot()
    }

    pub fn subscribe(&self, listener: impl Fn(&InvestorState) + 'static) {
        self.view.subscribe(listener);
    }

    pub fn unmount(&self) {
        self.view.unmount();
    }

    /// 重新加载当前标签页的集合
    pub async fn load(&self) -> ClientResult<()> {
        let feed = self.view.with(|s| s.feed);
        self.fetch(
            ListIdeasRequest { feed },
            "Failed to load ideas. Please try again.",
            None,
        )
        .await
        .map_err(|e| e.in_op_with("board.load", feed.as_str()))
    }

    /// 切换标签页；筛选条件保持不变
    pub async fn switch_feed(&self, feed: IdeaFeed) -> ClientResult<()> {
        self.view.update(|s| s.feed = feed);
        self.load().await
    }

    pub fn set_search(&self, search: impl Into<String>) {
        let search = search.into();
        self.view.update(|s| s.filter.search = search);
    }

    /// 空字符串表示不按分类筛选
    pub fn set_category(&self, category: Option<String>) {
        let category = category.filter(|c| !c.trim().is_empty());
        self.view.update(|s| s.filter.category = category);
    }

    pub fn clear_filters(&self) {
        self.view.update(|s| s.filter = IdeaFilter::default());
    }

    /// 由服务端按分类搜索，结果替换当前集合并设置分类筛选
    pub async fn search_by_category(&self, category: &str) -> ClientResult<()> {
        let category = category.trim();
        if category.is_empty() {
            self.set_category(None);
            return self.load().await;
        }

        self.view.update(|s| s.feed = IdeaFeed::All);
        self.fetch(
            CategorySearchRequest {
                category: category.to_string(),
            },
            "Failed to search ideas.",
            Some(category.to_string()),
        )
        .await
        .map_err(|e| e.in_op_with("board.search", category.to_string()))
    }

    pub async fn toggle_like(&self, id: &Id) -> ClientResult<()> {
        self.toggle(Toggle::Like, id).await
    }

    pub async fn toggle_save(&self, id: &Id) -> ClientResult<()> {
        self.toggle(Toggle::Save, id).await
    }

    /// 根据当前标记选择请求，成功后重新加载当前集合
    async fn toggle(&self, toggle: Toggle, id: &Id) -> ClientResult<()> {
        let reaction = self.view.with(|s| {
            s.ideas
                .iter()
                .find(|idea| idea.id == *id)
                .map(|idea| toggle.reaction(idea))
        });
        let Some(reaction) = reaction else {
            self.view
                .update(|s| s.error = Some(toggle.failure().to_string()));
            return Err(ClientError::new(ErrorKind::NotFound, "Idea not found")
                .in_op_with("board.toggle", id.to_string()));
        };

        let request = ReactionRequest {
            reaction,
            idea_id: id.clone(),
        };
        if let Err(e) = self.client.call(&request).await {
            error!("[Board] Failed to {} idea {}: {}", reaction.as_str(), id, e);
            self.view
                .update(|s| s.error = Some(toggle.failure().to_string()));
            return Err(e.in_op_with("board.toggle", id.to_string()));
        }

        self.load().await
    }

    async fn fetch<R>(&self, request: R, failure: &str, category: Option<String>) -> ClientResult<()>
    where
        R: ApiRequest<Response = Vec<Idea>>,
    {
        let ticket = self.view.begin_load();
        self.view.update(|s| {
            s.loading = true;
            s.error = None;
        });

        let result = self.client.call(&request).await;
        if !self.view.is_current(ticket) {
            debug!("[Board] Dropping superseded response for {}.", request.path());
            return Ok(());
        }

        match result {
            Ok(ideas) => {
                self.view.update(|s| {
                    s.ideas = ideas;
                    s.loading = false;
                    if category.is_some() {
                        s.filter.category = category;
                    }
                });
                Ok(())
            }
            Err(e) => {
                error!("[Board] {} {}", failure, e);
                let message = failure_message(&e, failure);
                self.view.update(|s| {
                    s.ideas.clear();
                    s.loading = false;
                    s.error = Some(message);
                });
                Err(e)
            }
        }
    }
}
