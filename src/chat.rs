//! 会话浮层
//!
//! 打开时拉取与对方的历史消息；发送采用乐观更新：先以客户端生成的
//! 临时 id 追加到列表，服务端确认后换成正式 id，失败时按临时 id 移除。

use crate::client::ApiClient;
use crate::error::{ClientError, ClientResult};
use crate::transport::HttpTransport;
use crate::view::ViewState;
use chrono::{DateTime, Utc};
use ideahub_shared::protocol::{ChatChannel, MessageHistoryRequest, SendMessageRequest};
use ideahub_shared::{Id, Idea, Message, Role};
use log::{debug, error};
use std::rc::Rc;
use uuid::Uuid;

pub const SEND_FAILED: &str = "Failed to send message. Please try again.";

/// 消息标识：发送中的消息只有客户端临时 id
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageId {
    Tentative(Uuid),
    Confirmed(Id),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub id: MessageId,
    pub content: String,
    /// 无法识别的发送者为 None
    pub sender_role: Option<Role>,
    pub timestamp: DateTime<Utc>,
    /// 尚未得到服务端确认
    pub pending: bool,
}

impl From<Message> for ChatMessage {
    fn from(message: Message) -> Self {
        Self {
            id: MessageId::Confirmed(message.id),
            content: message.content,
            sender_role: message.sender_role,
            timestamp: message.timestamp,
            pending: false,
        }
    }
}

/// 会话对象
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationTarget {
    pub peer_id: Id,
    pub peer_name: String,
    /// 围绕哪条创意展开（作为 chatSessionId 发送）
    pub idea_id: Option<Id>,
}

impl ConversationTarget {
    /// 投资人联系创意作者
    pub fn idea_owner(idea: &Idea) -> Option<Self> {
        Some(Self {
            peer_id: idea.owner()?.clone(),
            peer_name: idea.owner_name().to_string(),
            idea_id: Some(idea.id.clone()),
        })
    }

    /// 创业者联系对该创意感兴趣的投资人
    pub fn interested_investor(idea: &Idea) -> Option<Self> {
        Some(Self {
            peer_id: idea.investor_id.clone()?,
            peer_name: "Investor".to_string(),
            idea_id: Some(idea.id.clone()),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatState {
    pub target: Option<ConversationTarget>,
    pub messages: Vec<ChatMessage>,
    pub loading: bool,
    pub sending: bool,
    pub draft: String,
    pub error: Option<String>,
    /// 列表每次变化加一，界面据此滚动到底部
    pub revision: u64,
}

impl ChatState {
    pub fn is_open(&self) -> bool {
        self.target.is_some()
    }

    pub fn can_send(&self) -> bool {
        self.is_open() && !self.loading && !self.sending && !self.draft.trim().is_empty()
    }
}

pub struct ChatOverlay<T> {
    client: ApiClient<T>,
    channel: ChatChannel,
    view: Rc<ViewState<ChatState>>,
}

impl<T> Clone for ChatOverlay<T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            channel: self.channel,
            view: self.view.clone(),
        }
    }
}

impl<T: HttpTransport> ChatOverlay<T> {
    pub fn new(client: ApiClient<T>, channel: ChatChannel) -> Self {
        Self {
            client,
            channel,
            view: Rc::new(ViewState::new(ChatState::default())),
        }
    }

    /// 按角色选择消息通道，没有通道的角色（管理员）返回 None
    pub fn for_role(client: ApiClient<T>, role: Role) -> Option<Self> {
        ChatChannel::for_role(role).map(|channel| Self::new(client, channel))
    }

    pub fn state(&self) -> ChatState {
        self.view.snapshot()
    }

    pub fn subscribe(&self, listener: impl Fn(&ChatState) + 'static) {
        self.view.subscribe(listener);
    }

    pub fn unmount(&self) {
        self.view.unmount();
    }

    /// 打开与某人的会话并加载历史消息
    pub async fn open(&self, target: ConversationTarget) -> ClientResult<()> {
        let ticket = self.view.begin_load();
        let peer = target.peer_id.clone();
        self.view.update(|s| {
            *s = ChatState {
                target: Some(target),
                loading: true,
                revision: s.revision + 1,
                ..ChatState::default()
            };
        });

        let request = MessageHistoryRequest {
            channel: self.channel,
            other_user_id: peer.clone(),
        };
        let result = self.client.call(&request).await;
        if !self.view.is_current(ticket) {
            debug!("[Chat] Dropping history for closed conversation with {}.", peer);
            return Ok(());
        }

        match result {
            Ok(history) => {
                let mut messages: Vec<ChatMessage> =
                    history.into_iter().map(ChatMessage::from).collect();
                messages.sort_by_key(|m| m.timestamp);
                self.view.update(|s| {
                    s.messages = messages;
                    s.loading = false;
                    s.revision += 1;
                });
                Ok(())
            }
            Err(e) => {
                error!("[Chat] Failed to load messages with {}: {}", peer, e);
                self.view.update(|s| {
                    s.loading = false;
                    s.error = Some("Failed to load messages.".to_string());
                });
                Err(e.in_op_with("chat.open", peer.to_string()))
            }
        }
    }

    /// 关闭会话；之后到达的响应全部忽略
    pub fn close(&self) {
        self.view.begin_load();
        self.view.update(|s| {
            *s = ChatState {
                revision: s.revision + 1,
                ..ChatState::default()
            };
        });
    }

    pub fn set_draft(&self, draft: impl Into<String>) {
        let draft = draft.into();
        self.view.update(|s| s.draft = draft);
    }

    /// 发送当前草稿
    pub async fn send_draft(&self) -> ClientResult<()> {
        let draft = self.view.with(|s| s.draft.clone());
        self.send(&draft).await
    }

    /// 发送消息
    ///
    /// 空白内容、历史消息仍在加载或已有消息在发送中时直接拒绝，不改变状态。
    pub async fn send(&self, text: &str) -> ClientResult<()> {
        let content = text.trim().to_string();
        if content.is_empty() {
            return Err(ClientError::validation("Message cannot be empty").in_op("chat.send"));
        }

        let (target, loading, sending) =
            self.view.with(|s| (s.target.clone(), s.loading, s.sending));
        let Some(target) = target else {
            return Err(ClientError::validation("No conversation is open").in_op("chat.send"));
        };
        // 历史加载完成时会整体替换列表
        if loading {
            return Err(
                ClientError::validation("Messages are still loading").in_op("chat.send"),
            );
        }
        if sending {
            return Err(
                ClientError::validation("A message is already being sent").in_op("chat.send"),
            );
        }

        let tentative = Uuid::new_v4();
        let ticket = self.view.ticket();
        self.view.update(|s| {
            s.draft.clear();
            s.sending = true;
            s.error = None;
            s.messages.push(ChatMessage {
                id: MessageId::Tentative(tentative),
                content: content.clone(),
                sender_role: Some(self.channel.role()),
                timestamp: Utc::now(),
                pending: true,
            });
            s.revision += 1;
        });

        let request = SendMessageRequest {
            channel: self.channel,
            to_user_id: target.peer_id.clone(),
            content,
            chat_session_id: target.idea_id.clone(),
        };
        let result = self.client.call(&request).await;
        if !self.view.is_current(ticket) {
            debug!("[Chat] Conversation closed before the send completed.");
            return result.map(|_| ()).map_err(|e| e.in_op("chat.send"));
        }

        let tentative_id = MessageId::Tentative(tentative);
        match result {
            Ok(receipt) => {
                let receipt = receipt.into_option();
                self.view.update(|s| {
                    if let Some(message) = s.messages.iter_mut().find(|m| m.id == tentative_id) {
                        if let Some(receipt) = receipt {
                            message.id = MessageId::Confirmed(receipt.id);
                            if let Some(timestamp) = receipt.timestamp {
                                message.timestamp = timestamp;
                            }
                        }
                        message.pending = false;
                    }
                    s.sending = false;
                    s.revision += 1;
                });
                Ok(())
            }
            Err(e) => {
                error!("[Chat] Failed to send message to {}: {}", target.peer_id, e);
                self.view.update(|s| {
                    s.messages.retain(|m| m.id != tentative_id);
                    s.sending = false;
                    s.error = Some(SEND_FAILED.to_string());
                    s.revision += 1;
                });
                Err(e.in_op_with("chat.send", target.peer_id.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests;
