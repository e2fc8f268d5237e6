use crate::{
    Ack, Credentials, Id, Idea, IdeaDraft, Loose, Message, MessageReceipt, RegisterForm,
    RegisteredUser, Role, Session,
};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Serialize};

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// Whether requests with this method carry a JSON body.
    pub fn has_body(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put)
    }
}

/// Data carried in the `data` field of a response envelope.
///
/// `absent` is what an endpoint means when the envelope has no `data` at all
/// (or the body is empty). Types without a sensible empty value return `None`,
/// which the client reports as a malformed response.
pub trait ResponseData: DeserializeOwned {
    fn absent() -> Option<Self> {
        None
    }
}

impl ResponseData for Ack {
    fn absent() -> Option<Self> {
        Some(Ack)
    }
}

impl<T: DeserializeOwned> ResponseData for Vec<T> {
    fn absent() -> Option<Self> {
        Some(Vec::new())
    }
}

impl<T: DeserializeOwned> ResponseData for Option<T> {
    fn absent() -> Option<Self> {
        Some(None)
    }
}

impl<T: DeserializeOwned> ResponseData for Loose<T> {
    fn absent() -> Option<Self> {
        Some(Loose::Unknown(IgnoredAny))
    }
}

impl ResponseData for Idea {}
impl ResponseData for Session {}

/// A trait that defines the request-response relationship and metadata for an API endpoint.
pub trait ApiRequest: Serialize {
    /// The response type carried in the envelope's `data`.
    type Response: ResponseData;
    /// The HTTP method.
    const METHOD: HttpMethod;
    /// Whether the request carries the session's bearer token. A 401 on an
    /// authenticated request means the session is gone; on an
    /// unauthenticated one it means the credentials were wrong.
    const AUTHENTICATED: bool = true;
    /// The URL path, including any query string.
    fn path(&self) -> String;
}

// =========================================================
// Auth
// =========================================================

impl ApiRequest for Credentials {
    type Response = Session;
    const METHOD: HttpMethod = HttpMethod::Post;
    const AUTHENTICATED: bool = false;

    fn path(&self) -> String {
        "/api/Auth/login".to_string()
    }
}

impl ApiRequest for RegisterForm {
    type Response = Loose<RegisteredUser>;
    const METHOD: HttpMethod = HttpMethod::Post;
    const AUTHENTICATED: bool = false;

    fn path(&self) -> String {
        "/api/Auth/register".to_string()
    }
}

// =========================================================
// Entrepreneur
// =========================================================

/// List the ideas owned by the current entrepreneur
#[derive(Debug, Serialize, Deserialize)]
pub struct MyIdeasRequest;

impl ApiRequest for MyIdeasRequest {
    type Response = Vec<Idea>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/api/Entrepreneur/my-ideas".to_string()
    }
}

/// Create an idea; the draft itself is the request body.
impl ApiRequest for IdeaDraft {
    type Response = Idea;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/api/Entrepreneur/create-idea".to_string()
    }
}

#[derive(Debug, Serialize)]
pub struct UpdateIdeaRequest {
    #[serde(skip)]
    pub id: Id,
    #[serde(flatten)]
    pub draft: IdeaDraft,
}

impl ApiRequest for UpdateIdeaRequest {
    // Some deployments answer with the updated record, some with nothing.
    type Response = Option<Idea>;
    const METHOD: HttpMethod = HttpMethod::Put;

    fn path(&self) -> String {
        format!("/api/Entrepreneur/update-idea/{}", self.id.path_segment())
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteIdeaRequest {
    #[serde(skip)]
    pub id: Id,
}

impl ApiRequest for DeleteIdeaRequest {
    type Response = Ack;
    const METHOD: HttpMethod = HttpMethod::Delete;

    fn path(&self) -> String {
        format!("/api/Entrepreneur/delete-idea/{}", self.id.path_segment())
    }
}

// =========================================================
// Investor
// =========================================================

/// Which investor collection to load
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdeaFeed {
    #[default]
    All,
    Liked,
    Saved,
}

impl IdeaFeed {
    pub const ALL: [IdeaFeed; 3] = [IdeaFeed::All, IdeaFeed::Liked, IdeaFeed::Saved];

    pub fn as_str(&self) -> &'static str {
        match self {
            IdeaFeed::All => "all",
            IdeaFeed::Liked => "liked",
            IdeaFeed::Saved => "saved",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListIdeasRequest {
    #[serde(skip)]
    pub feed: IdeaFeed,
}

impl ApiRequest for ListIdeasRequest {
    type Response = Vec<Idea>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        match self.feed {
            IdeaFeed::All => "/api/Investor/ideas".to_string(),
            IdeaFeed::Liked => "/api/Investor/ideas/liked".to_string(),
            IdeaFeed::Saved => "/api/Investor/ideas/saved".to_string(),
        }
    }
}

/// Server-side category search
#[derive(Debug, Serialize)]
pub struct CategorySearchRequest {
    #[serde(skip)]
    pub category: String,
}

impl ApiRequest for CategorySearchRequest {
    type Response = Vec<Idea>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        format!(
            "/api/Investor/ideas/search?category={}",
            urlencoding::encode(&self.category)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reaction {
    Like,
    Unlike,
    Save,
    Unsave,
}

impl Reaction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Reaction::Like => "like",
            Reaction::Unlike => "unlike",
            Reaction::Save => "save",
            Reaction::Unsave => "unsave",
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionRequest {
    #[serde(skip)]
    pub reaction: Reaction,
    pub idea_id: Id,
}

impl ApiRequest for ReactionRequest {
    type Response = Ack;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        format!("/api/Investor/ideas/{}", self.reaction.as_str())
    }
}

// =========================================================
// Messaging
// =========================================================

/// Messaging endpoints live under the sender's role prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatChannel {
    Entrepreneur,
    Investor,
}

impl ChatChannel {
    pub fn for_role(role: Role) -> Option<Self> {
        match role {
            Role::Entrepreneur => Some(ChatChannel::Entrepreneur),
            Role::Investor => Some(ChatChannel::Investor),
            Role::Admin => None,
        }
    }

    pub fn role(&self) -> Role {
        match self {
            ChatChannel::Entrepreneur => Role::Entrepreneur,
            ChatChannel::Investor => Role::Investor,
        }
    }

    fn prefix(&self) -> &'static str {
        match self {
            ChatChannel::Entrepreneur => "/api/Entrepreneur",
            ChatChannel::Investor => "/api/Investor",
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    #[serde(skip)]
    pub channel: ChatChannel,
    pub to_user_id: Id,
    pub content: String,
    pub chat_session_id: Option<Id>,
}

impl ApiRequest for SendMessageRequest {
    type Response = Loose<MessageReceipt>;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        format!("{}/message", self.channel.prefix())
    }
}

#[derive(Debug, Serialize)]
pub struct MessageHistoryRequest {
    #[serde(skip)]
    pub channel: ChatChannel,
    #[serde(skip)]
    pub other_user_id: Id,
}

impl ApiRequest for MessageHistoryRequest {
    type Response = Vec<Message>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        format!(
            "{}/messages/{}",
            self.channel.prefix(),
            self.other_user_id.path_segment()
        )
    }
}
