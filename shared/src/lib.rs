use chrono::{DateTime, NaiveDateTime, Utc};
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

pub mod protocol;

// =========================================================
// 常量定义 (Constants)
// =========================================================

/// 持久化会话所使用的 LocalStorage 键
pub const STORAGE_SESSION_KEY: &str = "user";
pub const HEADER_AUTHORIZATION: &str = "Authorization";
pub const HEADER_CONTENT_TYPE: &str = "Content-Type";

/// 创意未填写标签/分类时提交的默认值
pub const DEFAULT_IDEA_TAGS: &str = "General";
pub const DEFAULT_IDEA_CATEGORY: &str = "Startup";

// =========================================================
// 基础类型 (Primitives)
// =========================================================

/// 服务端标识符
///
/// 后端有的接口返回数字 id，有的返回字符串 id，这里两者都接受，
/// 并按原样回传。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Id {
    Number(i64),
    Text(String),
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Id::Number(n) => write!(f, "{}", n),
            Id::Text(s) => write!(f, "{}", s),
        }
    }
}

impl Id {
    /// 作为 URL 路径段使用时的编码形式
    pub fn path_segment(&self) -> String {
        match self {
            Id::Number(n) => n.to_string(),
            Id::Text(s) => urlencoding::encode(s).into_owned(),
        }
    }
}

impl From<i64> for Id {
    fn from(n: i64) -> Self {
        Id::Number(n)
    }
}

impl From<&str> for Id {
    fn from(s: &str) -> Self {
        Id::Text(s.to_string())
    }
}

/// `null` 按默认值处理（后端对空字段有时返回 null 而不是省略）
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// 解析服务端时间戳
///
/// 带时区偏移的按偏移换算；不带偏移的（如 `2024-05-01T10:00:00.1234567`）按 UTC 处理。
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .ok()
        .or_else(|| raw.parse::<NaiveDateTime>().ok().map(|t| t.and_utc()))
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {:?}", raw)))
}

/// 回执里的时间戳可有可无，无法解析时忽略
fn lenient_optional_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Loose<String>>::deserialize(deserializer)?
        .and_then(Loose::into_option)
        .and_then(|raw| parse_timestamp(&raw)))
}

/// 无法识别的发送者（未知角色名、数字 id 等）记为 None
fn lenient_role<'de, D>(deserializer: D) -> Result<Option<Role>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Loose<String>>::deserialize(deserializer)?
        .and_then(Loose::into_option)
        .and_then(|raw| raw.parse().ok()))
}

// =========================================================
// 角色 (Role)
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Entrepreneur,
    Investor,
    Admin,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Entrepreneur, Role::Investor, Role::Admin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Entrepreneur => "Entrepreneur",
            Role::Investor => "Investor",
            Role::Admin => "Admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 无法识别的角色字符串
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown role: {:?}", self.0)
    }
}

impl std::error::Error for UnknownRole {}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Role::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// =========================================================
// 会话 (Session)
// =========================================================

/// 服务端签发的会话信息（令牌 + 角色 + 身份）
///
/// 令牌是不透明字符串，客户端不做解码。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(default, alias = "id")]
    pub user_id: Option<Id>,
    #[serde(default, alias = "username", alias = "userName")]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    pub role: Role,
    pub token: String,
}

impl Session {
    /// 令牌为空的会话视为无效
    pub fn is_valid(&self) -> bool {
        !self.token.trim().is_empty()
    }

    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .or(self.email.as_deref())
            .unwrap_or(self.role.as_str())
    }

    /// 头像使用的首字母
    pub fn initial(&self) -> char {
        self.display_name()
            .chars()
            .next()
            .map(|c| c.to_ascii_uppercase())
            .unwrap_or('U')
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

/// 注册接口返回的用户信息，字段全部可选
///
/// 只有同时带回令牌和角色时才能直接建立会话。
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredUser {
    #[serde(default, alias = "id")]
    pub user_id: Option<Id>,
    #[serde(default, alias = "username", alias = "userName")]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub token: Option<String>,
}

impl RegisteredUser {
    pub fn into_session(self) -> Option<Session> {
        let session = Session {
            user_id: self.user_id,
            name: self.name,
            email: self.email,
            role: self.role?,
            token: self.token?,
        };
        session.is_valid().then_some(session)
    }
}

// =========================================================
// 领域模型 (Domain Models)
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    #[serde(default)]
    pub id: Option<Id>,
    #[serde(default, alias = "username", deserialize_with = "null_as_default")]
    pub name: String,
}

/// 创业者发布的项目创意
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Idea {
    pub id: Id,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub budget: f64,
    #[serde(default, alias = "entrepreneurId")]
    pub owner_id: Option<Id>,
    #[serde(default)]
    pub entrepreneur: Option<Person>,
    /// 对该创意感兴趣的投资人（创业者一侧聊天的对象）
    #[serde(default)]
    pub investor_id: Option<Id>,
    #[serde(default, alias = "isLiked", deserialize_with = "null_as_default")]
    pub liked_by_current_user: bool,
    #[serde(default, alias = "isSaved", deserialize_with = "null_as_default")]
    pub saved_by_current_user: bool,
}

impl Idea {
    /// 创意作者的用户 id
    pub fn owner(&self) -> Option<&Id> {
        self.owner_id
            .as_ref()
            .or_else(|| self.entrepreneur.as_ref().and_then(|p| p.id.as_ref()))
    }

    pub fn owner_name(&self) -> &str {
        self.entrepreneur
            .as_ref()
            .map(|p| p.name.as_str())
            .filter(|n| !n.trim().is_empty())
            .unwrap_or("Entrepreneur")
    }

    /// 逗号分隔的标签
    pub fn tag_list(&self) -> Vec<&str> {
        self.tags
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect()
    }
}

/// 创建/更新创意时提交的字段（后端 DTO 使用 PascalCase）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct IdeaDraft {
    pub title: String,
    pub description: String,
    pub tags: String,
    pub category: String,
    pub budget: f64,
}

impl IdeaDraft {
    pub fn from_idea(idea: &Idea) -> Self {
        Self {
            title: idea.title.clone(),
            description: idea.description.clone(),
            tags: idea.tags.clone(),
            category: idea.category.clone(),
            budget: idea.budget,
        }
    }

    /// 去除首尾空白后的副本，空的标签/分类换成默认值
    pub fn trimmed(&self) -> Self {
        let or_default = |value: &str, default: &str| {
            let value = value.trim();
            (if value.is_empty() { default } else { value }).to_string()
        };
        Self {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            tags: or_default(&self.tags, DEFAULT_IDEA_TAGS),
            category: or_default(&self.category, DEFAULT_IDEA_CATEGORY),
            budget: self.budget,
        }
    }

    /// 解析表单里的预算：留空为 0，其余必须是有限数字
    pub fn parse_budget(raw: &str) -> Option<f64> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Some(0.0);
        }
        raw.parse::<f64>().ok().filter(|b| b.is_finite())
    }
}

/// 会话消息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: Id,
    pub content: String,
    /// 无法识别时为 None，界面按对方消息显示
    #[serde(default, alias = "sender", deserialize_with = "lenient_role")]
    pub sender_role: Option<Role>,
    #[serde(alias = "sentAt", alias = "createdAt", deserialize_with = "lenient_timestamp")]
    pub timestamp: DateTime<Utc>,
    #[serde(default, alias = "chatSessionId")]
    pub conversation_id: Option<Id>,
}

/// 发送消息后服务端的回执
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageReceipt {
    pub id: Id,
    #[serde(
        default,
        alias = "sentAt",
        alias = "createdAt",
        deserialize_with = "lenient_optional_timestamp"
    )]
    pub timestamp: Option<DateTime<Utc>>,
}

// =========================================================
// 响应信封 (Envelope)
// =========================================================

fn default_success() -> bool {
    true
}

/// 所有接口统一的响应外壳 `{success, data?, message?}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    #[serde(default = "default_success")]
    pub success: bool,
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

/// 形状不确定的响应数据：能解析就用，解析不了就忽略
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Loose<T> {
    Known(T),
    Unknown(IgnoredAny),
}

impl<T> Loose<T> {
    pub fn into_option(self) -> Option<T> {
        match self {
            Loose::Known(value) => Some(value),
            Loose::Unknown(_) => None,
        }
    }
}

/// 不关心内容的响应数据
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Ack;

impl<'de> Deserialize<'de> for Ack {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        IgnoredAny::deserialize(deserializer)?;
        Ok(Ack)
    }
}
