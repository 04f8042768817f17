use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, InvalidHeaderValue, COOKIE, USER_AGENT};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, instrument, trace};

use crate::config::Credentials;
use crate::constants::{CHAT_API_METHOD, CHAT_API_NAME, CHAT_API_VERSION, CHAT_USER_AGENT};
use crate::db::models::{ChannelId, Message, MessageId};

pub type ChatResult<T> = core::result::Result<T, ChatErr>;

#[derive(Debug, Error)]
pub enum ChatErr {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("api rejected the request: {0}")]
    Api(Value),

    #[error("while creating a HeaderValue ({0})")]
    Header(#[from] InvalidHeaderValue),
}

/// Which side of the anchor a page is fetched from. `Before` walks toward the
/// start of history, `After` toward the newest message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageDirection {
    Before,
    After,
}

/// The single paging primitive both sync modes are built on. A trait so the
/// synchronizer can run against a scripted source in tests.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch up to `count` messages strictly on the `direction` side of
    /// `anchor`, or the newest `count` messages when no anchor is given.
    async fn fetch_page(
        &self,
        channel_id: ChannelId,
        anchor: Option<MessageId>,
        direction: PageDirection,
        count: usize,
    ) -> ChatResult<Vec<Message>>;
}

/// Client for the Synology-style chat post endpoint: one form-encoded POST
/// under a session cookie plus CSRF token.
#[derive(Debug)]
pub struct ChatClient {
    http: reqwest::Client,
    api_url: String,
    headers: HeaderMap,
}

impl ChatClient {
    pub fn new(credentials: &Credentials) -> ChatResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_str(&credentials.chat_cookie)?);
        headers.insert("x-syno-token", HeaderValue::from_str(&credentials.chat_token)?);
        headers.insert(USER_AGENT, HeaderValue::from_static(CHAT_USER_AGENT));

        debug!("built session headers for chat api");

        Ok(Self {
            http: reqwest::Client::new(),
            api_url: credentials.chat_api_url.clone(),
            headers,
        })
    }
}

#[async_trait]
impl PageSource for ChatClient {
    #[instrument(skip(self))]
    async fn fetch_page(
        &self,
        channel_id: ChannelId,
        anchor: Option<MessageId>,
        direction: PageDirection,
        count: usize,
    ) -> ChatResult<Vec<Message>> {
        let (prev_count, next_count) = match direction {
            PageDirection::Before => (count, 0),
            PageDirection::After => (0, count),
        };

        let mut payload = vec![
            ("api", CHAT_API_NAME.to_string()),
            ("method", CHAT_API_METHOD.to_string()),
            ("version", CHAT_API_VERSION.to_string()),
            ("channel_id", channel_id.to_string()),
            ("prev_count", prev_count.to_string()),
            ("next_count", next_count.to_string()),
            ("create_at", "null".to_string()),
        ];
        if let Some(anchor) = anchor {
            payload.push(("post_id", anchor.to_string()));
        }

        let response = self
            .http
            .post(&self.api_url)
            .headers(self.headers.clone())
            .form(&payload)
            .send()
            .await?
            .error_for_status()?;

        let body = response.json::<ChatListResponse>().await?;
        if !body.success {
            return Err(ChatErr::Api(body.error.unwrap_or(Value::Null)));
        }

        let mut posts = body.data.unwrap_or_default().posts;
        // the wire shape omits the channel, stamp it so archives stay
        // self-describing
        for post in posts.iter_mut() {
            post.channel_id = channel_id;
        }

        trace!(post_count = posts.len(), "fetched page");
        Ok(posts)
    }
}

#[derive(Debug, Deserialize)]
struct ChatListResponse {
    success: bool,

    #[serde(default)]
    data: Option<PostPage>,

    #[serde(default)]
    error: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
struct PostPage {
    #[serde(default)]
    posts: Vec<Message>,
}
