// Data model of the server payloads: threads of posts, each post optionally
// carrying its own comment subtree, plus board metadata and the outgoing
// editor payloads. The thread endpoints emit camelCase, the board activity
// endpoint still emits snake_case for some fields, hence the aliases.

use board_ref::{BoardRef, CommentRef, PostRef, ThreadRef};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnError};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Identity {
    pub name: String,
    pub avatar: String,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub id: String,
    pub name: String,
    #[serde(alias = "avatar_url")]
    pub avatar_url: String,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Permissions {
    #[serde(alias = "can_edit_board_data")]
    pub can_edit_board_data: bool,
}

#[serde_as]
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostTags {
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default, alias = "whisper_tags")]
    pub whisper_tags: Vec<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default, alias = "index_tags")]
    pub index_tags: Vec<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default, alias = "category_tags")]
    pub category_tags: Vec<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default, alias = "content_warnings")]
    pub content_warnings: Vec<String>,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize)]
pub struct PostOptions {
    #[serde(default)]
    pub wide: bool,
}

#[serde_as]
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(alias = "post_id")]
    pub post_id: PostRef,
    #[serde(alias = "thread_id")]
    pub thread_id: ThreadRef,
    #[serde(default, alias = "parent_post_id")]
    pub parent_post_id: Option<PostRef>,
    #[serde(alias = "secret_identity")]
    pub secret_identity: Identity,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default, alias = "user_identity")]
    pub user_identity: Option<Identity>,
    pub created: DateTime<Utc>,
    pub content: String,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub options: PostOptions,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub tags: PostTags,
    #[serde(default)]
    pub comments: Option<Vec<Comment>>,
    #[serde(default, alias = "posts_amount")]
    pub posts_amount: u64,
    #[serde(default, alias = "comments_amount")]
    pub comments_amount: u64,
    #[serde(default, alias = "threads_amount")]
    pub threads_amount: u64,
    #[serde(default, alias = "new_posts_amount")]
    pub new_posts_amount: u64,
    #[serde(default, alias = "new_comments_amount")]
    pub new_comments_amount: u64,
    #[serde(default, alias = "is_new")]
    pub is_new: bool,
    #[serde(default, alias = "is_own")]
    pub is_own: bool,
}

impl Post {
    pub fn category_tags(&self) -> &[String] {
        &self.tags.category_tags
    }

    // posts_amount counts every post in the thread, head included; the feed
    // shows contributions without the head.
    pub fn total_contributions(&self) -> u64 {
        self.posts_amount.saturating_sub(1)
    }

    pub fn has_new_activity(&self) -> bool {
        self.is_new || self.new_comments_amount > 0
    }
}

#[serde_as]
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(alias = "comment_id")]
    pub comment_id: CommentRef,
    #[serde(default, alias = "parent_comment_id")]
    pub parent_comment_id: Option<CommentRef>,
    #[serde(default, alias = "chain_parent_id")]
    pub chain_parent_id: Option<CommentRef>,
    #[serde(alias = "secret_identity")]
    pub secret_identity: Identity,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default, alias = "user_identity")]
    pub user_identity: Option<Identity>,
    pub created: DateTime<Utc>,
    pub content: String,
    #[serde(default, alias = "is_new")]
    pub is_new: bool,
}

impl Comment {
    // A comment posted as a continuation of a chain carries chainParentId
    // instead of parentCommentId; either one threads it under that comment.
    pub fn parent_id(&self) -> Option<&CommentRef> {
        self.parent_comment_id
            .as_ref()
            .or(self.chain_parent_id.as_ref())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DefaultView {
    #[default]
    Thread,
    Gallery,
    Timeline,
}

#[serde_as]
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Thread {
    #[serde(alias = "thread_id")]
    pub thread_id: ThreadRef,
    #[serde(default)]
    pub posts: Vec<Post>,
    #[serde(default, alias = "is_new")]
    pub is_new: bool,
    #[serde(default, alias = "new_posts_amount")]
    pub new_posts_amount: u64,
    #[serde(default, alias = "new_comments_amount")]
    pub new_comments_amount: u64,
    #[serde(default, alias = "total_comments_amount")]
    pub total_comments_amount: u64,
    #[serde(default, alias = "total_posts_amount")]
    pub total_posts_amount: u64,
    #[serde(default, alias = "direct_threads_amount")]
    pub direct_threads_amount: u64,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default, alias = "last_activity")]
    pub last_activity: Option<DateTime<Utc>>,
    #[serde(default)]
    pub muted: bool,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default, alias = "default_view")]
    pub default_view: DefaultView,
    #[serde(default, alias = "personal_identity")]
    pub personal_identity: Option<Identity>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardActivityPage {
    #[serde(default, alias = "next_page_cursor")]
    pub next_page_cursor: Option<String>,
    #[serde(default)]
    pub activity: Vec<Thread>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BoardDescriptionKind {
    Text,
    CategoryFilter,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardDescription {
    #[serde(default)]
    pub id: Option<u64>,
    pub index: u64,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: BoardDescriptionKind,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub categories: Option<Vec<String>>,
}

#[serde_as]
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardData {
    pub slug: BoardRef,
    #[serde(alias = "avatar_url")]
    pub avatar_url: String,
    pub tagline: String,
    #[serde(alias = "accent_color")]
    pub accent_color: String,
    #[serde(default)]
    pub descriptions: Vec<BoardDescription>,
    #[serde(default)]
    pub muted: bool,
    #[serde(default)]
    pub permissions: Option<Permissions>,
    #[serde(default, alias = "posting_identities")]
    pub posting_identities: Option<Vec<Role>>,
}

// Outgoing editor payloads.

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPayload {
    pub content: String,
    pub force_anonymous: bool,
    pub whisper_tags: Vec<String>,
    pub index_tags: Vec<String>,
    pub category_tags: Vec<String>,
    pub content_warnings: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity_id: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentPayload {
    pub content: String,
    pub force_anonymous: bool,
    pub reply_to_comment_id: Option<CommentRef>,
}
