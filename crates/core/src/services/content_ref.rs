//! Typed references to moderatable content.

use std::collections::{HashMap, HashSet};

use hushboard_common::{AppError, AppResult};
use hushboard_db::entities::{message, post, reply, report, report::ContentKind};
use hushboard_db::repositories::{MessageRepository, PostRepository, ReplyRepository};
use serde::{Deserialize, Serialize};

/// A reference to a post, message or reply.
///
/// Replies live under a post, so a reply reference always carries its
/// parent id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentRef {
    Post {
        id: String,
    },
    Message {
        id: String,
    },
    Reply {
        id: String,
        #[serde(rename = "parentId")]
        parent_id: String,
    },
}

impl ContentRef {
    #[must_use]
    pub const fn kind(&self) -> ContentKind {
        match self {
            Self::Post { .. } => ContentKind::Post,
            Self::Message { .. } => ContentKind::Message,
            Self::Reply { .. } => ContentKind::Reply,
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Post { id } | Self::Message { id } | Self::Reply { id, .. } => id,
        }
    }

    #[must_use]
    pub fn parent_id(&self) -> Option<&str> {
        match self {
            Self::Reply { parent_id, .. } => Some(parent_id),
            Self::Post { .. } | Self::Message { .. } => None,
        }
    }

    /// Build a reference from its loose parts, as they arrive over the wire
    /// or sit in a report row.
    pub fn from_parts(kind: ContentKind, id: &str, parent_id: Option<&str>) -> AppResult<Self> {
        let id = id.to_string();
        match kind {
            ContentKind::Post => Ok(Self::Post { id }),
            ContentKind::Message => Ok(Self::Message { id }),
            ContentKind::Reply => parent_id
                .filter(|p| !p.is_empty())
                .map(|p| Self::Reply {
                    id,
                    parent_id: p.to_string(),
                })
                .ok_or_else(|| AppError::BadRequest("A reply reference needs its post id".to_string())),
        }
    }

    /// The content a report points at.
    pub fn from_report(report: &report::Model) -> AppResult<Self> {
        Self::from_parts(report.target_type, &report.target_id, report.parent_id.as_deref())
    }
}

/// Live content as shown to a reviewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentSnapshot {
    Post(post::Model),
    Message(message::Model),
    Reply(reply::Model),
}

impl ContentSnapshot {
    #[must_use]
    pub const fn kind(&self) -> ContentKind {
        match self {
            Self::Post(_) => ContentKind::Post,
            Self::Message(_) => ContentKind::Message,
            Self::Reply(_) => ContentKind::Reply,
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Post(p) => &p.id,
            Self::Message(m) => &m.id,
            Self::Reply(r) => &r.id,
        }
    }

    /// Whether this snapshot is the content `target` points at. A reply
    /// must also sit under the referenced post.
    #[must_use]
    pub fn matches(&self, target: &ContentRef) -> bool {
        match (self, target) {
            (Self::Post(p), ContentRef::Post { id }) => &p.id == id,
            (Self::Message(m), ContentRef::Message { id }) => &m.id == id,
            (Self::Reply(r), ContentRef::Reply { id, parent_id }) => {
                &r.id == id && &r.post_id == parent_id
            }
            _ => false,
        }
    }

    /// Owner uid of the content.
    #[must_use]
    pub fn user_id(&self) -> &str {
        match self {
            Self::Post(p) => &p.user_id,
            Self::Message(m) => &m.user_id,
            Self::Reply(r) => &r.user_id,
        }
    }
}

/// Fetch and removal of content by reference, dispatched on its kind.
#[derive(Clone)]
pub struct ContentStore {
    post_repo: PostRepository,
    message_repo: MessageRepository,
    reply_repo: ReplyRepository,
}

impl ContentStore {
    #[must_use]
    pub const fn new(
        post_repo: PostRepository,
        message_repo: MessageRepository,
        reply_repo: ReplyRepository,
    ) -> Self {
        Self {
            post_repo,
            message_repo,
            reply_repo,
        }
    }

    /// Fetch the content behind `target`, if it still exists.
    pub async fn fetch(&self, target: &ContentRef) -> AppResult<Option<ContentSnapshot>> {
        Ok(match target {
            ContentRef::Post { id } => self.post_repo.find_by_id(id).await?.map(ContentSnapshot::Post),
            ContentRef::Message { id } => self
                .message_repo
                .find_by_id(id)
                .await?
                .map(ContentSnapshot::Message),
            ContentRef::Reply { id, parent_id } => self
                .reply_repo
                .find_by_id(id)
                .await?
                .filter(|r| &r.post_id == parent_id)
                .map(ContentSnapshot::Reply),
        })
    }

    /// Fetch many references at once, keyed by content id.
    ///
    /// Issues one batched lookup per kind, run concurrently. References to
    /// content that no longer exists are simply absent from the map. Callers
    /// pair entries back up with [`ContentSnapshot::matches`].
    pub async fn fetch_many<'a, I>(&self, targets: I) -> AppResult<HashMap<String, ContentSnapshot>>
    where
        I: IntoIterator<Item = &'a ContentRef>,
    {
        let mut post_ids = HashSet::new();
        let mut message_ids = HashSet::new();
        let mut reply_ids = HashSet::new();

        for target in targets {
            let bucket = match target.kind() {
                ContentKind::Post => &mut post_ids,
                ContentKind::Message => &mut message_ids,
                ContentKind::Reply => &mut reply_ids,
            };
            bucket.insert(target.id().to_string());
        }

        let post_ids: Vec<String> = post_ids.into_iter().collect();
        let message_ids: Vec<String> = message_ids.into_iter().collect();
        let reply_ids: Vec<String> = reply_ids.into_iter().collect();

        let (posts, messages, replies) = futures::try_join!(
            self.post_repo.find_by_ids(&post_ids),
            self.message_repo.find_by_ids(&message_ids),
            self.reply_repo.find_by_ids(&reply_ids),
        )?;

        let snapshots = posts
            .into_iter()
            .map(ContentSnapshot::Post)
            .chain(messages.into_iter().map(ContentSnapshot::Message))
            .chain(replies.into_iter().map(ContentSnapshot::Reply))
            .map(|s| (s.id().to_string(), s))
            .collect();

        Ok(snapshots)
    }

    /// Remove the content behind `target`.
    ///
    /// Posts and messages are hard-deleted; replies are replaced by the
    /// tombstone. Returns `false` when there was nothing to remove.
    ///
    /// A reply that exists under a different post than the one referenced
    /// is a `BadRequest`, not an absence.
    pub async fn remove(&self, target: &ContentRef) -> AppResult<bool> {
        match target {
            ContentRef::Post { id } => self.post_repo.delete(id).await,
            ContentRef::Message { id } => self.message_repo.delete(id).await,
            ContentRef::Reply { id, parent_id } => {
                if self.reply_repo.tombstone(id, Some(parent_id)).await? {
                    return Ok(true);
                }
                match self.reply_repo.find_by_id(id).await? {
                    Some(reply) if &reply.post_id != parent_id => Err(AppError::BadRequest(
                        format!("Reply {id} does not belong to post {parent_id}"),
                    )),
                    _ => Ok(false),
                }
            }
        }
    }
}
