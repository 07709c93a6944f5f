//! Follows, reactions and comments on feed activities.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::UserId;
use super::string_enum::string_enum;

/// Maximum comment length, in characters.
pub const MAX_COMMENT_CHARS: usize = 500;

string_enum! {
    /// Emoji-style reaction to a feed activity.
    pub enum ReactionKind ("reaction") {
        /// Red heart.
        Heart => "heart",
        /// Fire.
        Fire => "fire",
        /// Clapping hands.
        Clap => "clap",
        /// Surprised face.
        Wow => "wow",
    }
}

/// A user's reaction to one feed activity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reaction {
    /// Reacting user.
    pub user_id: UserId,
    /// Feed activity reacted to.
    pub activity_id: Uuid,
    /// Reaction kind.
    pub kind: ReactionKind,
    /// Creation instant.
    pub created_at: DateTime<Utc>,
}

/// Validation failures for comment bodies.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommentValidationError {
    /// Body was blank.
    #[error("Comment must not be empty.")]
    Empty,
    /// Body too long.
    #[error("Comment must be at most {max} characters.")]
    TooLong {
        /// Maximum accepted length.
        max: usize,
    },
}

/// Comment on a feed activity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    /// Comment identifier.
    pub id: Uuid,
    /// Feed activity commented on.
    pub activity_id: Uuid,
    /// Author.
    pub user_id: UserId,
    /// Trimmed body text.
    pub body: String,
    /// Creation instant.
    pub created_at: DateTime<Utc>,
}

impl Comment {
    /// Validate and build a new comment.
    pub fn new(
        activity_id: Uuid,
        user_id: UserId,
        body: &str,
        created_at: DateTime<Utc>,
    ) -> Result<Self, CommentValidationError> {
        let body = body.trim();
        if body.is_empty() {
            return Err(CommentValidationError::Empty);
        }
        if body.chars().count() > MAX_COMMENT_CHARS {
            return Err(CommentValidationError::TooLong {
                max: MAX_COMMENT_CHARS,
            });
        }
        Ok(Self {
            id: Uuid::new_v4(),
            activity_id,
            user_id,
            body: body.to_owned(),
            created_at,
        })
    }
}
