use chrono::{DateTime, Duration, Utc};
use shared::domain::Comment;

use crate::{id, user};

/// 2023-11-14T22:13:20Z, fixed so fixtures compare equal across calls.
const CREATED_AT_SECS: i64 = 1_700_000_000;

fn created_at(index: u32) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(CREATED_AT_SECS, 0).unwrap_or_default()
        + Duration::minutes(i64::from(index))
}

pub fn comment() -> Comment {
    comment_with_body(0, "Some Comment")
}

pub fn comment_with_body(index: u32, body: impl Into<String>) -> Comment {
    Comment {
        id: id::comment_id(index),
        body: body.into(),
        author: user::user(),
        created_at: created_at(index),
        deleted_at: None,
    }
}

pub fn deleted_comment() -> Comment {
    let comment = comment();
    Comment {
        deleted_at: Some(comment.created_at + Duration::hours(1)),
        ..comment
    }
}

/// `count` comments, oldest first, with distinct ids and bodies.
pub fn comments(count: u32) -> Vec<Comment> {
    (0..count)
        .map(|index| comment_with_body(index, format!("Comment #{}", index + 1)))
        .collect()
}
