use shared::domain::{CommentId, LocationId, ProjectId, UserId};

pub const USER_ID: i64 = 1;
pub const CREATOR_ID: i64 = 2;
pub const PROJECT_ID: i64 = 1_000;
pub const COMMENT_ID_BASE: i64 = 10_000;

pub fn user_id() -> UserId {
    UserId(USER_ID)
}

pub fn creator_id() -> UserId {
    UserId(CREATOR_ID)
}

pub fn project_id() -> ProjectId {
    ProjectId(PROJECT_ID)
}

pub fn comment_id(index: u32) -> CommentId {
    CommentId(COMMENT_ID_BASE + i64::from(index))
}

pub fn location_id(country: &str) -> LocationId {
    match country {
        "DE" => LocationId(638_242),
        "MX" => LocationId(116_545),
        _ => LocationId(12_589_335),
    }
}
