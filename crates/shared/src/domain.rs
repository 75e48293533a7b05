use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub i64);
    };
}

id_newtype!(UserId);
id_newtype!(ProjectId);
id_newtype!(CommentId);
id_newtype!(LocationId);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Avatar {
    pub small: String,
    pub medium: String,
    pub thumb: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: LocationId,
    pub name: String,
    pub displayable_name: String,
    pub country: String,
    pub state: Option<String>,
    pub expanded_country: String,
}

/// Account identity. Immutable once built; variants are derived through
/// [`User::to_builder`], which carries the identifier over untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    name: String,
    avatar: Avatar,
    is_email_verified: bool,
    opted_out_of_recommendations: bool,
    social: bool,
    location: Option<Location>,
    created_projects_count: u32,
    member_projects_count: u32,
}

impl User {
    pub fn builder(id: UserId) -> UserBuilder {
        UserBuilder {
            id,
            name: String::new(),
            avatar: Avatar {
                small: String::new(),
                medium: String::new(),
                thumb: String::new(),
            },
            is_email_verified: false,
            opted_out_of_recommendations: false,
            social: false,
            location: None,
            created_projects_count: 0,
            member_projects_count: 0,
        }
    }

    pub fn to_builder(&self) -> UserBuilder {
        UserBuilder {
            id: self.id,
            name: self.name.clone(),
            avatar: self.avatar.clone(),
            is_email_verified: self.is_email_verified,
            opted_out_of_recommendations: self.opted_out_of_recommendations,
            social: self.social,
            location: self.location.clone(),
            created_projects_count: self.created_projects_count,
            member_projects_count: self.member_projects_count,
        }
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn avatar(&self) -> &Avatar {
        &self.avatar
    }

    pub fn is_email_verified(&self) -> bool {
        self.is_email_verified
    }

    pub fn opted_out_of_recommendations(&self) -> bool {
        self.opted_out_of_recommendations
    }

    pub fn is_social(&self) -> bool {
        self.social
    }

    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    pub fn created_projects_count(&self) -> u32 {
        self.created_projects_count
    }

    pub fn member_projects_count(&self) -> u32 {
        self.member_projects_count
    }

    pub fn is_creator(&self) -> bool {
        self.created_projects_count > 0
    }
}

/// Builder for [`User`]. The identifier is fixed by [`User::builder`].
#[derive(Debug, Clone)]
pub struct UserBuilder {
    id: UserId,
    name: String,
    avatar: Avatar,
    is_email_verified: bool,
    opted_out_of_recommendations: bool,
    social: bool,
    location: Option<Location>,
    created_projects_count: u32,
    member_projects_count: u32,
}

impl UserBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn avatar(mut self, avatar: Avatar) -> Self {
        self.avatar = avatar;
        self
    }

    pub fn is_email_verified(mut self, verified: bool) -> Self {
        self.is_email_verified = verified;
        self
    }

    pub fn opted_out_of_recommendations(mut self, opted_out: bool) -> Self {
        self.opted_out_of_recommendations = opted_out;
        self
    }

    pub fn social(mut self, social: bool) -> Self {
        self.social = social;
        self
    }

    pub fn location(mut self, location: impl Into<Option<Location>>) -> Self {
        self.location = location.into();
        self
    }

    pub fn created_projects_count(mut self, count: u32) -> Self {
        self.created_projects_count = count;
        self
    }

    pub fn member_projects_count(mut self, count: u32) -> Self {
        self.member_projects_count = count;
        self
    }

    pub fn build(self) -> User {
        User {
            id: self.id,
            name: self.name,
            avatar: self.avatar,
            is_email_verified: self.is_email_verified,
            opted_out_of_recommendations: self.opted_out_of_recommendations,
            social: self.social,
            location: self.location,
            created_projects_count: self.created_projects_count,
            member_projects_count: self.member_projects_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub slug: String,
    pub creator: User,
    /// Whether the current user has pledged to this project.
    pub is_backing: bool,
    pub comments_count: u32,
}

impl Project {
    pub fn is_backing(&self) -> bool {
        self.is_backing
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub body: String,
    pub author: User,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Comment {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod tests;
