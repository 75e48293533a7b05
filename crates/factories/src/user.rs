//! User fixtures. [`user`] is the base; every other function overrides a few
//! fields of it.

use shared::domain::User;

use crate::{avatar, id, location};

/// Verified, not opted out, located in the US, no created or member projects.
pub fn user() -> User {
    User::builder(id::user_id())
        .avatar(avatar::avatar())
        .name("Some Name")
        .is_email_verified(true)
        .opted_out_of_recommendations(false)
        .location(location::united_states())
        .build()
}

pub fn user_not_verified_email() -> User {
    user().to_builder().is_email_verified(false).build()
}

pub fn social_user() -> User {
    user().to_builder().social(true).build()
}

pub fn collaborator() -> User {
    user()
        .to_builder()
        .created_projects_count(0)
        .member_projects_count(10)
        .build()
}

pub fn creator() -> User {
    user()
        .to_builder()
        .created_projects_count(5)
        .member_projects_count(10)
        .build()
}

pub fn german_user() -> User {
    user().to_builder().location(location::germany()).build()
}

pub fn mexican_user() -> User {
    user().to_builder().location(location::mexico()).build()
}

pub fn no_recommendations() -> User {
    user().to_builder().opted_out_of_recommendations(true).build()
}
