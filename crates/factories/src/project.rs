use shared::domain::{Project, User};

use crate::{avatar, id, location};

fn project_creator() -> User {
    User::builder(id::creator_id())
        .avatar(avatar::avatar())
        .name("Project Creator")
        .is_email_verified(true)
        .location(location::united_states())
        .created_projects_count(1)
        .build()
}

pub fn project() -> Project {
    Project {
        id: id::project_id(),
        name: "Some Project Name".into(),
        slug: "some-project-name".into(),
        creator: project_creator(),
        is_backing: false,
        comments_count: 0,
    }
}

/// [`project`] as seen by a user who has pledged to it.
pub fn backed_project() -> Project {
    Project {
        is_backing: true,
        ..project()
    }
}
