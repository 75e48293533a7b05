use shared::domain::Avatar;

const AVATAR_BASE_URL: &str = "https://ksr-ugc.imgix.net/avatars/default";

pub fn avatar() -> Avatar {
    Avatar {
        small: format!("{AVATAR_BASE_URL}/small.jpg"),
        medium: format!("{AVATAR_BASE_URL}/medium.jpg"),
        thumb: format!("{AVATAR_BASE_URL}/thumb.jpg"),
    }
}
