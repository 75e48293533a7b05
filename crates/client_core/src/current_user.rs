use shared::domain::User;
use tokio::sync::watch;
use tracing::info;

/// Source of the signed-in account. Observers always see a value; `None` means
/// signed out.
pub trait CurrentUserProvider: Send + Sync {
    fn observe(&self) -> watch::Receiver<Option<User>>;
}

pub struct CurrentUser {
    tx: watch::Sender<Option<User>>,
}

impl CurrentUser {
    pub fn new(initial: Option<User>) -> Self {
        let (tx, _) = watch::channel(initial);
        Self { tx }
    }

    pub fn signed_out() -> Self {
        Self::new(None)
    }

    pub fn login(&self, user: User) {
        info!(user_id = user.id().0, "current user: logged in");
        self.tx.send_replace(Some(user));
    }

    /// Replaces the cached account details; ignored while signed out.
    pub fn refresh(&self, user: User) {
        self.tx.send_if_modified(|current| match current {
            Some(existing) if *existing != user => {
                *existing = user;
                true
            }
            _ => false,
        });
    }

    pub fn logout(&self) {
        if self.tx.send_replace(None).is_some() {
            info!("current user: logged out");
        }
    }

    pub fn get(&self) -> Option<User> {
        self.tx.borrow().clone()
    }

    pub fn is_logged_in(&self) -> bool {
        self.tx.borrow().is_some()
    }
}

impl Default for CurrentUser {
    fn default() -> Self {
        Self::signed_out()
    }
}

impl CurrentUserProvider for CurrentUser {
    fn observe(&self) -> watch::Receiver<Option<User>> {
        self.tx.subscribe()
    }
}
