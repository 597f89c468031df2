use std::sync::Arc;

use crate::{application::user_service::UserService, infrastructure::Session};

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService>,
    pub session: Arc<dyn Session>,
}

impl AppState {
    pub fn new(user_service: Arc<UserService>, session: Arc<dyn Session>) -> Self {
        Self {
            user_service,
            session,
        }
    }
}
