//! Authentication service implementation
//!
//! Admin authorization for the shop management panel. Admins are the
//! Telegram user IDs listed in the bot configuration.

use tracing::debug;
use crate::config::settings::Settings;

/// Authentication service for managing admin access
#[derive(Debug, Clone)]
pub struct AuthService {
    admin_ids: Vec<i64>,
}

impl AuthService {
    /// Create a new AuthService instance
    pub fn new(settings: &Settings) -> Self {
        Self {
            admin_ids: settings.bot.admin_ids.clone(),
        }
    }

    /// Check if user is a bot admin
    pub fn is_admin(&self, user_id: i64) -> bool {
        self.admin_ids.contains(&user_id)
    }

    /// Check if user can access the admin panel
    pub fn can_access_admin_panel(&self, user_id: i64) -> bool {
        let allowed = self.is_admin(user_id);
        debug!(user_id = user_id, allowed = allowed, "Admin panel access check");
        allowed
    }

    /// Admin chat IDs for notifications
    pub fn admin_ids(&self) -> &[i64] {
        &self.admin_ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> AuthService {
        let mut settings = Settings::default();
        settings.bot.admin_ids = vec![42, 99];
        AuthService::new(&settings)
    }

    #[test]
    fn test_admin_is_recognized() {
        let auth = service();
        assert!(auth.is_admin(42));
        assert!(auth.can_access_admin_panel(99));
    }

    #[test]
    fn test_non_admin_is_rejected() {
        let auth = service();
        assert!(!auth.is_admin(7));
        assert!(!auth.can_access_admin_panel(7));
    }
}
