//! Signed-in user state.

use models::User;
use tracing::info;

/// Starts out loading; the first `set_user`/`sign_in`/`sign_out` settles it.
#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    user: Option<User>,
    is_authenticated: bool,
    is_loading: bool,
}

impl Default for Session {
    fn default() -> Self { Self { user: None, is_authenticated: false, is_loading: true } }
}

impl Session {
    pub fn new() -> Self { Self::default() }

    pub fn user(&self) -> Option<&User> { self.user.as_ref() }

    pub fn is_authenticated(&self) -> bool { self.is_authenticated }

    pub fn is_loading(&self) -> bool { self.is_loading }

    /// Restore a known user (or none) without counting it as a fresh sign-in.
    pub fn set_user(&mut self, user: Option<User>) {
        self.is_authenticated = user.is_some();
        self.user = user;
        self.is_loading = false;
    }

    pub fn sign_in(&mut self, user: User) {
        info!(email = %user.email, role = ?user.role, "signed in");
        self.set_user(Some(user));
    }

    pub fn sign_out(&mut self) {
        if let Some(user) = &self.user {
            info!(email = %user.email, "signed out");
        }
        self.set_user(None);
    }

    pub fn set_loading(&mut self, loading: bool) { self.is_loading = loading; }

    /// Where to land after sign-in; `None` keeps the shopper on the storefront.
    pub fn dashboard_path(&self) -> Option<&'static str> {
        self.user.as_ref().and_then(|u| u.role.dashboard_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::Role;

    fn admin() -> User {
        User {
            id: Some("u1".into()),
            full_name: "Admin".into(),
            email: "admin@example.com".into(),
            role: Role::Admin,
            phone: None,
        }
    }

    #[test]
    fn starts_loading_and_anonymous() {
        let s = Session::new();
        assert!(s.is_loading());
        assert!(!s.is_authenticated());
        assert!(s.user().is_none());
    }

    #[test]
    fn sign_in_then_out() {
        let mut s = Session::new();
        s.sign_in(admin());
        assert!(s.is_authenticated());
        assert!(!s.is_loading());
        assert_eq!(s.dashboard_path(), Some("/dashboard/admin/dashboard"));

        s.sign_out();
        assert!(!s.is_authenticated());
        assert!(s.user().is_none());
        assert_eq!(s.dashboard_path(), None);
    }

    #[test]
    fn set_user_none_settles_loading() {
        let mut s = Session::new();
        s.set_user(None);
        assert!(!s.is_loading());
        s.set_loading(true);
        assert!(s.is_loading());
    }
}
