//! Credential providers for authenticated requests.

use std::sync::RwLock;

/// Supplies the bearer credential attached to every request.
///
/// Implementations are injected into [`crate::OrderClient`] so tests can use
/// fakes and applications can back them with whatever session store they have.
pub trait CredentialProvider: Send + Sync {
    /// Current bearer token, if signed in.
    fn get(&self) -> Option<String>;

    /// Forget the current token.
    fn clear(&self);
}

/// Never supplies a credential. Requests go out without `Authorization`.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCredentials;

impl CredentialProvider for NoCredentials {
    fn get(&self) -> Option<String> {
        None
    }

    fn clear(&self) {}
}

/// In-memory token holder.
#[derive(Debug, Default)]
pub struct StaticCredentials {
    token: RwLock<Option<String>>,
}

impl StaticCredentials {
    /// Create a provider holding `token`.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }

    /// Replace the held token.
    pub fn set(&self, token: impl Into<String>) {
        let mut guard = self.token.write().unwrap_or_else(|e| e.into_inner());
        *guard = Some(token.into());
    }
}

impl CredentialProvider for StaticCredentials {
    fn get(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
            .filter(|token| !token.is_empty())
    }

    fn clear(&self) {
        let mut guard = self.token.write().unwrap_or_else(|e| e.into_inner());
        *guard = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_credentials_lifecycle() {
        let creds = StaticCredentials::new("abc");
        assert_eq!(creds.get().as_deref(), Some("abc"));

        creds.clear();
        assert!(creds.get().is_none());

        creds.set("def");
        assert_eq!(creds.get().as_deref(), Some("def"));
    }

    #[test]
    fn test_empty_token_counts_as_absent() {
        let creds = StaticCredentials::new("");
        assert!(creds.get().is_none());
        assert!(NoCredentials.get().is_none());
    }
}
