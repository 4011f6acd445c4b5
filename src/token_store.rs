//! Bearer-token storage abstraction.
//!
//! The live gateway reads the token at request time; login writes it. The
//! file backend is canonical for the app, the memory backend is a test
//! double.

use std::path::PathBuf;

use parking_lot::RwLock;

use crate::types::AuthSession;

/// Where the current bearer token lives.
pub trait TokenStore: Send + Sync {
    /// Load the current session, if any.
    fn load(&self) -> Option<AuthSession>;

    /// Persist a session. Failures are logged, not propagated; an
    /// unsaved token only costs a re-login.
    fn save(&self, session: &AuthSession);

    /// Remove stored credentials.
    fn clear(&self);
}

/// File-backed token storage under `~/.opsdesk/token.json`.
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new() -> Self {
        let home = dirs::home_dir().unwrap_or_default();
        FileTokenStore {
            path: home.join(".opsdesk").join("token.json"),
        }
    }

    pub fn at(path: PathBuf) -> Self {
        FileTokenStore { path }
    }
}

impl Default for FileTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Option<AuthSession> {
        if !self.path.exists() {
            return None;
        }
        let content = std::fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&content) {
            Ok(session) => Some(session),
            Err(e) => {
                log::warn!("Ignoring unreadable token file: {}", e);
                None
            }
        }
    }

    fn save(&self, session: &AuthSession) {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                if let Err(e) = std::fs::create_dir_all(parent) {
                    log::warn!("Failed to create token dir: {}", e);
                    return;
                }
            }
        }
        match serde_json::to_string_pretty(session) {
            Ok(content) => {
                if let Err(e) = std::fs::write(&self.path, content) {
                    log::warn!("Failed to write token file: {}", e);
                }
            }
            Err(e) => log::warn!("Failed to serialize token: {}", e),
        }
    }

    fn clear(&self) {
        if self.path.exists() {
            let _ = std::fs::remove_file(&self.path);
        }
    }
}

/// In-memory token storage for tests and the mock transport.
#[derive(Default)]
pub struct MemoryTokenStore {
    session: RwLock<Option<AuthSession>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<AuthSession> {
        self.session.read().clone()
    }

    fn save(&self, session: &AuthSession) {
        *self.session.write() = Some(session.clone());
    }

    fn clear(&self) {
        *self.session.write() = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AuthUser;

    fn session() -> AuthSession {
        AuthSession {
            token: "tok-123".into(),
            user: AuthUser {
                id: "u-1".into(),
                name: "Admin".into(),
                email: "admin@opsdesk.example".into(),
                role: "admin".into(),
            },
        }
    }

    #[test]
    fn test_file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::at(dir.path().join("nested").join("token.json"));

        assert!(store.load().is_none());
        store.save(&session());
        let loaded = store.load().unwrap();
        assert_eq!(loaded.token, "tok-123");
        assert_eq!(loaded.user.email, "admin@opsdesk.example");

        store.clear();
        assert!(store.load().is_none());
    }

    #[test]
    fn test_file_store_ignores_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token.json");
        std::fs::write(&path, "{not json").unwrap();
        let store = FileTokenStore::at(path);
        assert!(store.load().is_none());
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryTokenStore::new();
        assert!(store.load().is_none());
        store.save(&session());
        assert_eq!(store.load().unwrap().token, "tok-123");
        store.clear();
        assert!(store.load().is_none());
    }
}
