// Session credential and its persistence.
//
// The credential only ever lives in two places: inside the `ApiClient`
// that uses it and in whatever `SessionStore` the command layer hands us
// (a plain text file in practice).

use std::cell::RefCell;
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result};

/// Opaque session token sent as the `s` cookie on authenticated calls.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Credential(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Somewhere a single credential can be loaded from and saved to.
pub trait SessionStore {
    /// Fails with `NoSessionFound` when nothing was ever saved and with
    /// `Persistence` when the medium itself is broken.
    fn load(&self) -> Result<Credential>;

    /// Replaces whatever was stored before.
    fn save(&self, credential: &Credential) -> Result<()>;
}

/// Stores the token as the whole content of one file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn persistence(&self, source: std::io::Error) -> Error {
        Error::Persistence {
            location: self.location(),
            source,
        }
    }
}

impl SessionStore for FileStore {
    fn load(&self) -> Result<Credential> {
        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(Error::NoSessionFound {
                    location: self.location(),
                })
            }
            Err(e) => return Err(self.persistence(e)),
        };

        let token = content.trim();
        if token.is_empty() {
            return Err(Error::NoSessionFound {
                location: self.location(),
            });
        }
        debug!(path = %self.path.display(), "loaded session token");
        Ok(Credential::new(token))
    }

    fn save(&self, credential: &Credential) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.persistence(e))?;
        }

        // Write next to the target and rename so a crash mid-write leaves
        // the previous session intact.
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        fs::write(&tmp, credential.as_str()).map_err(|e| self.persistence(e))?;
        if let Err(e) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(self.persistence(e));
        }
        debug!(path = %self.path.display(), "saved session token");
        Ok(())
    }
}

/// In-process store, used by tests and by callers embedding the client.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slot: RefCell<Option<Credential>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credential(credential: Credential) -> Self {
        MemoryStore {
            slot: RefCell::new(Some(credential)),
        }
    }
}

impl SessionStore for MemoryStore {
    fn load(&self) -> Result<Credential> {
        self.slot
            .borrow()
            .clone()
            .ok_or_else(|| Error::NoSessionFound {
                location: "memory".into(),
            })
    }

    fn save(&self, credential: &Credential) -> Result<()> {
        *self.slot.borrow_mut() = Some(credential.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_is_no_session() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("eero_session.txt"));
        assert!(matches!(store.load(), Err(Error::NoSessionFound { .. })));
    }

    #[test]
    fn blank_file_is_no_session() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("eero_session.txt");
        fs::write(&path, "  \n").unwrap();
        assert!(matches!(
            FileStore::new(path).load(),
            Err(Error::NoSessionFound { .. })
        ));
    }

    #[test]
    fn directory_in_place_of_file_is_persistence_error() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        assert!(matches!(store.load(), Err(Error::Persistence { .. })));
    }

    #[test]
    fn save_then_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("nested").join("eero_session.txt"));
        store.save(&Credential::new("T1")).unwrap();
        assert_eq!(store.load().unwrap(), Credential::new("T1"));

        store.save(&Credential::new("T2")).unwrap();
        assert_eq!(store.load().unwrap().as_str(), "T2");
        assert!(!dir.path().join("nested").join("eero_session.txt.tmp").exists());
    }

    #[test]
    fn load_trims_trailing_newline() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("eero_session.txt");
        fs::write(&path, "T1\n").unwrap();
        assert_eq!(FileStore::new(path).load().unwrap().as_str(), "T1");
    }

    #[test]
    fn memory_store_holds_one_credential() {
        let store = MemoryStore::new();
        assert!(matches!(store.load(), Err(Error::NoSessionFound { .. })));
        store.save(&Credential::new("a")).unwrap();
        store.save(&Credential::new("b")).unwrap();
        assert_eq!(store.load().unwrap().as_str(), "b");
    }

    #[test]
    fn debug_hides_token() {
        let shown = format!("{:?}", Credential::new("secret-token"));
        assert!(!shown.contains("secret-token"));
    }
}
