use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use crate::client::{ClientError, ClientResult};

const APP_DIR: &str = "reading-quiz";
const USERNAME_FILE: &str = "username";

/// Remembers the learner's name between runs.
#[derive(Debug, Clone)]
pub struct UsernameStore {
    path: PathBuf,
}

impl UsernameStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config dir>/reading-quiz/username`, when the platform has a config dir.
    pub fn default_location() -> Option<Self> {
        dirs::config_dir().map(|dir| Self::new(dir.join(APP_DIR).join(USERNAME_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> ClientResult<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let name = contents.trim();
                Ok((!name.is_empty()).then(|| name.to_string()))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Saves the trimmed name and returns it.
    pub fn save(&self, name: &str) -> ClientResult<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ClientError::EmptyUsername);
        }
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, name)?;
        Ok(name.to_string())
    }

    pub fn clear(&self) -> ClientResult<()> {
        match fs::remove_file(&self.path) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}
