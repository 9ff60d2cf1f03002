//! Ensemble des éléments favoris (`starred.dat`)

use crate::{Result, read_optional, write_atomic};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::debug;

pub const STARRED_FILE: &str = "starred.dat";

/// Ensemble ordonné d'identifiants, un par ligne
///
/// Seule l'appartenance compte : ajouter deux fois le même identifiant ne
/// change rien.
#[derive(Debug)]
pub struct StarredStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl StarredStore {
    /// Store rangé dans `directory/starred.dat`
    pub fn new(directory: impl AsRef<Path>) -> Self {
        Self::with_path(directory.as_ref().join(STARRED_FILE))
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self) -> Result<Vec<String>> {
        let Some(text) = read_optional(&self.path).await? else {
            return Ok(Vec::new());
        };
        let mut ids: Vec<String> = Vec::new();
        for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
            if !ids.iter().any(|id| id == line) {
                ids.push(line.to_string());
            }
        }
        Ok(ids)
    }

    async fn write(&self, ids: &[String]) -> Result<()> {
        let mut text = ids.join("\n");
        if !text.is_empty() {
            text.push('\n');
        }
        write_atomic(&self.path, text.as_bytes()).await?;
        Ok(())
    }

    /// Identifiants favoris dans l'ordre d'ajout
    pub async fn list(&self) -> Result<Vec<String>> {
        let _guard = self.lock.lock().await;
        self.read().await
    }

    pub async fn contains(&self, id: &str) -> Result<bool> {
        Ok(self.list().await?.iter().any(|s| s == id))
    }

    /// Ajoute des identifiants; rend le nombre réellement ajoutés
    pub async fn star<I, S>(&self, ids: I) -> Result<usize>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let _guard = self.lock.lock().await;
        let mut current = self.read().await?;
        let before = current.len();

        for id in ids {
            let id = id.as_ref().trim();
            if !id.is_empty() && !current.iter().any(|s| s == id) {
                current.push(id.to_string());
            }
        }

        let added = current.len() - before;
        if added > 0 {
            self.write(&current).await?;
        }
        debug!("starred {} new ids ({} total)", added, current.len());
        Ok(added)
    }

    /// Retire des identifiants; rend le nombre réellement retirés
    pub async fn unstar<I, S>(&self, ids: I) -> Result<usize>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let _guard = self.lock.lock().await;
        let mut current = self.read().await?;
        let before = current.len();

        let removed: Vec<String> = ids.into_iter().map(|s| s.as_ref().trim().to_string()).collect();
        current.retain(|id| !removed.contains(id));

        let count = before - current.len();
        if count > 0 {
            self.write(&current).await?;
        }
        debug!("unstarred {} ids ({} left)", count, current.len());
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = StarredStore::new(dir.path());
        assert!(store.list().await.unwrap().is_empty());
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn test_star_twice_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let store = StarredStore::new(dir.path());

        assert_eq!(store.star(["a", "b"]).await.unwrap(), 2);
        assert_eq!(store.star(["a"]).await.unwrap(), 0);
        assert_eq!(store.list().await.unwrap(), vec!["a", "b"]);

        let text = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(text, "a\nb\n");
    }

    #[tokio::test]
    async fn test_unstar() {
        let dir = tempfile::tempdir().unwrap();
        let store = StarredStore::new(dir.path());

        store.star(["a", "b", "c"]).await.unwrap();
        assert_eq!(store.unstar(["b", "zzz"]).await.unwrap(), 1);
        assert_eq!(store.list().await.unwrap(), vec!["a", "c"]);
        assert!(!store.contains("b").await.unwrap());
    }

    #[tokio::test]
    async fn test_reads_hand_edited_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(STARRED_FILE), "x\n\n  y \nx\n").unwrap();

        let store = StarredStore::new(dir.path());
        assert_eq!(store.list().await.unwrap(), vec!["x", "y"]);
    }
}
