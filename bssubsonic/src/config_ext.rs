//! Extension pour lire la section `subsonic` de bsconfig

use crate::state::{DEFAULT_PASSWORD, DEFAULT_SERVER_TYPE, DEFAULT_USERNAME, SubsonicSettings};
use anyhow::Result;
use bsconfig::Config;

const DEFAULT_STORAGE_DIR: &str = "data";

/// Trait d'extension pour la configuration Subsonic
pub trait SubsonicConfigExt {
    fn get_subsonic_username(&self) -> String;

    fn get_subsonic_password(&self) -> String;

    fn get_subsonic_server_type(&self) -> String;

    /// Répertoire des fichiers `starred.dat` et `playlists.dat`
    ///
    /// Relatif au répertoire de configuration s'il n'est pas absolu; créé au
    /// besoin.
    fn get_subsonic_storage_dir(&self) -> Result<String>;

    fn get_subsonic_settings(&self) -> SubsonicSettings {
        SubsonicSettings {
            username: self.get_subsonic_username(),
            password: self.get_subsonic_password(),
            server_type: self.get_subsonic_server_type(),
        }
    }
}

impl SubsonicConfigExt for Config {
    fn get_subsonic_username(&self) -> String {
        self.get_string_or(&["subsonic", "username"], DEFAULT_USERNAME)
    }

    fn get_subsonic_password(&self) -> String {
        self.get_string_or(&["subsonic", "password"], DEFAULT_PASSWORD)
    }

    fn get_subsonic_server_type(&self) -> String {
        self.get_string_or(&["subsonic", "server_type"], DEFAULT_SERVER_TYPE)
    }

    fn get_subsonic_storage_dir(&self) -> Result<String> {
        self.get_managed_dir(&["subsonic", "storage", "directory"], DEFAULT_STORAGE_DIR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_embedded_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_config(dir.path().to_str().unwrap()).unwrap();

        let settings = config.get_subsonic_settings();
        assert_eq!(settings.username, "voyage");
        assert_eq!(settings.password, "141592");
        assert_eq!(settings.server_type, "bilisonic");

        let storage = config.get_subsonic_storage_dir().unwrap();
        assert!(storage.starts_with(dir.path().to_str().unwrap()));
        assert!(std::path::Path::new(&storage).is_dir());
    }
}
