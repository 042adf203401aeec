use crate::minecraft::defaults::default_properties;
use crate::minecraft::properties::{PropertySet, parse_properties, serialize_properties};
use log::{debug, error, warn};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::path::{Path, PathBuf};

pub const PROPERTIES_FILE_NAME: &str = "server.properties";

#[derive(Debug)]
pub enum StoreError {
    /// the server directory given at startup does not exist
    PathNotFound(PathBuf),
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::PathNotFound(path) => write!(f, "path '{}' does not exist", path.display()),
            StoreError::Io { path, source } => write!(f, "{}: {source}", path.display()),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            StoreError::PathNotFound(_) => None,
            StoreError::Io { source, .. } => Some(source),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerInfo {
    pub server_path: PathBuf,
    pub properties_file: PathBuf,
    pub exists: bool,
}

/// Reads and writes the `server.properties` of a single server directory.
#[derive(Debug, Clone)]
pub struct PropertiesStore {
    server_path: PathBuf,
    properties_file: PathBuf,
}

impl PropertiesStore {
    /// Opens the store for `server_path`, which is made absolute and must exist.
    pub fn open(server_path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let server_path = server_path.as_ref();
        let server_path = std::path::absolute(server_path).map_err(|source| StoreError::Io {
            path: server_path.to_path_buf(),
            source,
        })?;
        if !server_path.exists() {
            return Err(StoreError::PathNotFound(server_path));
        }

        let properties_file = server_path.join(PROPERTIES_FILE_NAME);
        Ok(Self {
            server_path,
            properties_file,
        })
    }

    pub fn server_path(&self) -> &Path {
        &self.server_path
    }

    pub fn properties_file(&self) -> &Path {
        &self.properties_file
    }

    pub fn info(&self) -> ServerInfo {
        let exists = self.properties_file.try_exists().unwrap_or_else(|err| {
            warn!("cannot check {}: {err}", self.properties_file.display());
            false
        });
        ServerInfo {
            server_path: self.server_path.clone(),
            properties_file: self.properties_file.clone(),
            exists,
        }
    }

    /// Loads the properties file, or a copy of the defaults if the server has none yet.
    ///
    /// Failing to check whether the file exists is an error, not a missing file.
    pub fn load(&self) -> Result<PropertySet, StoreError> {
        let exists = self
            .properties_file
            .try_exists()
            .map_err(|source| self.io_error(source))?;
        if !exists {
            debug!(
                "{} does not exist, using default properties",
                self.properties_file.display()
            );
            return Ok(default_properties().clone());
        }

        let content = fs::read_to_string(&self.properties_file)
            .map_err(|source| self.io_error(source))?;
        let properties = parse_properties(&content);
        debug!(
            "loaded {} properties from {}",
            properties.len(),
            self.properties_file.display()
        );
        Ok(properties)
    }

    /// Replaces the properties file with `properties`, creating the server directory if needed.
    pub fn save(&self, properties: &PropertySet) -> Result<(), StoreError> {
        if let Some(parent) = self.properties_file.parent() {
            fs::create_dir_all(parent).map_err(|source| self.io_error(source))?;
        }
        fs::write(&self.properties_file, serialize_properties(properties))
            .map_err(|source| self.io_error(source))?;
        debug!(
            "saved {} properties to {}",
            properties.len(),
            self.properties_file.display()
        );
        Ok(())
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        let err = StoreError::Io {
            path: self.properties_file.clone(),
            source,
        };
        error!("{err}");
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::minecraft::properties::PropertyValue;
    use pretty_assertions::assert_eq;
    use test_log::test;

    #[test]
    fn open_missing_directory() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let missing = dir.path().join("nope");
        assert!(matches!(
            PropertiesStore::open(&missing),
            Err(StoreError::PathNotFound(path)) if path == missing
        ));
    }

    #[test]
    fn info_reports_paths() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let store = PropertiesStore::open(dir.path()).expect("failed to open store");
        let info = store.info();
        assert!(info.server_path.is_absolute());
        assert_eq!(info.properties_file, info.server_path.join("server.properties"));
        assert!(!info.exists);

        fs::write(store.properties_file(), "pvp=false").expect("failed to write file");
        assert!(store.info().exists);
    }

    #[test]
    fn load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let store = PropertiesStore::open(dir.path()).expect("failed to open store");
        let properties = store.load().expect("failed to load");
        assert_eq!(&properties, default_properties());
        assert_eq!(
            properties.keys().collect::<Vec<_>>(),
            default_properties().keys().collect::<Vec<_>>()
        );
        // loading defaults does not create the file
        assert!(!store.properties_file().exists());
    }

    #[test]
    fn load_existing_file() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        fs::write(
            dir.path().join("server.properties"),
            "#Minecraft server properties\nmax-players=5\npvp=false\n",
        )
        .expect("failed to write file");
        let store = PropertiesStore::open(dir.path()).expect("failed to open store");
        let properties = store.load().expect("failed to load");
        assert_eq!(
            properties,
            PropertySet::from_iter([
                ("max-players", PropertyValue::Int(5)),
                ("pvp", PropertyValue::Bool(false)),
            ])
        );
    }

    #[test]
    fn load_unreadable_file() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        // a directory where the file should be makes reading fail
        fs::create_dir(dir.path().join("server.properties")).expect("failed to create dir");
        let store = PropertiesStore::open(dir.path()).expect("failed to open store");
        assert!(matches!(store.load(), Err(StoreError::Io { .. })));
    }

    #[test]
    fn load_non_utf8_file() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        fs::write(dir.path().join("server.properties"), [0x6d, 0x3d, 0xff, 0xfe])
            .expect("failed to write file");
        let store = PropertiesStore::open(dir.path()).expect("failed to open store");
        assert!(matches!(store.load(), Err(StoreError::Io { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn load_from_unsearchable_directory() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().expect("failed to create temp dir");
        fs::write(dir.path().join("server.properties"), "max-players=5")
            .expect("failed to write file");
        let store = PropertiesStore::open(dir.path()).expect("failed to open store");

        fs::set_permissions(dir.path(), fs::Permissions::from_mode(0o000))
            .expect("failed to change permissions");
        // root ignores directory permissions
        let restricted = fs::read_dir(dir.path()).is_err();
        let result = store.load();
        let info = store.info();
        fs::set_permissions(dir.path(), fs::Permissions::from_mode(0o700))
            .expect("failed to restore permissions");

        if restricted {
            assert!(matches!(result, Err(StoreError::Io { .. })));
            assert!(!info.exists);
        }
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let store = PropertiesStore::open(dir.path()).expect("failed to open store");
        let mut properties = store.load().expect("failed to load");
        properties.insert("motd", "Hello=World");
        properties.insert("max-players", 64);
        properties.insert("hardcore", true);

        store.save(&properties).expect("failed to save");
        assert_eq!(store.load().expect("failed to load"), properties);

        let written = fs::read_to_string(store.properties_file()).expect("failed to read file");
        assert!(written.starts_with("accepts-transfers=false\n"));
        assert!(written.ends_with("white-list=false"));
        assert!(written.contains("\nmotd=Hello=World\n"));
    }

    #[test]
    fn save_replaces_whole_file() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        fs::write(dir.path().join("server.properties"), "# old\npvp=true\nmotd=old\n")
            .expect("failed to write file");
        let store = PropertiesStore::open(dir.path()).expect("failed to open store");
        store
            .save(&PropertySet::from_iter([("pvp", false)]))
            .expect("failed to save");
        assert_eq!(
            fs::read_to_string(store.properties_file()).expect("failed to read file"),
            "pvp=false"
        );
    }

    #[test]
    fn save_creates_missing_directory() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let server_dir = dir.path().join("server");
        fs::create_dir(&server_dir).expect("failed to create dir");
        let store = PropertiesStore::open(&server_dir).expect("failed to open store");
        fs::remove_dir(&server_dir).expect("failed to remove dir");

        store
            .save(&PropertySet::from_iter([("white-list", false)]))
            .expect("failed to save");
        assert!(server_dir.is_dir());
        assert_eq!(
            fs::read_to_string(server_dir.join("server.properties")).expect("failed to read file"),
            "white-list=false"
        );
    }
}
