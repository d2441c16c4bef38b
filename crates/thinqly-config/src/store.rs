// File-backed homes store. The file is a single JSON document read
// and rewritten whole under a mutex; a missing file means no homes.

use std::path::PathBuf;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use url::Url;

use thinqly_core::{DEFAULT_SERVER, HomeConfig, HomesStore, HomesStoreError};

/// Homes store persisted as pretty-printed JSON at a fixed path.
pub struct JsonHomesStore {
    path: PathBuf,
    // Serializes read-modify-write sequences against each other.
    lock: Mutex<()>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct HomesFile {
    #[serde(default)]
    homes: Vec<HomeRecord>,
}

/// On-disk shape of one home. Optional fields fall back to the same
/// defaults the admin API applies, so hand-edited files stay terse.
#[derive(Debug, Serialize, Deserialize)]
struct HomeRecord {
    home_id: String,
    home_name: String,
    #[serde(default)]
    pat: String,
    #[serde(default = "default_country")]
    country: String,
    #[serde(default = "default_client_id")]
    client_id: String,
    #[serde(default = "default_server")]
    server: String,
}

fn default_country() -> String {
    "KR".into()
}

fn default_client_id() -> String {
    "team-dashboard".into()
}

fn default_server() -> String {
    DEFAULT_SERVER.into()
}

impl HomeRecord {
    fn into_config(self) -> Result<HomeConfig, HomesStoreError> {
        let server_url = Url::parse(&self.server).map_err(|e| {
            HomesStoreError::Malformed(format!("home {}: bad server URL: {e}", self.home_id))
        })?;
        Ok(HomeConfig {
            home_id: self.home_id,
            home_name: self.home_name,
            server_url,
            pat: self.pat.into(),
            country: self.country.to_uppercase(),
            client_id: self.client_id,
        })
    }

    fn from_config(home: &HomeConfig) -> Self {
        Self {
            home_id: home.home_id.clone(),
            home_name: home.home_name.clone(),
            pat: home.pat.expose_secret().to_owned(),
            country: home.country.clone(),
            client_id: home.client_id.clone(),
            server: home.server_url.as_str().trim_end_matches('/').to_owned(),
        }
    }
}

impl JsonHomesStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    async fn read_file(&self) -> Result<HomesFile, HomesStoreError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(HomesFile::default());
            }
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str(&raw).map_err(|e| HomesStoreError::Malformed(e.to_string()))
    }
}

#[async_trait]
impl HomesStore for JsonHomesStore {
    async fn list_homes(&self) -> Result<Vec<HomeConfig>, HomesStoreError> {
        let _guard = self.lock.lock().await;
        self.read_file()
            .await?
            .homes
            .into_iter()
            .map(HomeRecord::into_config)
            .collect()
    }

    async fn replace_homes(&self, homes: Vec<HomeConfig>) -> Result<(), HomesStoreError> {
        let _guard = self.lock.lock().await;
        let file = HomesFile {
            homes: homes.iter().map(HomeRecord::from_config).collect(),
        };
        let raw = serde_json::to_string_pretty(&file)
            .map_err(|e| HomesStoreError::Malformed(e.to_string()))?;
        tokio::fs::write(&self.path, raw).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_home(id: &str) -> HomeConfig {
        HomeConfig {
            home_id: id.into(),
            home_name: format!("Home {id}"),
            server_url: Url::parse(DEFAULT_SERVER).unwrap(),
            pat: "token".to_string().into(),
            country: "KR".into(),
            client_id: "team-dashboard".into(),
        }
    }

    #[tokio::test]
    async fn missing_file_lists_no_homes() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonHomesStore::new(dir.path().join("homes.json"));
        assert!(store.list_homes().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn replace_then_list_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonHomesStore::new(dir.path().join("homes.json"));

        store
            .replace_homes(vec![sample_home("a1"), sample_home("b2")])
            .await
            .unwrap();

        let homes = store.list_homes().await.unwrap();
        assert_eq!(homes.len(), 2);
        assert_eq!(homes[0].home_id, "a1");
        assert_eq!(homes[1].home_name, "Home b2");
        assert!(homes[0].has_pat());
    }

    #[tokio::test]
    async fn sparse_records_fill_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("homes.json");
        std::fs::write(
            &path,
            r#"{"homes": [{"home_id": "x9", "home_name": "Lab", "country": "us"}]}"#,
        )
        .unwrap();

        let store = JsonHomesStore::new(&path);
        let homes = store.list_homes().await.unwrap();
        assert_eq!(homes.len(), 1);
        assert_eq!(homes[0].country, "US");
        assert_eq!(homes[0].client_id, "team-dashboard");
        assert_eq!(homes[0].server_url.as_str(), "https://api-kic.lgthinq.com/");
        assert!(!homes[0].has_pat());
    }

    #[tokio::test]
    async fn malformed_file_is_reported_not_swallowed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("homes.json");
        std::fs::write(&path, "{not json").unwrap();

        let store = JsonHomesStore::new(&path);
        let err = store.list_homes().await.unwrap_err();
        assert!(matches!(err, HomesStoreError::Malformed(_)));
    }

    #[tokio::test]
    async fn bad_server_url_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("homes.json");
        std::fs::write(
            &path,
            r#"{"homes": [{"home_id": "x9", "home_name": "Lab", "server": "not a url"}]}"#,
        )
        .unwrap();

        let store = JsonHomesStore::new(&path);
        let err = store.list_homes().await.unwrap_err();
        assert!(err.to_string().contains("x9"));
    }
}
