//! Browser configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use aurora_navigation::DefaultScheme;
use aurora_storage::JsonFile;
use aurora_tabs::{CookiePolicy, ProfileConfig, ProfilePolicy};

use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root for history and browsing profiles
    pub data_dir: PathBuf,
    /// Directory offered in the save dialog
    pub download_dir: PathBuf,
    /// Loaded by the first tab, new tabs and the home button
    pub homepage: String,
    /// Scheme prefixed to address bar input without one
    pub default_scheme: DefaultScheme,
    /// Give every tab its own profile instead of one shared profile
    pub isolated_tabs: bool,
    pub user_agent: Option<String>,
    pub cookie_policy: CookiePolicy,
    pub playback_requires_user_gesture: bool,
}

impl Config {
    pub fn new(data_dir: PathBuf) -> Self {
        let download_dir = dirs::download_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| data_dir.join("Downloads"));

        Self {
            data_dir,
            download_dir,
            homepage: "https://www.google.com".to_string(),
            default_scheme: DefaultScheme::Https,
            isolated_tabs: false,
            user_agent: None,
            cookie_policy: CookiePolicy::AllowPersistent,
            playback_requires_user_gesture: false,
        }
    }

    pub fn data_dir() -> PathBuf {
        dirs::data_local_dir()
            .map(|d| d.join("Aurora"))
            .unwrap_or_else(|| PathBuf::from(".aurora"))
    }

    pub fn default_path() -> PathBuf {
        Self::data_dir().join("config.json")
    }

    /// Read configuration from `path`, using defaults for anything the file
    /// leaves out. A missing file yields [`Config::default`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config: Config = JsonFile::new(path.as_ref()).read()?.unwrap_or_default();
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        JsonFile::new(path.as_ref()).write(self)?;
        Ok(())
    }

    pub fn history_path(&self) -> PathBuf {
        self.data_dir.join("history.json")
    }

    pub fn profiles_dir(&self) -> PathBuf {
        self.data_dir.join("profiles")
    }

    /// Profile settings shared by every tab, or used as the template for
    /// isolated ones.
    pub fn base_profile(&self) -> ProfileConfig {
        let mut profile = ProfileConfig::new("default", &self.profiles_dir().join("default"))
            .with_cookie_policy(self.cookie_policy);
        profile.user_agent = self.user_agent.clone();
        profile.playback_requires_user_gesture = self.playback_requires_user_gesture;
        profile
    }

    pub fn profile_policy(&self) -> ProfilePolicy {
        if self.isolated_tabs {
            ProfilePolicy::Isolated {
                root: self.profiles_dir().join("tabs"),
                template: self.base_profile(),
            }
        } else {
            ProfilePolicy::Shared(self.base_profile())
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Self::data_dir())
    }
}
