//! Profile configuration
//!
//! A profile is what the engine needs to set up a view's browsing context:
//! where it caches, where it keeps site storage, which user agent it sends and
//! how it treats cookies. The registry hands one to every context it creates.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::context::ContextId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CookiePolicy {
    /// Session cookies in memory, persistent cookies on disk
    #[default]
    AllowPersistent,
    /// Every cookie is dropped with the profile
    SessionOnly,
    /// Session cookies are written to disk as well
    ForcePersistent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    pub name: String,
    pub cache_path: PathBuf,
    pub storage_path: PathBuf,
    /// `None` keeps the engine's own user agent
    pub user_agent: Option<String>,
    pub cookie_policy: CookiePolicy,
    pub playback_requires_user_gesture: bool,
}

impl ProfileConfig {
    /// A profile rooted at `root`, with `cache/` and `storage/` below it.
    pub fn new(name: impl Into<String>, root: &Path) -> Self {
        Self {
            name: name.into(),
            cache_path: root.join("cache"),
            storage_path: root.join("storage"),
            user_agent: None,
            cookie_policy: CookiePolicy::default(),
            playback_requires_user_gesture: false,
        }
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn with_cookie_policy(mut self, cookie_policy: CookiePolicy) -> Self {
        self.cookie_policy = cookie_policy;
        self
    }
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self::new("default", Path::new("profiles/default"))
    }
}

/// How the registry picks a profile for a new context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfilePolicy {
    /// Every tab shares one profile (cookies, cache and storage)
    Shared(ProfileConfig),
    /// Every tab gets its own profile under `root/<context id>/`.
    /// User agent, cookie policy and playback settings come from `template`.
    Isolated {
        root: PathBuf,
        template: ProfileConfig,
    },
}

impl ProfilePolicy {
    pub fn profile_for(&self, id: ContextId) -> ProfileConfig {
        match self {
            ProfilePolicy::Shared(profile) => profile.clone(),
            ProfilePolicy::Isolated { root, template } => {
                let dir = root.join(id.to_string());
                ProfileConfig {
                    name: format!("tab-{}", id),
                    cache_path: dir.join("cache"),
                    storage_path: dir.join("storage"),
                    ..template.clone()
                }
            }
        }
    }

    pub fn is_isolated(&self) -> bool {
        matches!(self, ProfilePolicy::Isolated { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_policy_reuses_profile() {
        let profile = ProfileConfig::new("default", Path::new("/data/default"));
        let policy = ProfilePolicy::Shared(profile.clone());

        assert_eq!(policy.profile_for(ContextId::new()), profile);
        assert_eq!(policy.profile_for(ContextId::new()), profile);
    }

    #[test]
    fn test_isolated_policy_separates_paths() {
        let template = ProfileConfig::default()
            .with_user_agent("Aurora/1.0")
            .with_cookie_policy(CookiePolicy::SessionOnly);
        let policy = ProfilePolicy::Isolated {
            root: PathBuf::from("/data/tabs"),
            template,
        };

        let first_id = ContextId::new();
        let first = policy.profile_for(first_id);
        let second = policy.profile_for(ContextId::new());

        assert_ne!(first.storage_path, second.storage_path);
        assert_ne!(first.cache_path, second.cache_path);
        assert_eq!(
            first.cache_path,
            PathBuf::from("/data/tabs").join(first_id.to_string()).join("cache")
        );
        assert_eq!(first.user_agent.as_deref(), Some("Aurora/1.0"));
        assert_eq!(second.cookie_policy, CookiePolicy::SessionOnly);
    }
}
