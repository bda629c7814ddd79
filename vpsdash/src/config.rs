//! Connection profiles and timing settings: a JSON mapping of profile name ->
//! { url, tls_ca, timings } plus default timings.
//! Stored under XDG config dir: $XDG_CONFIG_HOME/vpsdash/profiles.json (fallback ~/.config/vpsdash/profiles.json)

use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fs, io, path::PathBuf, time::Duration};

/// Operator-tunable timing constants, in milliseconds on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timings {
    pub dashboard_interval_ms: u64,
    pub downloads_interval_ms: u64,
    pub settle_delay_ms: u64,
    pub toast_ms: u64,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            dashboard_interval_ms: 30_000,
            downloads_interval_ms: 5_000,
            settle_delay_ms: 1_000,
            toast_ms: 3_000,
        }
    }
}

// Anything faster than this would hammer a phone-hosted API.
const MIN_INTERVAL_MS: u64 = 250;

impl Timings {
    pub fn dashboard_interval(&self) -> Duration {
        Duration::from_millis(self.dashboard_interval_ms.max(MIN_INTERVAL_MS))
    }

    pub fn downloads_interval(&self) -> Duration {
        Duration::from_millis(self.downloads_interval_ms.max(MIN_INTERVAL_MS))
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn toast_duration(&self) -> Duration {
        Duration::from_millis(self.toast_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ProfileEntry {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tls_ca: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timings: Option<Timings>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProfilesFile {
    #[serde(default)]
    pub profiles: BTreeMap<String, ProfileEntry>,
    #[serde(default)]
    pub timings: Timings,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_dir: Option<String>,
    #[serde(default)]
    pub version: u32,
}

impl ProfilesFile {
    /// Timings for a profile, falling back to the file-wide defaults.
    pub fn timings_for(&self, profile: Option<&str>) -> Timings {
        profile
            .and_then(|name| self.profiles.get(name))
            .and_then(|p| p.timings)
            .unwrap_or(self.timings)
    }
}

pub fn config_dir() -> PathBuf {
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
        PathBuf::from(xdg).join("vpsdash")
    } else {
        dirs_next::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("vpsdash")
    }
}

pub fn profiles_path() -> PathBuf {
    config_dir().join("profiles.json")
}

/// Where saved artifacts go unless overridden.
pub fn default_download_dir() -> PathBuf {
    dirs_next::download_dir().unwrap_or_else(|| PathBuf::from("."))
}

pub fn load_profiles() -> ProfilesFile {
    let path = profiles_path();
    match fs::read_to_string(&path) {
        Ok(s) => serde_json::from_str(&s).unwrap_or_else(|err| {
            tracing::warn!(path = %path.display(), error = %err, "ignoring malformed profiles file");
            ProfilesFile::default()
        }),
        Err(_) => ProfilesFile::default(),
    }
}

pub fn save_profiles(p: &ProfilesFile) -> io::Result<()> {
    let path = profiles_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let data = serde_json::to_vec_pretty(p).map_err(io::Error::other)?;
    fs::write(path, data)
}

pub enum ResolveProfile {
    /// Use the provided runtime inputs (not persisted). (url, tls_ca)
    Direct(String, Option<String>),
    /// Loaded from existing profile entry (url, tls_ca)
    Loaded(String, Option<String>),
    /// Should prompt user to select among profile names
    PromptSelect(Vec<String>),
    /// Should prompt user to create a new profile (name)
    PromptCreate(String),
    /// No profile could be resolved (e.g., missing arguments)
    None,
}

pub struct ProfileRequest {
    pub profile_name: Option<String>,
    pub url: Option<String>,
    pub tls_ca: Option<String>,
}

impl ProfileRequest {
    pub fn resolve(self, pf: &ProfilesFile) -> ResolveProfile {
        match (self.url, self.profile_name) {
            // URL given (maybe saved later by the caller)
            (Some(u), _) => ResolveProfile::Direct(u, self.tls_ca),
            // Only a profile name -> load it or offer to create it
            (None, Some(name)) => match pf.profiles.get(&name) {
                Some(entry) => ResolveProfile::Loaded(
                    entry.url.clone(),
                    self.tls_ca.or_else(|| entry.tls_ca.clone()),
                ),
                None => ResolveProfile::PromptCreate(name),
            },
            (None, None) if pf.profiles.is_empty() => ResolveProfile::None,
            (None, None) => ResolveProfile::PromptSelect(pf.profiles.keys().cloned().collect()),
        }
    }
}
