//! Static table of supported applications.
//!
//! Each application has one primary (model) extension and a list of junk
//! extensions it leaves next to the model after an analysis run. The tables
//! are stored the way the applications spell them; comparison always goes
//! through [`normalize_extension`].

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

use crate::common::errors::CleanupError;

/// A supported structural-engineering package.
///
/// Ordering follows the registry order, which is also the order junk
/// extensions are unioned in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Application {
    Sap2000,
    Etabs,
    Safe,
}

/// Immutable description of one application's files
#[derive(Debug, PartialEq, Eq)]
pub struct ApplicationProfile {
    pub application: Application,
    pub name: &'static str,
    pub primary_extension: &'static str,
    pub junk_extensions: &'static [&'static str],
}

const SAP2000_JUNK: &[&str] = &[
    "ico", "msh", "tlog", "OUT", "sbk", "K~0", "K~I", "K~J", "K~M", "tlog", "Y", "Y$$", "Y~",
    "Y~1", "Y00", "Y01", "Y02", "Y03", "Y04", "Y05", "Y06", "Y07", "Y08", "C3", "F3", "K", "K3",
    "M3", "K~E", "K~G", "tlog",
];

const ETABS_JUNK: &[&str] = &[
    "ebk", "ico", "K~0", "K~E", "K~G", "K~I", "K~J", "K~M", "LOG", "msh", "OUT", "Y", "Y$$", "Y~",
    "Y~1", "Y00", "Y0A", "Y01", "Y02", "Y03", "Y04", "Y05", "Y06", "Y07", "Y08", "Y09",
];

const SAFE_JUNK: &[&str] = &[
    "ico", "K~0", "K~I", "K~J", "K~L", "K~M", "LOG", "msh", "OUT", "xsdm", "Y", "Y$$", "Y~",
    "Y~1", "Y00", "Y0A", "Y0B", "Y01", "Y02", "Y03", "Y05", "Y06", "Y07", "Y08", "Y09",
];

static PROFILES: [ApplicationProfile; 3] = [
    ApplicationProfile {
        application: Application::Sap2000,
        name: "SAP2000",
        primary_extension: ".sdb",
        junk_extensions: SAP2000_JUNK,
    },
    ApplicationProfile {
        application: Application::Etabs,
        name: "ETABS",
        primary_extension: ".edb",
        junk_extensions: ETABS_JUNK,
    },
    ApplicationProfile {
        application: Application::Safe,
        name: "SAFE",
        primary_extension: ".fdb",
        junk_extensions: SAFE_JUNK,
    },
];

impl Application {
    pub const ALL: [Application; 3] = [Application::Sap2000, Application::Etabs, Application::Safe];

    pub fn profile(self) -> &'static ApplicationProfile {
        match self {
            Application::Sap2000 => &PROFILES[0],
            Application::Etabs => &PROFILES[1],
            Application::Safe => &PROFILES[2],
        }
    }
}

impl std::fmt::Display for Application {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.profile().name)
    }
}

impl std::str::FromStr for Application {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sap2000" | "sap" => Ok(Application::Sap2000),
            "etabs" => Ok(Application::Etabs),
            "safe" => Ok(Application::Safe),
            other => Err(format!(
                "unknown application '{}' (expected sap2000, etabs or safe)",
                other
            )),
        }
    }
}

/// Lowercase an extension and strip any leading dot: `".OUT"` -> `"out"`
pub fn normalize_extension(ext: &str) -> String {
    ext.trim_start_matches('.').to_lowercase()
}

/// Look up the profiles for a selection, in registry order.
///
/// An empty selection is a caller error and is reported, not patched up.
pub fn profiles_for(
    selection: &BTreeSet<Application>,
) -> Result<Vec<&'static ApplicationProfile>, CleanupError> {
    if selection.is_empty() {
        return Err(CleanupError::no_applications());
    }
    Ok(selection.iter().map(|app| app.profile()).collect())
}

/// Primary extensions of the given profiles, lowercase with a leading dot
pub fn primary_extensions(profiles: &[&ApplicationProfile]) -> Vec<String> {
    profiles
        .iter()
        .map(|p| format!(".{}", normalize_extension(p.primary_extension)))
        .collect()
}

/// Deduplicated union of junk extensions, first occurrence wins.
///
/// Comparison is case-insensitive and ignores a leading dot; the result is
/// normalized (lowercase, no dot) in profile order then table order.
pub fn junk_union(profiles: &[&ApplicationProfile]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut union = Vec::new();
    for profile in profiles {
        for ext in profile.junk_extensions {
            let normalized = normalize_extension(ext);
            if seen.insert(normalized.clone()) {
                union.push(normalized);
            }
        }
    }
    union
}
