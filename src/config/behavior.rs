//! Loader behaviors.
//!
//! Each behavior is an independent capability. A loader is built with a
//! [`Behaviors`] set and never changes it afterwards.

use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// A single loader capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Behavior {
    /// Use the `test.json` mixin when the program name ends with `.test`
    UseTest,
    /// Read the user name from a `.user` file in the root path
    UseDotUser,
    /// Let process arguments replace default path discovery
    UseArgumentPaths,
    /// Use the executable's directory as the root path
    UseExecutablePath,
    /// Record unreadable files as skipped instead of failing
    IgnoreMissingFiles,
    /// Record malformed files as skipped instead of failing
    IgnoreInvalidFiles,
}

impl Behavior {
    pub const ALL: [Behavior; 6] = [
        Behavior::UseTest,
        Behavior::UseDotUser,
        Behavior::UseArgumentPaths,
        Behavior::UseExecutablePath,
        Behavior::IgnoreMissingFiles,
        Behavior::IgnoreInvalidFiles,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Behavior::UseTest => "use-test",
            Behavior::UseDotUser => "use-dot-user",
            Behavior::UseArgumentPaths => "use-argument-paths",
            Behavior::UseExecutablePath => "use-executable-path",
            Behavior::IgnoreMissingFiles => "ignore-missing-files",
            Behavior::IgnoreInvalidFiles => "ignore-invalid-files",
        }
    }
}

impl fmt::Display for Behavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown behavior '{0}'")]
pub struct UnknownBehavior(pub String);

impl FromStr for Behavior {
    type Err = UnknownBehavior;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        Behavior::ALL
            .into_iter()
            .find(|b| b.as_str() == normalized)
            .ok_or_else(|| UnknownBehavior(s.to_string()))
    }
}

/// An immutable-by-convention set of [`Behavior`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Behaviors(BTreeSet<Behavior>);

impl Behaviors {
    /// The empty set: strict loading, default discovery.
    pub fn none() -> Self {
        Self::default()
    }

    /// Add a behavior, builder style.
    pub fn with(mut self, behavior: Behavior) -> Self {
        self.0.insert(behavior);
        self
    }

    pub fn insert(&mut self, behavior: Behavior) -> bool {
        self.0.insert(behavior)
    }

    pub fn contains(&self, behavior: Behavior) -> bool {
        self.0.contains(&behavior)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Behavior> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<Behavior> for Behaviors {
    fn from_iter<I: IntoIterator<Item = Behavior>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<const N: usize> From<[Behavior; N]> for Behaviors {
    fn from(behaviors: [Behavior; N]) -> Self {
        behaviors.into_iter().collect()
    }
}

impl fmt::Display for Behaviors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.0.iter().map(Behavior::as_str).collect();
        write!(f, "[{}]", names.join(", "))
    }
}
