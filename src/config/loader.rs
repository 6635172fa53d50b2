//! Configuration loader with layered merging.
//!
//! Applies each lookup path in order to a target value. Later layers
//! override the fields they name; everything else is left as earlier layers
//! (or the target's initial value) set it.

use super::behavior::{Behavior, Behaviors};
use super::context::LookupContext;
use super::merge::deep_merge;
use super::resolver::{LookupPath, PathResolver, PreservedArgs};
use crate::error::{LoadError, LoadResult};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Why a lookup path was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SkipReason {
    /// The file could not be read
    Missing,
    /// The file was not a valid document for the target
    Invalid,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Missing => write!(f, "missing"),
            SkipReason::Invalid => write!(f, "invalid"),
        }
    }
}

/// A lookup path that was tolerated rather than loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedPath {
    pub path: PathBuf,
    pub reason: SkipReason,
}

/// Layered JSON configuration loader.
#[derive(Debug, Clone)]
pub struct Loader {
    /// Directory that relative lookup paths are built from.
    pub root_path: PathBuf,
    /// How process arguments become explicit config paths.
    ///
    /// Only consulted with [`Behavior::UseArgumentPaths`].
    pub preserved_args: PreservedArgs,
    /// Positional arguments left after the host parsed its flags.
    ///
    /// [`Loader::load`] hands these to the resolver for
    /// [`PreservedArgs::Positional`].
    pub positional_args: Vec<String>,

    behaviors: Behaviors,
    lookup_paths: Vec<LookupPath>,
    loaded_paths: Vec<PathBuf>,
    skipped: Vec<SkippedPath>,
}

impl Loader {
    /// Create a loader.
    ///
    /// The root path is the current directory, or the directory holding the
    /// running executable with [`Behavior::UseExecutablePath`]. Locating the
    /// executable is the only way construction can fail.
    pub fn new(behaviors: impl Into<Behaviors>) -> LoadResult<Self> {
        let behaviors = behaviors.into();
        let root_path = if behaviors.contains(Behavior::UseExecutablePath) {
            executable_dir()?
        } else {
            PathBuf::from(".")
        };
        Ok(Self::with_root(root_path, behaviors))
    }

    /// Create a loader rooted at an explicit directory.
    pub fn with_root(root_path: impl Into<PathBuf>, behaviors: impl Into<Behaviors>) -> Self {
        Self {
            root_path: root_path.into(),
            preserved_args: PreservedArgs::default(),
            positional_args: Vec::new(),
            behaviors: behaviors.into(),
            lookup_paths: Vec::new(),
            loaded_paths: Vec::new(),
            skipped: Vec::new(),
        }
    }

    /// Check whether the loader was built with a behavior.
    pub fn implements(&self, behavior: Behavior) -> bool {
        self.behaviors.contains(behavior)
    }

    pub fn behaviors(&self) -> &Behaviors {
        &self.behaviors
    }

    /// Resolve lookup paths without loading anything.
    pub fn resolve(&self, ctx: &LookupContext) -> Vec<LookupPath> {
        PathResolver::new(&self.root_path, self.preserved_args, &self.behaviors).resolve(ctx)
    }

    /// Lookup context for the running process, carrying
    /// [`Loader::positional_args`] as the positional remainder.
    pub fn context(&self) -> LookupContext {
        LookupContext::current().with_positional(self.positional_args.iter().cloned())
    }

    /// Load configuration into `target` using the current process state.
    pub fn load<T>(&mut self, target: &mut T) -> LoadResult<()>
    where
        T: Serialize + DeserializeOwned,
    {
        let ctx = self.context();
        self.load_with_context(&ctx, target)
    }

    /// Load configuration into `target`, layer by layer.
    ///
    /// Each layer is decoded, merged onto the document accumulated so far
    /// and deserialized as `T` before it is committed to `target`. A layer
    /// that fails is either recorded as skipped (with the matching ignore
    /// behavior) or aborts the load. An aborting layer leaves no partial
    /// writes; layers committed before it remain in `target`.
    ///
    /// Committing replaces `target` with the decoded value, so fields `T`
    /// does not serialize (`#[serde(skip)]`) come back as their defaults.
    /// Use [`Loader::load_with_commit`] to carry such fields across.
    pub fn load_with_context<T>(&mut self, ctx: &LookupContext, target: &mut T) -> LoadResult<()>
    where
        T: Serialize + DeserializeOwned,
    {
        self.load_with_commit(ctx, target, |target, value| *target = value)
    }

    /// Load like [`Loader::load_with_context`], committing each layer
    /// through `commit(target, decoded)` instead of plain assignment.
    ///
    /// `decoded` holds every serialized field as merged so far; `commit`
    /// decides what of `target` survives, typically state the serialized
    /// form omits.
    pub fn load_with_commit<T, F>(
        &mut self,
        ctx: &LookupContext,
        target: &mut T,
        mut commit: F,
    ) -> LoadResult<()>
    where
        T: Serialize + DeserializeOwned,
        F: FnMut(&mut T, T),
    {
        self.lookup_paths = self.resolve(ctx);
        self.loaded_paths.clear();
        self.skipped.clear();

        debug!(
            root = %self.root_path.display(),
            behaviors = %self.behaviors,
            paths = ?self.lookup_paths.iter().map(|l| &l.path).collect::<Vec<_>>(),
            "Resolved config lookup paths"
        );

        let mut accumulated =
            serde_json::to_value(&*target).map_err(|source| LoadError::Encode { source })?;

        let lookup_paths = self.lookup_paths.clone();
        for lookup in lookup_paths {
            let path = lookup.path;

            let data = match std::fs::read(&path) {
                Ok(data) => data,
                Err(source) => {
                    if !self.implements(Behavior::IgnoreMissingFiles) {
                        return Err(LoadError::Read { path, source });
                    }
                    debug!(path = %path.display(), error = %source, "Skipping missing config file");
                    self.skip(path, SkipReason::Missing);
                    continue;
                }
            };

            match apply_layer::<T>(&accumulated, &data) {
                Ok((merged, value)) => {
                    accumulated = merged;
                    commit(target, value);
                    debug!(path = %path.display(), source = %lookup.source, "Loaded config file");
                    self.loaded_paths.push(path);
                }
                Err(source) => {
                    if !self.implements(Behavior::IgnoreInvalidFiles) {
                        return Err(LoadError::Decode { path, source });
                    }
                    debug!(path = %path.display(), error = %source, "Skipping invalid config file");
                    self.skip(path, SkipReason::Invalid);
                }
            }
        }

        Ok(())
    }

    fn skip(&mut self, path: PathBuf, reason: SkipReason) {
        self.skipped.push(SkippedPath { path, reason });
    }

    /// Lookup paths resolved by the last load.
    pub fn lookup_paths(&self) -> &[LookupPath] {
        &self.lookup_paths
    }

    /// Config files loaded by the last load, in order.
    pub fn loaded_paths(&self) -> &[PathBuf] {
        &self.loaded_paths
    }

    /// Config files skipped by the last load, in order.
    pub fn skipped_paths(&self) -> Vec<&Path> {
        self.skipped.iter().map(|s| s.path.as_path()).collect()
    }

    /// Skipped config files with the reason each was skipped.
    pub fn skipped(&self) -> &[SkippedPath] {
        &self.skipped
    }
}

/// Decode one layer and merge it onto the accumulated document.
///
/// Returns the merged document and its typed form. Nothing is committed
/// here, so a failure leaves the caller's state untouched.
fn apply_layer<T: DeserializeOwned>(
    accumulated: &Value,
    data: &[u8],
) -> Result<(Value, T), serde_json::Error> {
    let layer: Value = serde_json::from_slice(data)?;
    let merged = deep_merge(accumulated.clone(), layer);
    let value = T::deserialize(&merged)?;
    Ok((merged, value))
}

fn executable_dir() -> LoadResult<PathBuf> {
    let exe = std::env::current_exe().map_err(|source| LoadError::ExecutableDir { source })?;
    match exe.parent() {
        Some(dir) => Ok(dir.to_path_buf()),
        None => Err(LoadError::ExecutableDirUnknown { path: exe }),
    }
}
