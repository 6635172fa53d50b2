//! Lookup path resolution.
//!
//! Produces the ordered list of config files a load applies. Argument paths,
//! when enabled and present, replace discovery entirely. Otherwise the list
//! is the base `config.json` followed by at most one mixin.

use super::behavior::{Behavior, Behaviors};
use super::context::LookupContext;
use std::fmt;
use std::path::{Component, Path, PathBuf};
use tracing::trace;

/// Base config file name, relative to the root path.
pub const BASE_FILE: &str = "config.json";

/// Directory holding mixin files, relative to the root path.
pub const MIXIN_DIR: &str = "config/mixins";

/// Name of the mixin used by test binaries.
pub const TEST_MIXIN: &str = "test";

/// File holding an explicit user name, relative to the root path.
pub const DOT_USER_FILE: &str = ".user";

/// How process arguments are turned into explicit config paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PreservedArgs {
    /// Use the positional arguments left after the host parsed its flags.
    #[default]
    Positional,
    /// Skip the program path and this many leading raw arguments.
    Count(usize),
}

/// Where a lookup path came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathSource {
    /// Supplied on the command line
    Argument,
    /// The base `config.json`
    Base,
    /// The `test.json` mixin
    TestMixin,
    /// The per-user mixin
    UserMixin,
}

impl fmt::Display for PathSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSource::Argument => write!(f, "argument"),
            PathSource::Base => write!(f, "base"),
            PathSource::TestMixin => write!(f, "test mixin"),
            PathSource::UserMixin => write!(f, "user mixin"),
        }
    }
}

/// A candidate config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupPath {
    pub path: PathBuf,
    pub source: PathSource,
}

impl LookupPath {
    fn new(path: impl Into<PathBuf>, source: PathSource) -> Self {
        Self {
            path: path.into(),
            source,
        }
    }
}

/// Computes lookup paths for one root and behavior set.
#[derive(Debug, Clone, Copy)]
pub struct PathResolver<'a> {
    pub root_path: &'a Path,
    pub preserved_args: PreservedArgs,
    pub behaviors: &'a Behaviors,
}

impl<'a> PathResolver<'a> {
    pub fn new(root_path: &'a Path, preserved_args: PreservedArgs, behaviors: &'a Behaviors) -> Self {
        Self {
            root_path,
            preserved_args,
            behaviors,
        }
    }

    /// Resolve the ordered lookup paths for this context.
    pub fn resolve(&self, ctx: &LookupContext) -> Vec<LookupPath> {
        if self.behaviors.contains(Behavior::UseArgumentPaths)
            && let Some(paths) = self.argument_paths(ctx)
        {
            return paths;
        }

        let mut paths = vec![LookupPath::new(self.under_root(BASE_FILE), PathSource::Base)];

        if self.behaviors.contains(Behavior::UseTest) && ctx.is_test_binary() {
            paths.push(LookupPath::new(
                self.mixin_path(TEST_MIXIN),
                PathSource::TestMixin,
            ));
        } else {
            let user = self.user(ctx);
            if !user.is_empty() {
                paths.push(LookupPath::new(self.mixin_path(&user), PathSource::UserMixin));
            }
        }

        paths
    }

    /// Explicit paths from the arguments, or `None` to fall back to discovery.
    fn argument_paths(&self, ctx: &LookupContext) -> Option<Vec<LookupPath>> {
        let args: &[String] = match self.preserved_args {
            PreservedArgs::Positional => &ctx.positional,
            PreservedArgs::Count(count) => {
                let split = count.saturating_add(1);
                ctx.args.get(split..).unwrap_or_default()
            }
        };

        if args.is_empty() {
            return None;
        }

        Some(
            args.iter()
                .map(|arg| LookupPath::new(arg, PathSource::Argument))
                .collect(),
        )
    }

    /// Resolve the user identity that selects the mixin.
    ///
    /// A readable `.user` file wins when [`Behavior::UseDotUser`] is set,
    /// even if it trims down to nothing. Otherwise the OS user is used, and
    /// an unknown user yields the empty string.
    pub fn user(&self, ctx: &LookupContext) -> String {
        if self.behaviors.contains(Behavior::UseDotUser) {
            let dot_user = self.under_root(DOT_USER_FILE);
            match std::fs::read_to_string(&dot_user) {
                Ok(contents) => {
                    let user = contents.trim().to_string();
                    trace!(path = %dot_user.display(), user = %user, "User read from dot file");
                    return user;
                }
                Err(e) => {
                    trace!(path = %dot_user.display(), error = %e, "No dot user file");
                }
            }
        }

        let user = ctx.os_user.clone().unwrap_or_default();
        trace!(user = %user, "Using OS user");
        user
    }

    /// Path of a mixin, always inside the mixin directory.
    ///
    /// Root, prefix and `..` components of the name are dropped, so a user
    /// name like `/etc/passwd` maps to `config/mixins/etc/passwd.json`.
    fn mixin_path(&self, name: &str) -> PathBuf {
        let file = format!("{name}.json");
        let mut path = self.under_root(MIXIN_DIR);
        for component in Path::new(&file).components() {
            if let Component::Normal(part) = component {
                path.push(part);
            }
        }
        path
    }

    /// Join a relative path onto the root. A `.` root is left off, so the
    /// default root yields `config.json` rather than `./config.json`.
    fn under_root(&self, relative: impl AsRef<Path>) -> PathBuf {
        if self.root_path.as_os_str().is_empty() || self.root_path == Path::new(".") {
            relative.as_ref().to_path_buf()
        } else {
            self.root_path.join(relative)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn paths(lookup: &[LookupPath]) -> Vec<PathBuf> {
        lookup.iter().map(|l| l.path.clone()).collect()
    }

    #[test]
    fn test_default_is_base_plus_user_mixin() {
        let root = Path::new("/srv/app");
        let behaviors = Behaviors::none();
        let ctx = LookupContext::new(["/srv/app/bin"]).with_os_user("bob");

        let resolved = PathResolver::new(root, PreservedArgs::default(), &behaviors).resolve(&ctx);

        assert_eq!(
            resolved,
            vec![
                LookupPath::new("/srv/app/config.json", PathSource::Base),
                LookupPath::new("/srv/app/config/mixins/bob.json", PathSource::UserMixin),
            ]
        );
    }

    #[test]
    fn test_no_user_means_base_only() {
        let root = Path::new("/srv/app");
        let behaviors = Behaviors::none();
        let ctx = LookupContext::new(["/srv/app/bin"]);

        let resolved = PathResolver::new(root, PreservedArgs::default(), &behaviors).resolve(&ctx);

        assert_eq!(paths(&resolved), vec![PathBuf::from("/srv/app/config.json")]);
    }

    #[test]
    fn test_test_mixin_beats_user() {
        let root = Path::new("/srv/app");
        let behaviors = Behaviors::from([Behavior::UseTest]);
        let ctx = LookupContext::new(["/tmp/build/app.test"]).with_os_user("bob");

        let resolved = PathResolver::new(root, PreservedArgs::default(), &behaviors).resolve(&ctx);

        assert_eq!(
            resolved[1],
            LookupPath::new("/srv/app/config/mixins/test.json", PathSource::TestMixin)
        );
        assert_eq!(resolved.len(), 2);
    }

    #[test]
    fn test_use_test_without_test_binary_falls_back_to_user() {
        let root = Path::new("/srv/app");
        let behaviors = Behaviors::from([Behavior::UseTest]);
        let ctx = LookupContext::new(["/srv/app/bin"]).with_os_user("bob");

        let resolved = PathResolver::new(root, PreservedArgs::default(), &behaviors).resolve(&ctx);

        assert_eq!(resolved[1].source, PathSource::UserMixin);
    }

    #[test]
    fn test_test_binary_without_use_test_uses_user() {
        let root = Path::new("/srv/app");
        let behaviors = Behaviors::none();
        let ctx = LookupContext::new(["app.test"]).with_os_user("bob");

        let resolved = PathResolver::new(root, PreservedArgs::default(), &behaviors).resolve(&ctx);

        assert_eq!(
            resolved[1].path,
            PathBuf::from("/srv/app/config/mixins/bob.json")
        );
    }

    #[test]
    fn test_dot_user_file_is_trimmed_and_preferred() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(".user"), "alice\n").unwrap();
        let behaviors = Behaviors::from([Behavior::UseDotUser]);
        let ctx = LookupContext::new(["app"]).with_os_user("bob");
        let resolver = PathResolver::new(temp.path(), PreservedArgs::default(), &behaviors);

        assert_eq!(resolver.user(&ctx), "alice");
        assert_eq!(
            resolver.resolve(&ctx)[1].path,
            temp.path().join("config/mixins/alice.json")
        );
    }

    #[test]
    fn test_dot_user_ignored_without_behavior() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(".user"), "alice").unwrap();
        let behaviors = Behaviors::none();
        let ctx = LookupContext::new(["app"]).with_os_user("bob");
        let resolver = PathResolver::new(temp.path(), PreservedArgs::default(), &behaviors);

        assert_eq!(resolver.user(&ctx), "bob");
    }

    #[test]
    fn test_missing_dot_user_falls_back_to_os_user() {
        let temp = TempDir::new().unwrap();
        let behaviors = Behaviors::from([Behavior::UseDotUser]);
        let ctx = LookupContext::new(["app"]).with_os_user("bob");
        let resolver = PathResolver::new(temp.path(), PreservedArgs::default(), &behaviors);

        assert_eq!(resolver.user(&ctx), "bob");
    }

    #[test]
    fn test_blank_dot_user_suppresses_mixin() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(".user"), "  \n").unwrap();
        let behaviors = Behaviors::from([Behavior::UseDotUser]);
        let ctx = LookupContext::new(["app"]).with_os_user("bob");

        let resolved =
            PathResolver::new(temp.path(), PreservedArgs::default(), &behaviors).resolve(&ctx);

        assert_eq!(paths(&resolved), vec![temp.path().join("config.json")]);
    }

    #[test]
    fn test_positional_args_replace_discovery() {
        let root = Path::new("/srv/app");
        let behaviors = Behaviors::from([Behavior::UseArgumentPaths, Behavior::UseTest]);
        let ctx = LookupContext::new(["app.test", "-v", "one.json", "two.json"])
            .with_positional(["one.json", "two.json"])
            .with_os_user("bob");

        let resolved = PathResolver::new(root, PreservedArgs::Positional, &behaviors).resolve(&ctx);

        assert_eq!(
            resolved,
            vec![
                LookupPath::new("one.json", PathSource::Argument),
                LookupPath::new("two.json", PathSource::Argument),
            ]
        );
    }

    #[test]
    fn test_empty_positional_falls_back() {
        let root = Path::new("/srv/app");
        let behaviors = Behaviors::from([Behavior::UseArgumentPaths]);
        let ctx = LookupContext::new(["app", "extra.json"]);

        let resolved = PathResolver::new(root, PreservedArgs::Positional, &behaviors).resolve(&ctx);

        assert_eq!(paths(&resolved), vec![PathBuf::from("/srv/app/config.json")]);
    }

    #[test]
    fn test_count_skips_program_and_preserved_args() {
        let root = Path::new("/srv/app");
        let behaviors = Behaviors::from([Behavior::UseArgumentPaths]);
        let ctx = LookupContext::new(["app", "serve", "a.json", "b.json"]);

        let resolved = PathResolver::new(root, PreservedArgs::Count(1), &behaviors).resolve(&ctx);

        assert_eq!(
            paths(&resolved),
            vec![PathBuf::from("a.json"), PathBuf::from("b.json")]
        );
    }

    #[test]
    fn test_count_zero_takes_everything_after_program() {
        let root = Path::new("/srv/app");
        let behaviors = Behaviors::from([Behavior::UseArgumentPaths]);
        let ctx = LookupContext::new(["app", "a.json"]);

        let resolved = PathResolver::new(root, PreservedArgs::Count(0), &behaviors).resolve(&ctx);

        assert_eq!(paths(&resolved), vec![PathBuf::from("a.json")]);
    }

    #[test]
    fn test_count_without_enough_args_falls_back() {
        let root = Path::new("/srv/app");
        let behaviors = Behaviors::from([Behavior::UseArgumentPaths]);
        let ctx = LookupContext::new(["app", "serve"]);

        let resolved = PathResolver::new(root, PreservedArgs::Count(1), &behaviors).resolve(&ctx);

        assert_eq!(paths(&resolved), vec![PathBuf::from("/srv/app/config.json")]);
    }

    #[test]
    fn test_huge_count_falls_back() {
        let root = Path::new("/srv/app");
        let behaviors = Behaviors::from([Behavior::UseArgumentPaths]);
        let ctx = LookupContext::new(["app", "a.json"]);

        let resolved =
            PathResolver::new(root, PreservedArgs::Count(usize::MAX), &behaviors).resolve(&ctx);

        assert_eq!(resolved[0].source, PathSource::Base);
    }

    #[test]
    fn test_args_ignored_without_behavior() {
        let root = Path::new("/srv/app");
        let behaviors = Behaviors::none();
        let ctx = LookupContext::new(["app", "a.json"]).with_positional(["a.json"]);

        let resolved = PathResolver::new(root, PreservedArgs::Count(0), &behaviors).resolve(&ctx);

        assert_eq!(resolved[0].source, PathSource::Base);
    }

    #[test]
    fn test_base_is_always_first_without_argument_paths() {
        let root = Path::new("/srv/app");
        let ctx = LookupContext::new(["app.test", "x.json"])
            .with_positional(["x.json"])
            .with_os_user("bob");

        for behavior in Behavior::ALL {
            if behavior == Behavior::UseArgumentPaths {
                continue;
            }
            let behaviors = Behaviors::from([behavior]);
            let resolved =
                PathResolver::new(root, PreservedArgs::default(), &behaviors).resolve(&ctx);
            assert_eq!(resolved[0], LookupPath::new("/srv/app/config.json", PathSource::Base));
        }
    }

    #[test]
    fn test_absolute_user_stays_under_mixin_dir() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(".user"), "/etc/passwd\n").unwrap();
        let behaviors = Behaviors::from([Behavior::UseDotUser]);
        let ctx = LookupContext::new(["app"]);

        let resolved =
            PathResolver::new(temp.path(), PreservedArgs::default(), &behaviors).resolve(&ctx);

        assert_eq!(
            resolved[1].path,
            temp.path().join("config/mixins/etc/passwd.json")
        );
    }

    #[test]
    fn test_parent_components_dropped_from_user() {
        let root = Path::new("/srv/app");
        let behaviors = Behaviors::none();
        let ctx = LookupContext::new(["app"]).with_os_user("../../secrets/key");

        let resolved = PathResolver::new(root, PreservedArgs::default(), &behaviors).resolve(&ctx);

        assert_eq!(
            resolved[1].path,
            PathBuf::from("/srv/app/config/mixins/secrets/key.json")
        );
        assert!(resolved[1].path.starts_with("/srv/app/config/mixins"));
    }

    #[test]
    fn test_dot_root_is_left_off() {
        let behaviors = Behaviors::none();
        let ctx = LookupContext::new(["app"]).with_os_user("bob");

        let resolved =
            PathResolver::new(Path::new("."), PreservedArgs::default(), &behaviors).resolve(&ctx);

        assert_eq!(
            paths(&resolved),
            vec![
                PathBuf::from("config.json"),
                PathBuf::from("config/mixins/bob.json"),
            ]
        );
    }

    #[test]
    fn test_path_source_display() {
        assert_eq!(PathSource::Argument.to_string(), "argument");
        assert_eq!(PathSource::Base.to_string(), "base");
        assert_eq!(PathSource::TestMixin.to_string(), "test mixin");
        assert_eq!(PathSource::UserMixin.to_string(), "user mixin");
    }
}
