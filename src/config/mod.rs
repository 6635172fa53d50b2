//! Layered JSON configuration.
//!
//! A load applies an ordered list of JSON files to one target value:
//! 1. **Base** - `<root>/config.json`, always first
//! 2. **Mixin** - at most one of:
//!    - `<root>/config/mixins/test.json` for test binaries (`UseTest`)
//!    - `<root>/config/mixins/<user>.json`, where the user comes from
//!      `<root>/.user` (`UseDotUser`) or the OS
//!
//! With `UseArgumentPaths`, paths given on the command line replace both.
//!
//! ## Merge Strategy
//! Objects merge field by field, arrays and scalars are replaced, and a null
//! leaves the earlier value in place.
//!
//! ## Failures
//! Unreadable and malformed files abort the load unless `IgnoreMissingFiles`
//! or `IgnoreInvalidFiles` is set, in which case they are recorded as skipped.

mod behavior;
mod context;
mod loader;
mod merge;
mod resolver;

pub use behavior::{Behavior, Behaviors, UnknownBehavior};
pub use context::{LookupContext, current_os_user};
pub use loader::{Loader, SkipReason, SkippedPath};
pub use merge::{deep_merge, deep_merge_all};
pub use resolver::{
    BASE_FILE, DOT_USER_FILE, LookupPath, MIXIN_DIR, PathResolver, PathSource, PreservedArgs,
    TEST_MIXIN,
};
