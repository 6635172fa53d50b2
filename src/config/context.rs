//! Process inputs consumed by path resolution.
//!
//! The resolver never reads `std::env` on its own; everything it needs from
//! the running process is captured here first, so tests can build a context
//! by hand.

use tracing::trace;

/// Snapshot of the process state that influences lookup paths.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupContext {
    /// Raw argument vector, program path first.
    pub args: Vec<String>,
    /// Positional arguments left over after the host parsed its flags.
    pub positional: Vec<String>,
    /// Name of the current OS user, if it could be determined.
    pub os_user: Option<String>,
}

impl LookupContext {
    /// Capture the current process arguments and OS user.
    ///
    /// The positional remainder starts empty; hosts that parse flags attach
    /// theirs with [`LookupContext::with_positional`].
    pub fn current() -> Self {
        Self {
            args: std::env::args().collect(),
            positional: Vec::new(),
            os_user: current_os_user(),
        }
    }

    pub fn new(args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            args: args.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn with_positional(mut self, positional: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.positional = positional.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_os_user(mut self, user: impl Into<String>) -> Self {
        self.os_user = Some(user.into());
        self
    }

    pub fn without_os_user(mut self) -> Self {
        self.os_user = None;
        self
    }

    /// Path the program was invoked as.
    pub fn program(&self) -> Option<&str> {
        self.args.first().map(String::as_str)
    }

    /// Whether the program is a test binary, i.e. its path ends with `.test`.
    pub fn is_test_binary(&self) -> bool {
        self.program().is_some_and(|program| program.ends_with(".test"))
    }
}

/// Look up the name of the user the process runs as.
///
/// Resolves the real uid through the passwd database, falling back to
/// `USER`/`USERNAME` when there is no entry (or no passwd database).
pub fn current_os_user() -> Option<String> {
    passwd_user().or_else(env_user)
}

#[cfg(unix)]
fn passwd_user() -> Option<String> {
    use nix::unistd::{Uid, User};

    let uid = Uid::current();
    match User::from_uid(uid) {
        Ok(Some(user)) if !user.name.is_empty() => Some(user.name),
        Ok(_) => {
            trace!(uid = %uid, "No passwd entry for uid");
            None
        }
        Err(e) => {
            trace!(uid = %uid, error = %e, "Passwd lookup failed");
            None
        }
    }
}

#[cfg(not(unix))]
fn passwd_user() -> Option<String> {
    None
}

fn env_user() -> Option<String> {
    ["USER", "USERNAME"]
        .iter()
        .filter_map(|key| std::env::var(key).ok())
        .map(|name| name.trim().to_string())
        .find(|name| !name.is_empty())
}
