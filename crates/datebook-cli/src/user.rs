//! Acting-user identity resolution for CLI commands.
//!
//! The resolution chain: `--user` flag > `DATEBOOK_USER` env > `USER` env
//! (TTY only). Commands that read or mutate per-user data require an
//! identity naming a registered user; `register` works without one.

use datebook_core::model::User;
use datebook_core::store::Store;
use std::env;

/// Errors from identity resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityError {
    /// Human-readable description.
    pub message: String,
    /// Machine error code.
    pub code: &'static str,
}

impl std::fmt::Display for IdentityError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for IdentityError {}

/// Environment reader trait for dependency injection in tests.
trait EnvReader {
    fn get(&self, key: &str) -> Option<String>;
    fn is_tty(&self) -> bool;
}

/// Real environment reader.
struct RealEnv;

impl EnvReader for RealEnv {
    fn get(&self, key: &str) -> Option<String> {
        env::var(key).ok().filter(|v| !v.is_empty())
    }

    fn is_tty(&self) -> bool {
        use std::io::IsTerminal;
        std::io::stdin().is_terminal()
    }
}

/// Core resolution logic, parameterized by environment reader.
fn resolve_username_with(cli_flag: Option<&str>, env: &dyn EnvReader) -> Option<String> {
    if let Some(name) = cli_flag {
        if !name.is_empty() {
            return Some(name.to_string());
        }
    }

    if let Some(val) = env.get("DATEBOOK_USER") {
        return Some(val);
    }

    // USER env, but only if stdin is a TTY.
    if env.is_tty() {
        if let Some(val) = env.get("USER") {
            return Some(val);
        }
    }

    None
}

/// Resolve the acting username following the chain:
///
/// 1. `--user` CLI flag (passed as `cli_flag`)
/// 2. `DATEBOOK_USER` environment variable
/// 3. `USER` environment variable (only if running in a TTY)
///
/// Returns `None` if no identity could be resolved.
pub fn resolve_username(cli_flag: Option<&str>) -> Option<String> {
    resolve_username_with(cli_flag, &RealEnv)
}

/// Resolve the acting user to a registered account.
///
/// Use this for commands operating on per-user data.
///
/// # Errors
///
/// Returns an [`IdentityError`] when no identity could be resolved, when
/// the store lookup fails, or when the name is not registered.
pub fn require_user(store: &Store, cli_flag: Option<&str>) -> Result<User, IdentityError> {
    let Some(username) = resolve_username(cli_flag) else {
        return Err(IdentityError {
            message: "User identity required for this command. \
                      Set --user or the DATEBOOK_USER environment variable."
                .to_string(),
            code: "missing_user",
        });
    };

    match store.find_user_by_username(&username) {
        Ok(Some(user)) => Ok(user),
        Ok(None) => Err(IdentityError {
            message: format!("no registered user named '{username}'; run `dbk register` first"),
            code: "unknown_user",
        }),
        Err(err) => Err(IdentityError {
            message: format!("look up user '{username}': {err}"),
            code: "user_lookup_failed",
        }),
    }
}
