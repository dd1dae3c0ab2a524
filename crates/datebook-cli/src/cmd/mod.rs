//! Command handlers, one module per subcommand.

pub mod add;
pub mod calendar;
pub mod list;
pub mod register;
pub mod remove;
pub mod wish;

use crate::output::{CliError, OutputMode, render_error};
use crate::user::IdentityError;
use datebook_core::error::StoreError;

/// Marker for a failure that has already been rendered to stderr.
///
/// `main` downcasts to this and exits non-zero without printing the
/// error again.
#[derive(Debug)]
pub(crate) struct Reported;

impl std::fmt::Display for Reported {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "command failed")
    }
}

impl std::error::Error for Reported {}

/// Render a core error and turn it into a non-zero exit.
pub(crate) fn fail(output: OutputMode, err: &StoreError) -> anyhow::Error {
    let _ = render_error(output, &CliError::from_store(err));
    anyhow::Error::new(Reported)
}

/// Render an identity-resolution error and turn it into a non-zero exit.
pub(crate) fn fail_identity(output: OutputMode, err: &IdentityError) -> anyhow::Error {
    let _ = render_error(
        output,
        &CliError::with_details(&err.message, "Register with `dbk register` and pass --user.", err.code),
    );
    anyhow::Error::new(Reported)
}
