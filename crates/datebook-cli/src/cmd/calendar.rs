//! `dbk calendar` — dates with events, restricted to the acting user.

use clap::Args;
use datebook_core::service;
use datebook_core::store::Store;

use crate::cmd::{fail, fail_identity};
use crate::output::{OutputMode, render_json, render_success};
use crate::user;

#[derive(Args, Debug)]
pub struct CalendarArgs {}

pub fn run_calendar(
    _args: &CalendarArgs,
    user_flag: Option<&str>,
    store: &Store,
    output: OutputMode,
) -> anyhow::Result<()> {
    let acting = user::require_user(store, user_flag).map_err(|e| fail_identity(output, &e))?;

    let dates = service::dates_with_events_for_user(store, acting.id)
        .map_err(|err| fail(output, &err))?;

    render_json(output, &dates)?;
    if !output.is_json() {
        if dates.is_empty() {
            render_success(output, "No occupied dates.")?;
        }
        for date in &dates {
            render_success(output, date)?;
        }
    }
    Ok(())
}
