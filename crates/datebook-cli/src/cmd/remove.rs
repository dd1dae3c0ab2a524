//! `dbk remove` — delete one of the acting user's special dates.

use clap::Args;
use datebook_core::service;
use datebook_core::store::Store;
use serde_json::json;

use crate::cmd::{fail, fail_identity};
use crate::output::{OutputMode, render_json, render_success};
use crate::user;

#[derive(Args, Debug)]
pub struct RemoveArgs {
    /// Id of the special date to remove.
    pub id: i64,
}

pub fn run_remove(
    args: &RemoveArgs,
    user_flag: Option<&str>,
    store: &mut Store,
    output: OutputMode,
) -> anyhow::Result<()> {
    let acting = user::require_user(store, user_flag).map_err(|e| fail_identity(output, &e))?;

    service::remove_special_date(store, acting.id, args.id)
        .map_err(|err| fail(output, &err))?;

    render_json(output, &json!({ "removed": args.id }))?;
    render_success(output, &format!("Removed special date {}", args.id))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::RemoveArgs;

    #[test]
    fn remove_args_parse_positional_id() {
        use clap::Parser;

        #[derive(Parser)]
        struct Wrapper {
            #[command(flatten)]
            args: RemoveArgs,
        }
        let w = Wrapper::parse_from(["test", "7"]);
        assert_eq!(w.args.id, 7);
    }
}
