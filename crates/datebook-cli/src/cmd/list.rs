//! `dbk list` — the acting user's special dates, ordered by date.

use clap::Args;
use datebook_core::store::Store;

use crate::cmd::{fail, fail_identity};
use crate::output::{OutputMode, render_json, render_success};
use crate::user;

#[derive(Args, Debug)]
pub struct ListArgs {}

pub fn run_list(
    _args: &ListArgs,
    user_flag: Option<&str>,
    store: &Store,
    output: OutputMode,
) -> anyhow::Result<()> {
    let acting = user::require_user(store, user_flag).map_err(|e| fail_identity(output, &e))?;

    let dates = store
        .list_special_dates_for_user(acting.id)
        .map_err(|err| fail(output, &err))?;

    render_json(output, &dates)?;
    if !output.is_json() {
        if dates.is_empty() {
            render_success(output, "No special dates yet. Add one with `dbk add`.")?;
        }
        for date in &dates {
            let category = date.category.as_deref().unwrap_or("-");
            render_success(
                output,
                &format!("{:>4}  {}  {:<12} {}", date.id, date.date, category, date.title),
            )?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::ListArgs;

    #[test]
    fn list_args_parse_empty() {
        use clap::Parser;

        #[derive(Parser)]
        struct Wrapper {
            #[command(flatten)]
            args: ListArgs,
        }
        let w = Wrapper::parse_from(["test"]);
        let _ = w.args;
    }
}
