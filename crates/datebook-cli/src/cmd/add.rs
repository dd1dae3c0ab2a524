//! `dbk add` — record a special date for the acting user.

use clap::Args;
use datebook_core::model::NewSpecialDate;
use datebook_core::service;
use datebook_core::store::Store;
use serde_json::json;

use crate::cmd::{fail, fail_identity};
use crate::output::{OutputMode, render_json, render_success};
use crate::user;

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Title of the special date, e.g. "Mum's birthday".
    #[arg(short, long)]
    pub title: String,

    /// Calendar date in YYYY-MM-DD form.
    #[arg(short, long)]
    pub date: String,

    /// Free-text description.
    #[arg(long)]
    pub description: Option<String>,

    /// Category tag, e.g. "Birthday" or "Anniversary".
    #[arg(short, long)]
    pub category: Option<String>,
}

pub fn run_add(
    args: &AddArgs,
    user_flag: Option<&str>,
    store: &mut Store,
    output: OutputMode,
) -> anyhow::Result<()> {
    let acting = user::require_user(store, user_flag).map_err(|e| fail_identity(output, &e))?;

    let new = NewSpecialDate {
        title: args.title.clone(),
        date: args.date.clone(),
        description: args.description.clone(),
        category: args.category.clone(),
    };
    let id = service::add_special_date(store, acting.id, &new)
        .map_err(|err| fail(output, &err))?;

    render_json(output, &json!({ "id": id, "title": args.title, "date": args.date }))?;
    render_success(
        output,
        &format!("Added special date '{}' on {} (id {id})", args.title, args.date),
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::AddArgs;

    #[test]
    fn add_args_defaults() {
        use clap::Parser;

        #[derive(Parser)]
        struct Wrapper {
            #[command(flatten)]
            args: AddArgs,
        }
        let w = Wrapper::parse_from(["test", "--title", "Birthday", "--date", "2025-01-01"]);
        assert_eq!(w.args.title, "Birthday");
        assert_eq!(w.args.date, "2025-01-01");
        assert!(w.args.description.is_none());
        assert!(w.args.category.is_none());
    }
}
