//! `dbk register` — create a user account.

use clap::Args;
use datebook_core::store::Store;
use serde_json::json;

use crate::cmd::fail;
use crate::output::{OutputMode, render_json, render_success};

#[derive(Args, Debug)]
pub struct RegisterArgs {
    /// Username for the new account (unique).
    // Long-only: -u belongs to the global --user flag.
    #[arg(long)]
    pub username: String,

    /// Email address for the new account (unique).
    #[arg(short, long)]
    pub email: String,
}

pub fn run_register(args: &RegisterArgs, store: &Store, output: OutputMode) -> anyhow::Result<()> {
    let id = store
        .create_user(&args.username, &args.email)
        .map_err(|err| fail(output, &err))?;

    render_json(output, &json!({ "id": id, "username": args.username }))?;
    render_success(output, &format!("Registered user '{}' (id {id})", args.username))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::RegisterArgs;

    #[test]
    fn register_args_parse() {
        use clap::Parser;

        #[derive(Parser)]
        struct Wrapper {
            #[command(flatten)]
            args: RegisterArgs,
        }
        let w = Wrapper::parse_from(["test", "--username", "alice", "--email", "a@example.com"]);
        assert_eq!(w.args.username, "alice");
        assert_eq!(w.args.email, "a@example.com");
    }
}
