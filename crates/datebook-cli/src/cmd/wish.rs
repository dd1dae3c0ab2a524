//! `dbk wish` / `dbk wishlist` — wishlist items on an owned special date.

use clap::Args;
use datebook_core::model::NewWishlistItem;
use datebook_core::service;
use datebook_core::store::Store;

use crate::cmd::{fail, fail_identity};
use crate::output::{OutputMode, render_json, render_success};
use crate::user;

#[derive(Args, Debug)]
pub struct WishArgs {
    /// Id of the special date to attach the item to.
    pub date_id: i64,

    /// Name of the wishlist item.
    #[arg(short, long)]
    pub name: String,

    /// Free-text description.
    #[arg(long)]
    pub description: Option<String>,

    /// Link to the item.
    #[arg(long)]
    pub url: Option<String>,

    /// Price estimate.
    #[arg(long)]
    pub price: Option<f64>,
}

pub fn run_wish(
    args: &WishArgs,
    user_flag: Option<&str>,
    store: &Store,
    output: OutputMode,
) -> anyhow::Result<()> {
    let acting = user::require_user(store, user_flag).map_err(|e| fail_identity(output, &e))?;

    let new = NewWishlistItem {
        item_name: args.name.clone(),
        description: args.description.clone(),
        url: args.url.clone(),
        price: args.price,
    };
    let item = service::add_wishlist_item(store, acting.id, args.date_id, &new)
        .map_err(|err| fail(output, &err))?;

    render_json(output, &item)?;
    render_success(
        output,
        &format!("Added wishlist item '{}' (id {})", item.item_name, item.id),
    )?;
    Ok(())
}

#[derive(Args, Debug)]
pub struct WishlistArgs {
    /// Id of the special date to list items for.
    pub date_id: i64,
}

pub fn run_wishlist(
    args: &WishlistArgs,
    user_flag: Option<&str>,
    store: &Store,
    output: OutputMode,
) -> anyhow::Result<()> {
    let acting = user::require_user(store, user_flag).map_err(|e| fail_identity(output, &e))?;

    let items = service::wishlist_items(store, acting.id, args.date_id)
        .map_err(|err| fail(output, &err))?;

    render_json(output, &items)?;
    if !output.is_json() {
        if items.is_empty() {
            render_success(output, "No wishlist items.")?;
        }
        for item in &items {
            let price = item
                .price
                .map_or_else(|| "-".to_string(), |p| format!("{p:.2}"));
            render_success(
                output,
                &format!("{:>4}  {:<24} {:>8}  {}", item.id, item.item_name, price,
                    item.url.as_deref().unwrap_or("-")),
            )?;
        }
    }
    Ok(())
}
