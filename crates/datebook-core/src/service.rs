//! Caller-facing operations: ownership checks and the aggregation query.
//!
//! Every function takes the authenticated user id as an explicit parameter;
//! nothing here reads identity from ambient context. The auth collaborator
//! (CLI, HTTP layer, ...) resolves credentials to a [`UserId`] and the core
//! trusts it.

use rusqlite::params_from_iter;
use std::collections::BTreeSet;

use crate::error::StoreError;
use crate::index;
use crate::model::{
    NewSpecialDate, NewWishlistItem, SpecialDate, SpecialDateId, UserId, WishlistItem,
};
use crate::store::Store;

/// Load a special date and verify `user` owns it.
///
/// # Errors
///
/// `NotFound` when the id is unknown, `Unauthorized` on an ownership
/// mismatch.
pub fn owned_special_date(
    store: &Store,
    user: UserId,
    date_id: SpecialDateId,
) -> Result<SpecialDate, StoreError> {
    let Some(date) = store.get_special_date(date_id)? else {
        return Err(StoreError::NotFound {
            entity: "special date",
            id: date_id,
        });
    };
    if date.user_id != user {
        tracing::warn!(user_id = user, date_id, "ownership check failed");
        return Err(StoreError::Unauthorized {
            user_id: user,
            date_id,
        });
    }
    Ok(date)
}

/// Add a special date for `user`, recording its calendar event.
///
/// # Errors
///
/// `InvalidDate`/`MissingField` for bad input, `NotFound` for an unknown
/// user id.
pub fn add_special_date(
    store: &mut Store,
    user: UserId,
    new: &NewSpecialDate,
) -> Result<SpecialDateId, StoreError> {
    store.create_special_date(user, new)
}

/// Remove one of `user`'s special dates (with its wishlist items and
/// calendar event).
///
/// # Errors
///
/// `NotFound`/`Unauthorized` from the ownership check, otherwise whatever
/// the store delete reports.
pub fn remove_special_date(
    store: &mut Store,
    user: UserId,
    date_id: SpecialDateId,
) -> Result<(), StoreError> {
    owned_special_date(store, user, date_id)?;
    store.delete_special_date(date_id)
}

/// Attach a wishlist item to one of `user`'s special dates, returning the
/// created item with its assigned id.
///
/// # Errors
///
/// `NotFound` when the parent id is unknown, `Unauthorized` when `user`
/// does not own it, `MissingField` for a blank item name.
pub fn add_wishlist_item(
    store: &Store,
    user: UserId,
    date_id: SpecialDateId,
    new: &NewWishlistItem,
) -> Result<WishlistItem, StoreError> {
    owned_special_date(store, user, date_id)?;
    store.add_wishlist_item(date_id, new)
}

/// List the wishlist items of one of `user`'s special dates.
///
/// # Errors
///
/// `NotFound`/`Unauthorized` from the ownership check.
pub fn wishlist_items(
    store: &Store,
    user: UserId,
    date_id: SpecialDateId,
) -> Result<Vec<WishlistItem>, StoreError> {
    owned_special_date(store, user, date_id)?;
    store.list_wishlist_items(date_id)
}

/// Dates with at least one calendar event, restricted to dates `user`
/// has a special date on.
///
/// The calendar index is shared across users, but the result is the
/// intersection with the caller's own dates, so nothing about other
/// users' dates can leak. Set semantics; returned sorted for stable
/// display.
///
/// # Errors
///
/// Returns an error if a query fails.
pub fn dates_with_events_for_user(
    store: &Store,
    user: UserId,
) -> Result<BTreeSet<String>, StoreError> {
    let conn = store.connection();

    let mut stmt =
        conn.prepare("SELECT DISTINCT date FROM special_dates WHERE user_id = ?1")?;
    let own_dates = stmt
        .query_map([user], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;

    if own_dates.is_empty() {
        return Ok(BTreeSet::new());
    }

    let placeholders = vec!["?"; own_dates.len()].join(", ");
    let sql = format!(
        "SELECT date, events FROM calendar_entries WHERE date IN ({placeholders})"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params_from_iter(own_dates.iter()), |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let mut occupied = BTreeSet::new();
    for (date, raw) in rows {
        // Entries never persist with an empty map, but a corrupt row
        // decodes as empty and must not count as occupied.
        if !index::decode_event_map(&date, &raw).is_empty() {
            occupied.insert(date);
        }
    }

    Ok(occupied)
}
