//! Entity store: users, special dates, wishlist items.
//!
//! [`Store`] owns one SQLite connection. Mutations that affect the derived
//! calendar index (`create_special_date`, `delete_special_date`) pair the
//! entity write with the matching [`crate::index`] update inside a single
//! transaction, so the two can never diverge: a failure anywhere rolls the
//! whole unit of work back.
//!
//! Ownership is NOT checked here. Operations referencing a special date by
//! id act on it regardless of owner; the caller (see [`crate::service`])
//! is responsible for signalling `Unauthorized` before delegating.

use chrono::Utc;
use rusqlite::{Connection, ErrorCode as SqliteErrorCode, OptionalExtension, params};
use std::path::Path;

use crate::db;
use crate::error::StoreError;
use crate::index;
use crate::model::{
    DateKey, EventSummary, NewSpecialDate, NewWishlistItem, SpecialDate, SpecialDateId, User,
    UserId, WishlistItem, WishlistItemId,
};

/// Handle to the datebook store.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open (or create) the store at `path` and migrate it.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        Ok(Self {
            conn: db::open_store(path)?,
        })
    }

    /// Open a fresh in-memory store (tests and dry runs).
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be configured or migrated.
    pub fn open_in_memory() -> anyhow::Result<Self> {
        Ok(Self {
            conn: db::open_in_memory()?,
        })
    }

    pub(crate) fn connection(&self) -> &Connection {
        &self.conn
    }

    // -----------------------------------------------------------------------
    // Users
    // -----------------------------------------------------------------------

    /// Register a user.
    ///
    /// # Errors
    ///
    /// `MissingField` for a blank username/email, `Conflict` when either
    /// is already registered.
    pub fn create_user(&self, username: &str, email: &str) -> Result<UserId, StoreError> {
        let username = username.trim();
        let email = email.trim();
        if username.is_empty() {
            return Err(StoreError::MissingField { field: "username" });
        }
        if email.is_empty() {
            return Err(StoreError::MissingField { field: "email" });
        }

        let result = self.conn.execute(
            "INSERT INTO users (username, email, created_at_us) VALUES (?1, ?2, ?3)",
            params![username, email, now_us()],
        );

        match result {
            Ok(_) => {
                let id = self.conn.last_insert_rowid();
                tracing::info!(user_id = id, username, "registered user");
                Ok(id)
            }
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == SqliteErrorCode::ConstraintViolation =>
            {
                Err(StoreError::Conflict(format!(
                    "username '{username}' or email '{email}' is already registered"
                )))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Look up a user by exact username.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let user = self
            .conn
            .query_row(
                "SELECT user_id, username, email, created_at_us
                 FROM users WHERE username = ?1",
                params![username],
                map_user,
            )
            .optional()?;
        Ok(user)
    }

    /// Look up a user by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_user(&self, id: UserId) -> Result<Option<User>, StoreError> {
        let user = self
            .conn
            .query_row(
                "SELECT user_id, username, email, created_at_us
                 FROM users WHERE user_id = ?1",
                params![id],
                map_user,
            )
            .optional()?;
        Ok(user)
    }

    /// Delete a user. Restricted: fails while the user still owns special
    /// dates.
    ///
    /// # Errors
    ///
    /// `Conflict` when dates remain, `NotFound` when the id is unknown.
    pub fn delete_user(&self, id: UserId) -> Result<(), StoreError> {
        let owned: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM special_dates WHERE user_id = ?1",
            params![id],
            |row| row.get(0),
        )?;
        if owned > 0 {
            return Err(StoreError::Conflict(format!(
                "user {id} still owns {owned} special date(s)"
            )));
        }

        let deleted = self
            .conn
            .execute("DELETE FROM users WHERE user_id = ?1", params![id])?;
        if deleted == 0 {
            return Err(StoreError::NotFound { entity: "user", id });
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Special dates
    // -----------------------------------------------------------------------

    /// Create a special date for `owner` and record its calendar event, in
    /// one transaction.
    ///
    /// # Errors
    ///
    /// `InvalidDate`/`MissingField` for bad input, `NotFound` for an
    /// unknown owner, `Write` (after full rollback) if any statement fails.
    pub fn create_special_date(
        &mut self,
        owner: UserId,
        new: &NewSpecialDate,
    ) -> Result<SpecialDateId, StoreError> {
        let title = new.title.trim();
        if title.is_empty() {
            return Err(StoreError::MissingField { field: "title" });
        }
        let date = DateKey::parse(&new.date)?;

        let tx = self.conn.transaction()?;

        let owner_exists: bool = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM users WHERE user_id = ?1)",
            params![owner],
            |row| row.get(0),
        )?;
        if !owner_exists {
            return Err(StoreError::NotFound {
                entity: "user",
                id: owner,
            });
        }

        tx.execute(
            "INSERT INTO special_dates (user_id, title, date, description, category, created_at_us)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                owner,
                title,
                date.to_string(),
                new.description.as_deref(),
                new.category.as_deref(),
                now_us(),
            ],
        )?;
        let id = tx.last_insert_rowid();

        let summary = EventSummary {
            title: title.to_string(),
            date: date.to_string(),
        };
        index::record_event(&tx, date, title, &summary)?;

        tx.commit()?;
        tracing::info!(date_id = id, user_id = owner, date = %date, "created special date");
        Ok(id)
    }

    /// Delete a special date: cascade its wishlist items, drop the row, and
    /// remove its calendar event, in one transaction.
    ///
    /// # Errors
    ///
    /// `NotFound` when the id is unknown, `Write` (after full rollback) if
    /// any statement fails.
    pub fn delete_special_date(&mut self, id: SpecialDateId) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;

        let Some(existing) = tx
            .query_row(
                "SELECT date_id, user_id, title, date, description, category, created_at_us
                 FROM special_dates WHERE date_id = ?1",
                params![id],
                map_special_date,
            )
            .optional()?
        else {
            return Err(StoreError::NotFound {
                entity: "special date",
                id,
            });
        };

        // Explicit cascade: the FK carries no ON DELETE action on purpose.
        let cascaded = tx.execute(
            "DELETE FROM wishlist_items WHERE special_date_id = ?1",
            params![id],
        )?;
        tx.execute("DELETE FROM special_dates WHERE date_id = ?1", params![id])?;

        index::remove_event(&tx, &existing.date, &existing.title)?;

        tx.commit()?;
        tracing::info!(
            date_id = id,
            wishlist_items = cascaded,
            date = %existing.date,
            "deleted special date"
        );
        Ok(())
    }

    /// Fetch a special date by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_special_date(&self, id: SpecialDateId) -> Result<Option<SpecialDate>, StoreError> {
        let row = self
            .conn
            .query_row(
                "SELECT date_id, user_id, title, date, description, category, created_at_us
                 FROM special_dates WHERE date_id = ?1",
                params![id],
                map_special_date,
            )
            .optional()?;
        Ok(row)
    }

    /// All special dates owned by `user`, ordered by date (then id for
    /// stable ties).
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_special_dates_for_user(
        &self,
        user: UserId,
    ) -> Result<Vec<SpecialDate>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT date_id, user_id, title, date, description, category, created_at_us
             FROM special_dates
             WHERE user_id = ?1
             ORDER BY date ASC, date_id ASC",
        )?;
        let rows = stmt
            .query_map(params![user], map_special_date)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    // -----------------------------------------------------------------------
    // Wishlist items
    // -----------------------------------------------------------------------

    /// Attach a wishlist item to a special date.
    ///
    /// # Errors
    ///
    /// `MissingField` for a blank item name, `NotFound` when the parent
    /// special date does not exist.
    pub fn add_wishlist_item(
        &self,
        special_date_id: SpecialDateId,
        new: &NewWishlistItem,
    ) -> Result<WishlistItem, StoreError> {
        let item_name = new.item_name.trim();
        if item_name.is_empty() {
            return Err(StoreError::MissingField { field: "item_name" });
        }

        let parent_exists: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM special_dates WHERE date_id = ?1)",
            params![special_date_id],
            |row| row.get(0),
        )?;
        if !parent_exists {
            return Err(StoreError::NotFound {
                entity: "special date",
                id: special_date_id,
            });
        }

        self.conn.execute(
            "INSERT INTO wishlist_items (special_date_id, item_name, description, url, price, created_at_us)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                special_date_id,
                item_name,
                new.description.as_deref(),
                new.url.as_deref(),
                new.price,
                now_us(),
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        tracing::debug!(item_id = id, date_id = special_date_id, "added wishlist item");

        Ok(WishlistItem {
            id,
            special_date_id,
            item_name: item_name.to_string(),
            description: new.description.clone(),
            url: new.url.clone(),
            price: new.price,
        })
    }

    /// Fetch a wishlist item by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_wishlist_item(
        &self,
        id: WishlistItemId,
    ) -> Result<Option<WishlistItem>, StoreError> {
        let row = self
            .conn
            .query_row(
                "SELECT item_id, special_date_id, item_name, description, url, price
                 FROM wishlist_items WHERE item_id = ?1",
                params![id],
                map_wishlist_item,
            )
            .optional()?;
        Ok(row)
    }

    /// All wishlist items for a special date, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_wishlist_items(
        &self,
        special_date_id: SpecialDateId,
    ) -> Result<Vec<WishlistItem>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT item_id, special_date_id, item_name, description, url, price
             FROM wishlist_items
             WHERE special_date_id = ?1
             ORDER BY item_id ASC",
        )?;
        let rows = stmt
            .query_map(params![special_date_id], map_wishlist_item)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

fn now_us() -> i64 {
    Utc::now().timestamp_micros()
}

fn map_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        created_at_us: row.get(3)?,
    })
}

fn map_special_date(row: &rusqlite::Row<'_>) -> rusqlite::Result<SpecialDate> {
    Ok(SpecialDate {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        date: row.get(3)?,
        description: row.get(4)?,
        category: row.get(5)?,
        created_at_us: row.get(6)?,
    })
}

fn map_wishlist_item(row: &rusqlite::Row<'_>) -> rusqlite::Result<WishlistItem> {
    Ok(WishlistItem {
        id: row.get(0)?,
        special_date_id: row.get(1)?,
        item_name: row.get(2)?,
        description: row.get(3)?,
        url: row.get(4)?,
        price: row.get(5)?,
    })
}

#[cfg(test)]
mod tests {
    use super::Store;
    use crate::error::StoreError;
    use crate::index;
    use crate::model::{NewSpecialDate, NewWishlistItem};

    fn test_store() -> Store {
        Store::open_in_memory().expect("open in-memory store")
    }

    fn new_date(title: &str, date: &str) -> NewSpecialDate {
        NewSpecialDate {
            title: title.to_string(),
            date: date.to_string(),
            description: None,
            category: None,
        }
    }

    #[test]
    fn create_and_find_user() {
        let store = test_store();
        let id = store
            .create_user("testuser", "testuser@example.com")
            .expect("create user");

        let user = store
            .find_user_by_username("testuser")
            .expect("query")
            .expect("user exists");
        assert_eq!(user.id, id);
        assert_eq!(user.email, "testuser@example.com");

        assert!(
            store
                .find_user_by_username("nobody")
                .expect("query")
                .is_none()
        );
    }

    #[test]
    fn duplicate_username_or_email_conflicts() {
        let store = test_store();
        store
            .create_user("alice", "alice@example.com")
            .expect("create");

        let err = store
            .create_user("alice", "other@example.com")
            .expect_err("duplicate username");
        assert!(matches!(err, StoreError::Conflict(_)));

        let err = store
            .create_user("carol", "alice@example.com")
            .expect_err("duplicate email");
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[test]
    fn blank_user_fields_are_rejected() {
        let store = test_store();
        assert!(matches!(
            store.create_user("  ", "a@example.com"),
            Err(StoreError::MissingField { field: "username" })
        ));
        assert!(matches!(
            store.create_user("a", ""),
            Err(StoreError::MissingField { field: "email" })
        ));
    }

    #[test]
    fn create_special_date_records_calendar_event() {
        let mut store = test_store();
        let user = store.create_user("alice", "alice@example.com").expect("user");
        let id = store
            .create_special_date(user, &new_date("Birthday", "2025-01-01"))
            .expect("create date");
        assert!(id > 0);

        let events = index::load_event_map(store.connection(), "2025-01-01")
            .expect("load")
            .expect("entry exists");
        assert_eq!(events.len(), 1);
        assert_eq!(events["Birthday"].date, "2025-01-01");
    }

    #[test]
    fn create_special_date_validates_input() {
        let mut store = test_store();
        let user = store.create_user("alice", "alice@example.com").expect("user");

        assert!(matches!(
            store.create_special_date(user, &new_date("", "2025-01-01")),
            Err(StoreError::MissingField { field: "title" })
        ));
        assert!(matches!(
            store.create_special_date(user, &new_date("Party", "someday")),
            Err(StoreError::InvalidDate { .. })
        ));
        assert!(matches!(
            store.create_special_date(9999, &new_date("Party", "2025-01-01")),
            Err(StoreError::NotFound { entity: "user", .. })
        ));
    }

    #[test]
    fn delete_special_date_cascades_and_clears_event() {
        let mut store = test_store();
        let user = store.create_user("alice", "alice@example.com").expect("user");
        let date_id = store
            .create_special_date(user, &new_date("Anniversary", "2025-01-02"))
            .expect("create date");

        let item = store
            .add_wishlist_item(
                date_id,
                &NewWishlistItem {
                    item_name: "Money".to_string(),
                    url: Some("https://money.com".to_string()),
                    ..NewWishlistItem::default()
                },
            )
            .expect("add item");

        store.delete_special_date(date_id).expect("delete");

        assert!(store.get_special_date(date_id).expect("query").is_none());
        assert!(
            store.get_wishlist_item(item.id).expect("query").is_none(),
            "wishlist items must cascade with their parent"
        );
        assert!(
            index::load_entry(store.connection(), "2025-01-02")
                .expect("load")
                .is_none(),
            "calendar entry must be removed with the last event"
        );
    }

    #[test]
    fn delete_special_date_keeps_shared_date_occupied() {
        let mut store = test_store();
        let alice = store.create_user("alice", "alice@example.com").expect("user");
        let bob = store.create_user("bob", "bob@example.com").expect("user");

        let a = store
            .create_special_date(alice, &new_date("Birthday", "2025-06-15"))
            .expect("create");
        store
            .create_special_date(bob, &new_date("Graduation", "2025-06-15"))
            .expect("create");

        store.delete_special_date(a).expect("delete");

        let events = index::load_event_map(store.connection(), "2025-06-15")
            .expect("load")
            .expect("date still occupied by bob's event");
        assert_eq!(events.len(), 1);
        assert!(events.contains_key("Graduation"));
    }

    #[test]
    fn delete_missing_special_date_is_not_found() {
        let mut store = test_store();
        let err = store.delete_special_date(42).expect_err("missing id");
        assert!(matches!(
            err,
            StoreError::NotFound {
                entity: "special date",
                id: 42
            }
        ));
    }

    #[test]
    fn list_special_dates_ordered_by_date() {
        let mut store = test_store();
        let user = store.create_user("alice", "alice@example.com").expect("user");
        store
            .create_special_date(user, &new_date("C", "2025-12-31"))
            .expect("create");
        store
            .create_special_date(user, &new_date("A", "2025-01-01"))
            .expect("create");
        store
            .create_special_date(user, &new_date("B", "2025-06-15"))
            .expect("create");

        let dates = store.list_special_dates_for_user(user).expect("list");
        let titles: Vec<&str> = dates.iter().map(|d| d.title.as_str()).collect();
        assert_eq!(titles, ["A", "B", "C"]);
    }

    #[test]
    fn wishlist_item_round_trip_with_optional_fields() {
        let mut store = test_store();
        let user = store.create_user("alice", "alice@example.com").expect("user");
        let date_id = store
            .create_special_date(user, &new_date("Anniversary", "2025-01-02"))
            .expect("create date");

        let created = store
            .add_wishlist_item(
                date_id,
                &NewWishlistItem {
                    item_name: "Money".to_string(),
                    url: Some("https://money.com".to_string()),
                    ..NewWishlistItem::default()
                },
            )
            .expect("add item");

        let fetched = store
            .get_wishlist_item(created.id)
            .expect("query")
            .expect("item exists");
        assert_eq!(fetched.item_name, "Money");
        assert_eq!(fetched.url.as_deref(), Some("https://money.com"));
        assert_eq!(fetched.description, None);
        assert_eq!(fetched.price, None);
    }

    #[test]
    fn wishlist_item_requires_existing_parent_and_name() {
        let store = test_store();
        assert!(matches!(
            store.add_wishlist_item(
                1,
                &NewWishlistItem {
                    item_name: " ".to_string(),
                    ..NewWishlistItem::default()
                }
            ),
            Err(StoreError::MissingField { field: "item_name" })
        ));
        assert!(matches!(
            store.add_wishlist_item(
                1,
                &NewWishlistItem {
                    item_name: "Money".to_string(),
                    ..NewWishlistItem::default()
                }
            ),
            Err(StoreError::NotFound {
                entity: "special date",
                ..
            })
        ));
    }

    #[test]
    fn delete_user_is_restricted_while_dates_remain() {
        let mut store = test_store();
        let user = store.create_user("alice", "alice@example.com").expect("user");
        let date_id = store
            .create_special_date(user, &new_date("Birthday", "2025-01-01"))
            .expect("create");

        let err = store.delete_user(user).expect_err("restricted");
        assert!(matches!(err, StoreError::Conflict(_)));

        store.delete_special_date(date_id).expect("delete date");
        store.delete_user(user).expect("now deletable");
        assert!(store.get_user(user).expect("query").is_none());
    }
}
