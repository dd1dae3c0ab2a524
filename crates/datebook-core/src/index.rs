//! Derived calendar occupancy index.
//!
//! `calendar_entries` maps a `YYYY-MM-DD` key to a JSON object of event
//! title -> [`EventSummary`]. A row exists if and only if at least one
//! special date across all users falls on that day; it is created and
//! destroyed only by [`record_event`] / [`remove_event`], which the entity
//! store invokes inside the same transaction as the paired row mutation.
//!
//! # Title collisions
//!
//! Events are keyed by title, so two special dates sharing a title on the
//! same day collapse into one entry with last-writer-wins semantics. This
//! matches the upstream data model; see DESIGN.md.
//!
//! # Corrupt rows
//!
//! A stored event map that fails to decode is treated as empty (with a
//! warning) rather than surfacing a decode failure, so a single corrupt
//! row cannot wedge writes to that date.

use rusqlite::{Connection, OptionalExtension, params};
use std::collections::BTreeMap;

use crate::error::StoreError;
use crate::model::{CalendarEntry, DateKey, EventSummary};

type EventMap = BTreeMap<String, EventSummary>;

/// Insert or overwrite the event for `title` on `date`.
///
/// Creates the calendar entry (with its derived day/month/year columns)
/// when the date was previously unoccupied. Idempotent for identical
/// `(date, title, summary)` calls.
///
/// Callers are expected to run this inside the transaction that mutates
/// the paired `special_dates` row.
///
/// # Errors
///
/// Returns [`StoreError::Write`] if a statement fails, or
/// [`StoreError::Encode`] if the updated map cannot be serialized.
pub fn record_event(
    conn: &Connection,
    date: DateKey,
    title: &str,
    summary: &EventSummary,
) -> Result<(), StoreError> {
    let key = date.to_string();

    match load_event_map(conn, &key)? {
        Some(mut events) => {
            // Last-writer-wins per title.
            events.insert(title.to_string(), summary.clone());
            persist_event_map(conn, &key, &events)?;
        }
        None => {
            let events: EventMap =
                BTreeMap::from([(title.to_string(), summary.clone())]);
            conn.execute(
                "INSERT INTO calendar_entries (date, day_of_week, day, month, year, events)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    key,
                    date.weekday(),
                    date.day(),
                    date.month(),
                    date.year(),
                    serde_json::to_string(&events)?,
                ],
            )?;
        }
    }

    tracing::debug!(date = %key, title, "recorded calendar event");
    Ok(())
}

/// Remove the event for `title` on `date`.
///
/// A missing entry is a no-op, not an error. When the last title is
/// removed, the entry itself is deleted so no empty rows linger.
///
/// # Errors
///
/// Returns [`StoreError::Write`] if a statement fails, or
/// [`StoreError::Encode`] if the shrunk map cannot be serialized.
pub fn remove_event(conn: &Connection, date: &str, title: &str) -> Result<(), StoreError> {
    let Some(mut events) = load_event_map(conn, date)? else {
        return Ok(());
    };

    events.remove(title);

    if events.is_empty() {
        conn.execute("DELETE FROM calendar_entries WHERE date = ?1", params![date])?;
        tracing::debug!(date, "calendar entry emptied and deleted");
    } else {
        persist_event_map(conn, date, &events)?;
        tracing::debug!(date, title, "removed calendar event");
    }

    Ok(())
}

/// Fetch the full calendar entry for `date`, if occupied.
///
/// # Errors
///
/// Returns [`StoreError::Write`] if the query fails.
pub fn load_entry(conn: &Connection, date: &str) -> Result<Option<CalendarEntry>, StoreError> {
    let row = conn
        .query_row(
            "SELECT date, day_of_week, day, month, year, events
             FROM calendar_entries
             WHERE date = ?1",
            params![date],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, u32>(1)?,
                    row.get::<_, u32>(2)?,
                    row.get::<_, u32>(3)?,
                    row.get::<_, i32>(4)?,
                    row.get::<_, String>(5)?,
                ))
            },
        )
        .optional()?;

    Ok(row.map(|(date, day_of_week, day, month, year, raw)| CalendarEntry {
        events: decode_event_map(&date, &raw),
        date,
        day_of_week,
        day,
        month,
        year,
    }))
}

/// Fetch just the decoded event map for `date`.
///
/// `Ok(None)` means the date is unoccupied. A present-but-corrupt map
/// decodes as `Some(empty)`.
///
/// # Errors
///
/// Returns [`StoreError::Write`] if the query fails.
pub fn load_event_map(conn: &Connection, date: &str) -> Result<Option<EventMap>, StoreError> {
    let raw: Option<String> = conn
        .query_row(
            "SELECT events FROM calendar_entries WHERE date = ?1",
            params![date],
            |row| row.get(0),
        )
        .optional()?;

    Ok(raw.map(|raw| decode_event_map(date, &raw)))
}

fn persist_event_map(conn: &Connection, date: &str, events: &EventMap) -> Result<(), StoreError> {
    conn.execute(
        "UPDATE calendar_entries SET events = ?1 WHERE date = ?2",
        params![serde_json::to_string(events)?, date],
    )?;
    Ok(())
}

pub(crate) fn decode_event_map(date: &str, raw: &str) -> EventMap {
    match serde_json::from_str(raw) {
        Ok(events) => events,
        Err(error) => {
            tracing::warn!(date, %error, "malformed calendar event map, treating as empty");
            EventMap::new()
        }
    }
}
