use rusqlite::{params, Connection};

use crate::db::favorites::prefixed_columns;
use crate::db::models::{Artwork, CartItem, CartLine};

/// Insert a cart row with quantity 1. Existing rows for the same artwork are left alone.
pub fn add(conn: &Connection, user_id: i64, artwork_id: i64) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO cart_items (user_id, artwork_id, quantity) VALUES (?1, ?2, 1)",
        params![user_id, artwork_id],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Delete the oldest matching row. Returns false when nothing matched.
pub fn remove_one(conn: &Connection, user_id: i64, artwork_id: i64) -> rusqlite::Result<bool> {
    let rows = conn.execute(
        "DELETE FROM cart_items WHERE id = (
             SELECT id FROM cart_items WHERE user_id = ?1 AND artwork_id = ?2
             ORDER BY id LIMIT 1
         )",
        params![user_id, artwork_id],
    )?;
    Ok(rows > 0)
}

/// Empty the user's cart. Returns the number of rows removed.
pub fn clear(conn: &Connection, user_id: i64) -> rusqlite::Result<usize> {
    conn.execute("DELETE FROM cart_items WHERE user_id = ?1", params![user_id])
}

pub fn list_rows(conn: &Connection, user_id: i64) -> rusqlite::Result<Vec<CartItem>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, artwork_id, quantity FROM cart_items WHERE user_id = ?1 ORDER BY id",
    )?;
    let rows = stmt
        .query_map(params![user_id], |row| {
            Ok(CartItem {
                id: row.get(0)?,
                user_id: row.get(1)?,
                artwork_id: row.get(2)?,
                quantity: row.get(3)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn list_lines(conn: &Connection, user_id: i64) -> rusqlite::Result<Vec<CartLine>> {
    let sql = format!(
        "SELECT {}, c.quantity FROM cart_items c JOIN artworks a ON a.id = c.artwork_id
         WHERE c.user_id = ?1 ORDER BY c.id",
        prefixed_columns()
    );
    let mut stmt = conn.prepare(&sql)?;
    let lines = stmt
        .query_map(params![user_id], |row| {
            Ok(CartLine {
                artwork: Artwork::from_row(row)?,
                quantity: row.get(7)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(lines)
}
