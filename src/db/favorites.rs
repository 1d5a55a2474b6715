use rusqlite::{params, Connection};

use crate::db::models::{Artwork, Favorite};

/// Insert a favorite row. Repeated adds create repeated rows.
pub fn add(conn: &Connection, user_id: i64, artwork_id: i64) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO favorites (user_id, artwork_id) VALUES (?1, ?2)",
        params![user_id, artwork_id],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Delete the oldest matching row. Returns false when nothing matched.
pub fn remove_one(conn: &Connection, user_id: i64, artwork_id: i64) -> rusqlite::Result<bool> {
    let rows = conn.execute(
        "DELETE FROM favorites WHERE id = (
             SELECT id FROM favorites WHERE user_id = ?1 AND artwork_id = ?2
             ORDER BY id LIMIT 1
         )",
        params![user_id, artwork_id],
    )?;
    Ok(rows > 0)
}

pub fn list_rows(conn: &Connection, user_id: i64) -> rusqlite::Result<Vec<Favorite>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, artwork_id FROM favorites WHERE user_id = ?1 ORDER BY id",
    )?;
    let rows = stmt
        .query_map(params![user_id], |row| {
            Ok(Favorite {
                id: row.get(0)?,
                user_id: row.get(1)?,
                artwork_id: row.get(2)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// The user's favorites resolved to artworks; rows whose artwork is gone are skipped.
pub fn list_artworks(conn: &Connection, user_id: i64) -> rusqlite::Result<Vec<Artwork>> {
    let sql = format!(
        "SELECT {} FROM favorites f JOIN artworks a ON a.id = f.artwork_id
         WHERE f.user_id = ?1 ORDER BY f.id",
        prefixed_columns()
    );
    let mut stmt = conn.prepare(&sql)?;
    let artworks = stmt
        .query_map(params![user_id], Artwork::from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(artworks)
}

pub(crate) fn prefixed_columns() -> String {
    Artwork::COLUMNS
        .split(", ")
        .map(|c| format!("a.{}", c))
        .collect::<Vec<_>>()
        .join(", ")
}
