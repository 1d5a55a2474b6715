use rusqlite::{params, Connection, OptionalExtension};

use crate::db::cart;
use crate::db::models::{ContactDetails, Order};

pub fn create(
    conn: &Connection,
    user_id: Option<i64>,
    contact: &ContactDetails,
    filenames: &[String],
) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO orders (user_id, name, email, phone, address, notes, filenames)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            user_id,
            contact.name,
            contact.email,
            contact.phone,
            contact.address,
            contact.notes,
            filenames.join(","),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Create an attachment-free order and empty the user's cart in one transaction.
pub fn checkout(
    conn: &mut Connection,
    user_id: i64,
    contact: &ContactDetails,
) -> rusqlite::Result<i64> {
    let tx = conn.transaction()?;
    let order_id = create(&tx, Some(user_id), contact, &[])?;
    cart::clear(&tx, user_id)?;
    tx.commit()?;
    Ok(order_id)
}

pub fn get(conn: &Connection, id: i64) -> rusqlite::Result<Option<Order>> {
    conn.query_row(
        "SELECT id, user_id, name, email, phone, address, notes, filenames
         FROM orders WHERE id = ?1",
        params![id],
        |row| {
            Ok(Order {
                id: row.get(0)?,
                user_id: row.get(1)?,
                contact: ContactDetails {
                    name: row.get(2)?,
                    email: row.get(3)?,
                    phone: row.get(4)?,
                    address: row.get(5)?,
                    notes: row.get(6)?,
                },
                filenames: row.get(7)?,
            })
        },
    )
    .optional()
}
