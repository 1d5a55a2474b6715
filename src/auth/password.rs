use rusqlite::Connection;

use crate::db::models::User;
use crate::db::users;

pub fn hash_password(plaintext: &str, cost: u32) -> Result<String, bcrypt::BcryptError> {
    bcrypt::hash(plaintext, cost)
}

/// Constant-time via bcrypt; a malformed stored hash never verifies.
pub fn verify_password(plaintext: &str, hash: &str) -> bool {
    bcrypt::verify(plaintext, hash).unwrap_or(false)
}

/// Look up `username` and check `password`. Unknown users and wrong
/// passwords are indistinguishable to the caller.
pub fn authenticate(
    conn: &Connection,
    username: &str,
    password: &str,
) -> rusqlite::Result<Option<User>> {
    let user = users::find_by_username(conn, username)?;
    Ok(user.filter(|u| verify_password(password, &u.password_hash)))
}
