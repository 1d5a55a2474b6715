use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::Row;
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl ToSql for Role {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Role {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        // Anything that isn't explicitly admin is an ordinary user
        match value.as_str()? {
            "admin" => Ok(Role::Admin),
            _ => Ok(Role::User),
        }
    }
}

/// A monetary amount with exactly two decimal places and at most eight
/// integer digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Price(Decimal);

impl Price {
    const LIMIT: Decimal = Decimal::from_parts(100_000_000, 0, 0, false, 0);
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PriceError {
    #[error("not a number")]
    Invalid,
    #[error("must not be negative")]
    Negative,
    #[error("must be below 100000000")]
    TooLarge,
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut amount = Decimal::from_str(s.trim()).map_err(|_| PriceError::Invalid)?;
        if amount.is_sign_negative() {
            if !amount.is_zero() {
                return Err(PriceError::Negative);
            }
            amount.set_sign_positive(true);
        }
        amount = amount.round_dp(2);
        if amount >= Price::LIMIT {
            return Err(PriceError::TooLarge);
        }
        amount.rescale(2);
        Ok(Price(amount))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl ToSql for Price {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.0.to_string()))
    }
}

impl FromSql for Price {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value {
            ValueRef::Text(_) => value
                .as_str()?
                .parse()
                .map_err(|e: PriceError| FromSqlError::Other(Box::new(e))),
            ValueRef::Integer(i) => Ok(Price(Decimal::new(i * 100, 2))),
            ValueRef::Real(r) => Decimal::try_from(r)
                .map(|d| Price(d.round_dp(2)))
                .map_err(|e| FromSqlError::Other(Box::new(e))),
            _ => Err(FromSqlError::InvalidType),
        }
    }
}

#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub role: Role,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[derive(Debug, Clone)]
pub struct Collection {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Artwork {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub image_filename: Option<String>,
    pub author: Option<String>,
    pub price: Option<Price>,
    pub collection_id: Option<i64>,
}

impl Artwork {
    pub const COLUMNS: &'static str =
        "id, title, description, image_filename, author, price, collection_id";

    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Artwork {
            id: row.get(0)?,
            title: row.get(1)?,
            description: row.get(2)?,
            image_filename: row.get(3)?,
            author: row.get(4)?,
            price: row.get(5)?,
            collection_id: row.get(6)?,
        })
    }

    /// Link to the artwork's image under `/uploads`, with the stored name
    /// percent-encoded as a single path segment.
    pub fn image_url(&self) -> Option<String> {
        let name = self.image_filename.as_deref()?;
        let mut url = Url::parse("http://localhost/uploads").ok()?;
        url.path_segments_mut().ok()?.push(name);
        Some(url.path().to_string())
    }
}

#[derive(Debug, Clone)]
pub struct NewArtwork {
    pub title: String,
    pub description: Option<String>,
    pub image_filename: Option<String>,
    pub author: Option<String>,
    pub price: Option<Price>,
    pub collection_id: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct Favorite {
    pub id: i64,
    pub user_id: i64,
    pub artwork_id: i64,
}

#[derive(Debug, Clone)]
pub struct CartItem {
    pub id: i64,
    pub user_id: i64,
    pub artwork_id: i64,
    pub quantity: i64,
}

/// A cart row resolved to its artwork.
#[derive(Debug, Clone)]
pub struct CartLine {
    pub artwork: Artwork,
    pub quantity: i64,
}

#[derive(Debug, Clone)]
pub struct News {
    pub id: i64,
    pub title: String,
    pub content: Option<String>,
}

/// Contact details submitted with an order.
#[derive(Debug, Clone, Default)]
pub struct ContactDetails {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Order {
    pub id: i64,
    pub user_id: Option<i64>,
    pub contact: ContactDetails,
    /// Comma-joined stored upload names; empty when nothing was attached
    pub filenames: String,
}
