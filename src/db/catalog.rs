//! Artworks, collections and news: the admin-managed, create-only content.

use rusqlite::{params, Connection, OptionalExtension};

use crate::db::models::{Artwork, Collection, NewArtwork, News};

pub fn list_artworks(conn: &Connection) -> rusqlite::Result<Vec<Artwork>> {
    let sql = format!("SELECT {} FROM artworks ORDER BY id", Artwork::COLUMNS);
    let mut stmt = conn.prepare(&sql)?;
    let artworks = stmt
        .query_map([], Artwork::from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(artworks)
}

pub fn get_artwork(conn: &Connection, id: i64) -> rusqlite::Result<Option<Artwork>> {
    let sql = format!("SELECT {} FROM artworks WHERE id = ?1", Artwork::COLUMNS);
    conn.query_row(&sql, params![id], Artwork::from_row)
        .optional()
}

pub fn artwork_exists(conn: &Connection, id: i64) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT COUNT(*) > 0 FROM artworks WHERE id = ?1",
        params![id],
        |row| row.get(0),
    )
}

pub fn create_artwork(conn: &Connection, artwork: &NewArtwork) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO artworks (title, description, image_filename, author, price, collection_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            artwork.title,
            artwork.description,
            artwork.image_filename,
            artwork.author,
            artwork.price,
            artwork.collection_id,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn list_collections(conn: &Connection) -> rusqlite::Result<Vec<Collection>> {
    let mut stmt = conn.prepare("SELECT id, name, description FROM collections ORDER BY id")?;
    let collections = stmt
        .query_map([], |row| {
            Ok(Collection {
                id: row.get(0)?,
                name: row.get(1)?,
                description: row.get(2)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(collections)
}

pub fn collection_exists(conn: &Connection, id: i64) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT COUNT(*) > 0 FROM collections WHERE id = ?1",
        params![id],
        |row| row.get(0),
    )
}

pub fn create_collection(
    conn: &Connection,
    name: &str,
    description: Option<&str>,
) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO collections (name, description) VALUES (?1, ?2)",
        params![name, description],
    )?;
    Ok(conn.last_insert_rowid())
}

/// All news, newest (highest id) first.
pub fn list_news(conn: &Connection) -> rusqlite::Result<Vec<News>> {
    let mut stmt = conn.prepare("SELECT id, title, content FROM news ORDER BY id DESC")?;
    let items = stmt
        .query_map([], |row| {
            Ok(News {
                id: row.get(0)?,
                title: row.get(1)?,
                content: row.get(2)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(items)
}

pub fn create_news(conn: &Connection, title: &str, content: &str) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO news (title, content) VALUES (?1, ?2)",
        params![title, content],
    )?;
    Ok(conn.last_insert_rowid())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_conn;

    fn sample_artwork(title: &str) -> NewArtwork {
        NewArtwork {
            title: title.to_string(),
            description: Some("oil on canvas".to_string()),
            image_filename: Some("sea.png".to_string()),
            author: Some("K. Z.".to_string()),
            price: Some("120.5".parse().unwrap()),
            collection_id: None,
        }
    }

    #[test]
    fn news_is_listed_newest_first() {
        let conn = test_conn();
        for title in ["first", "second", "third"] {
            create_news(&conn, title, "body").unwrap();
        }

        let ids: Vec<i64> = list_news(&conn).unwrap().iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[test]
    fn artwork_round_trip_keeps_price_scale() {
        let conn = test_conn();
        let id = create_artwork(&conn, &sample_artwork("Sea")).unwrap();

        let art = get_artwork(&conn, id).unwrap().unwrap();
        assert_eq!(art.title, "Sea");
        assert_eq!(art.price.unwrap().to_string(), "120.50");
        assert_eq!(art.image_filename.as_deref(), Some("sea.png"));
        assert!(art.collection_id.is_none());
        assert!(artwork_exists(&conn, id).unwrap());
        assert!(!artwork_exists(&conn, id + 1).unwrap());
    }

    #[test]
    fn artwork_may_belong_to_a_collection() {
        let conn = test_conn();
        let coll = create_collection(&conn, "Seascapes", None).unwrap();
        let mut art = sample_artwork("Harbour");
        art.collection_id = Some(coll);
        art.price = None;
        let id = create_artwork(&conn, &art).unwrap();

        let stored = get_artwork(&conn, id).unwrap().unwrap();
        assert_eq!(stored.collection_id, Some(coll));
        assert!(stored.price.is_none());
        assert!(collection_exists(&conn, coll).unwrap());
        assert_eq!(list_collections(&conn).unwrap().len(), 1);
    }

    #[test]
    fn artwork_with_unknown_collection_is_rejected() {
        let conn = test_conn();
        let mut art = sample_artwork("Orphan");
        art.collection_id = Some(99);
        assert!(create_artwork(&conn, &art).is_err());
    }

    #[test]
    fn list_artworks_is_unfiltered() {
        let conn = test_conn();
        create_artwork(&conn, &sample_artwork("A")).unwrap();
        create_artwork(&conn, &sample_artwork("B")).unwrap();
        assert_eq!(list_artworks(&conn).unwrap().len(), 2);
    }
}
