//! Admin dashboard and the create-only forms for artworks, news and collections.

use askama::Template;
use axum::extract::{Multipart, State};
use axum::response::Response;
use axum::routing::get;
use axum::{Form, Router};
use serde::Deserialize;

use crate::db::models::{Artwork, Collection, NewArtwork, News, Price, User};
use crate::db::{catalog, users};
use crate::error::AppResult;
use crate::extractors::{AdminUser, Layout};
use crate::flash::{self, Flash};
use crate::state::AppState;
use crate::uploads;
use crate::views::page;

const ARTWORK_FORM: &str = "/admin/artwork/add";
const NEWS_FORM: &str = "/admin/news/add";
const COLLECTION_FORM: &str = "/admin/collection/add";

#[derive(Template)]
#[template(path = "pages/admin.html")]
pub struct DashboardTemplate<'a> {
    pub layout: &'a Layout,
    pub artworks: Vec<Artwork>,
    pub collections: Vec<Collection>,
    pub news: Vec<News>,
    pub users: Vec<User>,
}

#[derive(Template)]
#[template(path = "pages/artwork_form.html")]
pub struct ArtworkFormTemplate<'a> {
    pub layout: &'a Layout,
    pub collections: Vec<Collection>,
}

#[derive(Template)]
#[template(path = "pages/news_form.html")]
pub struct NewsFormTemplate<'a> {
    pub layout: &'a Layout,
}

#[derive(Template)]
#[template(path = "pages/collection_form.html")]
pub struct CollectionFormTemplate<'a> {
    pub layout: &'a Layout,
}

#[derive(Deserialize)]
pub struct NewsForm {
    pub title: String,
    pub content: String,
}

#[derive(Deserialize)]
pub struct CollectionForm {
    pub name: String,
    pub description: Option<String>,
}

/// Text fields of the multipart artwork form, before validation.
#[derive(Debug, Default)]
struct ArtworkFields {
    title: String,
    description: String,
    author: String,
    price: String,
    collection_id: String,
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

impl ArtworkFields {
    fn set(&mut self, field: &str, value: String) {
        match field {
            "title" => self.title = value,
            "description" => self.description = value,
            "author" => self.author = value,
            "price" => self.price = value,
            "collection_id" => self.collection_id = value,
            _ => {}
        }
    }

    /// Checks that don't need the database. Returns the message to flash on failure.
    fn validate(&self) -> Result<(Option<Price>, Option<i64>), Flash> {
        if self.title.trim().is_empty() {
            return Err(Flash::warning("Title is required"));
        }

        let price = match optional(&self.price) {
            None => None,
            Some(raw) => Some(
                raw.parse::<Price>()
                    .map_err(|e| Flash::danger(format!("Invalid price: {}", e)))?,
            ),
        };

        let collection_id = match optional(&self.collection_id) {
            None => None,
            Some(raw) => Some(
                raw.parse::<i64>()
                    .map_err(|_| Flash::warning("Collection not found"))?,
            ),
        };

        Ok((price, collection_id))
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin", get(dashboard).post(dashboard))
        .route(ARTWORK_FORM, get(artwork_form).post(add_artwork))
        .route(NEWS_FORM, get(news_form).post(add_news))
        .route(COLLECTION_FORM, get(collection_form).post(add_collection))
}

async fn dashboard(
    State(state): State<AppState>,
    _admin: AdminUser,
    layout: Layout,
) -> AppResult<Response> {
    let conn = state.db.get()?;
    let template = DashboardTemplate {
        layout: &layout,
        artworks: catalog::list_artworks(&conn)?,
        collections: catalog::list_collections(&conn)?,
        news: catalog::list_news(&conn)?,
        users: users::list(&conn)?,
    };
    Ok(page(&layout, template))
}

async fn artwork_form(
    State(state): State<AppState>,
    _admin: AdminUser,
    layout: Layout,
) -> AppResult<Response> {
    let conn = state.db.get()?;
    let collections = catalog::list_collections(&conn)?;
    Ok(page(
        &layout,
        ArtworkFormTemplate {
            layout: &layout,
            collections,
        },
    ))
}

/// POST /admin/artwork/add — the image keeps the name it was uploaded with.
async fn add_artwork(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    mut multipart: Multipart,
) -> AppResult<Response> {
    let mut fields = ArtworkFields::default();
    let mut image: Option<(String, axum::body::Bytes)> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        if name == "image" {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let data = field.bytes().await?;
            if !file_name.is_empty() {
                image = Some((file_name, data));
            }
        } else {
            let value = field.text().await?;
            fields.set(&name, value);
        }
    }

    let (price, collection_id) = match fields.validate() {
        Ok(parsed) => parsed,
        Err(flash) => return Ok(flash::redirect(ARTWORK_FORM, flash)),
    };

    if let Some((file_name, _)) = &image {
        if !uploads::is_plain_component(file_name) {
            tracing::warn!("Rejected artwork image name {:?}", file_name);
            return Ok(flash::redirect(
                ARTWORK_FORM,
                Flash::warning("Image file name is not allowed"),
            ));
        }
    }

    {
        let conn = state.db.get()?;
        if let Some(id) = collection_id {
            if !catalog::collection_exists(&conn, id)? {
                return Ok(flash::redirect(
                    ARTWORK_FORM,
                    Flash::warning("Collection not found"),
                ));
            }
        }
    }

    let image_filename = match image {
        Some((file_name, data)) => {
            state.uploads.save(&file_name, &data).await?;
            Some(file_name)
        }
        None => None,
    };

    let artwork = NewArtwork {
        title: fields.title.trim().to_string(),
        description: optional(&fields.description),
        image_filename,
        author: optional(&fields.author),
        price,
        collection_id,
    };

    let conn = state.db.get()?;
    let id = catalog::create_artwork(&conn, &artwork)?;
    tracing::info!("Artwork {} added by {}", id, admin.username);

    Ok(flash::redirect("/admin", Flash::success("Artwork added")))
}

async fn news_form(_admin: AdminUser, layout: Layout) -> Response {
    page(&layout, NewsFormTemplate { layout: &layout })
}

async fn add_news(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Form(form): Form<NewsForm>,
) -> AppResult<Response> {
    let title = form.title.trim();
    if title.is_empty() {
        return Ok(flash::redirect(NEWS_FORM, Flash::warning("Title is required")));
    }

    let conn = state.db.get()?;
    let id = catalog::create_news(&conn, title, &form.content)?;
    tracing::info!("News item {} added by {}", id, admin.username);

    Ok(flash::redirect("/admin", Flash::success("News item added")))
}

async fn collection_form(_admin: AdminUser, layout: Layout) -> Response {
    page(&layout, CollectionFormTemplate { layout: &layout })
}

async fn add_collection(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Form(form): Form<CollectionForm>,
) -> AppResult<Response> {
    let name = form.name.trim();
    if name.is_empty() {
        return Ok(flash::redirect(
            COLLECTION_FORM,
            Flash::warning("Name is required"),
        ));
    }

    let description = form.description.as_deref().and_then(optional);
    let conn = state.db.get()?;
    let id = catalog::create_collection(&conn, name, description.as_deref())?;
    tracing::info!("Collection {} added by {}", id, admin.username);

    Ok(flash::redirect("/admin", Flash::success("Collection added")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(title: &str, price: &str, collection_id: &str) -> ArtworkFields {
        ArtworkFields {
            title: title.to_string(),
            price: price.to_string(),
            collection_id: collection_id.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn validate_parses_optional_price_and_collection() {
        let (price, coll) = fields("Sea", "12.5", "3").validate().unwrap();
        assert_eq!(price.unwrap().to_string(), "12.50");
        assert_eq!(coll, Some(3));

        let (price, coll) = fields("Sea", "", " ").validate().unwrap();
        assert!(price.is_none());
        assert!(coll.is_none());
    }

    #[test]
    fn validate_rejects_bad_input() {
        let err = fields("  ", "1", "").validate().unwrap_err();
        assert_eq!(err.message, "Title is required");

        let err = fields("Sea", "twelve", "").validate().unwrap_err();
        assert_eq!(err.level, crate::flash::FlashLevel::Danger);

        let err = fields("Sea", "", "first").validate().unwrap_err();
        assert_eq!(err.message, "Collection not found");
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let mut f = ArtworkFields::default();
        f.set("title", "Sea".to_string());
        f.set("csrf", "x".to_string());
        assert_eq!(f.title, "Sea");
    }
}
