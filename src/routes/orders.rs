use askama::Template;
use axum::extract::{Multipart, State};
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Form, Router};
use serde::Deserialize;

use crate::db::models::ContactDetails;
use crate::db::orders;
use crate::error::AppResult;
use crate::extractors::{CurrentUser, Layout};
use crate::flash::{self, Flash};
use crate::state::AppState;
use crate::uploads;
use crate::views::page;

/// Multipart field carrying reference files on the compose form.
pub const REFERENCE_FILES_FIELD: &str = "reference_files";

#[derive(Template)]
#[template(path = "pages/compose_order.html")]
pub struct ComposeOrderTemplate<'a> {
    pub layout: &'a Layout,
}

#[derive(Deserialize, Default)]
pub struct ContactForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
}

impl From<ContactForm> for ContactDetails {
    fn from(form: ContactForm) -> Self {
        ContactDetails {
            name: non_blank(form.name),
            email: non_blank(form.email),
            phone: non_blank(form.phone),
            address: non_blank(form.address),
            notes: non_blank(form.notes),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn apply_contact_field(contact: &mut ContactDetails, field: &str, value: String) {
    let slot = match field {
        "name" => &mut contact.name,
        "email" => &mut contact.email,
        "phone" => &mut contact.phone,
        "address" => &mut contact.address,
        "notes" => &mut contact.notes,
        _ => return,
    };
    *slot = non_blank(Some(value));
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/place_order", post(place_order))
        .route("/compose_order", get(compose_order_page).post(compose_order))
}

/// POST /place_order — checkout from the cart. The whole cart is emptied,
/// whatever it held, in the same transaction that records the order.
async fn place_order(
    State(state): State<AppState>,
    user: CurrentUser,
    Form(form): Form<ContactForm>,
) -> AppResult<Response> {
    let mut conn = state.db.get()?;
    let order_id = orders::checkout(&mut conn, user.id, &form.into())?;
    tracing::info!("Order {} placed by user {}", order_id, user.id);

    Ok(flash::redirect(
        "/",
        Flash::success("Order placed. Thank you! We will be in touch."),
    ))
}

async fn compose_order_page(_user: CurrentUser, layout: Layout) -> Response {
    page(&layout, ComposeOrderTemplate { layout: &layout })
}

/// POST /compose_order — contact details plus any number of reference files.
/// Files are stored as `u{user_id}_{sanitized name}`; the order keeps the
/// stored names comma-joined. If the order can't be recorded the files
/// saved so far are removed again.
async fn compose_order(
    State(state): State<AppState>,
    user: CurrentUser,
    mut multipart: Multipart,
) -> AppResult<Response> {
    let mut saved = Vec::new();

    let recorded: AppResult<i64> = async {
        let mut contact = ContactDetails::default();

        while let Some(field) = multipart.next_field().await? {
            let field_name = field.name().unwrap_or_default().to_string();

            if field_name == REFERENCE_FILES_FIELD {
                let original = match field.file_name() {
                    Some(name) if !name.is_empty() => name.to_string(),
                    _ => continue,
                };
                let Some(stored) = uploads::order_file_name(user.id, &original) else {
                    tracing::warn!("Skipping reference file with unusable name {:?}", original);
                    continue;
                };
                let data = field.bytes().await?;
                state.uploads.save(&stored, &data).await?;
                saved.push(stored);
            } else {
                let value = field.text().await?;
                apply_contact_field(&mut contact, &field_name, value);
            }
        }

        let conn = state.db.get()?;
        Ok(orders::create(&conn, Some(user.id), &contact, &saved)?)
    }
    .await;

    let order_id = match recorded {
        Ok(id) => id,
        Err(e) => {
            state.uploads.discard(&saved).await;
            return Err(e);
        }
    };

    tracing::info!(
        "Composed order {} from user {} with {} file(s)",
        order_id,
        user.id,
        saved.len()
    );

    Ok(flash::redirect(
        "/",
        Flash::success("Request sent, thank you! I will review it and get back to you shortly."),
    ))
}
