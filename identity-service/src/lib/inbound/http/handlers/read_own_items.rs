use axum::Extension;
use axum::Json;
use serde::Serialize;

use crate::domain::user::models::AuthenticatedSession;

pub async fn read_own_items(
    Extension(session): Extension<AuthenticatedSession>,
) -> Json<Vec<ItemData>> {
    Json(vec![ItemData {
        item_id: "Foo".to_string(),
        owner: session.identity.username,
    }])
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemData {
    pub item_id: String,
    pub owner: String,
}
