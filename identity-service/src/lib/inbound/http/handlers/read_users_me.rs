use axum::Extension;
use axum::Json;
use serde::Serialize;

use crate::domain::user::models::AuthenticatedSession;
use crate::domain::user::models::PublicIdentity;

pub async fn read_users_me(
    Extension(session): Extension<AuthenticatedSession>,
) -> Json<UserResponseData> {
    Json((&session.identity).into())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserResponseData {
    pub username: String,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub disabled: bool,
}

impl From<&PublicIdentity> for UserResponseData {
    fn from(identity: &PublicIdentity) -> Self {
        Self {
            username: identity.username.clone(),
            email: identity.email.clone(),
            full_name: identity.full_name.clone(),
            disabled: identity.disabled,
        }
    }
}
