use axum::extract::rejection::FormRejection;
use axum::extract::State;
use axum::Form;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use crate::domain::user::models::AccessToken;
use crate::domain::user::ports::AuthenticationServicePort;
use crate::inbound::http::router::AppState;

const PASSWORD_GRANT: &str = "password";

/// OAuth2 password flow token endpoint.
pub async fn login(
    State(state): State<AppState>,
    form: Result<Form<LoginRequestForm>, FormRejection>,
) -> Result<Json<TokenResponseData>, ApiError> {
    let Form(form) = form.map_err(|e| ApiError::UnprocessableEntity(e.body_text()))?;

    if let Some(grant_type) = form.grant_type.as_deref() {
        if grant_type != PASSWORD_GRANT {
            return Err(ApiError::UnprocessableEntity(format!(
                "Unsupported grant_type: {}",
                grant_type
            )));
        }
    }

    let token = state
        .authentication_service
        .login(&form.username, &form.password)
        .await?;

    Ok(Json(token.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequestForm {
    username: String,
    password: String,
    grant_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenResponseData {
    pub access_token: String,
    pub token_type: String,
}

impl From<AccessToken> for TokenResponseData {
    fn from(token: AccessToken) -> Self {
        Self {
            access_token: token.access_token,
            token_type: token.token_type.to_string(),
        }
    }
}
