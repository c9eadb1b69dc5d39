use actix_web::{web, HttpResponse, ResponseError};
use reqwest::StatusCode;
use serde::Deserialize;

use crate::domain::subscriber_email::SubscriberEmail;
use crate::domain::subscription_result::SubscriptionResult;
use crate::store::Store;
use crate::subscriptions;

#[derive(Deserialize, Debug)]
pub struct SubscribeBody {
    pub email: String,
}

#[tracing::instrument(
    name = "Creating a newsletter subscription handler",
    skip(body, store),
    fields(subscriber_email = %body.email)
)]
pub async fn handle_subscribe(
    body: web::Json<SubscribeBody>,
    store: web::Data<Store>,
) -> Result<HttpResponse, SubscribeError> {
    let email =
        SubscriberEmail::parse(body.email.clone()).map_err(SubscribeError::ValidationError)?;

    let result = subscriptions::subscribe(&store, &email).await;
    // The body always echoes the service result; only the status code changes.
    let status_code = if result.is_success() {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };

    Ok(HttpResponse::build(status_code).json(result))
}

#[derive(thiserror::Error)]
pub enum SubscribeError {
    #[error("Validation error")]
    ValidationError(String),
}

impl std::fmt::Debug for SubscribeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubscribeError::ValidationError(reason) => write!(f, "Caused by:\n\t({})", reason),
        }
    }
}

impl ResponseError for SubscribeError {
    fn status_code(&self) -> StatusCode {
        match self {
            SubscribeError::ValidationError(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .json(SubscriptionResult::<()>::failure(self.to_string()))
    }
}
