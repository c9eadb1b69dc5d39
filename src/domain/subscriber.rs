use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::subscriber_email::SubscriberEmail;
use crate::domain::subscriber_status::SubscriberStatus;
use crate::domain::unsubscribe_token::UnsubscribeToken;

/// Full image of one `subscribers` row. `unsubscribed_at` is non-null exactly
/// when the status is `unsubscribed`.
#[derive(Debug, serde::Serialize)]
pub struct Subscriber {
    pub id: Uuid,
    pub email: SubscriberEmail,
    pub status: SubscriberStatus,
    pub unsubscribe_token: UnsubscribeToken,
    pub created_at: DateTime<Utc>,
    pub unsubscribed_at: Option<DateTime<Utc>>,
}
