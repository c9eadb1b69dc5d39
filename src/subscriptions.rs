use chrono::Utc;
use sqlx::{postgres::PgRow, PgConnection, Row};
use uuid::Uuid;

use crate::domain::subscriber::Subscriber;
use crate::domain::subscriber_email::SubscriberEmail;
use crate::domain::subscriber_status::SubscriberStatus;
use crate::domain::subscription_result::{ActiveSubscriber, SubscriptionResult};
use crate::domain::unsubscribe_token::UnsubscribeToken;
use crate::store::Store;

// Callers only ever see these two messages; query errors are logged with full
// detail server-side and must not leak past this module.
const STORE_ERROR_MESSAGE: &str = "Database error";
const UNKNOWN_TOKEN_MESSAGE: &str = "Invalid or expired unsubscribe link";

/// Subscribes an email address to the newsletter. Repeats are signalled with
/// the `alreadySubscribed` flag, and a previously unsubscribed address gets
/// its existing row reactivated instead of a new one.
#[tracing::instrument(
    name = "Subscribing an email to the newsletter",
    skip(store, email),
    fields(subscriber_email = %email.as_ref())
)]
pub async fn subscribe(store: &Store, email: &SubscriberEmail) -> SubscriptionResult {
    match run_subscribe(store, email).await {
        Ok(result) => result,
        Err(err) => {
            tracing::error!("Failed to subscribe {}: {:?}", email.as_ref(), err);
            SubscriptionResult::failure(String::from(STORE_ERROR_MESSAGE))
        }
    }
}

async fn run_subscribe(
    store: &Store,
    email: &SubscriberEmail,
) -> Result<SubscriptionResult, sqlx::Error> {
    // Dropped, and therefore closed, on every return path below.
    let mut conn = store.connect().await?;

    match find_subscriber_by_email(&mut conn, email).await? {
        Some(subscriber) if subscriber.status.is_active() => {
            Ok(SubscriptionResult::already_subscribed())
        }
        Some(subscriber) => {
            // Re-subscription reuses the row; the token assigned at creation
            // stays valid.
            reactivate_subscriber(&mut conn, subscriber.id).await?;

            Ok(SubscriptionResult::success())
        }
        None => {
            let unsubscribe_token = UnsubscribeToken::generate();

            insert_subscriber(&mut conn, email, &unsubscribe_token).await?;

            Ok(SubscriptionResult::success())
        }
    }
}

/// Unsubscribes whoever holds the token. An unknown token gets the same
/// answer as an expired one; nothing else about it is revealed.
#[tracing::instrument(name = "Unsubscribing a subscriber by token", skip(store, token))]
pub async fn unsubscribe(store: &Store, token: &UnsubscribeToken) -> SubscriptionResult {
    match run_unsubscribe(store, token).await {
        Ok(result) => result,
        Err(err) => {
            tracing::error!("Failed to unsubscribe: {:?}", err);
            SubscriptionResult::failure(String::from(STORE_ERROR_MESSAGE))
        }
    }
}

async fn run_unsubscribe(
    store: &Store,
    token: &UnsubscribeToken,
) -> Result<SubscriptionResult, sqlx::Error> {
    let mut conn = store.connect().await?;

    match find_subscriber_by_token(&mut conn, token).await? {
        None => Ok(SubscriptionResult::failure(String::from(
            UNKNOWN_TOKEN_MESSAGE,
        ))),
        Some(subscriber) if subscriber.status.is_unsubscribed() => {
            Ok(SubscriptionResult::already_unsubscribed())
        }
        Some(subscriber) => {
            mark_unsubscribed(&mut conn, subscriber.id).await?;

            Ok(SubscriptionResult::success())
        }
    }
}

/// Everyone currently opted in, newest first, projected down to what a
/// mailing needs.
#[tracing::instrument(name = "Listing active subscribers", skip(store))]
pub async fn get_active_subscribers(store: &Store) -> SubscriptionResult<Vec<ActiveSubscriber>> {
    match run_get_active_subscribers(store).await {
        Ok(subscribers) => SubscriptionResult::success_with_data(subscribers),
        Err(err) => {
            tracing::error!("Failed to fetch active subscribers: {:?}", err);
            SubscriptionResult::failure(String::from(STORE_ERROR_MESSAGE))
        }
    }
}

async fn run_get_active_subscribers(store: &Store) -> Result<Vec<ActiveSubscriber>, sqlx::Error> {
    let mut conn = store.connect().await?;

    list_active_subscribers(&mut conn).await
}

#[tracing::instrument(name = "Fetch a subscriber row by email", skip(conn, email))]
async fn find_subscriber_by_email(
    conn: &mut PgConnection,
    email: &SubscriberEmail,
) -> Result<Option<Subscriber>, sqlx::Error> {
    sqlx::query(
        r#"
        SELECT id, email, status, unsubscribe_token, created_at, unsubscribed_at
        FROM subscribers
        WHERE email = $1
        "#,
    )
    .bind(email.as_ref())
    .map(map_subscriber_row)
    .fetch_optional(conn)
    .await
}

#[tracing::instrument(name = "Fetch a subscriber row by token", skip(conn, token))]
async fn find_subscriber_by_token(
    conn: &mut PgConnection,
    token: &UnsubscribeToken,
) -> Result<Option<Subscriber>, sqlx::Error> {
    sqlx::query(
        r#"
        SELECT id, email, status, unsubscribe_token, created_at, unsubscribed_at
        FROM subscribers
        WHERE unsubscribe_token = $1
        "#,
    )
    .bind(token.as_ref())
    .map(map_subscriber_row)
    .fetch_optional(conn)
    .await
}

#[tracing::instrument(name = "Insert a new active subscriber", skip(conn, email, token))]
async fn insert_subscriber(
    conn: &mut PgConnection,
    email: &SubscriberEmail,
    token: &UnsubscribeToken,
) -> Result<(), sqlx::Error> {
    // id and created_at are generated by the database.
    sqlx::query(
        r#"
        INSERT INTO subscribers (email, status, unsubscribe_token)
        VALUES ($1, $2, $3)
        "#,
    )
    .bind(email.as_ref())
    .bind(SubscriberStatus::Active.as_ref())
    .bind(token.as_ref())
    .execute(conn)
    .await?;

    Ok(())
}

#[tracing::instrument(name = "Reactivating an unsubscribed subscriber", skip(conn))]
async fn reactivate_subscriber(conn: &mut PgConnection, id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE subscribers
        SET status = $1, unsubscribed_at = NULL
        WHERE id = $2
        "#,
    )
    .bind(SubscriberStatus::Active.as_ref())
    .bind(id)
    .execute(conn)
    .await?;

    Ok(())
}

#[tracing::instrument(name = "Marking a subscriber as unsubscribed", skip(conn))]
async fn mark_unsubscribed(conn: &mut PgConnection, id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE subscribers
        SET status = $1, unsubscribed_at = $2
        WHERE id = $3
        "#,
    )
    .bind(SubscriberStatus::Unsubscribed.as_ref())
    .bind(Utc::now())
    .bind(id)
    .execute(conn)
    .await?;

    Ok(())
}

#[tracing::instrument(name = "Fetch all active subscribers", skip(conn))]
async fn list_active_subscribers(
    conn: &mut PgConnection,
) -> Result<Vec<ActiveSubscriber>, sqlx::Error> {
    sqlx::query(
        r#"
        SELECT email, unsubscribe_token
        FROM subscribers
        WHERE status = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(SubscriberStatus::Active.as_ref())
    .map(|row: PgRow| ActiveSubscriber {
        email: SubscriberEmail::parse(row.get("email")).unwrap(),
        unsubscribe_token: UnsubscribeToken::parse(row.get("unsubscribe_token")).unwrap(),
    })
    .fetch_all(conn)
    .await
}

fn map_subscriber_row(row: PgRow) -> Subscriber {
    Subscriber {
        id: row.get("id"),
        email: SubscriberEmail::parse(row.get("email")).unwrap(),
        status: SubscriberStatus::parse(row.get("status")).unwrap(),
        unsubscribe_token: UnsubscribeToken::parse(row.get("unsubscribe_token")).unwrap(),
        created_at: row.get("created_at"),
        unsubscribed_at: row.get("unsubscribed_at"),
    }
}
