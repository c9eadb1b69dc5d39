use std::collections::HashMap;

use blog_newsletter::domain::subscription_result::SubscriptionResult;
use blog_newsletter::domain::unsubscribe_token::UnsubscribeToken;
use blog_newsletter::subscriptions;

use crate::helpers::TestApp;

#[tokio::test]
async fn unsubscribe_marks_an_active_subscriber_as_unsubscribed() {
    let test_app = TestApp::spawn_app().await;

    test_app
        .post_subscribe(HashMap::from([("email", "alice@test.com")]))
        .await;

    let subscriber = test_app.fetch_subscriber("alice@test.com").await;

    let result = subscriptions::unsubscribe(&test_app.store, &subscriber.unsubscribe_token).await;

    match result {
        SubscriptionResult::Success(body) => {
            assert!(body.already_unsubscribed.is_none());
        }
        SubscriptionResult::Failure(body) => {
            panic!("Expected a success result, got error: {}", body.error)
        }
    }

    let unsubscribed = test_app.fetch_subscriber("alice@test.com").await;

    assert_eq!(unsubscribed.status.as_ref(), "unsubscribed");
    assert!(unsubscribed.unsubscribed_at.is_some());
}

#[tokio::test]
async fn unsubscribe_twice_is_an_idempotent_no_op() {
    let test_app = TestApp::spawn_app().await;

    test_app
        .post_subscribe(HashMap::from([("email", "alice@test.com")]))
        .await;

    let subscriber = test_app.fetch_subscriber("alice@test.com").await;

    subscriptions::unsubscribe(&test_app.store, &subscriber.unsubscribe_token).await;

    let first_pass = test_app.fetch_subscriber("alice@test.com").await;

    let result = subscriptions::unsubscribe(&test_app.store, &subscriber.unsubscribe_token).await;

    match result {
        SubscriptionResult::Success(body) => {
            assert_eq!(body.already_unsubscribed, Some(true));
        }
        SubscriptionResult::Failure(body) => {
            panic!("Expected a success result, got error: {}", body.error)
        }
    }

    // The original unsubscription timestamp is left untouched
    let second_pass = test_app.fetch_subscriber("alice@test.com").await;

    assert_eq!(first_pass.unsubscribed_at, second_pass.unsubscribed_at);
}

#[tokio::test]
async fn unsubscribe_with_an_unknown_token_fails_without_writes() {
    let test_app = TestApp::spawn_app().await;

    test_app
        .post_subscribe(HashMap::from([("email", "alice@test.com")]))
        .await;

    // Well-formed, but belongs to nobody
    let unknown_token = UnsubscribeToken::generate();

    let result = subscriptions::unsubscribe(&test_app.store, &unknown_token).await;

    match result {
        SubscriptionResult::Success(_) => panic!("Expected a failure result"),
        SubscriptionResult::Failure(body) => {
            assert_eq!(body.error, "Invalid or expired unsubscribe link");
        }
    }

    let subscriber = test_app.fetch_subscriber("alice@test.com").await;

    assert_eq!(subscriber.status.as_ref(), "active");
    assert!(subscriber.unsubscribed_at.is_none());
}

#[tokio::test]
async fn subscribe_unsubscribe_subscribe_round_trip_keeps_the_token() {
    let test_app = TestApp::spawn_app().await;

    test_app
        .post_subscribe(HashMap::from([("email", "alice@test.com")]))
        .await;

    let original = test_app.fetch_subscriber("alice@test.com").await;

    subscriptions::unsubscribe(&test_app.store, &original.unsubscribe_token).await;

    test_app
        .post_subscribe(HashMap::from([("email", "alice@test.com")]))
        .await;

    let round_tripped = test_app.fetch_subscriber("alice@test.com").await;

    assert_eq!(original.id, round_tripped.id);
    assert_eq!(
        original.unsubscribe_token.as_ref(),
        round_tripped.unsubscribe_token.as_ref()
    );
    assert_eq!(round_tripped.status.as_ref(), "active");
}
