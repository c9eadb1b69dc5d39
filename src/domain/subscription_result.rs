use serde::Serialize;

use crate::domain::subscriber_email::SubscriberEmail;
use crate::domain::unsubscribe_token::UnsubscribeToken;

/// What callers of the read path get to see about a subscriber: enough to
/// address a mailing and to build its unsubscribe link, nothing else.
#[derive(Debug, serde::Serialize)]
pub struct ActiveSubscriber {
    pub email: SubscriberEmail,
    #[serde(rename = "unsubscribeToken")]
    pub unsubscribe_token: UnsubscribeToken,
}

/// Outcome shared by every subscription operation. The service never returns
/// an `Err`: store failures are folded into the `Failure` variant, and
/// repeated subscribe/unsubscribe calls are signalled through the
/// `already_*` flags rather than treated as errors.
#[derive(Debug, serde::Serialize)]
#[serde(untagged)]
pub enum SubscriptionResult<T = ()> {
    Success(SuccessBody<T>),
    Failure(FailureBody),
}

#[derive(Debug, serde::Serialize)]
pub struct SuccessBody<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(rename = "alreadySubscribed", skip_serializing_if = "Option::is_none")]
    pub already_subscribed: Option<bool>,
    #[serde(rename = "alreadyUnsubscribed", skip_serializing_if = "Option::is_none")]
    pub already_unsubscribed: Option<bool>,
}

#[derive(Debug, serde::Serialize)]
pub struct FailureBody {
    pub success: bool,
    pub error: String,
}

impl<T: Serialize> SubscriptionResult<T> {
    pub fn success() -> SubscriptionResult<T> {
        SubscriptionResult::Success(SuccessBody {
            success: true,
            data: None,
            already_subscribed: None,
            already_unsubscribed: None,
        })
    }

    pub fn success_with_data(data: T) -> SubscriptionResult<T> {
        SubscriptionResult::Success(SuccessBody {
            success: true,
            data: Some(data),
            already_subscribed: None,
            already_unsubscribed: None,
        })
    }

    pub fn already_subscribed() -> SubscriptionResult<T> {
        SubscriptionResult::Success(SuccessBody {
            success: true,
            data: None,
            already_subscribed: Some(true),
            already_unsubscribed: None,
        })
    }

    pub fn already_unsubscribed() -> SubscriptionResult<T> {
        SubscriptionResult::Success(SuccessBody {
            success: true,
            data: None,
            already_subscribed: None,
            already_unsubscribed: Some(true),
        })
    }

    pub fn failure(error: String) -> SubscriptionResult<T> {
        SubscriptionResult::Failure(FailureBody {
            success: false,
            error,
        })
    }

    pub fn is_success(&self) -> bool {
        matches!(self, SubscriptionResult::Success(_))
    }
}
