use super::*;
use crate::actor::{Actor, Role};
use crate::email::EmailMessage;

fn message() -> EmailMessage {
    EmailMessage {
        to: "broker@example.com".to_string(),
        subject: "New task".to_string(),
        html: "<p>hi</p>".to_string(),
    }
}

fn actor() -> Actor {
    Actor::new("u-1", "Sam Okafor", "sam@example.com", Role::Assistant)
}

#[tokio::test]
async fn fake_mailer_records_sends() {
    let mailer = FakeMailer::new();
    mailer.send(&message()).await.unwrap();

    let sent = mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "broker@example.com");
}

#[tokio::test]
async fn fake_mailer_failure_mode() {
    let mailer = FakeMailer::new();
    mailer.set_failing(true);

    assert!(mailer.send(&message()).await.is_err());
    assert!(mailer.sent().is_empty());

    mailer.set_failing(false);
    assert!(mailer.send(&message()).await.is_ok());
}

#[tokio::test]
async fn sign_in_round_trip() {
    let auth = FakeAuth::new();
    auth.add_user("sam@example.com", "hunter2", actor());

    let (token, signed_in) = auth.sign_in("sam@example.com", "hunter2").await.unwrap();
    assert_eq!(signed_in.role, Role::Assistant);

    let resolved = auth.session(&token).await.unwrap();
    assert_eq!(resolved, Some(signed_in));

    auth.sign_out(&token).await.unwrap();
    assert_eq!(auth.session(&token).await.unwrap(), None);
}

#[tokio::test]
async fn wrong_password_and_unknown_email_look_the_same() {
    let auth = FakeAuth::new();
    auth.add_user("sam@example.com", "hunter2", actor());

    let wrong_password = auth.sign_in("sam@example.com", "nope").await.unwrap_err();
    let unknown_email = auth.sign_in("ghost@example.com", "nope").await.unwrap_err();

    assert_eq!(wrong_password.to_string(), unknown_email.to_string());
}

#[tokio::test]
async fn password_reset_rotates_and_invalidates() {
    let auth = FakeAuth::new();
    auth.add_user("sam@example.com", "hunter2", actor());
    let (token, _) = auth.sign_in("sam@example.com", "hunter2").await.unwrap();

    // Unknown emails do not reveal themselves
    assert!(auth
        .request_password_reset("ghost@example.com")
        .await
        .unwrap()
        .is_none());

    let reset = auth
        .request_password_reset("sam@example.com")
        .await
        .unwrap()
        .unwrap();
    auth.confirm_password_reset(&reset, "correct-horse")
        .await
        .unwrap();

    // Old password dead, old session dead, new password works
    assert!(auth.sign_in("sam@example.com", "hunter2").await.is_err());
    assert_eq!(auth.session(&token).await.unwrap(), None);
    assert!(auth.sign_in("sam@example.com", "correct-horse").await.is_ok());

    // Reset tokens are single-use
    assert!(matches!(
        auth.confirm_password_reset(&reset, "again").await,
        Err(AuthError::UnknownResetToken)
    ));
}
