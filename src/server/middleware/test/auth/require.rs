use super::*;

fn user() -> DiscordUser {
    DiscordUser {
        id: "300000000000000001".to_string(),
        username: "leia".to_string(),
        avatar: None,
    }
}

/// Tests a logged-in visitor passes the guard.
///
/// Expected: Ok with the session's user and access token
#[tokio::test]
async fn returns_user_and_token() -> Result<(), TestError> {
    let mut test = TestBuilder::new().with_session().build().await?;
    let session = test.session().await?;
    AuthSession::new(session)
        .login(&user(), "access")
        .await
        .unwrap();

    let (returned_user, token) = AuthGuard::new(session)
        .require("/dashboard")
        .await
        .unwrap();

    assert_eq!(returned_user, user());
    assert_eq!(token, "access");
    Ok(())
}

/// Tests an anonymous visitor is rejected and their destination remembered.
///
/// Expected: Err(AuthError::UserNotInSession), return path stored in the session
#[tokio::test]
async fn rejects_anonymous_and_stores_return_path() -> Result<(), TestError> {
    let mut test = TestBuilder::new().with_session().build().await?;
    let session = test.session().await?;

    let result = AuthGuard::new(session).require("/guild/1").await;

    assert!(matches!(
        result,
        Err(AppError::AuthErr(AuthError::UserNotInSession))
    ));
    assert_eq!(
        ReturnToSession::new(session).take().await.unwrap().as_deref(),
        Some("/guild/1")
    );
    Ok(())
}

/// Tests a logged-out session no longer passes the guard.
///
/// Expected: Err(AuthError::UserNotInSession)
#[tokio::test]
async fn rejects_after_logout() -> Result<(), TestError> {
    let mut test = TestBuilder::new().with_session().build().await?;
    let session = test.session().await?;
    let auth = AuthSession::new(session);
    auth.login(&user(), "access").await.unwrap();
    auth.flush().await.unwrap();

    let result = AuthGuard::new(session).require("/dashboard").await;

    assert!(matches!(
        result,
        Err(AppError::AuthErr(AuthError::UserNotInSession))
    ));
    Ok(())
}
