use crate::{CliError, Commands, execute};

use dt_config::RoutesConfig;
use dt_session::{
    AuthApi, FileTokenStore, MockAuthApi, Navigator, SessionError, SessionOptions, SessionStore,
    TokenStore,
};

use std::sync::Arc;

use googletest::assert_that;
use googletest::prelude::eq;
use tempfile::TempDir;

fn store_in(dir: &TempDir) -> SessionStore {
    SessionStore::new(
        Arc::new(MockAuthApi::new()) as Arc<dyn AuthApi>,
        Arc::new(FileTokenStore::new(dir.path().join("session"))) as Arc<dyn TokenStore>,
        SessionOptions::default(),
    )
}

fn navigator() -> Navigator {
    Navigator::from_routes(&RoutesConfig::default())
}

fn login(identifier: &str, secret: &str) -> Commands {
    Commands::Login {
        identifier: identifier.to_string(),
        secret: secret.to_string(),
    }
}

#[tokio::test]
async fn given_login_when_next_invocation_restores_then_whoami_reports_admin() {
    // Given
    let temp = TempDir::new().unwrap();
    let first = store_in(&temp);
    first.restore().await;
    execute(&first, &navigator(), login("admin@example.com", "admin"))
        .await
        .unwrap();

    // When
    let second = store_in(&temp);
    second.restore().await;
    let value = execute(&second, &navigator(), Commands::Whoami).await.unwrap();

    // Then
    assert_eq!(value["phase"], "authenticated");
    assert_eq!(value["state"]["identity"]["role"], "admin");
}

#[tokio::test]
async fn given_wrong_secret_when_login_then_session_error() {
    let temp = TempDir::new().unwrap();
    let store = store_in(&temp);
    store.restore().await;

    let result = execute(&store, &navigator(), login("admin@example.com", "x")).await;

    assert!(matches!(
        result,
        Err(CliError::Session {
            source: SessionError::InvalidCredentials { .. },
            ..
        })
    ));
}

#[tokio::test]
async fn given_secretary_when_check_admin_path_then_redirect_decision() {
    let temp = TempDir::new().unwrap();
    let store = store_in(&temp);
    store.restore().await;
    execute(&store, &navigator(), login("secretary@example.com", "secretary"))
        .await
        .unwrap();

    let value = execute(
        &store,
        &navigator(),
        Commands::Check {
            path: "/admin/users".to_string(),
        },
    )
    .await
    .unwrap();

    assert_eq!(value["decision"]["outcome"], "redirect");
    assert_eq!(value["decision"]["to"], "/secretary");
}

#[tokio::test]
async fn given_admin_when_users_editable_then_admins_excluded() {
    let temp = TempDir::new().unwrap();
    let store = store_in(&temp);
    store.restore().await;
    execute(&store, &navigator(), login("admin@example.com", "admin"))
        .await
        .unwrap();

    let value = execute(&store, &navigator(), Commands::Users { editable: true })
        .await
        .unwrap();

    let identities = value["identities"].as_array().unwrap();
    assert_that!(identities.len(), eq(3));
    assert!(identities.iter().all(|i| i["role"] != "admin"));
}

#[tokio::test]
async fn given_signed_out_when_users_editable_then_not_signed_in() {
    let temp = TempDir::new().unwrap();
    let store = store_in(&temp);
    store.restore().await;

    let result = execute(&store, &navigator(), Commands::Users { editable: true }).await;

    assert!(matches!(result, Err(CliError::NotSignedIn { .. })));
}

#[tokio::test]
async fn given_unknown_permission_name_when_permissions_then_argument_error() {
    let temp = TempDir::new().unwrap();
    let store = store_in(&temp);
    store.restore().await;

    let result = execute(
        &store,
        &navigator(),
        Commands::Permissions {
            identity_id: "2".to_string(),
            permissions: vec!["fly_helicopter".to_string()],
        },
    )
    .await;

    assert!(matches!(result, Err(CliError::Argument { .. })));
}

#[tokio::test]
async fn given_signed_in_when_logout_then_session_file_removed() {
    let temp = TempDir::new().unwrap();
    let store = store_in(&temp);
    store.restore().await;
    execute(&store, &navigator(), login("user@example.com", "user"))
        .await
        .unwrap();

    let value = execute(&store, &navigator(), Commands::Logout).await.unwrap();

    assert_eq!(value["authenticated"], false);
    assert!(!temp.path().join("session").join("token").exists());
}
