use crate::commands::Commands;
use crate::error::{CliError, Result as CliErrorResult};

use dt_core::{Permission, Role, editable_identities};
use dt_session::{Navigator, SessionStore};

use std::str::FromStr;

use serde_json::{Value, json};

/// Run one command against a restored session store.
pub async fn execute(
    store: &SessionStore,
    navigator: &Navigator,
    command: Commands,
) -> CliErrorResult<Value> {
    match command {
        Commands::Login { identifier, secret } => {
            let (token, identity) = store.sign_in(&identifier, &secret).await?;
            Ok(json!({ "token": token, "identity": identity }))
        }

        Commands::Logout => {
            store.sign_out().await;
            Ok(serde_json::to_value(store.state())?)
        }

        Commands::Register {
            email,
            secret,
            name,
            role,
        } => {
            let role = Role::from_str(&role)?;
            let identity = store.register(&email, &secret, &name, role).await?;
            Ok(json!({ "identity": identity }))
        }

        Commands::Whoami => Ok(json!({
            "phase": store.phase(),
            "state": store.state(),
        })),

        Commands::Users { editable } => {
            let all = store.list_identities().await?;

            if !editable {
                return Ok(json!({ "identities": all }));
            }

            let current = store.state().identity.ok_or_else(CliError::not_signed_in)?;
            Ok(json!({ "identities": editable_identities(&current, &all) }))
        }

        Commands::Permissions {
            identity_id,
            permissions,
        } => {
            let permissions = permissions
                .iter()
                .map(|name| Permission::from_str(name))
                .collect::<Result<Vec<_>, _>>()?;

            store
                .update_permissions(&identity_id, permissions.iter().copied())
                .await?;

            Ok(json!({
                "identity_id": identity_id,
                "permissions": permissions,
            }))
        }

        Commands::Check { path } => {
            let outcome = navigator.navigate(&store.state(), &path);
            Ok(json!({ "path": path, "decision": outcome }))
        }
    }
}
