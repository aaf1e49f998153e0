use std::collections::HashMap;

use super::SessionError;

pub(crate) const SERVICE_NAME: &str = "gestao-console";

fn attributes(server: &str) -> HashMap<&str, &str> {
    let mut attrs = HashMap::new();
    attrs.insert("service", SERVICE_NAME);
    attrs.insert("server", server);
    attrs
}

async fn open() -> Result<oo7::Keyring, SessionError> {
    oo7::Keyring::new()
        .await
        .map_err(|e| SessionError::Keyring(format!("Failed to connect to keyring: {}", e)))
}

/// Store the bearer token for `server` in the Secret Service keyring.
pub async fn store_token(server: &str, token: &str) -> Result<(), SessionError> {
    let keyring = open().await?;

    keyring
        .create_item(
            &format!("Gestão console ({})", server),
            &attributes(server),
            token.as_bytes(),
            true, // replace existing
        )
        .await
        .map_err(|e| SessionError::Keyring(format!("Failed to store token: {}", e)))?;

    Ok(())
}

pub async fn load_token(server: &str) -> Result<Option<String>, SessionError> {
    let keyring = open().await?;

    let items = keyring
        .search_items(&attributes(server))
        .await
        .map_err(|e| SessionError::Keyring(format!("Failed to search keyring: {}", e)))?;

    let Some(item) = items.first() else {
        return Ok(None);
    };
    let secret = item
        .secret()
        .await
        .map_err(|e| SessionError::Keyring(format!("Failed to read secret: {}", e)))?;
    let token = String::from_utf8(secret.to_vec())
        .map_err(|e| SessionError::Keyring(format!("Invalid UTF-8 in secret: {}", e)))?;

    Ok(Some(token))
}

pub async fn delete_token(server: &str) -> Result<(), SessionError> {
    let keyring = open().await?;

    let items = keyring
        .search_items(&attributes(server))
        .await
        .map_err(|e| SessionError::Keyring(format!("Failed to search keyring: {}", e)))?;

    for item in items {
        item.delete()
            .await
            .map_err(|e| SessionError::Keyring(format!("Failed to delete token: {}", e)))?;
    }

    Ok(())
}
