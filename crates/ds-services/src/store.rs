//! Typed JSON access on top of the untyped `KvStore` port.

use ds_core::{AppError, KvStore, Result};
use serde::{de::DeserializeOwned, Serialize};

pub(crate) async fn load<T: DeserializeOwned>(kv: &dyn KvStore, key: &str) -> Result<Option<T>> {
    let Some(value) = kv.get(key).await? else {
        return Ok(None);
    };
    serde_json::from_value(value)
        .map(Some)
        .map_err(|e| AppError::Store(format!("corrupt record at {key}: {e}")))
}

pub(crate) async fn save<T: Serialize>(kv: &dyn KvStore, key: &str, record: &T) -> Result<()> {
    let value = serde_json::to_value(record)
        .map_err(|e| AppError::Store(format!("cannot encode record for {key}: {e}")))?;
    kv.set(key, value).await?;
    Ok(())
}
