use crate::api::StorageAPI;

const HISTORY_KEY: &str = "search_history";
const HISTORY_LIMIT: usize = 3;

/// Record a successful search, most-recent-first, deduplicated, capped at
/// three entries. History is best-effort: storage failures are logged and
/// never fail the search that triggered them.
pub(super) async fn push(storage: &dyn StorageAPI, text: &str) {
    let mut entries = recent(storage).await;

    entries.retain(|entry| entry != text);
    entries.insert(0, text.to_string());
    entries.truncate(HISTORY_LIMIT);

    let encoded = match serde_json::to_string(&entries) {
        Ok(encoded) => encoded,
        Err(err) => {
            tracing::warn!(?err, "failed to encode search history");
            return;
        }
    };

    if let Err(err) = storage.set(HISTORY_KEY, encoded).await {
        tracing::warn!(?err, "failed to persist search history");
    }
}

pub(super) async fn recent(storage: &dyn StorageAPI) -> Vec<String> {
    let raw = match storage.get(HISTORY_KEY).await {
        Ok(Some(raw)) => raw,
        Ok(None) => return vec![],
        Err(err) => {
            tracing::warn!(?err, "failed to read search history");
            return vec![];
        }
    };

    serde_json::from_str(&raw).unwrap_or_default()
}
