use reading_core::model::Progress;

use crate::repository::StorageError;

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

/// Encode progress as the flat JSON object persisted under the storage key.
pub(crate) fn encode_progress(progress: &Progress) -> Result<String, StorageError> {
    serde_json::to_string(progress).map_err(ser)
}

/// Decode a persisted JSON object back into progress.
///
/// Anything that is not a `{string: bool}` object is a serialization error;
/// callers decide whether to recover.
pub(crate) fn decode_progress(raw: &str) -> Result<Progress, StorageError> {
    serde_json::from_str(raw).map_err(ser)
}
