//! Payload framing: JSON text carried as a zenoh-ext serialized string

use serde::{de::DeserializeOwned, Serialize};
use zenoh::bytes::ZBytes;

use crate::error::{LeaderboardError, Result};

pub(crate) fn encode<T: Serialize + ?Sized>(value: &T) -> Result<ZBytes> {
    let json = serde_json::to_string(value)?;
    Ok(zenoh_ext::z_serialize(&json))
}

pub(crate) fn decode<T: DeserializeOwned>(payload: &ZBytes) -> Result<T> {
    let json = decode_text(payload)?;
    Ok(serde_json::from_str(&json)?)
}

pub(crate) fn decode_text(payload: &ZBytes) -> Result<String> {
    zenoh_ext::z_deserialize::<String>(payload)
        .map_err(|_| LeaderboardError::Serialization("payload is not a string".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ScoreRecord, ScoreSubmission};

    #[test]
    fn test_record_list_payload() {
        let records = vec![ScoreRecord::at(ScoreSubmission::new("Atlas", 400).unwrap(), 7)];
        let payload = encode(&records).unwrap();
        let decoded: Vec<ScoreRecord> = decode(&payload).unwrap();
        assert_eq!(decoded, records);
    }

    #[test]
    fn test_wrong_shape_is_serialization_error() {
        let payload = encode("just text").unwrap();
        let err = decode::<Vec<ScoreRecord>>(&payload).unwrap_err();
        assert!(matches!(err, LeaderboardError::Serialization(_)));
    }
}
