use serde::{Deserialize, Deserializer};

/// One event from a tailnet log stream.
///
/// Missing and `null` fields decode to their empty value; a field of the wrong
/// JSON type fails the whole batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LogEntry {
    #[serde(deserialize_with = "null_as_default")]
    pub timestamp: String,
    #[serde(deserialize_with = "null_as_default")]
    pub version: i64,
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub event_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub tailnet: String,
    #[serde(deserialize_with = "null_as_default")]
    pub message: String,
    #[serde(deserialize_with = "null_as_default")]
    pub data: EventData,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EventData {
    #[serde(rename = "nodeID")]
    pub node_id: Option<String>,
    #[serde(rename = "deviceName")]
    pub device_name: Option<String>,
    #[serde(rename = "managedBy")]
    pub managed_by: Option<String>,
    pub actor: Option<String>,
    #[serde(alias = "URL")]
    pub url: Option<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// The request body of `POST /api/{token}`, in input order.
pub type LogBatch = Vec<LogEntry>;

/// Decode a request body into a batch. The body must be a JSON array.
pub fn parse_batch(body: &[u8]) -> Result<LogBatch, serde_json::Error> {
    serde_json::from_slice(body)
}
