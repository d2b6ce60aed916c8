use crate::error::EtlError;
use serde::{Deserialize, Deserializer};
use std::path::Path;

/// One line of an activity log.
///
/// Only `ts` and `page` are guaranteed; everything else is absent or null for
/// events such as logged-out page views.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEvent {
    /// Epoch milliseconds.
    pub ts: i64,
    pub page: String,
    #[serde(default)]
    pub song: Option<String>,
    #[serde(default)]
    pub artist: Option<String>,
    /// Track length in seconds.
    #[serde(default)]
    pub length: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_user_id")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub session_id: Option<i64>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub user_agent: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum UserIdRepr {
    Text(String),
    Number(i64),
}

/// Logs carry `userId` as a string, sometimes as a number; "" means no user.
fn deserialize_user_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let repr = Option::<UserIdRepr>::deserialize(deserializer)?;
    Ok(repr
        .map(|r| match r {
            UserIdRepr::Text(s) => s,
            UserIdRepr::Number(n) => n.to_string(),
        })
        .filter(|s| !s.is_empty()))
}

/// Reads line-delimited activity logs.
#[derive(Clone, Debug, Default)]
pub struct EventExtractor;

impl EventExtractor {
    /// All events of the file in input order; any bad line fails the whole file.
    pub fn extract(&self, path: &Path) -> Result<Vec<RawEvent>, EtlError> {
        let text = std::fs::read_to_string(path).map_err(|err| EtlError::io(path, err))?;
        self.parse(path, &text)
    }

    fn parse(&self, path: &Path, text: &str) -> Result<Vec<RawEvent>, EtlError> {
        text.lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(index, line)| {
                serde_json::from_str::<RawEvent>(line).map_err(|err| {
                    EtlError::malformed(path, format!("line {}: {}", index + 1, err))
                })
            })
            .collect()
    }
}
