use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

/// A single recorded engagement event. Rows are write-once: there is no
/// update or delete path anywhere in the service.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: i64,
    pub email: String,
    pub ip: String,
    pub event_type: String,
    pub timestamp: DateTime<Utc>,
}

/// The kind of interaction being recorded. Persisted as text in the
/// `event_type` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventType {
    Open,
    Click,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Open => "open",
            EventType::Click => "click",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_type_maps_to_column_values() {
        assert_eq!(EventType::Open.as_str(), "open");
        assert_eq!(EventType::Click.as_str(), "click");
        assert_eq!(EventType::Click.to_string(), "click");
    }
}
