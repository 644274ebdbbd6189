//! Result DTOs

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::result::{ResultRecord, ResultSnapshot};

/// Response body of `GET /result?session_id=&task_id=`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultsResponse {
    pub session_id: String,
    #[serde(default)]
    pub result: Vec<Value>,
    pub count: u32,
}

impl ResultsResponse {
    /// Convert into a snapshot for `task_id`
    ///
    /// Items that are not JSON objects are wrapped under a single `value`
    /// column so that every record can be shown in a table.
    pub fn into_snapshot(self, task_id: &str) -> ResultSnapshot {
        let items = self.result.into_iter().map(into_record).collect();
        ResultSnapshot {
            session_id: self.session_id,
            task_id: task_id.to_string(),
            items,
            count: self.count,
        }
    }
}

fn into_record(item: Value) -> ResultRecord {
    match item {
        Value::Object(map) => map,
        other => {
            let mut map = Map::new();
            map.insert("value".to_string(), other);
            map
        }
    }
}
