//! Location model
//!
//! Table: "Location"

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Id;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: Id,
    pub name: String,
    pub description: Option<String>,
    pub address: Option<String>,
    /// Id of the uploaded location image, if any
    pub image_id: Option<Id>,
    pub user_id: Id,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
