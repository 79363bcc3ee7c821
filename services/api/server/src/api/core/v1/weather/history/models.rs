use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Search count per city, as typed by the caller
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(example = json!({"Москва": 2, "Париж": 1}))]
pub struct HistoryResponse(pub HashMap<String, u64>);
