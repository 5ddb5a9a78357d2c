use crate::calendar::CalendarCell;
use crate::errors::FetchError;
use crate::wages::WageDataset;
use serde::{Deserialize, Serialize};

pub const CODE_OK: i64 = 200;
pub const CODE_BAD_REQUEST: i64 = 400;

/// Wire shape of `/api/wages`: the payload only counts when `code` is 200.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WageEnvelope {
    pub code: i64,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<WageDataset>,
}

impl WageEnvelope {
    pub fn ok(data: WageDataset) -> Self {
        Self {
            code: CODE_OK,
            message: Some("ok".to_string()),
            data: Some(data),
        }
    }

    pub fn error(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: Some(message.into()),
            data: None,
        }
    }

    pub fn into_dataset(self) -> Result<WageDataset, FetchError> {
        match (self.code, self.data) {
            (CODE_OK, Some(data)) => Ok(data),
            (code, _) => Err(FetchError::Rejected {
                code,
                message: self
                    .message
                    .unwrap_or_else(|| "failed to fetch wage data".to_string()),
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CalendarQuery {
    pub name: Option<String>,
    pub year: Option<String>,
    pub month: Option<String>,
    pub offset: Option<String>,
    pub refresh: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WagesQuery {
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarResponse {
    pub user_name: String,
    pub year: i32,
    pub month: u32,
    pub monthly_total: f64,
    pub cells: Vec<CalendarCell>,
}
