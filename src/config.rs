use crate::calendar::DisplayedMonth;
use std::{env, path::PathBuf};
use tracing::warn;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_YEAR: i32 = 2025;
const DEFAULT_MONTH_NUMBER: i64 = 12;
const DEFAULT_CURRENCY: &str = "¥";

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub wage_api_url: Option<String>,
    pub wage_data_path: Option<PathBuf>,
    pub default_month: DisplayedMonth,
    pub currency: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            wage_api_url: None,
            wage_data_path: None,
            default_month: DisplayedMonth::normalized(DEFAULT_YEAR, DEFAULT_MONTH_NUMBER - 1),
            currency: DEFAULT_CURRENCY.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let year = parse_or(get("WAGE_DEFAULT_YEAR"), "WAGE_DEFAULT_YEAR", DEFAULT_YEAR);
        let month_number = parse_or(
            get("WAGE_DEFAULT_MONTH"),
            "WAGE_DEFAULT_MONTH",
            DEFAULT_MONTH_NUMBER,
        );

        Self {
            port: parse_or(get("PORT"), "PORT", DEFAULT_PORT),
            wage_api_url: get("WAGE_API_URL").map(|url| url.trim_end_matches('/').to_string()),
            wage_data_path: get("WAGE_DATA_PATH").map(PathBuf::from),
            default_month: DisplayedMonth::normalized(year, month_number - 1),
            currency: get("WAGE_CURRENCY").unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
        }
    }
}

fn parse_or<T: std::str::FromStr + Copy>(value: Option<String>, key: &str, fallback: T) -> T {
    match value {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("ignoring invalid {key}={raw:?}");
            fallback
        }),
        None => fallback,
    }
}
