//! Response shapes of the backend and their normalization into domain types.
//!
//! The backend is a thin JSON server over a Python-generated data file, so the
//! decoder is lenient:
//! - `/api/prices` may be a bare array or `{ "prices": [...] }`
//! - bare `NaN` / `Infinity` tokens (not valid JSON) are read as `null`
//! - `null`, missing, or non-numeric log returns become NaN
//! - a missing or non-text `Date` becomes an empty date (filtered out downstream)
//! - array entries that are not objects are skipped

use std::borrow::Cow;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::domain::{ChangePoint, PriceRecord};

/// Either accepted shape of the prices payload.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum PricesResponse {
    Bare(Vec<Value>),
    Wrapped { prices: Vec<Value> },
}

impl PricesResponse {
    pub fn into_records(self) -> Vec<PriceRecord> {
        let rows = match self {
            PricesResponse::Bare(rows) => rows,
            PricesResponse::Wrapped { prices } => prices,
        };
        rows.into_iter()
            .filter_map(WirePrice::from_value)
            .map(WirePrice::into_record)
            .collect()
    }
}

#[derive(Debug, Deserialize)]
pub struct WirePrice {
    #[serde(rename = "Date", default, deserialize_with = "lenient_string")]
    date: Option<String>,
    #[serde(rename = "Log_Returns", default, deserialize_with = "lenient_f64")]
    log_returns: Option<f64>,
    #[serde(rename = "Price", default, deserialize_with = "lenient_f64")]
    price: Option<f64>,
}

impl WirePrice {
    /// Decode one array entry; `None` unless it is an object.
    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(_) => serde_json::from_value(value).ok(),
            _ => None,
        }
    }

    fn into_record(self) -> PriceRecord {
        PriceRecord {
            date: self.date.unwrap_or_default(),
            log_return: self.log_returns.unwrap_or(f64::NAN),
            price: self.price,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct WireChangePoint {
    #[serde(default, deserialize_with = "lenient_string")]
    change_point_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    associated_event: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    log_return_change: Option<f64>,
    #[serde(default, deserialize_with = "lenient_string")]
    event_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    event_description: Option<String>,
}

impl WireChangePoint {
    /// `None` when no change-point date was reported.
    pub fn into_change_point(self) -> Option<ChangePoint> {
        let date = self.change_point_date.filter(|d| !d.trim().is_empty())?;
        Some(ChangePoint {
            change_point_date: date,
            associated_event: self.associated_event.unwrap_or_default(),
            log_return_change: self.log_return_change.unwrap_or(f64::NAN),
            event_date: self.event_date.unwrap_or_default(),
            event_description: self.event_description.unwrap_or_default(),
        })
    }
}

/// Decode a prices body.
pub fn parse_prices(body: &str) -> Result<Vec<PriceRecord>, serde_json::Error> {
    let sanitized = sanitize_non_finite(body);
    let response: PricesResponse = serde_json::from_str(&sanitized)?;
    Ok(response.into_records())
}

/// Decode a change-point body.
pub fn parse_change_point(body: &str) -> Result<Option<ChangePoint>, serde_json::Error> {
    let sanitized = sanitize_non_finite(body);
    let wire: WireChangePoint = serde_json::from_str(&sanitized)?;
    Ok(wire.into_change_point())
}

/// Replace `NaN`, `Infinity` and `-Infinity` tokens outside string literals
/// with `null`.
pub fn sanitize_non_finite(body: &str) -> Cow<'_, str> {
    if !body.contains("NaN") && !body.contains("Infinity") {
        return Cow::Borrowed(body);
    }

    let bytes = body.as_bytes();
    let mut out = String::with_capacity(body.len());
    let mut start = 0;
    let mut in_string = false;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if in_string {
            match b {
                b'\\' => i += 2,
                b'"' => {
                    in_string = false;
                    i += 1;
                }
                _ => i += 1,
            }
            continue;
        }

        if b == b'"' {
            in_string = true;
            i += 1;
            continue;
        }

        let rest = &bytes[i..];
        let token_len = if rest.starts_with(b"NaN") {
            3
        } else if rest.starts_with(b"Infinity") {
            8
        } else if rest.starts_with(b"-Infinity") {
            9
        } else {
            0
        };

        if token_len > 0 {
            out.push_str(&body[start..i]);
            out.push_str("null");
            i += token_len;
            start = i;
        } else {
            i += 1;
        }
    }

    out.push_str(&body[start..]);
    Cow::Owned(out)
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    })
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        _ => None,
    })
}
