//! Rate quote model and provider payload decoding

use crate::core::error::QuoteError;
use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One observation for a currency pair.
///
/// `bid` and `ask` travel as decimal strings on the wire and are kept as
/// [`Decimal`] so they can be stored numerically without losing scale.
/// Fields the provider sends that we don't model (`code`, `name`, `high`,
/// `create_date`, ...) are carried in `extra` and echoed back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateQuote {
    #[serde(skip)]
    pair: String,
    pub bid: Decimal,
    pub ask: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl RateQuote {
    #[cfg(test)]
    pub(crate) fn new(pair: &str, bid: Decimal, ask: Decimal) -> Self {
        RateQuote {
            pair: pair.to_string(),
            bid,
            ask,
            timestamp: None,
            extra: BTreeMap::new(),
        }
    }

    pub fn pair(&self) -> &str {
        &self.pair
    }

    /// Provider timestamp (epoch seconds) if present and valid.
    pub fn observed_at(&self) -> Option<DateTime<Utc>> {
        self.timestamp
            .as_deref()
            .and_then(|ts| ts.trim().parse::<i64>().ok())
            .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
    }
}

/// A decoded provider response keyed by pair code (e.g. `USDBRL`).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct QuoteResponse {
    quotes: BTreeMap<String, RateQuote>,
}

impl QuoteResponse {
    pub fn decode(body: &[u8]) -> Result<Self, QuoteError> {
        let mut quotes: BTreeMap<String, RateQuote> = serde_json::from_slice(body)?;

        if quotes.is_empty() {
            return Err(QuoteError::Decode("response contains no quotes".into()));
        }

        for (pair, quote) in quotes.iter_mut() {
            if pair.trim().is_empty() {
                return Err(QuoteError::Decode("empty pair code".into()));
            }
            quote.pair = pair.clone();
        }

        Ok(QuoteResponse { quotes })
    }

    /// Looks up a single pair; a missing key is an error, never a default.
    pub fn get(&self, pair: &str) -> Result<&RateQuote, QuoteError> {
        self.quotes
            .get(pair)
            .ok_or_else(|| QuoteError::NotFound(pair.to_string()))
    }

    pub fn pairs(&self) -> impl Iterator<Item = &str> {
        self.quotes.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RateQuote> {
        self.quotes.values()
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }
}
