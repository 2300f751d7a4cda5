//! Exchange rates: the hosted provider first, the local
//! `exchange-rates.json` document as fallback, and conversion over whichever
//! snapshot was obtained.

use std::collections::HashMap;

use chrono::{TimeZone, Utc};
use serde::Deserialize;
use tracing::warn;

use crate::{
    error::{Error, Result},
    models::ExchangeRate,
    state::Portal,
};

#[derive(Deserialize)]
struct LatestRates {
    conversion_rates: HashMap<String, f64>,
    time_last_update_unix: i64,
}

#[derive(Deserialize)]
struct RatesDoc {
    rates: Vec<ExchangeRate>,
}

/// Provider response for a direct pair lookup.
#[derive(Debug, Clone, Deserialize)]
pub struct PairRate {
    pub base_code: String,
    pub target_code: String,
    pub conversion_rate: f64,
    pub conversion_result: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct Conversion {
    pub amount: f64,
    pub rate: f64,
    pub from: String,
    pub to: String,
}

impl Portal {
    /// Current snapshot of USD-based rates. Provider failures fall back to
    /// the local document; if that also fails the snapshot is empty.
    pub async fn exchange_rates(&self) -> Vec<ExchangeRate> {
        match self.provider_latest("USD").await {
            Ok(rates) => rates,
            Err(e) => {
                warn!("exchange rate provider unavailable, falling back: {e}");
                match self.fetch_document::<RatesDoc>("exchange-rates").await {
                    Ok(doc) => doc.rates,
                    Err(e) => {
                        warn!("exchange rate fallback unavailable: {e}");
                        Vec::new()
                    }
                }
            }
        }
    }

    pub async fn convert(&self, amount: f64, from: &str, to: &str) -> Result<Conversion> {
        let rates = self.exchange_rates().await;
        convert_with(&rates, amount, from, to)
    }

    /// Direct pair conversion against the provider; errors propagate.
    pub async fn pair(&self, from: &str, to: &str, amount: f64) -> Result<PairRate> {
        let url = format!(
            "{}/{}/pair/{from}/{to}/{amount}",
            self.config.exchange_api_url, self.config.exchange_api_key
        );
        let body = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Headline USD to UGX rate from the provider.
    pub async fn usd_to_ugx(&self) -> Result<ExchangeRate> {
        let rates = self.provider_latest("USD").await?;
        rates
            .into_iter()
            .find(|r| r.to == "UGX")
            .ok_or_else(|| Error::RateNotFound {
                from: "USD".to_owned(),
                to: "UGX".to_owned(),
            })
    }

    async fn provider_latest(&self, base: &str) -> Result<Vec<ExchangeRate>> {
        let url = format!(
            "{}/{}/latest/{base}",
            self.config.exchange_api_url, self.config.exchange_api_key
        );
        let body = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        let latest: LatestRates = serde_json::from_str(&body)?;

        let date = Utc
            .timestamp_opt(latest.time_last_update_unix, 0)
            .single()
            .unwrap_or_else(Utc::now);

        let mut rates: Vec<ExchangeRate> = latest
            .conversion_rates
            .into_iter()
            .map(|(code, rate)| ExchangeRate {
                from: base.to_owned(),
                to: code,
                rate,
                date,
            })
            .collect();
        rates.sort_by(|a, b| a.to.cmp(&b.to));
        Ok(rates)
    }
}

pub(crate) fn convert_with(
    rates: &[ExchangeRate],
    amount: f64,
    from: &str,
    to: &str,
) -> Result<Conversion> {
    let rate = rates
        .iter()
        .find(|r| r.from == from && r.to == to)
        .ok_or_else(|| Error::RateNotFound {
            from: from.to_owned(),
            to: to.to_owned(),
        })?;

    Ok(Conversion {
        amount: amount * rate.rate,
        rate: rate.rate,
        from: from.to_owned(),
        to: to.to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rate(from: &str, to: &str, value: f64) -> ExchangeRate {
        ExchangeRate {
            from: from.to_owned(),
            to: to.to_owned(),
            rate: value,
            date: Utc::now(),
        }
    }

    #[test]
    fn test_convert_multiplies_by_rate() {
        let rates = vec![rate("USD", "UGX", 3700.0), rate("USD", "KES", 129.0)];

        let conversion = convert_with(&rates, 100.0, "USD", "UGX").unwrap();
        assert_eq!(conversion.amount, 370_000.0);
        assert_eq!(conversion.rate, 3700.0);
        assert_eq!(conversion.from, "USD");
        assert_eq!(conversion.to, "UGX");
    }

    #[test]
    fn test_missing_pair_is_rate_not_found() {
        let rates = vec![rate("USD", "UGX", 3700.0)];

        let err = convert_with(&rates, 100.0, "UGX", "USD").unwrap_err();
        assert!(matches!(
            err,
            Error::RateNotFound { ref from, ref to } if from == "UGX" && to == "USD"
        ));
    }

    #[test]
    fn test_provider_shape_decodes() {
        let latest: LatestRates = serde_json::from_str(
            r#"{
                "result": "success",
                "base_code": "USD",
                "conversion_rates": {"UGX": 3700.0, "KES": 129.0},
                "time_last_update_unix": 1722816001
            }"#,
        )
        .unwrap();
        assert_eq!(latest.conversion_rates.len(), 2);
        assert_eq!(latest.conversion_rates["UGX"], 3700.0);
    }
}
