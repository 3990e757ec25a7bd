//! Country list proxy
//!
//! Fetches the country dataset and reshapes each entry into the compact
//! form the contact form's country picker uses.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};
use ts_rs::TS;
use ureq::Agent;

use super::http;
use crate::errors::{PortfolioError, Result};
use crate::storage::models::TS_EXPORT_PATH;

#[derive(Debug, Default, Deserialize)]
struct RawName {
    #[serde(default)]
    common: String,
    #[serde(default)]
    official: String,
}

#[derive(Debug, Default, Deserialize)]
struct RawFlags {
    svg: Option<String>,
    png: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawIdd {
    root: Option<String>,
    #[serde(default)]
    suffixes: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawCountry {
    #[serde(default)]
    name: RawName,
    #[serde(default)]
    cca2: String,
    #[serde(default)]
    cca3: String,
    #[serde(default)]
    flags: RawFlags,
    #[serde(default)]
    idd: RawIdd,
    #[serde(default)]
    region: String,
    #[serde(default)]
    capital: Vec<String>,
    #[serde(default)]
    population: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct Country {
    pub name: String,
    pub official_name: String,
    pub code: String,
    pub code3: String,
    pub flag: Option<String>,
    pub dial_code: Option<String>,
    pub region: String,
    pub capital: Option<String>,
    #[ts(type = "number")]
    pub population: u64,
}

impl From<RawCountry> for Country {
    fn from(raw: RawCountry) -> Self {
        let dial_code = match (raw.idd.root, raw.idd.suffixes.first()) {
            (Some(root), Some(suffix)) => Some(format!("{}{}", root, suffix)),
            (Some(root), None) => Some(root),
            (None, _) => None,
        };

        Self {
            name: raw.name.common,
            official_name: raw.name.official,
            code: raw.cca2,
            code3: raw.cca3,
            flag: raw.flags.svg.or(raw.flags.png),
            dial_code,
            region: raw.region,
            capital: raw.capital.into_iter().next(),
            population: raw.population,
        }
    }
}

/// 解析上游 JSON 并转换，按名称排序
pub fn transform_countries(body: &str) -> Result<Vec<Country>> {
    let value: serde_json::Value = serde_json::from_str(body)?;
    if !value.is_array() {
        return Err(PortfolioError::serialization(
            "country list response is not an array",
        ));
    }
    let raw: Vec<RawCountry> = serde_json::from_value(value)?;

    let mut countries: Vec<Country> = raw.into_iter().map(Country::from).collect();
    countries.sort_by(|a, b| {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.name.cmp(&b.name))
    });
    Ok(countries)
}

pub struct CountriesService {
    agent: Agent,
    api_url: String,
    cache: Option<Cache<&'static str, Arc<Vec<Country>>>>,
}

impl CountriesService {
    /// `cache_ttl_secs == 0` 关闭缓存
    pub fn new(agent: Agent, api_url: impl Into<String>, cache_ttl_secs: u64) -> Self {
        let cache = (cache_ttl_secs > 0).then(|| {
            Cache::builder()
                .max_capacity(1)
                .time_to_live(Duration::from_secs(cache_ttl_secs))
                .build()
        });
        Self {
            agent,
            api_url: api_url.into(),
            cache,
        }
    }

    pub async fn list(&self) -> Result<Arc<Vec<Country>>> {
        match &self.cache {
            // try_get_with 不缓存错误
            Some(cache) => cache
                .try_get_with("all", self.fetch())
                .await
                .map_err(|e| (*e).clone()),
            None => self.fetch().await,
        }
    }

    async fn fetch(&self) -> Result<Arc<Vec<Country>>> {
        let resp = http::get(&self.agent, "countries", &self.api_url).await?;
        if !resp.is_success() {
            error!(
                "Country API returned {}: {}",
                resp.status,
                resp.body_excerpt()
            );
            return Err(PortfolioError::upstream(format!(
                "country API returned status {}",
                resp.status
            )));
        }

        let countries = transform_countries(&resp.body)?;
        debug!("Fetched {} countries", countries.len());
        Ok(Arc::new(countries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_maps_every_field() {
        let body = r#"[{
            "name": {"common": "Norway", "official": "Kingdom of Norway"},
            "cca2": "NO", "cca3": "NOR",
            "flags": {"svg": "https://flags/no.svg", "png": "https://flags/no.png"},
            "idd": {"root": "+4", "suffixes": ["7"]},
            "region": "Europe", "capital": ["Oslo"], "population": 5379475
        }]"#;
        let countries = transform_countries(body).unwrap();
        assert_eq!(
            countries[0],
            Country {
                name: "Norway".to_string(),
                official_name: "Kingdom of Norway".to_string(),
                code: "NO".to_string(),
                code3: "NOR".to_string(),
                flag: Some("https://flags/no.svg".to_string()),
                dial_code: Some("+47".to_string()),
                region: "Europe".to_string(),
                capital: Some("Oslo".to_string()),
                population: 5_379_475,
            }
        );
    }

    #[test]
    fn test_transform_fallbacks() {
        let body = r#"[
            {"name": {"common": "Zeta"}, "flags": {"png": "z.png"}, "idd": {"root": "+1", "suffixes": []}},
            {"name": {"common": "alpha"}, "idd": {}, "capital": []}
        ]"#;
        let countries = transform_countries(body).unwrap();
        assert_eq!(countries[0].name, "alpha");
        assert_eq!(countries[0].dial_code, None);
        assert_eq!(countries[0].capital, None);
        assert_eq!(countries[0].flag, None);
        assert_eq!(countries[1].flag.as_deref(), Some("z.png"));
        assert_eq!(countries[1].dial_code.as_deref(), Some("+1"));
    }

    #[test]
    fn test_transform_rejects_non_array() {
        assert!(transform_countries(r#"{"status": 404}"#).is_err());
        assert!(transform_countries("not json").is_err());
    }

    #[test]
    fn test_serialized_field_names() {
        let body = r#"[{"name": {"common": "Chile", "official": "Republic of Chile"},
            "cca2": "CL", "cca3": "CHL", "idd": {"root": "+5", "suffixes": ["6"]}}]"#;
        let json = serde_json::to_value(transform_countries(body).unwrap()).unwrap();
        assert_eq!(json[0]["officialName"], "Republic of Chile");
        assert_eq!(json[0]["dialCode"], "+56");
        assert_eq!(json[0]["code3"], "CHL");
    }
}
