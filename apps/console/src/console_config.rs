use std::env;
use std::path::PathBuf;

use ironbeam_application::RecordSort;
use ironbeam_core::AppError;
use ironbeam_domain::RecordKind;
use tracing_subscriber::EnvFilter;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpSourceConfig {
    pub base_url: Url,
    pub api_token: Option<String>,
    pub timeout_secs: u64,
    pub max_attempts: u8,
    pub retry_backoff_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordSourceConfig {
    Http(HttpSourceConfig),
    Fixture(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    pub kind: RecordKind,
    pub source: RecordSourceConfig,
    pub search: Option<String>,
    pub filters: Vec<(String, String)>,
    pub sort: RecordSort,
    pub page: usize,
    pub page_size: usize,
}

impl ConsoleConfig {
    pub fn load() -> Result<Self, AppError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let kind = non_empty("IRONBEAM_RESOURCE")
            .ok_or_else(|| AppError::Validation("IRONBEAM_RESOURCE is required".to_owned()))?
            .parse::<RecordKind>()?;

        let source = match (
            non_empty("IRONBEAM_API_BASE_URL"),
            non_empty("IRONBEAM_FIXTURE_PATH"),
        ) {
            (Some(base_url), None) => {
                let base_url = Url::parse(base_url.as_str()).map_err(|error| {
                    AppError::Validation(format!("invalid IRONBEAM_API_BASE_URL: {error}"))
                })?;
                RecordSourceConfig::Http(HttpSourceConfig {
                    base_url,
                    api_token: non_empty("IRONBEAM_API_TOKEN"),
                    timeout_secs: parse_or("IRONBEAM_HTTP_TIMEOUT_SECS", &lookup, 15)?,
                    max_attempts: parse_or("IRONBEAM_HTTP_MAX_ATTEMPTS", &lookup, 3)?,
                    retry_backoff_ms: parse_or("IRONBEAM_HTTP_RETRY_BACKOFF_MS", &lookup, 200)?,
                })
            }
            (None, Some(path)) => RecordSourceConfig::Fixture(PathBuf::from(path)),
            (Some(_), Some(_)) => {
                return Err(AppError::Validation(
                    "set either IRONBEAM_API_BASE_URL or IRONBEAM_FIXTURE_PATH, not both"
                        .to_owned(),
                ));
            }
            (None, None) => {
                return Err(AppError::Validation(
                    "IRONBEAM_API_BASE_URL or IRONBEAM_FIXTURE_PATH is required".to_owned(),
                ));
            }
        };

        let filters = non_empty("IRONBEAM_FILTERS")
            .map(|value| parse_filters(value.as_str()))
            .transpose()?
            .unwrap_or_default();

        let sort = non_empty("IRONBEAM_SORT")
            .map(|value| RecordSort::parse_transport(value.as_str()))
            .transpose()?
            .unwrap_or_default();

        Ok(Self {
            kind,
            source,
            search: non_empty("IRONBEAM_SEARCH"),
            filters,
            sort,
            page: parse_or("IRONBEAM_PAGE", &lookup, 1)?,
            page_size: parse_or("IRONBEAM_PAGE_SIZE", &lookup, 10)?,
        })
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn parse_or<T, F>(name: &str, lookup: &F, default: T) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name).filter(|value| !value.trim().is_empty()) {
        Some(value) => value
            .trim()
            .parse::<T>()
            .map_err(|error| AppError::Validation(format!("invalid {name}: {error}"))),
        None => Ok(default),
    }
}

/// Parses `field=value` pairs separated by commas.
fn parse_filters(value: &str) -> Result<Vec<(String, String)>, AppError> {
    value
        .split(',')
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (field, expected) = pair.split_once('=').ok_or_else(|| {
                AppError::Validation(format!(
                    "IRONBEAM_FILTERS entry '{pair}' must look like field=value"
                ))
            })?;
            Ok((field.trim().to_owned(), expected.trim().to_owned()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use ironbeam_application::{RecordSort, SortKey};
    use ironbeam_domain::{RecordKind, SortDirection};

    use super::{ConsoleConfig, RecordSourceConfig};

    fn load(entries: &[(&str, &str)]) -> Result<ConsoleConfig, ironbeam_core::AppError> {
        let values: HashMap<String, String> = entries
            .iter()
            .map(|(name, value)| ((*name).to_owned(), (*value).to_owned()))
            .collect();
        ConsoleConfig::from_lookup(|name| values.get(name).cloned())
    }

    #[test]
    fn http_source_uses_defaults() {
        let config = load(&[
            ("IRONBEAM_RESOURCE", "leads"),
            ("IRONBEAM_API_BASE_URL", "http://127.0.0.1:3001"),
        ])
        .unwrap_or_else(|_| unreachable!());

        assert_eq!(config.kind, RecordKind::Lead);
        assert_eq!(config.page, 1);
        assert_eq!(config.page_size, 10);
        assert_eq!(config.sort, RecordSort::default());
        let RecordSourceConfig::Http(http) = config.source else {
            unreachable!("expected an HTTP source");
        };
        assert_eq!(http.max_attempts, 3);
        assert_eq!(http.timeout_secs, 15);
        assert!(http.api_token.is_none());
    }

    #[test]
    fn fixture_source_with_filters() {
        let config = load(&[
            ("IRONBEAM_RESOURCE", "page"),
            ("IRONBEAM_FIXTURE_PATH", "fixtures/pages.json"),
            ("IRONBEAM_FILTERS", "status=published, type = page"),
            ("IRONBEAM_PAGE_SIZE", "25"),
            ("IRONBEAM_SORT", "title:asc"),
        ])
        .unwrap_or_else(|_| unreachable!());

        assert!(matches!(config.source, RecordSourceConfig::Fixture(_)));
        assert_eq!(
            config.filters,
            vec![
                ("status".to_owned(), "published".to_owned()),
                ("type".to_owned(), "page".to_owned()),
            ]
        );
        assert_eq!(config.page_size, 25);
        assert_eq!(config.sort.key, SortKey::Field("title".to_owned()));
        assert_eq!(config.sort.direction, SortDirection::Asc);
    }

    #[test]
    fn rejects_missing_source_and_bad_numbers() {
        assert!(load(&[("IRONBEAM_RESOURCE", "leads")]).is_err());
        assert!(
            load(&[
                ("IRONBEAM_RESOURCE", "leads"),
                ("IRONBEAM_FIXTURE_PATH", "leads.json"),
                ("IRONBEAM_PAGE", "first"),
            ])
            .is_err()
        );
        assert!(
            load(&[
                ("IRONBEAM_RESOURCE", "leads"),
                ("IRONBEAM_FIXTURE_PATH", "leads.json"),
                ("IRONBEAM_FILTERS", "status"),
            ])
            .is_err()
        );
        assert!(
            load(&[
                ("IRONBEAM_RESOURCE", "leads"),
                ("IRONBEAM_FIXTURE_PATH", "leads.json"),
                ("IRONBEAM_SORT", "name:upwards"),
            ])
            .is_err()
        );
    }
}
