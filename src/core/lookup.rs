//! Country and dial-code lookup service
//!
//! Two read-only datasets back the wizards: the list of international dial
//! codes (registration) and the country to city hierarchy (profile). Both
//! come from a remote JSON API shaped as `{ "data": [...] }`, or from a
//! directory holding the same responses saved to disk.

use miette::Diagnostic;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::core::flow::Flow;

/// Public endpoint serving both datasets
pub const DEFAULT_API_BASE: &str = "https://countriesnow.space/api/v0.1";

/// File name of the saved dial-code response inside a reference directory
pub const CODES_FILE: &str = "codes.json";

/// File name of the saved country response inside a reference directory
pub const COUNTRIES_FILE: &str = "countries.json";

/// Errors that can occur while fetching reference data
#[derive(Debug, Error, Diagnostic)]
pub enum LookupError {
    #[error("Request to {url} failed: {source}")]
    #[diagnostic(
        code(signup::lookup::network),
        help("Check your network connection or pass --reference-dir with saved responses")
    )]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered with HTTP {status}")]
    #[diagnostic(code(signup::lookup::status))]
    Status { url: String, status: u16 },

    #[error("Malformed response from {origin}: {message}")]
    #[diagnostic(code(signup::lookup::decode))]
    Decode { origin: String, message: String },

    #[error("Cannot read {path}: {source}")]
    #[diagnostic(
        code(signup::lookup::io),
        help("A reference directory needs codes.json and countries.json")
    )]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Sorted, de-duplicated dial codes such as `+33`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DialCodeList(Vec<String>);

impl DialCodeList {
    pub fn new(codes: impl IntoIterator<Item = String>) -> Self {
        let mut codes: Vec<String> = codes.into_iter().filter(|c| !c.is_empty()).collect();
        codes.sort();
        codes.dedup();
        Self(codes)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.0.binary_search_by(|c| c.as_str().cmp(code)).is_ok()
    }
}

/// One country and its cities, in service order
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CountryRecord {
    pub country: String,
    #[serde(default)]
    pub cities: Vec<String>,
}

/// Country name to city names, keeping the order the service returned
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountryCityIndex {
    records: Vec<CountryRecord>,
}

impl CountryCityIndex {
    pub fn new(records: Vec<CountryRecord>) -> Self {
        Self { records }
    }

    /// Country names for option lists
    pub fn countries(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.country.as_str())
    }

    /// Cities of `country`, or an empty slice when the country is unknown
    pub fn cities(&self, country: &str) -> &[String] {
        self.records
            .iter()
            .find(|r| r.country == country)
            .map(|r| r.cities.as_slice())
            .unwrap_or(&[])
    }

    pub fn contains(&self, country: &str) -> bool {
        self.records.iter().any(|r| r.country == country)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Reference data a flow needs, loaded once at flow start
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceData {
    pub dial_codes: DialCodeList,
    pub countries: CountryCityIndex,
}

/// Source of reference data
pub trait LookupService {
    fn fetch_dial_codes(&self) -> Result<DialCodeList, LookupError>;
    fn fetch_country_city_index(&self) -> Result<CountryCityIndex, LookupError>;
}

/// Fetch what `flow` needs: dial codes for registration, countries for profile
pub fn load_reference_data(
    flow: Flow,
    service: &dyn LookupService,
) -> Result<ReferenceData, LookupError> {
    let mut data = ReferenceData::default();
    match flow {
        Flow::Registration => data.dial_codes = service.fetch_dial_codes()?,
        Flow::Profile => data.countries = service.fetch_country_city_index()?,
    }
    debug!(
        flow = %flow,
        dial_codes = data.dial_codes.len(),
        countries = data.countries.len(),
        "reference data loaded"
    );
    Ok(data)
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct DialCodeRecord {
    #[serde(default)]
    dial_code: Option<String>,
}

fn parse_dial_codes(body: &str, origin: &str) -> Result<DialCodeList, LookupError> {
    let envelope: Envelope<DialCodeRecord> =
        serde_json::from_str(body).map_err(|e| LookupError::Decode {
            origin: origin.to_string(),
            message: e.to_string(),
        })?;
    Ok(DialCodeList::new(
        envelope.data.into_iter().filter_map(|r| r.dial_code),
    ))
}

fn parse_countries(body: &str, origin: &str) -> Result<CountryCityIndex, LookupError> {
    let envelope: Envelope<CountryRecord> =
        serde_json::from_str(body).map_err(|e| LookupError::Decode {
            origin: origin.to_string(),
            message: e.to_string(),
        })?;
    Ok(CountryCityIndex::new(envelope.data))
}

/// Lookup against the remote HTTP API
pub struct HttpLookup {
    base: String,
    client: reqwest::blocking::Client,
}

impl HttpLookup {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into().trim_end_matches('/').to_string(),
            client: reqwest::blocking::Client::new(),
        }
    }

    fn get(&self, path: &str) -> Result<(String, String), LookupError> {
        let url = format!("{}/{}", self.base, path);
        debug!(%url, "fetching reference data");
        let response = self.client.get(&url).send().map_err(|source| LookupError::Network {
            url: url.clone(),
            source,
        })?;
        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status {
                url,
                status: status.as_u16(),
            });
        }
        let body = response.text().map_err(|source| LookupError::Network {
            url: url.clone(),
            source,
        })?;
        Ok((url, body))
    }
}

impl Default for HttpLookup {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE)
    }
}

impl LookupService for HttpLookup {
    fn fetch_dial_codes(&self) -> Result<DialCodeList, LookupError> {
        let (url, body) = self.get("countries/codes")?;
        parse_dial_codes(&body, &url)
    }

    fn fetch_country_city_index(&self) -> Result<CountryCityIndex, LookupError> {
        let (url, body) = self.get("countries")?;
        parse_countries(&body, &url)
    }
}

/// Lookup from API responses saved in a local directory
pub struct FileLookup {
    dir: PathBuf,
}

impl FileLookup {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn read(&self, name: &str) -> Result<(String, String), LookupError> {
        let path = self.dir.join(name);
        debug!(path = %path.display(), "reading reference data");
        let body = std::fs::read_to_string(&path).map_err(|source| LookupError::Io {
            path: path.clone(),
            source,
        })?;
        Ok((path.display().to_string(), body))
    }
}

impl LookupService for FileLookup {
    fn fetch_dial_codes(&self) -> Result<DialCodeList, LookupError> {
        let (origin, body) = self.read(CODES_FILE)?;
        parse_dial_codes(&body, &origin)
    }

    fn fetch_country_city_index(&self) -> Result<CountryCityIndex, LookupError> {
        let (origin, body) = self.read(COUNTRIES_FILE)?;
        parse_countries(&body, &origin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const CODES: &str = r#"{"error":false,"msg":"codes","data":[
        {"name":"France","code":"FR","dial_code":"+33"},
        {"name":"Canada","code":"CA","dial_code":"+1"},
        {"name":"United States","code":"US","dial_code":"+1"},
        {"name":"Antarctica","code":"AQ"}
    ]}"#;

    const COUNTRIES: &str = r#"{"error":false,"msg":"countries","data":[
        {"iso2":"FR","iso3":"FRA","country":"France","cities":["Lyon","Paris"]},
        {"iso2":"DE","iso3":"DEU","country":"Germany","cities":["Berlin"]}
    ]}"#;

    #[test]
    fn test_dial_codes_sorted_and_deduplicated() {
        let codes = parse_dial_codes(CODES, "test").unwrap();
        assert_eq!(codes.as_slice(), &["+1".to_string(), "+33".to_string()]);
        assert!(codes.contains("+33"));
        assert!(!codes.contains("+44"));
    }

    #[test]
    fn test_country_index_lookup() {
        let index = parse_countries(COUNTRIES, "test").unwrap();
        assert_eq!(index.countries().collect::<Vec<_>>(), vec!["France", "Germany"]);
        assert_eq!(index.cities("France"), &["Lyon".to_string(), "Paris".to_string()]);
        assert!(index.cities("Atlantis").is_empty());
    }

    #[test]
    fn test_decode_error() {
        let err = parse_countries("{\"data\": 3}", "test").unwrap_err();
        assert!(matches!(err, LookupError::Decode { .. }));
    }

    #[test]
    fn test_file_lookup_per_flow() {
        let tmp = tempdir().unwrap();
        std::fs::write(tmp.path().join(CODES_FILE), CODES).unwrap();
        std::fs::write(tmp.path().join(COUNTRIES_FILE), COUNTRIES).unwrap();
        let lookup = FileLookup::new(tmp.path());

        let data = load_reference_data(Flow::Registration, &lookup).unwrap();
        assert_eq!(data.dial_codes.len(), 2);
        assert!(data.countries.is_empty());

        let data = load_reference_data(Flow::Profile, &lookup).unwrap();
        assert!(data.dial_codes.is_empty());
        assert_eq!(data.countries.len(), 2);
    }

    #[test]
    fn test_file_lookup_missing_file() {
        let tmp = tempdir().unwrap();
        let lookup = FileLookup::new(tmp.path());
        let err = lookup.fetch_dial_codes().unwrap_err();
        assert!(matches!(err, LookupError::Io { .. }));
    }

    #[test]
    fn test_http_lookup_trims_base() {
        let lookup = HttpLookup::new("https://example.test/api/");
        assert_eq!(lookup.base, "https://example.test/api");
    }
}
