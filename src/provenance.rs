//! Source-file provenance
//!
//! Extract file names follow `<entity>_<YYYYMMDD>_<HHMMSS>.csv`. The date and
//! clock tokens become the `source_file_date` and `source_file_datetime`
//! columns stamped onto every row read from that file.
//!
//! Provenance is best-effort: names that do not follow the convention, and
//! listings that fail, degrade to absent values and never raise.

use crate::batch::{Batch, Cell};
use crate::storage::{ObjectLister, CSV_SUFFIX};
use chrono::{NaiveDate, NaiveDateTime};
use tracing::{debug, info, warn};

/// Column holding the source file name
pub const SOURCE_FILE_NAME: &str = "source_file_name";

/// Column holding the date token of the file name
pub const SOURCE_FILE_DATE: &str = "source_file_date";

/// Column holding the date and clock tokens of the file name
pub const SOURCE_FILE_DATETIME: &str = "source_file_datetime";

/// Provenance columns, in stamping order
pub const PROVENANCE_COLUMNS: [&str; 3] = [SOURCE_FILE_NAME, SOURCE_FILE_DATE, SOURCE_FILE_DATETIME];

const DATE_TOKEN_FORMAT: &str = "%Y%m%d";

/// Layouts of the concatenated date and clock tokens, tried in order
const DATETIME_TOKEN_FORMATS: &[&str] = &["%Y%m%d%H%M%S", "%Y%m%d%H%M"];

/// File name, date and date-time of one source extract
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProvenanceTriple {
    /// Last path segment of the source object
    pub file_name: Option<String>,
    /// Date token of the file name
    pub file_date: Option<NaiveDate>,
    /// Date and clock tokens of the file name
    pub file_datetime: Option<NaiveDateTime>,
}

impl ProvenanceTriple {
    /// The all-absent triple
    pub fn absent() -> Self {
        Self::default()
    }

    /// Whether every component is absent
    pub fn is_absent(&self) -> bool {
        self.file_name.is_none() && self.file_date.is_none() && self.file_datetime.is_none()
    }

    /// Stamp the three provenance columns onto every row of `batch`
    ///
    /// Existing provenance columns are replaced in place.
    pub fn stamp(&self, batch: Batch) -> Batch {
        batch
            .with_constant(SOURCE_FILE_NAME, &Cell::from(self.file_name.clone()))
            .with_constant(SOURCE_FILE_DATE, &Cell::from(self.file_date))
            .with_constant(SOURCE_FILE_DATETIME, &Cell::from(self.file_datetime))
    }
}

/// Derive provenance from a source file name
///
/// Returns the all-absent triple when the name has fewer than two `_`
/// separated tokens or the tokens are not a date and a clock time.
pub fn resolve(file_name: &str) -> ProvenanceTriple {
    let stem = file_name.split(CSV_SUFFIX).next().unwrap_or(file_name);
    let tokens: Vec<&str> = stem.split('_').collect();
    if tokens.len() < 2 {
        debug!("File name '{}' has no date tokens", file_name);
        return ProvenanceTriple::absent();
    }

    let date_token = tokens[tokens.len() - 2];
    let datetime_token = format!("{date_token}{}", tokens[tokens.len() - 1]);
    info!("source_file_date_str={}", date_token);
    info!("source_file_date_time_str={}", datetime_token);

    let file_date = NaiveDate::parse_from_str(date_token, DATE_TOKEN_FORMAT).ok();
    let file_datetime = DATETIME_TOKEN_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(&datetime_token, fmt).ok());

    match (file_date, file_datetime) {
        (Some(date), Some(datetime)) => ProvenanceTriple {
            file_name: Some(file_name.to_string()),
            file_date: Some(date),
            file_datetime: Some(datetime),
        },
        _ => {
            debug!("File name '{}' does not carry a parsable date", file_name);
            ProvenanceTriple::absent()
        }
    }
}

/// Last path segment of the first object under `prefix`
///
/// `None` when nothing is listed or the listing fails.
pub async fn resolve_file_name(lister: &dyn ObjectLister, prefix: &str) -> Option<String> {
    match lister.list_objects(prefix).await {
        Ok(keys) => keys
            .first()
            .and_then(|key| key.rsplit('/').next())
            .filter(|name| !name.is_empty())
            .map(str::to_string),
        Err(e) => {
            warn!("Could not list {} for provenance: {}", prefix, e);
            None
        }
    }
}

/// Resolve the provenance of the extract under `prefix`
pub async fn resolve_source(lister: &dyn ObjectLister, prefix: &str) -> ProvenanceTriple {
    let Some(file_name) = resolve_file_name(lister, prefix).await else {
        return ProvenanceTriple::absent();
    };
    info!("hr_data_csv_file_name={}", file_name);
    resolve(&file_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::Column;
    use crate::error::{Error, Result};
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    struct FixedLister(Result<Vec<String>>);

    #[async_trait]
    impl ObjectLister for FixedLister {
        async fn list_objects(&self, _prefix: &str) -> Result<Vec<String>> {
            match &self.0 {
                Ok(keys) => Ok(keys.clone()),
                Err(e) => Err(Error::storage_read("s3://bucket", e.to_string())),
            }
        }
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_resolve_well_formed_name() {
        let triple = resolve("employees_20240115_093000.csv");
        assert_eq!(
            triple,
            ProvenanceTriple {
                file_name: Some("employees_20240115_093000.csv".to_string()),
                file_date: Some(ymd(2024, 1, 15)),
                file_datetime: ymd(2024, 1, 15).and_hms_opt(9, 30, 0),
            }
        );
    }

    #[test]
    fn test_resolve_entity_with_underscores() {
        let triple = resolve("user_point_transactions_20231231_2359.csv");
        assert_eq!(triple.file_date, Some(ymd(2023, 12, 31)));
        assert_eq!(triple.file_datetime, ymd(2023, 12, 31).and_hms_opt(23, 59, 0));
    }

    #[test_case("report.csv" ; "no underscore")]
    #[test_case("employees_latest.csv" ; "no date token")]
    #[test_case("employees_20241345_093000.csv" ; "invalid month")]
    #[test_case("employees_20240115_x.csv" ; "invalid clock token")]
    #[test_case("" ; "empty name")]
    fn test_resolve_malformed_is_absent(name: &str) {
        assert!(resolve(name).is_absent());
    }

    #[test]
    fn test_resolve_is_idempotent() {
        assert_eq!(
            resolve("jobs_20240301_120000.csv"),
            resolve("jobs_20240301_120000.csv")
        );
    }

    #[test]
    fn test_stamp_repeats_values() {
        let batch = Batch::from_columns(vec![Column::new("id", vec![Cell::Int(1), Cell::Int(2)])])
            .unwrap();
        let stamped = resolve("regions_20240115_093000.csv").stamp(batch);

        assert_eq!(
            stamped.column_names(),
            vec!["id", SOURCE_FILE_NAME, SOURCE_FILE_DATE, SOURCE_FILE_DATETIME]
        );
        assert_eq!(stamped.cell(SOURCE_FILE_DATE, 1), Some(&Cell::Date(ymd(2024, 1, 15))));
        assert_eq!(
            stamped.cell(SOURCE_FILE_NAME, 0),
            Some(&Cell::str("regions_20240115_093000.csv"))
        );
    }

    #[test]
    fn test_stamp_absent_is_null() {
        let batch = Batch::from_columns(vec![Column::new("id", vec![Cell::Int(1)])]).unwrap();
        let stamped = ProvenanceTriple::absent().stamp(batch);
        for column in PROVENANCE_COLUMNS {
            assert_eq!(stamped.cell(column, 0), Some(&Cell::Null));
        }
    }

    #[tokio::test]
    async fn test_resolve_file_name_first_key() {
        let lister = FixedLister(Ok(vec![
            "raw/employees/p1/employees_20240115_093000.csv".to_string(),
            "raw/employees/p1/employees_20240116_093000.csv".to_string(),
        ]));
        assert_eq!(
            resolve_file_name(&lister, "raw/employees/p1").await,
            Some("employees_20240115_093000.csv".to_string())
        );
    }

    #[tokio::test]
    async fn test_resolve_file_name_empty_or_failed() {
        assert_eq!(resolve_file_name(&FixedLister(Ok(vec![])), "p").await, None);
        assert_eq!(
            resolve_file_name(&FixedLister(Err(Error::config("down"))), "p").await,
            None
        );
    }

    #[tokio::test]
    async fn test_resolve_source() {
        let lister = FixedLister(Ok(vec!["raw/jobs/p1/jobs_20240301_120000.csv".to_string()]));
        let triple = resolve_source(&lister, "raw/jobs/p1").await;
        assert_eq!(triple.file_datetime, ymd(2024, 3, 1).and_hms_opt(12, 0, 0));

        assert!(resolve_source(&FixedLister(Ok(vec![])), "p").await.is_absent());
    }
}
