//! CSV encoding of daily and engineered records.
//!
//! Columns are matched by header name, so their order in a file is free and extra
//! columns are ignored. The `Daily change` header marks a pre-featured file.

use crate::error::DataSourceError;
use chrono::{NaiveDate, NaiveDateTime};
use core_types::{DailyRecord, Dataset, EngineeredRecord, Features};
use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};
use rust_decimal::Decimal;
use std::collections::HashSet;
use std::io::{Read, Write};
use std::str::FromStr;

pub const DATE: &str = "Date";
pub const TICKER: &str = "Ticker";
pub const OPEN: &str = "Open";
pub const HIGH: &str = "High";
pub const LOW: &str = "Low";
pub const CLOSE: &str = "Close";

pub const DAILY_CHANGE: &str = "Daily change";
pub const DAILY_PCT_CHANGE: &str = "Daily % change";
pub const PRICE_RANGE: &str = "Price range";
pub const AVERAGE_PRICE: &str = "Average price";
pub const MA_7D: &str = "7d ma";
pub const VOLATILITY_7D: &str = "7d volatility";

/// Columns every dataset must provide.
pub const REQUIRED_COLUMNS: [&str; 6] = [TICKER, DATE, OPEN, HIGH, LOW, CLOSE];

/// The derived columns of a pre-featured dataset, in file order.
pub const FEATURE_COLUMNS: [&str; 6] = [
    DAILY_CHANGE,
    DAILY_PCT_CHANGE,
    PRICE_RANGE,
    AVERAGE_PRICE,
    MA_7D,
    VOLATILITY_7D,
];

/// The presence of this column means the derived features are already in the file.
pub const FEATURE_MARKER: &str = DAILY_CHANGE;

/// Header of an engineered-table file: `Date, Ticker, Open, High, Low, Close` and
/// the six feature columns.
pub fn engineered_header() -> Vec<&'static str> {
    let mut header = vec![DATE, TICKER, OPEN, HIGH, LOW, CLOSE];
    header.extend(FEATURE_COLUMNS);
    header
}

/// Parses a dataset from any CSV source.
///
/// Fails with `SchemaError` when a required column is absent. The dataset is
/// returned as `Featured` when the feature marker column is present.
pub fn read_dataset<R: Read>(reader: R) -> Result<Dataset, DataSourceError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let layout = Layout::from_headers(&headers)?;

    let mut seen = HashSet::new();
    let mut raw = Vec::new();
    let mut featured = Vec::new();

    for (i, result) in reader.records().enumerate() {
        // Row numbers are 1-based and count the header line.
        let row = i + 2;
        let record = result?;
        let daily = layout.daily(&record, row)?;

        if !seen.insert((daily.ticker.clone(), daily.date)) {
            return Err(DataSourceError::DuplicateRecord {
                ticker: daily.ticker,
                date: daily.date,
            });
        }

        match &layout.features {
            Some(columns) => featured.push(EngineeredRecord {
                daily,
                features: columns.parse(&record, row)?,
            }),
            None => raw.push(daily),
        }
    }

    if layout.features.is_some() {
        tracing::debug!(rows = featured.len(), "Parsed pre-featured dataset.");
        Ok(Dataset::Featured(featured))
    } else {
        tracing::debug!(rows = raw.len(), "Parsed raw dataset.");
        Ok(Dataset::Raw(raw))
    }
}

/// Writes engineered records under [`engineered_header`].
pub fn write_engineered<W: Write>(
    records: &[EngineeredRecord],
    writer: W,
) -> Result<(), DataSourceError> {
    let mut writer = WriterBuilder::new().from_writer(writer);
    writer.write_record(engineered_header())?;
    for record in records {
        writer.write_record(engineered_cells(record))?;
    }
    writer.flush()?;
    Ok(())
}

/// The cells of one engineered record, in [`engineered_header`] order.
/// Undefined values are written as empty cells.
pub fn engineered_cells(record: &EngineeredRecord) -> Vec<String> {
    let daily = &record.daily;
    let features = &record.features;
    vec![
        daily.date.format("%Y-%m-%d").to_string(),
        daily.ticker.clone(),
        format_decimal(daily.open),
        format_decimal(daily.high),
        format_decimal(daily.low),
        format_decimal(daily.close),
        format_opt(features.daily_change),
        format_opt(features.daily_pct_change),
        format_opt(features.price_range),
        format_opt(features.average_price),
        format_opt(features.ma_7d),
        format_opt(features.volatility_7d),
    ]
}

pub fn format_decimal(value: Decimal) -> String {
    value.normalize().to_string()
}

pub fn format_opt(value: Option<Decimal>) -> String {
    value.map(format_decimal).unwrap_or_default()
}

/// Column positions resolved from a header row.
struct Layout {
    ticker: usize,
    date: usize,
    open: usize,
    high: usize,
    low: usize,
    close: usize,
    features: Option<FeatureLayout>,
}

/// Positions of the optional feature columns; an absent column reads as `None`.
struct FeatureLayout {
    columns: [Option<usize>; 6],
}

impl Layout {
    fn from_headers(headers: &StringRecord) -> Result<Self, DataSourceError> {
        let position = |name: &str| headers.iter().position(|h| h == name);

        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|&&c| position(c).is_none())
            .map(|c| c.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(DataSourceError::SchemaError { missing });
        }

        let required = |name: &str| position(name).ok_or_else(|| DataSourceError::SchemaError {
            missing: vec![name.to_string()],
        });

        let features = position(FEATURE_MARKER).map(|_| FeatureLayout {
            columns: FEATURE_COLUMNS.map(position),
        });

        Ok(Self {
            ticker: required(TICKER)?,
            date: required(DATE)?,
            open: required(OPEN)?,
            high: required(HIGH)?,
            low: required(LOW)?,
            close: required(CLOSE)?,
            features,
        })
    }

    fn daily(&self, record: &StringRecord, row: usize) -> Result<DailyRecord, DataSourceError> {
        let date_cell = cell(record, self.date);
        let date = parse_date(date_cell).ok_or_else(|| parse_error(row, DATE, date_cell))?;

        DailyRecord::new(
            cell(record, self.ticker),
            date,
            required_decimal(record, self.open, OPEN, row)?,
            required_decimal(record, self.high, HIGH, row)?,
            required_decimal(record, self.low, LOW, row)?,
            required_decimal(record, self.close, CLOSE, row)?,
        )
        .map_err(|source| DataSourceError::InvalidRecord { row, source })
    }
}

impl FeatureLayout {
    fn parse(&self, record: &StringRecord, row: usize) -> Result<Features, DataSourceError> {
        let mut values = [None; 6];
        for (slot, (index, name)) in values
            .iter_mut()
            .zip(self.columns.iter().zip(FEATURE_COLUMNS))
        {
            if let Some(index) = index {
                *slot = optional_decimal(record, *index, name, row)?;
            }
        }

        let [daily_change, daily_pct_change, price_range, average_price, ma_7d, volatility_7d] =
            values;
        Ok(Features {
            daily_change,
            daily_pct_change,
            price_range,
            average_price,
            ma_7d,
            volatility_7d,
        })
    }
}

fn cell(record: &StringRecord, index: usize) -> &str {
    record.get(index).unwrap_or("")
}

fn parse_error(row: usize, column: &str, value: &str) -> DataSourceError {
    DataSourceError::Parse {
        row,
        column: column.to_string(),
        value: value.to_string(),
    }
}

fn required_decimal(
    record: &StringRecord,
    index: usize,
    column: &str,
    row: usize,
) -> Result<Decimal, DataSourceError> {
    let value = cell(record, index);
    optional_decimal(record, index, column, row)?.ok_or_else(|| parse_error(row, column, value))
}

/// Empty and NaN cells are "no value"; anything else must be a number.
fn optional_decimal(
    record: &StringRecord,
    index: usize,
    column: &str,
    row: usize,
) -> Result<Option<Decimal>, DataSourceError> {
    let value = cell(record, index);
    if value.is_empty() || value.eq_ignore_ascii_case("nan") {
        return Ok(None);
    }

    Decimal::from_str(value)
        .or_else(|_| Decimal::from_scientific(value))
        .map(Some)
        .map_err(|_| parse_error(row, column, value))
}

/// Accepts plain dates and date-times; the time of day is discarded.
fn parse_date(value: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }

    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|dt| dt.date())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const RAW: &str = "\
Date,Ticker,Open,High,Low,Close,Volume
2024-01-02,ETH,10,12,9,11,500
2024-01-01,BTC,100,110,95,105.5,42
";

    #[test]
    fn parses_raw_dataset_in_file_order() {
        let dataset = read_dataset(RAW.as_bytes()).unwrap();
        let Dataset::Raw(records) = dataset else {
            panic!("expected a raw dataset");
        };

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].ticker, "ETH");
        assert_eq!(records[1].close, dec!(105.5));
        assert_eq!(records[1].date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    }

    #[test]
    fn column_order_is_free() {
        let csv = "Close,Low,High,Open,Ticker,Date\n2,1,3,2,SOL,2024-03-01 00:00:00\n";
        let Dataset::Raw(records) = read_dataset(csv.as_bytes()).unwrap() else {
            panic!("expected a raw dataset");
        };

        assert_eq!(records[0].ticker, "SOL");
        assert_eq!(records[0].high, dec!(3));
        assert_eq!(records[0].date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    }

    #[test]
    fn reports_every_missing_required_column() {
        let err = read_dataset("Date,Ticker,Open\n".as_bytes()).unwrap_err();
        match err {
            DataSourceError::SchemaError { missing } => {
                assert_eq!(missing, vec!["High", "Low", "Close"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn detects_pre_featured_files() {
        let csv = "\
Date,Ticker,Open,High,Low,Close,Daily change,Daily % change,7d ma
2024-01-01,BTC,1,1,1,1,,,
2024-01-02,BTC,1,1,1,2,1,100,NaN
";
        let Dataset::Featured(records) = read_dataset(csv.as_bytes()).unwrap() else {
            panic!("expected a featured dataset");
        };

        assert_eq!(records[0].features.daily_change, None);
        assert_eq!(records[1].features.daily_change, Some(dec!(1)));
        assert_eq!(records[1].features.daily_pct_change, Some(dec!(100)));
        assert_eq!(records[1].features.ma_7d, None);
        // Absent feature columns read as no value.
        assert_eq!(records[1].features.price_range, None);
    }

    #[test]
    fn rejects_unparseable_cells() {
        let csv = "Date,Ticker,Open,High,Low,Close\n2024-01-01,BTC,1,abc,1,1\n";
        match read_dataset(csv.as_bytes()).unwrap_err() {
            DataSourceError::Parse { row, column, value } => {
                assert_eq!(row, 2);
                assert_eq!(column, "High");
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected error: {other}"),
        }

        let csv = "Date,Ticker,Open,High,Low,Close\nyesterday,BTC,1,1,1,1\n";
        assert!(matches!(
            read_dataset(csv.as_bytes()),
            Err(DataSourceError::Parse { .. })
        ));
    }

    #[test]
    fn empty_required_price_is_an_error() {
        let csv = "Date,Ticker,Open,High,Low,Close\n2024-01-01,BTC,1,1,1,\n";
        assert!(matches!(
            read_dataset(csv.as_bytes()),
            Err(DataSourceError::Parse { .. })
        ));
    }

    #[test]
    fn rejects_duplicate_ticker_dates() {
        let csv = "Date,Ticker,Open,High,Low,Close\n2024-01-01,BTC,1,1,1,1\n2024-01-01,BTC,2,2,2,2\n";
        assert!(matches!(
            read_dataset(csv.as_bytes()),
            Err(DataSourceError::DuplicateRecord { .. })
        ));
    }

    #[test]
    fn rejects_blank_tickers() {
        let csv = "Date,Ticker,Open,High,Low,Close\n2024-01-01,,1,1,1,1\n";
        assert!(matches!(
            read_dataset(csv.as_bytes()),
            Err(DataSourceError::InvalidRecord { row: 2, .. })
        ));
    }

    #[test]
    fn written_tables_read_back_as_featured() {
        let record = EngineeredRecord {
            daily: DailyRecord::new(
                "BTC",
                NaiveDate::from_ymd_opt(2024, 1, 8).unwrap(),
                dec!(1.5000),
                dec!(2),
                dec!(1),
                dec!(1.25),
            )
            .unwrap(),
            features: Features {
                daily_change: Some(dec!(0.25)),
                ma_7d: Some(dec!(1.1234)),
                ..Features::default()
            },
        };

        let mut buffer = Vec::new();
        write_engineered(std::slice::from_ref(&record), &mut buffer).unwrap();
        let text = String::from_utf8(buffer.clone()).unwrap();
        assert!(text.starts_with("Date,Ticker,Open,High,Low,Close,Daily change"));
        assert!(text.contains("2024-01-08,BTC,1.5,2,1,1.25,0.25,,,,1.1234,"));

        let Dataset::Featured(back) = read_dataset(buffer.as_slice()).unwrap() else {
            panic!("expected a featured dataset");
        };
        assert_eq!(back, vec![record]);
    }
}
