use crate::error::DashboardError;
use crate::state::DashboardState;
use analytics::{WindowParams, WindowedView};
use csv::WriterBuilder;
use core_types::FEATURE_WINDOW;
use data_source::codec::{engineered_cells, engineered_header, format_opt, VOLATILITY_7D};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub const RUNNING_MAX: &str = "Running Max";
pub const DRAWDOWN: &str = "Drawdown";

/// `{tickers joined by '_'}_{start}_{end}.csv`, dates in ISO format.
pub fn export_file_name(state: &DashboardState) -> String {
    format!(
        "{}_{}_{}.csv",
        state.tickers.join("_"),
        state.start.format("%Y-%m-%d"),
        state.end.format("%Y-%m-%d")
    )
}

/// Position of the static volatility column when the dynamic window has the same
/// name and takes its place.
fn shared_volatility_column(params: WindowParams) -> Option<usize> {
    if params.vol_window() != FEATURE_WINDOW {
        return None;
    }
    engineered_header().iter().position(|c| *c == VOLATILITY_7D)
}

/// The engineered columns followed by the window-dependent ones.
///
/// A volatility window of `FEATURE_WINDOW` days would repeat the `7d volatility`
/// header, so its values fill that column instead of adding a second one.
pub fn export_header(params: WindowParams) -> Vec<String> {
    let mut header: Vec<String> = engineered_header().into_iter().map(String::from).collect();
    header.push(format!("{}d MA", params.ma_window()));
    if shared_volatility_column(params).is_none() {
        header.push(format!("{}d volatility", params.vol_window()));
    }
    header.push(RUNNING_MAX.to_string());
    header.push(DRAWDOWN.to_string());
    header
}

/// Writes the windowed view in date order; undefined cells are left empty.
pub fn write_export<W: Write>(view: &WindowedView, writer: W) -> Result<(), DashboardError> {
    let shared = shared_volatility_column(view.params);

    let mut writer = WriterBuilder::new().from_writer(writer);
    writer.write_record(export_header(view.params))?;

    for row in &view.rows {
        let mut cells = engineered_cells(&row.record);
        cells.push(format_opt(row.dynamic_ma));
        match shared {
            Some(column) => cells[column] = format_opt(row.dynamic_volatility),
            None => cells.push(format_opt(row.dynamic_volatility)),
        }
        cells.push(format_opt(row.running_max));
        cells.push(format_opt(row.drawdown));
        writer.write_record(&cells)?;
    }

    writer.flush()?;
    Ok(())
}

/// Writes the export under its deterministic name in `dir` and returns the path.
pub fn export_to_dir(view: &WindowedView, state: &DashboardState, dir: &Path) -> Result<PathBuf, DashboardError> {
    let path = dir.join(export_file_name(state));
    let file = File::create(&path)?;
    write_export(view, BufWriter::new(file))?;

    tracing::info!(path = %path.display(), rows = view.rows.len(), "Exported filtered view.");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::Dashboard;
    use chrono::{Datelike, NaiveDate};
    use data_source::{load_upload, EngineeredTable};
    use features::FeatureEngine;

    fn state() -> DashboardState {
        DashboardState {
            tickers: vec!["BTC".to_string(), "ETH".to_string()],
            start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            ma_window: 30,
            vol_window: 14,
        }
    }

    fn view() -> WindowedView {
        let csv = "\
Date,Ticker,Open,High,Low,Close
2024-01-02,ETH,10,12,9,8
2024-01-01,BTC,100,110,90,100
2024-01-01,ETH,10,12,9,10
";
        let table = EngineeredTable::build(load_upload(csv.as_bytes()).unwrap(), &FeatureEngine::new());
        Dashboard::new(10).window(&table, &state()).unwrap()
    }

    #[test]
    fn file_name_joins_tickers_and_dates() {
        assert_eq!(export_file_name(&state()), "BTC_ETH_2024-01-01_2024-01-31.csv");
    }

    #[test]
    fn header_names_the_dynamic_windows() {
        let header = export_header(WindowParams::new(30, 14).unwrap());
        assert_eq!(header.len(), 16);
        assert_eq!(header[0], "Date");
        assert_eq!(header[11], "7d volatility");
        assert_eq!(&header[12..], ["30d MA", "14d volatility", "Running Max", "Drawdown"]);
    }

    #[test]
    fn writes_rows_in_date_order_with_empty_undefined_cells() {
        let dir = tempfile::tempdir().unwrap();
        let path = export_to_dir(&view(), &state(), dir.path()).unwrap();
        assert!(path.ends_with("BTC_ETH_2024-01-01_2024-01-31.csv"));

        let written = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = written.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[1].starts_with("2024-01-01,BTC,100,110,90,100,,,20,100,,,,,100,0"));
        assert!(lines[2].starts_with("2024-01-01,ETH,"));
        assert!(lines[3].starts_with("2024-01-02,ETH,10,12,9,8,-2,-20,"));
        assert!(lines[3].ends_with(",10,-20"));
    }

    #[test]
    fn seven_day_volatility_window_fills_the_existing_column() {
        let header = export_header(WindowParams::new(30, 7).unwrap());
        assert_eq!(header.len(), 15);
        assert_eq!(header.iter().filter(|c| *c == "7d volatility").count(), 1);
        assert_eq!(&header[12..], ["30d MA", "Running Max", "Drawdown"]);

        let mut csv = String::from("Date,Ticker,Open,High,Low,Close\n");
        for day in 1..=10 {
            let close = 100 + (day % 3) * 4;
            csv.push_str(&format!("2024-01-{day:02},BTC,{close},{close},{close},{close}\n"));
        }
        let table = EngineeredTable::build(load_upload(csv.as_bytes()).unwrap(), &FeatureEngine::new());
        let day_8 = table.records.iter().find(|r| r.date().day() == 8).unwrap();
        assert!(day_8.features.volatility_7d.is_some());

        // Starting the view on day 3 restarts the dynamic window.
        let state = DashboardState {
            tickers: vec!["BTC".to_string()],
            start: NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            ma_window: 30,
            vol_window: 7,
        };
        let view = Dashboard::new(10).window(&table, &state).unwrap();

        let mut out = Vec::new();
        write_export(&view, &mut out).unwrap();
        let written = String::from_utf8(out).unwrap();
        let rows: Vec<Vec<&str>> = written.lines().skip(1).map(|l| l.split(',').collect()).collect();

        assert_eq!(rows.len(), 8);
        assert!(rows.iter().all(|r| r.len() == 15));
        // Day 8 has a static value but only five returns inside the view.
        assert_eq!(rows[5][0], "2024-01-08");
        assert_eq!(rows[5][11], "");
        assert_eq!(rows[7][0], "2024-01-10");
        assert_ne!(rows[7][11], "");
    }
}
