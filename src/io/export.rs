//! CSV export for estimate results.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::finance::ProjectionYear;
use crate::sim::{HourRecord, MonthlyGeneration};

/// Schema v1 column header for hourly export.
pub const HOURLY_HEADER: &str = "timestep,local_time,solar_elevation_deg,ghi_w_m2,dni_w_m2,\
                                 dhi_w_m2,poa_w_m2,temp_air_c,wind_speed_m_s,cell_temp_c,\
                                 ac_real_w,ac_clear_w";

/// Schema v1 column header for monthly export.
pub const MONTHLY_HEADER: &str = "month,real_kwh";

/// Schema v1 column header for projection export.
pub const PROJECTION_HEADER: &str =
    "year,generation_kwh,tariff_per_kwh,savings,cumulative_savings";

fn to_file(path: &Path, write: impl FnOnce(io::BufWriter<File>) -> io::Result<()>) -> io::Result<()> {
    let file = File::create(path)?;
    write(io::BufWriter::new(file))
}

/// Exports hourly records to a CSV file at the given path.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_hourly_csv(hours: &[HourRecord], path: &Path) -> io::Result<()> {
    to_file(path, |w| write_hourly_csv(hours, w))
}

/// Writes hourly records as CSV to any writer.
///
/// One row per simulated hour; identical inputs give identical bytes.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_hourly_csv(hours: &[HourRecord], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(HOURLY_HEADER.split(',').map(str::trim))?;
    for h in hours {
        wtr.write_record(&[
            h.timestep.to_string(),
            h.local_time.format("%Y-%m-%dT%H:%M").to_string(),
            format!("{:.3}", h.solar_elevation_deg),
            format!("{:.2}", h.ghi_w_m2),
            format!("{:.2}", h.dni_w_m2),
            format!("{:.2}", h.dhi_w_m2),
            format!("{:.2}", h.poa_w_m2),
            format!("{:.2}", h.temp_air_c),
            format!("{:.2}", h.wind_speed_m_s),
            format!("{:.2}", h.cell_temp_c),
            format!("{:.3}", h.ac_real_w),
            format!("{:.3}", h.ac_clear_w),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Exports the monthly series to a CSV file.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_monthly_csv(months: &[MonthlyGeneration], path: &Path) -> io::Result<()> {
    to_file(path, |w| write_monthly_csv(months, w))
}

/// Writes the monthly series as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_monthly_csv(months: &[MonthlyGeneration], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(MONTHLY_HEADER.split(','))?;
    for m in months {
        wtr.write_record(&[m.month.to_string(), format!("{:.2}", m.real_kwh)])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Exports the savings projection to a CSV file.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_projection_csv(rows: &[ProjectionYear], path: &Path) -> io::Result<()> {
    to_file(path, |w| write_projection_csv(rows, w))
}

/// Writes the savings projection as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_projection_csv(rows: &[ProjectionYear], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(PROJECTION_HEADER.split(','))?;
    for p in rows {
        wtr.write_record(&[
            p.year.to_string(),
            format!("{:.2}", p.generation_kwh),
            format!("{:.4}", p.tariff_per_kwh),
            format!("{:.2}", p.savings),
            format!("{:.2}", p.cumulative_savings),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn make_hour(t: usize) -> HourRecord {
        HourRecord {
            timestep: t,
            local_time: NaiveDate::from_ymd_opt(2024, 1, 1)
                .and_then(|d| d.and_hms_opt(t as u32 % 24, 0, 0))
                .unwrap_or_default(),
            solar_elevation_deg: 30.0,
            ghi_w_m2: 600.0,
            dni_w_m2: 700.0,
            dhi_w_m2: 100.0,
            poa_w_m2: 650.0,
            temp_air_c: 25.0,
            wind_speed_m_s: 1.0,
            cell_temp_c: 43.0,
            dc_real_w: 2000.0,
            ac_real_w: 1800.0,
            ac_clear_w: 2100.0,
        }
    }

    fn lines(buf: Vec<u8>) -> Vec<String> {
        String::from_utf8(buf)
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn hourly_header_matches_schema_v1() {
        let mut buf = Vec::new();
        write_hourly_csv(&[make_hour(0)], &mut buf).ok();
        let out = lines(buf);
        assert_eq!(
            out.first().map(String::as_str),
            Some(
                "timestep,local_time,solar_elevation_deg,ghi_w_m2,dni_w_m2,dhi_w_m2,poa_w_m2,\
                 temp_air_c,wind_speed_m_s,cell_temp_c,ac_real_w,ac_clear_w"
            )
        );
        assert_eq!(out.get(1).map(|l| l.starts_with("0,2024-01-01T00:00,")), Some(true));
    }

    #[test]
    fn hourly_row_count_matches() {
        let hours: Vec<HourRecord> = (0..48).map(make_hour).collect();
        let mut buf = Vec::new();
        write_hourly_csv(&hours, &mut buf).ok();
        // 1 header + 48 data rows
        assert_eq!(lines(buf).len(), 49);
    }

    #[test]
    fn deterministic_output() {
        let hours: Vec<HourRecord> = (0..5).map(make_hour).collect();
        let mut buf1 = Vec::new();
        let mut buf2 = Vec::new();
        write_hourly_csv(&hours, &mut buf1).ok();
        write_hourly_csv(&hours, &mut buf2).ok();
        assert_eq!(buf1, buf2);
    }

    #[test]
    fn monthly_rows_parse_back() {
        let months: Vec<MonthlyGeneration> = (1..=12)
            .map(|month| MonthlyGeneration {
                month,
                real_kwh: f64::from(month) * 10.0,
            })
            .collect();
        let mut buf = Vec::new();
        write_monthly_csv(&months, &mut buf).ok();

        let mut rdr = csv::ReaderBuilder::new().from_reader(buf.as_slice());
        let headers = rdr.headers().cloned().ok();
        assert_eq!(headers.as_ref().map(csv::StringRecord::len), Some(2));
        let values: Vec<f64> = rdr
            .records()
            .filter_map(Result::ok)
            .filter_map(|r| r.get(1).and_then(|v| v.parse().ok()))
            .collect();
        assert_eq!(values.len(), 12);
        assert_eq!(values[11], 120.0);
    }

    #[test]
    fn projection_header_and_rows() {
        let rows = vec![
            ProjectionYear {
                year: 1,
                generation_kwh: 5000.0,
                tariff_per_kwh: 8.0,
                savings: 35_200.0,
                cumulative_savings: 35_200.0,
            },
            ProjectionYear {
                year: 2,
                generation_kwh: 4975.0,
                tariff_per_kwh: 8.4,
                savings: 36_777.0,
                cumulative_savings: 71_977.0,
            },
        ];
        let mut buf = Vec::new();
        write_projection_csv(&rows, &mut buf).ok();
        let out = lines(buf);
        assert_eq!(out[0], PROJECTION_HEADER);
        assert_eq!(out[2], "2,4975.00,8.4000,36777.00,71977.00");
    }
}
