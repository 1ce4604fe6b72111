use crate::config::{ColumnConfig, RunConfig};
use crate::model::ListingRecord;
use crate::stats::{AgeStats, PriceStats, Summary};
use anyhow::{Context, Result, bail};
use chrono::Local;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

const BOM: &str = "\u{feff}";
const SUMMARY_FILE: &str = "summary.txt";

#[derive(Debug, Clone)]
pub struct PersistOptions {
    pub out_dir: PathBuf,
    pub file_name: Option<String>,
    pub file_prefix: String,
    pub columns: ColumnConfig,
    pub free_marker: String,
    pub currency: String,
    pub extended_stats: bool,
}

impl PersistOptions {
    pub fn from_config(config: &RunConfig) -> Self {
        Self {
            out_dir: config.output.dir.clone(),
            file_name: config.output.file_name.clone(),
            file_prefix: config.output.file_prefix.clone(),
            columns: config.columns.clone(),
            free_marker: config.output.free_marker.clone(),
            currency: config.output.currency.clone(),
            extended_stats: config.output.extended_stats,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PersistReport {
    pub data_file: PathBuf,
    pub summary_file: PathBuf,
    pub analysis_files: Vec<PathBuf>,
}

pub fn prepare_output_dir(dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory {}", dir.display()))?;
    Ok(dir.to_path_buf())
}

pub fn persist(records: &[ListingRecord], options: &PersistOptions) {
    if let Err(err) = try_persist(records, options) {
        let message = format!("{err:#}");
        error!(error = %message, "error saving data");
    }
}

pub fn try_persist(
    records: &[ListingRecord],
    options: &PersistOptions,
) -> Result<Option<PersistReport>> {
    if records.is_empty() {
        warn!("no listing data to save");
        return Ok(None);
    }

    let out_dir = prepare_output_dir(&options.out_dir)?;
    let timestamp = Local::now().format("%Y%m%d_%H%M%S").to_string();

    let file_name = options
        .file_name
        .clone()
        .unwrap_or_else(|| format!("{}_{timestamp}.csv", options.file_prefix));
    let data_file = out_dir.join(file_name);
    write_listings_csv(&data_file, records, &options.columns)?;
    info!(path = %data_file.display(), rows = records.len(), "data saved");

    let summary = Summary::compute(records, &options.free_marker);
    let summary_file = out_dir.join(SUMMARY_FILE);
    write_bom_text(&summary_file, &summary.render(&options.currency))?;
    info!(path = %summary_file.display(), "summary saved");

    let analysis_files = if options.extended_stats {
        let files = write_analysis_files(&out_dir, records, &timestamp)?;
        info!(dir = %out_dir.display(), files = files.len(), "analysis data saved");
        files
    } else {
        Vec::new()
    };

    Ok(Some(PersistReport {
        data_file,
        summary_file,
        analysis_files,
    }))
}

pub fn write_listings_csv(
    path: &Path,
    records: &[ListingRecord],
    columns: &ColumnConfig,
) -> Result<()> {
    let mut writer = bom_csv_writer(path)?;
    writer.write_record(columns.header_row())?;
    for record in records {
        writer.write_record(record.values())?;
    }
    writer
        .flush()
        .with_context(|| format!("failed to flush {}", path.display()))?;
    Ok(())
}

pub fn read_listings_csv(path: &Path) -> Result<Vec<ListingRecord>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let text = text.strip_prefix(BOM).unwrap_or(&text);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(text.as_bytes());

    let mut records = Vec::new();
    for (index, row) in reader.records().enumerate() {
        let row = row
            .with_context(|| format!("malformed row {} in {}", index + 1, path.display()))?;
        if row.len() != 5 {
            bail!(
                "row {} in {} has {} columns, expected 5",
                index + 1,
                path.display(),
                row.len()
            );
        }
        records.push(ListingRecord {
            title: row[0].to_string(),
            organizer: row[1].to_string(),
            age_group: row[2].to_string(),
            price: row[3].to_string(),
            link: row[4].to_string(),
        });
    }
    Ok(records)
}

fn write_analysis_files(
    out_dir: &Path,
    records: &[ListingRecord],
    timestamp: &str,
) -> Result<Vec<PathBuf>> {
    let prices = PriceStats::compute(records);
    let ages = AgeStats::compute(records);

    let price_path = out_dir.join(format!("price_analysis_{timestamp}.csv"));
    let mut writer = bom_csv_writer(&price_path)?;
    writer.write_record(["Metric", "Value (EUR)"])?;
    let price_rows = [
        ("Mean Price", prices.mean),
        ("Median Price", prices.median),
        ("Standard Deviation", prices.std_dev),
        ("First Quartile (25%)", prices.quartiles[0]),
        ("Second Quartile (50%)", prices.quartiles[1]),
        ("Third Quartile (75%)", prices.quartiles[2]),
    ];
    for (metric, value) in price_rows {
        writer.write_record([metric.to_string(), value.to_string()])?;
    }
    writer.flush()?;

    let outliers_path = out_dir.join(format!("price_outliers_{timestamp}.csv"));
    let mut writer = bom_csv_writer(&outliers_path)?;
    writer.write_record(["Outlier Prices (EUR)"])?;
    for value in &prices.outliers {
        writer.write_record([value.to_string()])?;
    }
    writer.flush()?;

    let age_path = out_dir.join(format!("age_analysis_{timestamp}.csv"));
    let mut writer = bom_csv_writer(&age_path)?;
    writer.write_record(["Metric", "Value (Years)"])?;
    writer.write_record(["Mean Age".to_string(), ages.mean.to_string()])?;
    writer.write_record(["Minimum Age".to_string(), ages.min.to_string()])?;
    writer.write_record(["Maximum Age".to_string(), ages.max.to_string()])?;
    writer.write_record(["Most Common Age".to_string(), ages.most_common.to_string()])?;
    writer.flush()?;

    Ok(vec![price_path, outliers_path, age_path])
}

fn bom_csv_writer(path: &Path) -> Result<csv::Writer<File>> {
    let mut file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    file.write_all(BOM.as_bytes())
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(csv::Writer::from_writer(file))
}

fn write_bom_text(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, format!("{BOM}{content}"))
        .with_context(|| format!("failed to write {}", path.display()))
}
