use anyhow::{anyhow, Context, Result};
use chrono::{Local, NaiveDate};
use clap::Parser;
use freedays::{
    calendar::{compute_available, holidays_for_window, SchoolYearWindow},
    config::ScheduleConfig,
    extract::{extract_rows, is_range_column, resolve_columns},
    report,
    table::{load_table, Table},
};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

/// Find the school-year weekdays still free for the recurring
/// professional-development meeting, from contributed travel/leave
/// spreadsheets.
#[derive(Parser, Debug)]
#[command(name = "freedays", version)]
struct Args {
    /// Directory containing the contributed .xlsx/.csv files
    #[arg(long)]
    input: PathBuf,

    /// Schedule config (vacations, exclusions, manual column choice).
    /// Defaults to <input>/freedays.yaml when present.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output directory for the report files
    #[arg(long, default_value = "out")]
    out: PathBuf,
}

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();
    info!("startup");

    let args = Args::parse();

    // ─── 2) load config ──────────────────────────────────────────────
    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| args.input.join("freedays.yaml"));
    let config = ScheduleConfig::load_or_default(&config_path)?;
    if let Some(school) = &config.school {
        info!(%school, "processing");
    }

    // ─── 3) discover and load the contributed tables ─────────────────
    let tables = load_input_tables(&args.input)?;
    if tables.is_empty() {
        return Err(anyhow!(
            "no readable .xlsx/.csv files under {:?}",
            args.input
        ));
    }
    info!(count = tables.len(), "tables loaded");

    // ─── 4) classify columns and extract occupied dates ──────────────
    let mut occupied: BTreeSet<NaiveDate> = BTreeSet::new();
    let mut success_count = 0usize;
    let mut failure_count = 0usize;
    let mut failure_examples: Vec<String> = Vec::new();
    let mut column_hits: BTreeMap<String, usize> = BTreeMap::new();

    for table in &tables {
        let columns = resolve_columns(table, config.date_columns.as_deref())
            .with_context(|| format!("selecting date columns for {}", table.name))?;
        info!(table = %table.name, ?columns, "date columns selected");

        let outcome = extract_rows(table, &columns, is_range_column);
        success_count += outcome.success_count;
        failure_count += outcome.failure_count;
        for example in &outcome.failure_examples {
            if failure_examples.len() < 5 {
                failure_examples.push(example.clone());
            }
        }
        for (col, hits) in &outcome.column_hits {
            *column_hits.entry(col.clone()).or_insert(0) += hits;
        }
        occupied.extend(outcome.occupied_dates());
    }

    info!(
        success = success_count,
        failed = failure_count,
        occupied = occupied.len(),
        "extraction complete"
    );
    if failure_count > 0 {
        warn!(examples = ?failure_examples, "rows dropped as unparseable");
    }

    // ─── 5) window, holidays, availability ───────────────────────────
    let today = Local::now().date_naive();
    let window = SchoolYearWindow::anchored_to(today);
    let holidays = holidays_for_window(window);
    info!(
        start = %window.start,
        end = %window.end,
        holidays = holidays.len(),
        "school-year window"
    );

    let available = compute_available(
        &occupied,
        window,
        &holidays,
        config.summer_range(),
        config.winter_range(),
        &config.excluded_set(),
    );
    info!(available = available.len(), "availability computed");
    for (month, count) in report::monthly_counts(&available) {
        info!(%month, count, "available per month");
    }

    // ─── 6) write the report ─────────────────────────────────────────
    fs::create_dir_all(&args.out)
        .with_context(|| format!("creating output directory {:?}", args.out))?;
    report::write_occupied_csv(&args.out.join("occupied.csv"), &occupied)?;
    report::write_available_csv(&args.out.join("available.csv"), &available)?;

    let summary = report::RunSummary {
        school: config.school.clone(),
        window_start: window.start,
        window_end: window.end,
        tables: tables.len(),
        success_count,
        failure_count,
        failure_examples,
        column_hits,
        occupied_count: occupied.len(),
        holiday_count: holidays.len(),
        available_count: available.len(),
        monthly_available: report::monthly_counts(&available),
    };
    report::write_summary_json(&args.out.join("summary.json"), &summary)?;

    info!("done");
    Ok(())
}

/// Every .xlsx/.csv under `input`. A file that fails to load is logged and
/// skipped; one contributor's bad upload must not sink the batch.
fn load_input_tables(input: &Path) -> Result<Vec<Table>> {
    let mut tables = Vec::new();
    for pattern in ["*.xlsx", "*.xlsm", "*.csv"] {
        let full = input.join(pattern);
        let full = full
            .to_str()
            .ok_or_else(|| anyhow!("non-UTF8 input path {:?}", input))?
            .to_string();
        for entry in glob::glob(&full).context("globbing input files")? {
            let path = entry.context("reading glob entry")?;
            match load_table(&path) {
                Ok(table) => tables.push(table),
                Err(err) => warn!(?path, %err, "skipping unreadable file"),
            }
        }
    }
    Ok(tables)
}
