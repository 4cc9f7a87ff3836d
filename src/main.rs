mod api;
mod config;
mod consts;
mod environment;
mod events;
mod export;
mod filters;
mod logging;
mod pages;
mod pagination;
mod render;

use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::api::{ApiClient, DashboardApi};
use crate::config::{Config, get_config_path};
use crate::consts::cli_consts::EVENT_QUEUE_SIZE;
use crate::environment::Environment;
use crate::events::{EventSender, EventType};
use crate::export::{ExportCoordinator, ExportTarget, PollOptions};
use crate::filters::{
    CellFilters, DateRange, ModuleFilters, StationFilters, StatisticsQuery, Zone,
};
use crate::pages::stations::StationZone;
use crate::pagination::PageQuery;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
/// Terminal client for the cell/module manufacturing quality dashboards.
struct Cli {
    /// Command to execute
    #[command(subcommand)]
    command: Command,

    /// Server base URL, overriding the environment and config file.
    #[arg(long, global = true, value_name = "URL")]
    server_url: Option<String>,
}

#[derive(Args, Debug, Clone)]
struct DateArgs {
    /// Range start, e.g. "2026-08-27 06:00:00". Defaults to today 00:00:00.
    #[arg(long)]
    start: Option<String>,

    /// Range end. Defaults to today 23:59:59.
    #[arg(long)]
    end: Option<String>,
}

impl DateArgs {
    fn range(&self) -> Result<DateRange, filters::FilterError> {
        DateRange::parse(self.start.as_deref(), self.end.as_deref())
    }
}

#[derive(Args, Debug, Clone)]
struct PageArgs {
    /// 1-based page number
    #[arg(long, default_value_t = 1)]
    page: u32,

    /// Rows per page
    #[arg(long)]
    page_size: Option<u32>,
}

impl PageArgs {
    fn query(&self, config: &Config) -> PageQuery {
        PageQuery::new(self.page, self.page_size.unwrap_or(config.page_size))
    }
}

#[derive(Args, Debug, Clone)]
struct CellFilterArgs {
    #[command(flatten)]
    dates: DateArgs,

    /// Cell barcode substring
    #[arg(long, default_value = "")]
    barcode: String,

    /// Barley paper status code
    #[arg(long, default_value = "")]
    barley_status: String,

    /// Capacity status code
    #[arg(long, default_value = "")]
    capacity_status: String,

    /// Measurement status code
    #[arg(long, default_value = "")]
    measurement_status: String,

    /// Final status code
    #[arg(long, default_value = "")]
    final_status: String,

    /// Gear grade
    #[arg(long, default_value = "")]
    grade: String,
}

impl CellFilterArgs {
    fn filters(&self) -> Result<CellFilters, filters::FilterError> {
        Ok(CellFilters {
            range: self.dates.range()?,
            barcode: self.barcode.trim().to_string(),
            barley_status: self.barley_status.clone(),
            capacity_status: self.capacity_status.clone(),
            measurement_status: self.measurement_status.clone(),
            final_status: self.final_status.clone(),
            grade: self.grade.clone(),
        })
    }
}

#[derive(Args, Debug, Clone)]
struct ModuleFilterArgs {
    #[command(flatten)]
    dates: DateArgs,

    /// Module (pallet) identification barcode
    #[arg(long, default_value = "")]
    module_id: String,

    /// Module grade
    #[arg(long, default_value = "")]
    grade: String,
}

impl ModuleFilterArgs {
    fn filters(&self) -> Result<ModuleFilters, filters::FilterError> {
        Ok(ModuleFilters {
            range: self.dates.range()?,
            module_id: self.module_id.trim().to_string(),
            grade: self.grade.clone(),
        })
    }
}

#[derive(Args, Debug, Clone)]
struct StationFilterArgs {
    #[command(flatten)]
    dates: DateArgs,

    /// Station name (selects the source table; required)
    #[arg(long)]
    station: String,

    /// Barcode substring
    #[arg(long, default_value = "")]
    barcode: String,

    /// Production shift
    #[arg(long, default_value = "")]
    shift: String,
}

impl StationFilterArgs {
    fn filters(&self) -> Result<StationFilters, Box<dyn Error>> {
        let filters = StationFilters {
            range: self.dates.range()?,
            barcode: self.barcode.trim().to_string(),
            station_name: self.station.clone(),
            shift: self.shift.clone(),
        };
        filters.validate()?;
        Ok(filters)
    }
}

/// Which dashboard an `export` invocation targets.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
enum ExportKind {
    Cells,
    Modules,
    Zone02,
    /// Zone03's export is synchronous: no job, the response is the file.
    Zone03,
    ZoneStats,
    AllZones,
}

#[derive(Subcommand)]
enum Command {
    /// Cell dashboard: paginated cell reports with grade/NG breakdowns
    Cells {
        #[command(flatten)]
        filters: CellFilterArgs,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Module dashboard: expanded module formation reports
    Modules {
        #[command(flatten)]
        filters: ModuleFilterArgs,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Zone02 station data
    Zone02 {
        #[command(flatten)]
        filters: StationFilterArgs,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Zone03 station data
    Zone03 {
        #[command(flatten)]
        filters: StationFilterArgs,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Combined statistics for one zone
    Stats {
        /// Production zone
        #[arg(long, value_enum)]
        zone: Zone,
        #[command(flatten)]
        dates: DateArgs,
    },
    /// Grade-range suggestions over rejected cells
    Suggestions {
        #[command(flatten)]
        dates: DateArgs,
    },
    /// Run an export job and save the resulting workbook
    Export {
        /// Dashboard to export
        #[arg(value_enum)]
        kind: ExportKind,
        #[command(flatten)]
        cells: CellFilterArgs,
        /// Module id filter (module exports)
        #[arg(long, default_value = "")]
        module_id: String,
        /// Station name (zone02/zone03 exports)
        #[arg(long)]
        station: Option<String>,
        /// Production shift (zone02/zone03 exports)
        #[arg(long, default_value = "")]
        shift: String,
        /// Zone (zone-stats exports)
        #[arg(long, value_enum)]
        zone: Option<Zone>,
        /// Directory to save into; defaults to the configured download dir
        #[arg(long, value_name = "DIR")]
        out_dir: Option<PathBuf>,
        /// Give up after this many seconds instead of polling forever
        #[arg(long, value_name = "SECS")]
        timeout: Option<u64>,
    },
    /// Update the persisted client configuration. `--server-url` persists
    /// the server address.
    Configure {
        /// Default rows per page
        #[arg(long)]
        page_size: Option<u32>,
        /// Directory for export downloads
        #[arg(long)]
        download_dir: Option<PathBuf>,
    },
    /// Clear the persisted client configuration
    Reset,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let config_path = get_config_path()?;
    let config = Config::load_or_default(&config_path);

    let environment = match cli.server_url.clone().or_else(|| config.server_url.clone()) {
        Some(url) => Environment::from_override(Some(url)),
        None => std::env::var("CELLQUALITY_ENVIRONMENT")
            .ok()
            .and_then(|s| s.parse::<Environment>().ok())
            .unwrap_or_default(),
    };

    match cli.command {
        Command::Cells { filters, page } => {
            let api = ApiClient::new(environment);
            let query = page.query(&config);
            pages::cells::show(&api, &filters.filters()?, query).await?;
            Ok(())
        }
        Command::Modules { filters, page } => {
            let api = ApiClient::new(environment);
            let query = page.query(&config);
            pages::modules::show(&api, &filters.filters()?, query).await?;
            Ok(())
        }
        Command::Zone02 { filters, page } => {
            let api = ApiClient::new(environment);
            let query = page.query(&config);
            pages::stations::show(&api, StationZone::Zone02, &filters.filters()?, query).await?;
            Ok(())
        }
        Command::Zone03 { filters, page } => {
            let api = ApiClient::new(environment);
            let query = page.query(&config);
            pages::stations::show(&api, StationZone::Zone03, &filters.filters()?, query).await?;
            Ok(())
        }
        Command::Stats { zone, dates } => {
            let api = ApiClient::new(environment);
            let query = StatisticsQuery {
                zone,
                range: dates.range()?,
            };
            pages::statistics::show_statistics(&api, &query).await?;
            Ok(())
        }
        Command::Suggestions { dates } => {
            let api = ApiClient::new(environment);
            pages::statistics::show_suggestions(&api, &dates.range()?).await?;
            Ok(())
        }
        Command::Export {
            kind,
            cells,
            module_id,
            station,
            shift,
            zone,
            out_dir,
            timeout,
        } => {
            let dir = out_dir
                .or_else(|| config.download_dir.clone())
                .unwrap_or_else(|| PathBuf::from("."));
            let range = cells.dates.range()?;

            // Zone03 exports synchronously; everything else goes through the
            // job protocol.
            if kind == ExportKind::Zone03 {
                let filters = StationFilterArgs {
                    dates: cells.dates.clone(),
                    station: station.ok_or("A --station is required for zone03 exports")?,
                    barcode: cells.barcode.clone(),
                    shift,
                }
                .filters()?;
                let api = ApiClient::new(environment);
                let download = api.export_station_sheet(&filters).await.map_err(|e| {
                    eprintln!("Export failed: {}", e);
                    e
                })?;
                let path = export::download::save_export(&dir, &download, "Zone03_Reports")?;
                println!("Saved {}", path.display());
                return Ok(());
            }

            let target = match kind {
                ExportKind::Cells => ExportTarget::Cells(cells.filters()?),
                ExportKind::Modules => ExportTarget::Modules(ModuleFilters {
                    range,
                    module_id: module_id.trim().to_string(),
                    grade: cells.grade.clone(),
                }),
                ExportKind::Zone02 => {
                    let filters = StationFilterArgs {
                        dates: cells.dates.clone(),
                        station: station.ok_or("A --station is required for zone02 exports")?,
                        barcode: cells.barcode.clone(),
                        shift,
                    }
                    .filters()?;
                    ExportTarget::Zone02(filters)
                }
                ExportKind::ZoneStats => ExportTarget::ZoneStatistics(StatisticsQuery {
                    zone: zone.ok_or("A --zone is required for zone-stats exports")?,
                    range,
                }),
                ExportKind::AllZones => ExportTarget::AllZoneStatistics(range),
                ExportKind::Zone03 => unreachable!(),
            };

            run_export(environment, &target, &dir, timeout).await
        }
        Command::Configure {
            page_size,
            download_dir,
        } => {
            let mut updated = config;
            if let Some(url) = cli.server_url {
                updated.server_url = Some(url);
            }
            if let Some(size) = page_size {
                updated.page_size = size;
            }
            if let Some(dir) = download_dir {
                updated.download_dir = Some(dir);
            }
            updated
                .save(&config_path)
                .map_err(|e| format!("Failed to save config: {}", e))?;
            println!("Configuration saved to {}", config_path.display());
            Ok(())
        }
        Command::Reset => {
            println!("Clearing client configuration file...");
            Config::clear(&config_path).map_err(Into::into)
        }
    }
}

/// Drives one export attempt with a progress renderer attached, saving the
/// workbook on success.
async fn run_export(
    environment: Environment,
    target: &ExportTarget,
    dir: &std::path::Path,
    timeout: Option<u64>,
) -> Result<(), Box<dyn Error>> {
    let (tx, mut rx) = mpsc::channel(EVENT_QUEUE_SIZE);
    let events = EventSender::new(tx);

    let renderer = tokio::spawn(async move {
        let mut progress_shown = false;
        while let Some(event) = rx.recv().await {
            match event.event_type {
                EventType::Progress => {
                    if let Some(percent) = event.progress {
                        render::progress_line(percent);
                        progress_shown = true;
                    }
                }
                _ => {
                    if progress_shown {
                        render::finish_progress_line();
                        progress_shown = false;
                    }
                    if event.should_display() {
                        println!("{}", event);
                    }
                }
            }
        }
        if progress_shown {
            render::finish_progress_line();
        }
    });

    // Ctrl-C stops the poll loop instead of leaving the process hanging on
    // a wedged server-side job.
    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            signal_cancel.cancel();
        }
    });

    let options = PollOptions {
        deadline: timeout.map(Duration::from_secs),
        cancel: Some(cancel),
    };

    let api = ApiClient::new(environment);
    let mut coordinator = ExportCoordinator::with_options(&api, events, options);
    let result = coordinator.run_to_file(target, dir).await;
    drop(coordinator);
    let _ = renderer.await;

    match result {
        Ok(path) => {
            println!("Saved {}", path.display());
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", e);
            Err(e.into())
        }
    }
}
