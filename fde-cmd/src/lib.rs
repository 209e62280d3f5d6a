//! Command implementations for the FDE CLI.
//!
//! Each subcommand loads a delay CSV, runs one query against the index and
//! prints the result as pretty JSON on stdout.

use clap::{Args, Subcommand, ValueEnum};
use fde_geo::RegionSelector;
use fde_index::metric::MetricType;
use fde_index::{AggregatedIndex, Axis, DelayIndex};
use fde_records::metrics::{DelayCause, Field};
use fde_utils::years::YearRange;
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;

pub mod load;
pub mod report;

/// Which index a query runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum By {
    #[default]
    Airport,
    Carrier,
}

impl From<By> for Axis {
    fn from(by: By) -> Axis {
        match by {
            By::Airport => Axis::Airport,
            By::Carrier => Axis::Carrier,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct DataArgs {
    /// Delay CSV (optionally gzipped)
    #[arg(short = 'd', long, env = "FDE_DATA")]
    pub data: PathBuf,

    /// Index to query: airports (split by carrier) or carriers (split by airport)
    #[arg(long, value_enum, default_value_t = By::Airport)]
    pub by: By,
}

impl DataArgs {
    fn load(&self) -> anyhow::Result<DelayIndex> {
        load::load_index(&self.data)
    }
}

#[derive(Args, Debug, Clone)]
pub struct RangeArgs {
    /// First year, inclusive
    #[arg(long)]
    pub from: i32,

    /// Last year, inclusive
    #[arg(long)]
    pub to: i32,
}

impl RangeArgs {
    pub fn range(&self) -> YearRange {
        YearRange(self.from, self.to)
    }
}

#[derive(Args, Debug, Clone)]
pub struct CauseArgs {
    /// Delay cause: carrier, weather, nas, security or late-aircraft
    #[arg(short = 'c', long)]
    pub cause: DelayCause,

    /// Sum delay minutes instead of delayed-flight counts
    #[arg(long)]
    pub minutes: bool,
}

impl CauseArgs {
    pub fn field(&self) -> Field {
        if self.minutes {
            self.cause.minutes_field()
        } else {
            self.cause.count_field()
        }
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Delay minutes per cause for one airport or carrier
    Causes {
        #[command(flatten)]
        data: DataArgs,

        /// Airport or carrier name, exactly as in the data
        #[arg(short = 'e', long)]
        entity: String,

        #[command(flatten)]
        range: RangeArgs,
    },

    /// Monthly series of one delay cause
    Series {
        #[command(flatten)]
        data: DataArgs,

        #[arg(short = 'e', long)]
        entity: String,

        #[command(flatten)]
        range: RangeArgs,

        #[command(flatten)]
        cause: CauseArgs,
    },

    /// Seasonal totals of one delay cause
    Seasons {
        #[command(flatten)]
        data: DataArgs,

        #[arg(short = 'e', long)]
        entity: String,

        #[command(flatten)]
        range: RangeArgs,

        #[command(flatten)]
        cause: CauseArgs,
    },

    /// Totals per counterpart with stacked cause counts
    Counterparts {
        #[command(flatten)]
        data: DataArgs,

        /// Restrict to one entity; totals span every entity when omitted
        #[arg(short = 'e', long)]
        entity: Option<String>,

        #[command(flatten)]
        range: RangeArgs,
    },

    /// List entities with coordinates and year span
    Entities {
        #[command(flatten)]
        data: DataArgs,

        /// Entities to leave out (repeatable)
        #[arg(long)]
        exclude: Vec<String>,
    },

    /// Region-filtered entities with a metric value and colour position
    Choropleth {
        #[command(flatten)]
        data: DataArgs,

        /// State boundaries GeoJSON (optionally gzipped)
        #[arg(short = 'b', long, env = "FDE_BOUNDARIES")]
        boundaries: PathBuf,

        /// Region: all, northeast, southeast, midwest, southwest, mountain-west or pacific
        #[arg(short = 'r', long, default_value_t = RegionSelector::All)]
        region: RegionSelector,

        #[arg(short = 'y', long)]
        year: i32,

        /// Metric: avg-delay-per-late-flight, total-flights-delayed or total-delay-minutes
        #[arg(short = 'm', long, default_value_t = MetricType::AvgDelayPerLateFlight)]
        metric: MetricType,
    },
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)?;
    Ok(())
}

fn warn_if_unknown(index: &AggregatedIndex, entity: &str) {
    if !index.contains(entity) {
        log::warn!(
            "[FDE Debug] cmd: '{}' not found in the {:?} index, totals will be zero",
            entity,
            index.axis()
        );
    }
}

pub fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Causes {
            data,
            entity,
            range,
        } => {
            let index = data.load()?;
            let index = index.index(data.by.into());
            warn_if_unknown(index, &entity);
            print_json(&report::causes(index, &entity, range.range()))
        }
        Command::Series {
            data,
            entity,
            range,
            cause,
        } => {
            let index = data.load()?;
            let index = index.index(data.by.into());
            warn_if_unknown(index, &entity);
            print_json(&report::series(index, &entity, range.range(), cause.field()))
        }
        Command::Seasons {
            data,
            entity,
            range,
            cause,
        } => {
            let index = data.load()?;
            let index = index.index(data.by.into());
            warn_if_unknown(index, &entity);
            print_json(&report::seasons(index, &entity, range.range(), cause.field()))
        }
        Command::Counterparts {
            data,
            entity,
            range,
        } => {
            let index = data.load()?;
            let index = index.index(data.by.into());
            if let Some(entity) = &entity {
                warn_if_unknown(index, entity);
            }
            print_json(&report::counterparts(
                index,
                entity.as_deref(),
                range.range(),
            ))
        }
        Command::Entities { data, exclude } => {
            let index = data.load()?;
            print_json(&report::entities(index.index(data.by.into()), &exclude))
        }
        Command::Choropleth {
            data,
            boundaries,
            region,
            year,
            metric,
        } => {
            let index = data.load()?;
            let filter = load::load_boundaries(&boundaries)?;
            print_json(&report::choropleth(
                index.index(data.by.into()),
                &filter,
                region,
                year,
                metric,
            ))
        }
    }
}
