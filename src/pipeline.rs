//! Pipeline orchestration
//! Runs every stage once and collects the tables the dashboard pages consume.

use crate::config::{ConfigRecord, ConfigValidator};
use crate::data::schema::{AGGREGATE_REGION, GDP_VALUE, YEAR};
use crate::data::{
    CleanOptions, CleaningSummary, DataCleaner, DataFilter, DataInfo, DataLoader, DataReshaper,
    FilterError, GroupBy,
};
use crate::error::PipelineError;
use crate::stats::{ExecutiveSummary, StatsCalculator};
use polars::prelude::DataFrame;
use std::path::PathBuf;
use tracing::{debug, info, info_span};

/// Inputs for one run.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub data_path: PathBuf,
    pub config_path: PathBuf,
    pub clean: CleanOptions,
}

/// Named result tables, one per dashboard view.
#[derive(Debug, Clone)]
pub struct DashboardTables {
    /// Continent breakdown for the configured year, ascending by value.
    pub by_continent: DataFrame,
    /// Time series of the configured region, ascending by year.
    pub by_year: DataFrame,
    /// Countries of the configured region in the configured year, largest first.
    pub by_region: DataFrame,
    /// Every country in the configured year, largest first.
    pub by_country: DataFrame,
}

impl DashboardTables {
    /// Derive all tables from the cleaned long table. The input is not modified.
    pub fn build(clean: &DataFrame, config: &ConfigRecord) -> Result<Self, FilterError> {
        let op = config.operation;

        let year = DataFilter::by_year(clean, config.year)?;
        let region = DataFilter::by_region(clean, &config.region)?;

        let continents = DataFilter::excluding_region(&year, AGGREGATE_REGION)?;
        let by_continent = DataFilter::aggregate(&continents, op, GroupBy::Continent)?;
        let by_continent = DataFilter::sorted(&by_continent, GDP_VALUE, false)?;

        let by_year = DataFilter::aggregate(&region, op, GroupBy::Year)?;
        let by_year = DataFilter::sorted(&by_year, YEAR, false)?;

        let region_year = DataFilter::by_year(&region, config.year)?;
        let by_region = DataFilter::aggregate(&region_year, op, GroupBy::Country)?;
        let by_region = DataFilter::sorted(&by_region, GDP_VALUE, true)?;

        let by_country = DataFilter::aggregate(&year, op, GroupBy::Country)?;
        let by_country = DataFilter::sorted(&by_country, GDP_VALUE, true)?;

        Ok(Self {
            by_continent,
            by_year,
            by_region,
            by_country,
        })
    }

    pub fn named(&self) -> [(&'static str, &DataFrame); 4] {
        [
            ("by_continent", &self.by_continent),
            ("by_year", &self.by_year),
            ("by_region", &self.by_region),
            ("by_country", &self.by_country),
        ]
    }
}

/// Everything the presentation layer receives. Nothing flows back.
#[derive(Debug, Clone)]
pub struct DashboardContext {
    pub config: ConfigRecord,
    pub info: DataInfo,
    pub summary: CleaningSummary,
    pub tables: DashboardTables,
    pub executive: ExecutiveSummary,
}

impl DashboardContext {
    /// Build the context from an already loaded wide table.
    pub fn build(
        wide: &DataFrame,
        config: ConfigRecord,
        clean_options: &CleanOptions,
    ) -> Result<Self, PipelineError> {
        let long = DataReshaper::to_long(wide)?;
        let clean = DataCleaner::clean(&long, clean_options)?;
        let summary = DataCleaner::cleaning_summary(&long, &clean);
        debug!(columns = ?DataCleaner::column_types(&clean), "cleaned schema");

        ConfigValidator::validate(&config, &clean)?;

        let tables = DashboardTables::build(&clean, &config)?;
        let executive =
            StatsCalculator::executive_summary(&tables.by_year, &tables.by_continent, &config);
        let info = DataReshaper::data_info(wide, &long);

        Ok(Self {
            config,
            info,
            summary,
            tables,
            executive,
        })
    }

    /// Full run: read both inputs from disk, then [`DashboardContext::build`].
    pub fn run(options: &PipelineOptions) -> Result<Self, PipelineError> {
        let _span = info_span!("pipeline", data = %options.data_path.display()).entered();

        let config = ConfigRecord::load(&options.config_path)?;
        let wide = DataLoader::load_csv(&options.data_path)?;
        let context = Self::build(&wide, config, &options.clean)?;

        info!(
            rows = context.summary.rows_after,
            continents = context.tables.by_continent.height(),
            "pipeline finished"
        );
        Ok(context)
    }
}
