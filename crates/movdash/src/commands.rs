//! Subcommand implementations.
//!
//! Each command returns the text it wants on stdout so `main` stays the only
//! place that prints.

use crate::cli::{OptionsArgs, RenderArgs};
use anyhow::Context;
use movdash_common::load_with;
use movdash_config::{Config, ConfigLoader, DashboardConfig};
use movdash_graphs::{
    run_file, ChartRenderer, Dashboard, DashboardTables, FilterOptions, FilterSelection,
    SelectionRequest,
};
use serde::Serialize;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::info;

/// Load configuration from `path`, or from the default locations
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let config = match path {
        Some(path) => ConfigLoader::load_from_file(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => ConfigLoader::load().context("loading configuration")?,
    };
    Ok(config)
}

/// Option lists plus the selection the controls start with
#[derive(Debug, Serialize)]
struct OptionsReport<'a> {
    options: &'a FilterOptions,
    defaults: &'a FilterSelection,
}

/// `options`: list months, actions and the date span of the source
pub fn run_options(config: &Config, args: &OptionsArgs) -> anyhow::Result<String> {
    let mut config = config.clone();
    args.source.apply(&mut config);

    let records = load_with(&config.source.path, &config.source.to_load_options())
        .with_context(|| format!("loading movements from {}", config.source.path))?;
    let options = FilterOptions::from_records(&records);
    let defaults = options.default_selection();

    if args.json {
        let report = OptionsReport {
            options: &options,
            defaults: &defaults,
        };
        return Ok(serde_json::to_string_pretty(&report)?);
    }

    let date = |d: Option<chrono::NaiveDate>| {
        d.map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string())
    };

    let mut out = String::new();
    writeln!(out, "Registros: {}", records.len())?;
    writeln!(out, "Meses: {}", options.months.join(", "))?;
    writeln!(out, "Ações: {}", options.actions.join(", "))?;
    writeln!(
        out,
        "Período: {} a {}",
        date(options.min_date),
        date(options.max_date)
    )?;
    writeln!(out, "Seleção inicial: {}", defaults.summary())?;
    Ok(out)
}

/// One full pass: load, filter, aggregate, write the dashboard image
pub fn render_pass(
    config: &Config,
    request: &SelectionRequest,
) -> movdash_common::Result<(DashboardTables, PathBuf)> {
    let output = run_file(
        &config.source.path,
        &config.source.to_load_options(),
        request,
    )?;

    let dashboard = Dashboard::new(&output.tables, &config.dashboard, &config.graph);
    let path = config.graph.output_path();
    dashboard.render_to_file(&path, config.graph.format)?;

    Ok((output.tables, path))
}

/// `render`: one pass, tables to stdout
pub fn run_render(config: &Config, args: &RenderArgs) -> anyhow::Result<String> {
    let mut config = config.clone();
    args.source.apply(&mut config);
    args.output.apply(&mut config);

    let request = args.selection.to_request()?;
    let (tables, path) = render_pass(&config, &request)
        .with_context(|| format!("rendering dashboard from {}", config.source.path))?;
    info!("Dashboard written to {}", path.display());

    if args.json {
        Ok(serde_json::to_string_pretty(&tables)?)
    } else {
        let mut out = format_tables(&tables, &config.dashboard)?;
        writeln!(out, "Painel: {}", path.display())?;
        Ok(out)
    }
}

/// Human readable dump of the three aggregate tables
pub fn format_tables(
    tables: &DashboardTables,
    labels: &DashboardConfig,
) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    writeln!(out, "{}", tables.selection.summary())?;
    writeln!(
        out,
        "Registros: {} de {}",
        tables.filtered_count, tables.loaded_count
    )?;

    let sections = [
        (
            &labels.action_counts,
            tables
                .by_action
                .iter()
                .map(|row| (row.category.clone(), row.count))
                .collect::<Vec<_>>(),
        ),
        (
            &labels.daily_volume,
            tables
                .by_day
                .iter()
                .map(|row| (row.category.to_string(), row.count))
                .collect(),
        ),
        (
            &labels.hourly_volume,
            tables
                .by_hour
                .iter()
                .map(|row| (row.category.to_string(), row.count))
                .collect(),
        ),
    ];

    for (chart, rows) in sections {
        let width = rows
            .iter()
            .map(|(category, _)| category.chars().count())
            .chain(std::iter::once(chart.x_label.chars().count()))
            .max()
            .unwrap_or(0);

        writeln!(out)?;
        writeln!(out, "{}", chart.title)?;
        writeln!(out, "  {:<width$}  {}", chart.x_label, chart.y_label)?;
        if rows.is_empty() {
            writeln!(out, "  (sem dados)")?;
        }
        for (category, count) in rows {
            writeln!(out, "  {:<width$}  {:>5}", category, count)?;
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use movdash_common::test_utils::{mock_date, scenario_records};

    #[test]
    fn test_format_tables_lists_every_section() {
        let selection =
            FilterSelection::new("2024-03", ["LOAD"], mock_date(2024, 3, 1), mock_date(2024, 3, 31));
        let tables = movdash_graphs::run(&scenario_records(), &selection);

        let text = format_tables(&tables, &DashboardConfig::default()).unwrap();

        assert!(text.contains("Registros: 2 de 3"));
        assert!(text.contains("Total de Atividades Realizadas por Tipo"));
        assert!(text.contains("  LOAD      2"));
        assert!(text.contains("Atividades Realizadas por Hora"));
        let hour_section = text.split("Atividades Realizadas por Hora").nth(1).unwrap();
        let nine = hour_section.find("  9 ").unwrap();
        let ten = hour_section.find("  10 ").unwrap();
        assert!(nine < ten);
    }

    #[test]
    fn test_format_tables_marks_empty_sections() {
        let selection = FilterSelection::new(
            "2024-03",
            Vec::<String>::new(),
            mock_date(2024, 3, 1),
            mock_date(2024, 3, 31),
        );
        let tables = movdash_graphs::run(&scenario_records(), &selection);

        let text = format_tables(&tables, &DashboardConfig::default()).unwrap();
        assert_eq!(text.matches("(sem dados)").count(), 3);
    }
}
