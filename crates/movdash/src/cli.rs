//! Command line arguments

use chrono::NaiveDate;
use clap::{Args as ClapArgs, Parser, Subcommand};
use movdash_common::utils::{parse_date, parse_month};
use movdash_common::OutputFormat;
use movdash_config::Config;
use movdash_graphs::SelectionRequest;
use std::path::PathBuf;

/// Logistics movement dashboard
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Configuration file path
    #[arg(short, long, global = true, env = "MOVDASH_CONFIG_PATH")]
    pub config: Option<PathBuf>,

    /// Log level, overriding the configuration (e.g. debug, movdash_graphs=trace)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the filter option lists and their defaults
    Options(OptionsArgs),
    /// Run one pass: write the dashboard and print the tables
    Render(RenderArgs),
    /// Render, then re-render whenever the input or selection file changes
    Watch(WatchArgs),
}

/// Where to read movements from
#[derive(ClapArgs, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Movement spreadsheet or CSV file
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Worksheet name (first sheet by default)
    #[arg(long)]
    pub sheet: Option<String>,
}

/// Image output settings
#[derive(ClapArgs, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Dashboard image path
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Image format (svg or png)
    #[arg(short, long)]
    pub format: Option<OutputFormat>,
}

/// The four filter controls
#[derive(ClapArgs, Debug, Clone, Default)]
pub struct SelectionArgs {
    /// Month bucket, YYYY-MM (default: first month in the data)
    #[arg(short, long, value_parser = month_arg)]
    pub month: Option<String>,

    /// Action to include; repeat for several (default: all actions)
    #[arg(short = 'a', long = "action", value_name = "ACTION")]
    pub actions: Vec<String>,

    /// Select no action at all
    #[arg(long, conflicts_with = "actions")]
    pub no_actions: bool,

    /// First date, YYYY-MM-DD (default: earliest date in the data)
    #[arg(long, value_parser = date_arg)]
    pub start: Option<NaiveDate>,

    /// Last date, YYYY-MM-DD, compared at midnight (default: latest date in the data)
    #[arg(long, value_parser = date_arg)]
    pub end: Option<NaiveDate>,

    /// YAML selection file; flags given on the command line take precedence
    #[arg(long, value_name = "FILE")]
    pub selection: Option<PathBuf>,
}

#[derive(ClapArgs, Debug, Clone, Default)]
pub struct OptionsArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(ClapArgs, Debug, Clone, Default)]
pub struct RenderArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub selection: SelectionArgs,

    #[command(flatten)]
    pub output: OutputArgs,

    /// Print the tables as JSON instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct WatchArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// YAML selection file, re-read on every change
    #[arg(long, value_name = "FILE")]
    pub selection: Option<PathBuf>,

    #[command(flatten)]
    pub output: OutputArgs,

    /// Quiet period before a change triggers a new pass, in milliseconds
    #[arg(long, default_value_t = 500)]
    pub debounce_ms: u64,
}

impl SourceArgs {
    pub fn apply(&self, config: &mut Config) {
        if let Some(input) = &self.input {
            config.source.path = input.display().to_string();
        }
        if let Some(sheet) = &self.sheet {
            config.source.sheet = Some(sheet.clone());
        }
    }
}

impl OutputArgs {
    pub fn apply(&self, config: &mut Config) {
        if let Some(output) = &self.output {
            config.graph.output = Some(output.display().to_string());
        }
        if let Some(format) = self.format {
            config.graph.format = format;
        }
    }
}

impl SelectionArgs {
    /// Merge the flags over the selection file, if any
    pub fn to_request(&self) -> movdash_common::Result<SelectionRequest> {
        let mut request = match &self.selection {
            Some(path) => SelectionRequest::from_yaml_file(path)?,
            None => SelectionRequest::default(),
        };

        if let Some(month) = &self.month {
            request.month = Some(month.clone());
        }
        if self.no_actions {
            request.actions = Some(Vec::new());
        } else if !self.actions.is_empty() {
            request.actions = Some(self.actions.clone());
        }
        if let Some(start) = self.start {
            request.start = Some(start);
        }
        if let Some(end) = self.end {
            request.end = Some(end);
        }

        Ok(request)
    }
}

fn month_arg(value: &str) -> Result<String, String> {
    parse_month(value).map_err(|e| e.to_string())
}

fn date_arg(value: &str) -> Result<NaiveDate, String> {
    parse_date(value).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_render_flags() {
        let args = Args::try_parse_from([
            "movdash", "render", "--input", "base.csv", "--month", "2024-3", "-a", "LOAD", "-a",
            "UNLOAD", "--start", "2024-03-01", "--end", "2024-03-31", "--format", "png", "--json",
        ])
        .unwrap();

        let Command::Render(render) = args.command else {
            panic!("expected render");
        };
        assert_eq!(render.source.input, Some(PathBuf::from("base.csv")));
        assert_eq!(render.selection.month.as_deref(), Some("2024-03"));
        assert_eq!(render.selection.actions, vec!["LOAD", "UNLOAD"]);
        assert_eq!(render.output.format, Some(OutputFormat::Png));
        assert!(render.json);

        let request = render.selection.to_request().unwrap();
        assert_eq!(request.actions, Some(vec!["LOAD".to_string(), "UNLOAD".to_string()]));
        assert_eq!(request.end, NaiveDate::from_ymd_opt(2024, 3, 31));
    }

    #[test]
    fn test_no_actions_selects_empty_set() {
        let args = Args::try_parse_from(["movdash", "render", "--no-actions"]).unwrap();
        let Command::Render(render) = args.command else {
            panic!("expected render");
        };
        assert_eq!(render.selection.to_request().unwrap().actions, Some(vec![]));
    }

    #[test]
    fn test_defaults_leave_request_empty() {
        let request = SelectionArgs::default().to_request().unwrap();
        assert_eq!(request, SelectionRequest::default());
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(Args::try_parse_from(["movdash", "render", "--month", "março"]).is_err());
        assert!(Args::try_parse_from(["movdash", "render", "--start", "01/03/2024"]).is_err());
        assert!(Args::try_parse_from(["movdash", "render", "--format", "gif"]).is_err());
        assert!(
            Args::try_parse_from(["movdash", "render", "--no-actions", "-a", "LOAD"]).is_err()
        );
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args =
            Args::try_parse_from(["movdash", "watch", "--log-level", "debug", "-c", "x.yaml"])
                .unwrap();
        assert_eq!(args.log_level.as_deref(), Some("debug"));
        assert_eq!(args.config, Some(PathBuf::from("x.yaml")));
        let Command::Watch(watch) = args.command else {
            panic!("expected watch");
        };
        assert_eq!(watch.debounce_ms, 500);
    }

    #[test]
    fn test_overrides_apply_to_config() {
        let mut config = Config::default();
        SourceArgs {
            input: Some(PathBuf::from("dados/base.xlsx")),
            sheet: Some("Plan1".to_string()),
        }
        .apply(&mut config);
        OutputArgs {
            output: Some(PathBuf::from("painel.png")),
            format: Some(OutputFormat::Png),
        }
        .apply(&mut config);

        assert_eq!(config.source.path, "dados/base.xlsx");
        assert_eq!(config.source.sheet.as_deref(), Some("Plan1"));
        assert_eq!(config.graph.output_path(), PathBuf::from("painel.png"));
        assert_eq!(config.graph.format, OutputFormat::Png);
    }
}
