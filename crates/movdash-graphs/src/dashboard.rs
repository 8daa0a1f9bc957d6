//! Dashboard composition: a title header, a two-column row with the action
//! counts and daily volume, and a three-column row whose first column holds
//! the hourly volume.

use crate::action_counts::ActionCountChart;
use crate::daily_volume::DailyVolumeChart;
use crate::hourly_volume::HourlyVolumeChart;
use crate::pipeline::DashboardTables;
use crate::renderer::ChartRenderer;
use crate::types::{ChartKind, ChartSpec, FontConfig, StyleConfig};
use movdash_common::Result;
use movdash_config::{DashboardConfig, GraphConfig};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use tracing::{debug, instrument};

/// The full dashboard image
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub title: String,
    /// One-line selection description under the title
    pub subtitle: Option<String>,
    /// Whole-image chart settings; only size and style are used
    pub spec: ChartSpec,
    pub action_counts: ActionCountChart,
    pub daily_volume: DailyVolumeChart,
    pub hourly_volume: HourlyVolumeChart,
}

impl Dashboard {
    pub fn new(tables: &DashboardTables, dashboard: &DashboardConfig, graph: &GraphConfig) -> Self {
        let chart_spec = |kind, labels| ChartSpec::new(kind, labels, graph);

        let subtitle = dashboard.show_selection_summary.then(|| {
            format!(
                "{} | {} de {} registros",
                tables.selection.summary(),
                tables.filtered_count,
                tables.loaded_count
            )
        });

        Self {
            title: dashboard.title.clone(),
            subtitle,
            spec: ChartSpec {
                kind: ChartKind::Bar,
                title: dashboard.title.clone(),
                x_label: String::new(),
                y_label: String::new(),
                width: graph.width,
                height: graph.height,
                style: StyleConfig::from_settings(graph),
            },
            action_counts: ActionCountChart::from_table(
                &tables.by_action,
                chart_spec(ChartKind::Bar, &dashboard.action_counts),
            ),
            daily_volume: DailyVolumeChart::from_table(
                &tables.by_day,
                chart_spec(ChartKind::Line, &dashboard.daily_volume),
            ),
            hourly_volume: HourlyVolumeChart::from_table(
                &tables.by_hour,
                chart_spec(ChartKind::Bar, &dashboard.hourly_volume),
            ),
        }
    }

    /// Height of the title band
    fn header_height(&self) -> u32 {
        let title = self.spec.style.title_font.size * 2;
        let subtitle = if self.subtitle.is_some() {
            self.spec.style.label_font.size * 2
        } else {
            0
        };
        (title + subtitle + 10).min(self.spec.height / 4)
    }

    fn draw_header<DB>(&self, area: &DrawingArea<DB, Shift>, text_visible: bool) -> Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        let (width, height) = area.dim_in_pixel();
        let center = (width / 2) as i32;
        let centered = Pos::new(HPos::Center, VPos::Center);

        let title_font = FontConfig {
            size: self.spec.style.title_font.size * 3 / 2,
            ..self.spec.style.title_font.clone()
        };
        let title_style = self.text_style(&title_font, text_visible).pos(centered);

        match &self.subtitle {
            Some(subtitle) => {
                let subtitle_style = self
                    .text_style(&self.spec.style.label_font, text_visible)
                    .pos(centered);
                area.draw(&Text::new(
                    self.title.as_str(),
                    (center, (height / 3) as i32),
                    title_style,
                ))?;
                area.draw(&Text::new(
                    subtitle.as_str(),
                    (center, (height * 3 / 4) as i32),
                    subtitle_style,
                ))?;
            }
            None => {
                area.draw(&Text::new(
                    self.title.as_str(),
                    (center, (height / 2) as i32),
                    title_style,
                ))?;
            }
        }
        Ok(())
    }
}

impl ChartRenderer for Dashboard {
    fn size(&self) -> (u32, u32) {
        (self.spec.width, self.spec.height)
    }

    fn spec(&self) -> &ChartSpec {
        &self.spec
    }

    #[instrument(skip_all, fields(width = self.spec.width, height = self.spec.height))]
    fn draw<DB>(&self, area: &DrawingArea<DB, Shift>, text_visible: bool) -> Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        let (header, body) = area.split_vertically(self.header_height());
        self.draw_header(&header, text_visible)?;

        let (_, body_height) = body.dim_in_pixel();
        let (upper, lower) = body.split_vertically(body_height / 2);

        let upper_columns = upper.split_evenly((1, 2));
        self.action_counts.draw(&upper_columns[0], text_visible)?;
        self.daily_volume.draw(&upper_columns[1], text_visible)?;

        // Columns two and three of the lower row stay empty
        let lower_columns = lower.split_evenly((1, 3));
        self.hourly_volume.draw(&lower_columns[0], text_visible)?;

        debug!("Dashboard layout drawn");
        Ok(())
    }
}
