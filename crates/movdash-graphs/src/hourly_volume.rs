//! Hourly volume bar chart over the 24 hours of the day

use crate::aggregator::AggregateTable;
use crate::renderer::{count_axis_max, format_hour_24, ChartRenderer};
use crate::types::{ChartKind, ChartSpec};
use movdash_common::Result;
use plotters::coord::Shift;
use plotters::prelude::*;
use tracing::instrument;

/// Data point for hourly counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct HourlyDataPoint {
    pub hour: u32, // 0-23 hour of day
    pub count: usize,
}

/// Hourly volume bar chart
#[derive(Debug, Clone)]
pub struct HourlyVolumeChart {
    pub spec: ChartSpec,
    pub data: Vec<HourlyDataPoint>,
    /// Label every n-th hour on the x axis
    pub label_every: u32,
}

impl HourlyVolumeChart {
    pub fn new(spec: ChartSpec) -> Self {
        Self {
            spec: ChartSpec {
                kind: ChartKind::Bar,
                ..spec
            },
            data: Vec::new(),
            label_every: 3,
        }
    }

    pub fn from_table(table: &AggregateTable<u32>, spec: ChartSpec) -> Self {
        let mut chart = Self::new(spec);
        chart.set_data(
            table
                .iter()
                .map(|row| HourlyDataPoint {
                    hour: row.category,
                    count: row.count,
                })
                .collect(),
        );
        chart
    }

    /// Set data, dropping hours outside 0-23 and sorting by hour
    pub fn set_data(&mut self, data: Vec<HourlyDataPoint>) {
        self.data = data.into_iter().filter(|d| d.hour < 24).collect();
        self.data.sort_by_key(|d| d.hour);
    }

    fn hour_label(&self, hour: u32) -> String {
        if self.label_every <= 1 || hour % self.label_every == 0 {
            format_hour_24(hour)
        } else {
            String::new()
        }
    }
}

impl ChartRenderer for HourlyVolumeChart {
    fn size(&self) -> (u32, u32) {
        (self.spec.width, self.spec.height)
    }

    fn spec(&self) -> &ChartSpec {
        &self.spec
    }

    #[instrument(skip_all, fields(hours = self.data.len()))]
    fn draw<DB>(&self, area: &DrawingArea<DB, Shift>, text_visible: bool) -> Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        let style = &self.spec.style;
        let y_max = count_axis_max(self.data.iter().map(|d| d.count).max().unwrap_or(0)) as u32;

        // 0..23 is inclusive: one segment per hour
        let mut chart = ChartBuilder::on(area)
            .caption(&self.spec.title, self.text_style(&style.title_font, text_visible))
            .margin(style.margins.top as i32)
            .x_label_area_size(style.margins.bottom)
            .y_label_area_size(style.margins.left)
            .build_cartesian_2d((0u32..23u32).into_segmented(), 0u32..y_max)?;

        let label_style = self.text_style(&style.label_font, text_visible);
        let grid = self.grid_color();
        let formatter = |value: &SegmentValue<u32>| match value {
            SegmentValue::CenterOf(hour) => self.hour_label(*hour),
            _ => String::new(),
        };

        let mut mesh = chart.configure_mesh();
        mesh.x_desc(self.spec.x_label.as_str())
            .y_desc(self.spec.y_label.as_str())
            .label_style(label_style.clone())
            .axis_desc_style(label_style)
            .x_labels(24)
            .x_label_formatter(&formatter)
            .disable_x_mesh()
            .bold_line_style(grid)
            .light_line_style(grid.mix(0.3));
        if !style.show_grid {
            mesh.disable_mesh();
        }
        mesh.draw()?;

        chart.draw_series(
            Histogram::vertical(&chart)
                .style(self.primary_color().filled())
                .margin(2)
                .data(self.data.iter().map(|d| (d.hour, d.count as u32))),
        )?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_data_sorts_and_filters() {
        let mut chart = HourlyVolumeChart::new(ChartSpec::default());
        chart.set_data(vec![
            HourlyDataPoint { hour: 15, count: 20 },
            HourlyDataPoint { hour: 9, count: 30 },
            HourlyDataPoint { hour: 25, count: 40 }, // Invalid hour
            HourlyDataPoint { hour: 12, count: 25 },
        ]);

        assert_eq!(chart.data.len(), 3);
        assert_eq!(chart.data[0].hour, 9);
        assert_eq!(chart.data[1].hour, 12);
        assert_eq!(chart.data[2].hour, 15);
    }

    #[test]
    fn test_hour_labels() {
        let mut chart = HourlyVolumeChart::new(ChartSpec::default());
        assert_eq!(chart.hour_label(0), "00:00");
        assert_eq!(chart.hour_label(1), "");
        assert_eq!(chart.hour_label(21), "21:00");

        chart.label_every = 1;
        assert_eq!(chart.hour_label(7), "07:00");
    }

    #[test]
    fn test_svg_renders_hour_axis() {
        let mut chart = HourlyVolumeChart::new(ChartSpec::default());
        chart.set_data(vec![
            HourlyDataPoint { hour: 9, count: 1 },
            HourlyDataPoint { hour: 10, count: 1 },
        ]);

        let svg = chart.render_to_svg_string().unwrap();
        assert!(svg.contains("09:00"));
        assert!(svg.contains("<rect"));
    }
}
