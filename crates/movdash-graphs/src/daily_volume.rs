//! Line chart of activity volume per day of month

use crate::aggregator::AggregateTable;
use crate::renderer::{count_axis_max, ChartRenderer};
use crate::types::{ChartKind, ChartSpec};
use movdash_common::Result;
use plotters::coord::Shift;
use plotters::prelude::*;
use tracing::instrument;

/// Daily volume line chart
#[derive(Debug, Clone)]
pub struct DailyVolumeChart {
    pub spec: ChartSpec,
    /// (day of month, count), ascending by day
    pub data: Vec<(u32, usize)>,
}

impl DailyVolumeChart {
    pub fn new(spec: ChartSpec) -> Self {
        Self {
            spec: ChartSpec {
                kind: ChartKind::Line,
                ..spec
            },
            data: Vec::new(),
        }
    }

    pub fn from_table(table: &AggregateTable<u32>, spec: ChartSpec) -> Self {
        let mut chart = Self::new(spec);
        chart.data = table.iter().map(|row| (row.category, row.count)).collect();
        chart
    }

    /// Day axis bounds; a whole month when there is no data
    fn day_range(&self) -> (u32, u32) {
        let first = self.data.first().map(|(day, _)| *day);
        let last = self.data.last().map(|(day, _)| *day);
        match (first, last) {
            (Some(first), Some(last)) if first < last => (first, last),
            (Some(day), _) => (day.saturating_sub(1).max(1), (day + 1).min(31)),
            _ => (1, 31),
        }
    }
}

impl ChartRenderer for DailyVolumeChart {
    fn size(&self) -> (u32, u32) {
        (self.spec.width, self.spec.height)
    }

    fn spec(&self) -> &ChartSpec {
        &self.spec
    }

    #[instrument(skip_all, fields(points = self.data.len()))]
    fn draw<DB>(&self, area: &DrawingArea<DB, Shift>, text_visible: bool) -> Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        let style = &self.spec.style;
        let (first_day, last_day) = self.day_range();
        let y_max = count_axis_max(self.data.iter().map(|(_, c)| *c).max().unwrap_or(0)) as u32;

        let mut chart = ChartBuilder::on(area)
            .caption(&self.spec.title, self.text_style(&style.title_font, text_visible))
            .margin(style.margins.top as i32)
            .x_label_area_size(style.margins.bottom)
            .y_label_area_size(style.margins.left)
            .build_cartesian_2d(first_day..last_day, 0u32..y_max)?;

        let label_style = self.text_style(&style.label_font, text_visible);
        let grid = self.grid_color();

        let mut mesh = chart.configure_mesh();
        mesh.x_desc(self.spec.x_label.as_str())
            .y_desc(self.spec.y_label.as_str())
            .label_style(label_style.clone())
            .axis_desc_style(label_style)
            .x_labels((last_day - first_day + 1) as usize)
            .bold_line_style(grid)
            .light_line_style(grid.mix(0.3));
        if !style.show_grid {
            mesh.disable_mesh();
        }
        mesh.draw()?;

        let color = self.primary_color();
        let points: Vec<(u32, u32)> = self
            .data
            .iter()
            .map(|(day, count)| (*day, *count as u32))
            .collect();

        chart.draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(2)))?;
        chart.draw_series(
            points
                .iter()
                .map(|point| Circle::new(*point, 4, color.filled())),
        )?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chart_with(data: Vec<(u32, usize)>) -> DailyVolumeChart {
        let mut chart = DailyVolumeChart::new(ChartSpec::default());
        chart.data = data;
        chart
    }

    #[test]
    fn test_new_forces_line_kind() {
        let chart = DailyVolumeChart::new(ChartSpec::default());
        assert_eq!(chart.spec.kind, ChartKind::Line);
    }

    #[test]
    fn test_day_range() {
        assert_eq!(chart_with(vec![]).day_range(), (1, 31));
        assert_eq!(chart_with(vec![(5, 1), (6, 1)]).day_range(), (5, 6));
        assert_eq!(chart_with(vec![(1, 3)]).day_range(), (1, 2));
        assert_eq!(chart_with(vec![(31, 3)]).day_range(), (30, 31));
    }

    #[test]
    fn test_svg_draws_line() {
        let svg = chart_with(vec![(1, 3), (4, 2), (15, 1)])
            .render_to_svg_string()
            .unwrap();

        assert!(svg.contains("<polyline"));
        assert!(svg.contains("<circle"));
    }

    #[test]
    fn test_single_point_and_empty_render() {
        assert!(chart_with(vec![(12, 7)]).render_to_svg_string().is_ok());
        assert!(chart_with(vec![]).render_to_svg_string().is_ok());
    }
}
