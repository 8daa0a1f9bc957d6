//! Bar chart of activity counts per action type

use crate::aggregator::AggregateTable;
use crate::renderer::{count_axis_max, ChartRenderer};
use crate::types::{ChartKind, ChartSpec};
use movdash_common::Result;
use plotters::coord::Shift;
use plotters::prelude::*;
use tracing::instrument;

/// Action count bar chart
#[derive(Debug, Clone)]
pub struct ActionCountChart {
    pub spec: ChartSpec,
    /// (action, count) in display order
    pub data: Vec<(String, usize)>,
}

impl ActionCountChart {
    pub fn new(spec: ChartSpec) -> Self {
        Self {
            spec: ChartSpec {
                kind: ChartKind::Bar,
                ..spec
            },
            data: Vec::new(),
        }
    }

    pub fn from_table(table: &AggregateTable<String>, spec: ChartSpec) -> Self {
        let mut chart = Self::new(spec);
        chart.data = table
            .iter()
            .map(|row| (row.category.clone(), row.count))
            .collect();
        chart
    }

    fn max_count(&self) -> usize {
        self.data.iter().map(|(_, count)| *count).max().unwrap_or(0)
    }

    fn label_at(&self, index: u32) -> String {
        self.data
            .get(index as usize)
            .map(|(label, _)| label.clone())
            .unwrap_or_default()
    }
}

impl ChartRenderer for ActionCountChart {
    fn size(&self) -> (u32, u32) {
        (self.spec.width, self.spec.height)
    }

    fn spec(&self) -> &ChartSpec {
        &self.spec
    }

    #[instrument(skip_all, fields(bars = self.data.len()))]
    fn draw<DB>(&self, area: &DrawingArea<DB, Shift>, text_visible: bool) -> Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        let style = &self.spec.style;
        // Integer ranges are inclusive, so 0..n-1 gives one segment per bar
        let last_index = (self.data.len() as u32).saturating_sub(1).max(1);
        let y_max = count_axis_max(self.max_count()) as u32;

        let mut chart = ChartBuilder::on(area)
            .caption(&self.spec.title, self.text_style(&style.title_font, text_visible))
            .margin(style.margins.top as i32)
            .x_label_area_size(style.margins.bottom)
            .y_label_area_size(style.margins.left)
            .build_cartesian_2d((0u32..last_index).into_segmented(), 0u32..y_max)?;

        let label_style = self.text_style(&style.label_font, text_visible);
        let grid = self.grid_color();
        let formatter = |value: &SegmentValue<u32>| match value {
            SegmentValue::CenterOf(index) => self.label_at(*index),
            _ => String::new(),
        };

        let mut mesh = chart.configure_mesh();
        mesh.x_desc(self.spec.x_label.as_str())
            .y_desc(self.spec.y_label.as_str())
            .label_style(label_style.clone())
            .axis_desc_style(label_style)
            .x_labels(self.data.len().max(1))
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
                .margin(8)
                .data(
                    self.data
                        .iter()
                        .enumerate()
                        .map(|(index, (_, count))| (index as u32, *count as u32)),
                ),
        )?;

        Ok(())
    }
}
