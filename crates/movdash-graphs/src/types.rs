//! Chart types and styling structures

use movdash_config::{ChartLabels, GraphConfig};
use serde::{Deserialize, Serialize};

/// Supported chart types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChartKind {
    Bar,
    Line,
}

/// Everything needed to draw one chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Pixel size when rendered standalone
    pub width: u32,
    pub height: u32,
    pub style: StyleConfig,
}

impl ChartSpec {
    pub fn new(kind: ChartKind, labels: &ChartLabels, graph: &GraphConfig) -> Self {
        Self {
            kind,
            title: labels.title.clone(),
            x_label: labels.x_label.clone(),
            y_label: labels.y_label.clone(),
            width: graph.width,
            height: graph.height,
            style: StyleConfig::from_settings(graph),
        }
    }
}

impl Default for ChartSpec {
    fn default() -> Self {
        Self {
            kind: ChartKind::Bar,
            title: String::new(),
            x_label: String::new(),
            y_label: String::new(),
            width: 800,
            height: 600,
            style: StyleConfig::default(),
        }
    }
}

/// Font configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontConfig {
    pub family: String,
    pub size: u32,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            family: "sans-serif".to_string(),
            size: 14,
        }
    }
}

/// Margin configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarginConfig {
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub left: u32,
}

impl Default for MarginConfig {
    fn default() -> Self {
        Self {
            top: 15,
            right: 25,
            bottom: 50,
            left: 60,
        }
    }
}

/// Colors, fonts and spacing shared by every chart of a dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleConfig {
    pub background_color: String,
    pub primary_color: String,
    pub grid_color: String,
    pub title_font: FontConfig,
    pub label_font: FontConfig,
    pub margins: MarginConfig,
    pub show_grid: bool,
}

impl StyleConfig {
    pub fn from_settings(graph: &GraphConfig) -> Self {
        Self {
            background_color: graph.background_color.clone(),
            primary_color: graph.primary_color.clone(),
            grid_color: graph.secondary_color.clone(),
            title_font: FontConfig {
                family: graph.font_family.clone(),
                size: graph.title_font_size,
            },
            label_font: FontConfig {
                family: graph.font_family.clone(),
                size: graph.font_size,
            },
            margins: MarginConfig::default(),
            show_grid: graph.show_grid,
        }
    }
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self::from_settings(&GraphConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_from_settings() {
        let mut graph = GraphConfig::default();
        graph.primary_color = "#FF7F0E".to_string();
        graph.font_size = 11;
        let labels = ChartLabels::new("Volume de Atividades por Dia", "Dia", "Volume");

        let spec = ChartSpec::new(ChartKind::Line, &labels, &graph);

        assert_eq!(spec.kind, ChartKind::Line);
        assert_eq!(spec.x_label, "Dia");
        assert_eq!(spec.style.primary_color, "#FF7F0E");
        assert_eq!(spec.style.label_font.size, 11);
        assert_eq!(spec.style.grid_color, graph.secondary_color);
    }
}
