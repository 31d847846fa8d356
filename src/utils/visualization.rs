//! Visualization utilities for manifold_planning
//!
//! Plots state sequences with gnuplot, projected onto two chosen coordinates.

use gnuplot::{AutoOption, AxesCommon, Caption, Color, Figure, LineWidth, PointSize, PointSymbol};

use crate::common::{PlanningError, PlanningResult, RealVectorState};

/// Color palette for consistent styling
pub mod colors {
    pub const BLACK: &str = "#000000";
    pub const RED: &str = "#FF0000";
    pub const GREEN: &str = "#00FF00";
    pub const BLUE: &str = "#0000FF";
    pub const GRAY: &str = "#808080";

    // Semantic colors
    pub const MANIFOLD: &str = GRAY;
    pub const SAMPLE: &str = BLACK;
    pub const START: &str = GREEN;
    pub const GOAL: &str = BLUE;
    pub const PATH: &str = RED;
}

/// Style for path rendering
#[derive(Debug, Clone)]
pub struct PathStyle {
    pub color: String,
    pub line_width: f64,
    pub caption: String,
}

impl PathStyle {
    pub fn new(color: &str, caption: &str) -> Self {
        Self {
            color: color.to_string(),
            line_width: 2.0,
            caption: caption.to_string(),
        }
    }

    pub fn with_line_width(mut self, width: f64) -> Self {
        self.line_width = width;
        self
    }
}

impl Default for PathStyle {
    fn default() -> Self {
        Self::new(colors::PATH, "Path")
    }
}

/// Style for point rendering
#[derive(Debug, Clone)]
pub struct PointStyle {
    pub color: String,
    pub size: f64,
    pub symbol: char,
    pub caption: String,
}

impl PointStyle {
    pub fn new(color: &str, caption: &str) -> Self {
        Self {
            color: color.to_string(),
            size: 1.0,
            symbol: 'O',
            caption: caption.to_string(),
        }
    }

    pub fn with_size(mut self, size: f64) -> Self {
        self.size = size;
        self
    }

    pub fn with_symbol(mut self, symbol: char) -> Self {
        self.symbol = symbol;
        self
    }
}

/// Split states into the coordinate lists of two axes
pub fn project_coordinates(states: &[RealVectorState], axes: (usize, usize)) -> (Vec<f64>, Vec<f64>) {
    states
        .iter()
        .filter(|s| s.len() > axes.0.max(axes.1))
        .map(|s| (s[axes.0], s[axes.1]))
        .unzip()
}

/// Plot element queued until the figure is drawn
#[derive(Debug, Clone)]
enum Layer {
    Lines { x: Vec<f64>, y: Vec<f64>, style: PathStyle },
    Points { x: Vec<f64>, y: Vec<f64>, style: PointStyle },
}

/// Main visualizer struct
///
/// Plot calls only record layers. Every layer and setting lands on a
/// single set of axes when the figure is shown or saved.
pub struct Visualizer {
    axes: (usize, usize),
    title: String,
    x_label: String,
    y_label: String,
    x_range: Option<(f64, f64)>,
    y_range: Option<(f64, f64)>,
    aspect_ratio: Option<f64>,
    layers: Vec<Layer>,
}

impl Visualizer {
    /// Create a visualizer showing coordinates 0 and 1
    pub fn new() -> Self {
        Self {
            axes: (0, 1),
            title: String::new(),
            x_label: "x0".to_string(),
            y_label: "x1".to_string(),
            x_range: None,
            y_range: None,
            aspect_ratio: Some(1.0),
            layers: Vec::new(),
        }
    }

    /// Choose the two state coordinates to plot
    pub fn set_axes(&mut self, x: usize, y: usize) -> &mut Self {
        self.axes = (x, y);
        self.x_label = format!("x{}", x);
        self.y_label = format!("x{}", y);
        self
    }

    pub fn set_title(&mut self, title: &str) -> &mut Self {
        self.title = title.to_string();
        self
    }

    pub fn set_x_range(&mut self, min: f64, max: f64) -> &mut Self {
        self.x_range = Some((min, max));
        self
    }

    pub fn set_y_range(&mut self, min: f64, max: f64) -> &mut Self {
        self.y_range = Some((min, max));
        self
    }

    /// Set aspect ratio (None for auto)
    pub fn set_aspect_ratio(&mut self, ratio: Option<f64>) -> &mut Self {
        self.aspect_ratio = ratio;
        self
    }

    /// Plot a sequence of states as a polyline
    pub fn plot_path(&mut self, states: &[RealVectorState], style: &PathStyle) -> &mut Self {
        let (x, y) = project_coordinates(states, self.axes);
        self.layers.push(Layer::Lines {
            x,
            y,
            style: style.clone(),
        });
        self
    }

    /// Plot a path from x,y vectors
    pub fn plot_path_xy(&mut self, x: &[f64], y: &[f64], style: &PathStyle) -> &mut Self {
        self.layers.push(Layer::Lines {
            x: x.to_vec(),
            y: y.to_vec(),
            style: style.clone(),
        });
        self
    }

    /// Plot states as unconnected points
    pub fn plot_states(&mut self, states: &[RealVectorState], style: &PointStyle) -> &mut Self {
        let (x, y) = project_coordinates(states, self.axes);
        self.layers.push(Layer::Points {
            x,
            y,
            style: style.clone(),
        });
        self
    }

    /// Outline of a circle of `radius` around the origin, e.g. a sphere silhouette
    pub fn plot_circle(&mut self, radius: f64) -> &mut Self {
        let n = 180;
        let (x, y): (Vec<f64>, Vec<f64>) = (0..=n)
            .map(|i| {
                let angle = 2.0 * std::f64::consts::PI * i as f64 / n as f64;
                (radius * angle.cos(), radius * angle.sin())
            })
            .unzip();
        self.plot_path_xy(
            &x,
            &y,
            &PathStyle::new(colors::MANIFOLD, "Manifold").with_line_width(1.0),
        )
    }

    pub fn plot_start(&mut self, state: &RealVectorState) -> &mut Self {
        let style = PointStyle::new(colors::START, "Start").with_size(1.5);
        self.plot_states(std::slice::from_ref(state), &style)
    }

    pub fn plot_goal(&mut self, state: &RealVectorState) -> &mut Self {
        let style = PointStyle::new(colors::GOAL, "Goal").with_size(1.5);
        self.plot_states(std::slice::from_ref(state), &style)
    }

    /// Finalize and show the plot
    pub fn show(&self) -> PlanningResult<()> {
        self.render()
            .show()
            .map(|_| ())
            .map_err(|e| PlanningError::Visualization(e.to_string()))
    }

    /// Save plot to SVG file
    pub fn save_svg(&self, path: &str) -> PlanningResult<()> {
        self.render()
            .save_to_svg(path, 800, 600)
            .map_err(|e| PlanningError::Visualization(e.to_string()))
    }

    /// Draw every layer and setting onto one set of axes
    fn render(&self) -> Figure {
        let mut figure = Figure::new();
        {
            let axes = figure.axes2d();
            for layer in &self.layers {
                match layer {
                    Layer::Lines { x, y, style } => {
                        axes.lines(
                            x,
                            y,
                            &[
                                Caption(&style.caption),
                                Color(&style.color),
                                LineWidth(style.line_width),
                            ],
                        );
                    }
                    Layer::Points { x, y, style } => {
                        axes.points(
                            x,
                            y,
                            &[
                                Caption(&style.caption),
                                Color(&style.color),
                                PointSymbol(style.symbol),
                                PointSize(style.size),
                            ],
                        );
                    }
                }
            }

            if !self.title.is_empty() {
                axes.set_title(&self.title, &[]);
            }
            axes.set_x_label(&self.x_label, &[]);
            axes.set_y_label(&self.y_label, &[]);

            if let Some((min, max)) = self.x_range {
                axes.set_x_range(AutoOption::Fix(min), AutoOption::Fix(max));
            }
            if let Some((min, max)) = self.y_range {
                axes.set_y_range(AutoOption::Fix(min), AutoOption::Fix(max));
            }
            if let Some(ratio) = self.aspect_ratio {
                axes.set_aspect_ratio(AutoOption::Fix(ratio));
            }
        }
        figure
    }
}

impl Default for Visualizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visualizer_creation() {
        let mut vis = Visualizer::new();
        assert!(vis.aspect_ratio.is_some());
        vis.set_axes(0, 2);
        assert_eq!(vis.y_label, "x2");
    }

    #[test]
    fn test_plots_share_one_layer_list() {
        let mut vis = Visualizer::new();
        let path = vec![
            RealVectorState::from_vec(vec![0.0, 0.0]),
            RealVectorState::from_vec(vec![1.0, 1.0]),
        ];
        vis.set_title("Layers")
            .set_aspect_ratio(None)
            .plot_circle(1.0)
            .plot_path(&path, &PathStyle::default())
            .plot_start(&path[0])
            .plot_goal(&path[1]);

        assert!(vis.aspect_ratio.is_none());
        assert_eq!(vis.layers.len(), 4);
        match &vis.layers[1] {
            Layer::Lines { x, y, .. } => {
                assert_eq!(x, &vec![0.0, 1.0]);
                assert_eq!(y, &vec![0.0, 1.0]);
            }
            Layer::Points { .. } => panic!("path must be drawn as lines"),
        }
        assert!(matches!(vis.layers[3], Layer::Points { .. }));

        // Rendering builds the figure without launching gnuplot
        let _figure = vis.render();
    }

    #[test]
    fn test_path_style() {
        let style = PathStyle::new(colors::RED, "Test Path").with_line_width(3.0);
        assert_eq!(style.line_width, 3.0);
        assert_eq!(style.color, colors::RED);
    }

    #[test]
    fn test_project_coordinates() {
        let states = vec![
            RealVectorState::from_vec(vec![1.0, 2.0, 3.0]),
            RealVectorState::from_vec(vec![4.0, 5.0, 6.0]),
            RealVectorState::from_vec(vec![7.0]),
        ];
        let (x, y) = project_coordinates(&states, (2, 0));
        assert_eq!(x, vec![3.0, 6.0]);
        assert_eq!(y, vec![1.0, 4.0]);
    }
}
