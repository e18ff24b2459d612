//! Visualization utilities for TSP solutions.
//!
//! Generates SVG pictures of tours and convergence curves, and the
//! tsp-view text used by external plotters.

use crate::instance::TSPInstance;
use crate::solution::Solution;
use crate::tour_file::write_tsp_view;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// SVG visualization generator
pub struct Visualizer {
    /// Canvas width
    pub width: f64,
    /// Canvas height
    pub height: f64,
    /// Margin
    pub margin: f64,
    /// Node radius
    pub node_radius: f64,
    /// Draw node ids next to the nodes
    pub show_labels: bool,
}

impl Default for Visualizer {
    fn default() -> Self {
        Visualizer {
            width: 800.0,
            height: 800.0,
            margin: 50.0,
            node_radius: 4.0,
            show_labels: true,
        }
    }
}

impl Visualizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate SVG visualization of a solution
    pub fn generate_svg(&self, instance: &TSPInstance, solution: &Solution) -> String {
        let mut svg = String::new();

        let (min_x, max_x, min_y, max_y) = self.get_bounds(instance);

        let scale_x = (self.width - 2.0 * self.margin) / (max_x - min_x).max(1.0);
        let scale_y = (self.height - 2.0 * self.margin) / (max_y - min_y).max(1.0);
        let scale = scale_x.min(scale_y);

        svg.push_str(&format!(
            r##"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">
<style>
    .node {{ fill: #3498db; stroke: #2c3e50; stroke-width: 1; }}
    .start {{ fill: #e74c3c; stroke: #c0392b; stroke-width: 1; }}
    .unvisited {{ fill: #ecf0f1; stroke: #95a5a6; stroke-width: 1; }}
    .edge {{ stroke: #34495e; stroke-width: 1.5; fill: none; }}
    .label {{ font-family: Arial; font-size: 9px; fill: #2c3e50; }}
    .title {{ font-family: Arial; font-size: 14px; fill: #2c3e50; font-weight: bold; }}
</style>
<rect width="100%" height="100%" fill="#ffffff"/>
"##,
            self.width, self.height, self.width, self.height
        ));

        svg.push_str(&format!(
            r##"<text x="{}" y="25" class="title">Instance: {} | Cost: {} | Visited: {}/{} | Feasible: {}</text>
"##,
            self.margin, instance.name, solution.cost, solution.visited, instance.dimension, solution.feasible
        ));

        let transform = |x: f64, y: f64| -> (f64, f64) {
            let tx = self.margin + (x - min_x) * scale;
            let ty = self.height - self.margin - (y - min_y) * scale;
            (tx, ty)
        };

        let tour: Vec<usize> = solution.tour.iter()
            .copied()
            .filter(|&node| node < instance.dimension)
            .collect();

        if tour.len() > 1 {
            let points: Vec<String> = tour.iter()
                .map(|&node| {
                    let (x, y) = transform(instance.nodes[node].x, instance.nodes[node].y);
                    format!("{:.2},{:.2}", x, y)
                })
                .collect();
            // polygon closes the cycle
            svg.push_str(&format!(
                r#"<polygon points="{}" class="edge"/>
"#,
                points.join(" ")
            ));
        }

        let mut visited = vec![false; instance.dimension];
        for &node in &tour {
            visited[node] = true;
        }

        for node in &instance.nodes {
            let (x, y) = transform(node.x, node.y);

            let class = if tour.first() == Some(&node.id) {
                "start"
            } else if visited[node.id] {
                "node"
            } else {
                "unvisited"
            };

            svg.push_str(&format!(
                r##"<circle cx="{:.2}" cy="{:.2}" r="{}" class="{}"/>
"##,
                x, y, self.node_radius, class
            ));

            if self.show_labels {
                svg.push_str(&format!(
                    r##"<text x="{:.2}" y="{:.2}" class="label" text-anchor="middle">{}</text>
"##,
                    x, y - self.node_radius - 2.0, node.id
                ));
            }
        }

        svg.push_str("</svg>");

        svg
    }

    /// Generate the best cost per generation curve
    pub fn generate_convergence_svg(&self, history: &[i64], title: &str) -> String {
        let mut svg = String::new();

        let width = self.width;
        let height = 300.0;
        let margin = 50.0;

        svg.push_str(&format!(
            r##"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">
<style>
    .line {{ stroke: #3498db; stroke-width: 2; fill: none; }}
    .axis {{ stroke: #2c3e50; stroke-width: 1; }}
    .label {{ font-family: Arial; font-size: 12px; fill: #2c3e50; }}
    .title {{ font-family: Arial; font-size: 14px; fill: #2c3e50; font-weight: bold; }}
</style>
<rect width="100%" height="100%" fill="#ffffff"/>
"##,
            width, height, width, height
        ));

        svg.push_str(&format!(
            r#"<text x="{}" y="25" class="title">{} - {} generations</text>
"#,
            margin, title, history.len()
        ));

        svg.push_str(&format!(
            r##"<line x1="{}" y1="{}" x2="{}" y2="{}" class="axis"/>
<line x1="{}" y1="{}" x2="{}" y2="{}" class="axis"/>
"##,
            margin, height - margin, width - margin, height - margin,
            margin, margin, margin, height - margin
        ));

        if let (Some(&first), Some(&last)) = (history.first(), history.last()) {
            let hi = history.iter().copied().max().unwrap_or(first);
            let lo = history.iter().copied().min().unwrap_or(last);
            let plot_width = width - 2.0 * margin;
            let plot_height = height - 2.0 * margin;
            let x_scale = plot_width / (history.len().max(2) - 1) as f64;
            let y_scale = plot_height / ((hi - lo).max(1)) as f64;

            let mut path = String::new();
            for (i, &cost) in history.iter().enumerate() {
                let x = margin + i as f64 * x_scale;
                let y = height - margin - (cost - lo) as f64 * y_scale;

                if i == 0 {
                    path.push_str(&format!("M {:.2} {:.2}", x, y));
                } else {
                    path.push_str(&format!(" L {:.2} {:.2}", x, y));
                }
            }

            svg.push_str(&format!(r##"<path d="{}" class="line"/>
"##, path));

            svg.push_str(&format!(
                r##"<text x="{}" y="{}" class="label">{}</text>
<text x="{}" y="{}" class="label">{}</text>
"##,
                5.0, margin + 5.0, hi,
                5.0, height - margin, lo
            ));
        }

        svg.push_str("</svg>");

        svg
    }

    /// Get coordinate bounds
    fn get_bounds(&self, instance: &TSPInstance) -> (f64, f64, f64, f64) {
        if instance.nodes.is_empty() {
            return (0.0, 1.0, 0.0, 1.0);
        }

        let mut min_x = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_y = f64::NEG_INFINITY;

        for node in &instance.nodes {
            min_x = min_x.min(node.x);
            max_x = max_x.max(node.x);
            min_y = min_y.min(node.y);
            max_y = max_y.max(node.y);
        }

        (min_x, max_x, min_y, max_y)
    }

    /// Save SVG to file
    pub fn save_svg<P: AsRef<Path>>(&self, svg: &str, path: P) -> std::io::Result<()> {
        let mut file = File::create(path)?;
        file.write_all(svg.as_bytes())?;
        Ok(())
    }

    /// Export data for external plotting: the tsp-view text
    pub fn export_plot_data(&self, instance: &TSPInstance, solution: &Solution) -> String {
        let mut data = Vec::new();
        // writing into a Vec cannot fail
        let _ = write_tsp_view(&mut data, instance, &solution.tour);
        String::from_utf8_lossy(&data).into_owned()
    }
}

/// Generate comparison plot data for multiple solutions
pub fn generate_comparison_data(solutions: &[Solution]) -> String {
    let mut data = String::new();

    data.push_str("# Run Comparison\n");
    data.push_str("algorithm,cost,visited,time,iterations,feasible\n");

    for sol in solutions {
        data.push_str(&format!("{},{},{},{:.4},{},{}\n",
            sol.algorithm, sol.cost, sol.visited, sol.computation_time,
            sol.iterations.unwrap_or(0), sol.feasible));
    }

    data
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_instance() -> TSPInstance {
        TSPInstance::from_coords("test", &[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (4.0, 4.0)], 3)
    }

    #[test]
    fn test_visualizer() {
        let instance = create_test_instance();
        let solution = Solution::from_tour(&instance, vec![0, 1, 2], "test");

        let viz = Visualizer::new();
        let svg = viz.generate_svg(&instance, &solution);

        assert!(svg.starts_with("<?xml"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains("Instance: test"));
        assert!(svg.contains("<polygon"));
        assert_eq!(svg.matches("class=\"unvisited\"").count(), 1);
        assert_eq!(svg.matches("class=\"start\"").count(), 1);
    }

    #[test]
    fn test_convergence_svg() {
        let viz = Visualizer::new();
        let svg = viz.generate_convergence_svg(&[120, 110, 110, 95], "run");
        assert!(svg.contains("4 generations"));
        assert!(svg.contains("<path"));

        let empty = viz.generate_convergence_svg(&[], "run");
        assert!(!empty.contains("<path"));
    }

    #[test]
    fn test_export_plot_data() {
        let instance = create_test_instance();
        let solution = Solution::from_tour(&instance, vec![2, 0, 1], "test");
        let data = Visualizer::new().export_plot_data(&instance, &solution);

        assert_eq!(data, "4\n0 0\n1 0\n0 1\n4 4\n2\n0\n1\n");
    }

    #[test]
    fn test_comparison_data() {
        let instance = create_test_instance();
        let solution = Solution::from_tour(&instance, vec![0, 1, 2], "GA");
        let data = generate_comparison_data(&[solution]);
        assert!(data.lines().nth(2).unwrap().starts_with("GA,"));
    }
}
