//! Module for parsing and representing Euclidean TSP instances.
//!
//! This module handles the TSP-LIB format files (`TYPE : TSP`, `EDGE_WEIGHT_TYPE : EUC_2D`)
//! extended with a `MIN_NODE_NUM` header, the minimum number of nodes a tour must visit.
//! It also provides the distance/cost oracle every solver in this crate relies on.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use serde::{Deserialize, Serialize};

/// Represents a node of the instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Node identifier (1-indexed in files, 0-indexed internally)
    pub id: usize,
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
}

impl Node {
    pub fn new(id: usize, x: f64, y: f64) -> Self {
        Node { id, x, y }
    }
}

/// Represents a complete TSP instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TSPInstance {
    /// Name of the instance
    pub name: String,
    /// Comment/description
    pub comment: String,
    /// Number of nodes
    pub dimension: usize,
    /// Minimum number of nodes a feasible tour must contain
    pub min_node_num: usize,
    /// List of all nodes
    pub nodes: Vec<Node>,
}

/// Splits a header line the way TSPLIB files are laid out: `KEY : value`.
fn header_tokens(line: &str) -> Vec<&str> {
    line.split(|c: char| c == ':' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .collect()
}

impl TSPInstance {
    /// Build an instance directly from coordinates
    pub fn from_coords(name: &str, coords: &[(f64, f64)], min_node_num: usize) -> Self {
        let nodes = coords.iter()
            .enumerate()
            .map(|(id, &(x, y))| Node::new(id, x, y))
            .collect::<Vec<_>>();

        TSPInstance {
            name: name.to_string(),
            comment: String::new(),
            dimension: nodes.len(),
            min_node_num: min_node_num.min(nodes.len()),
            nodes,
        }
    }

    /// Parse an instance from a TSP-LIB format file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let file = File::open(&path)
            .map_err(|e| format!("Cannot open file: {}", e))?;
        Self::from_reader(BufReader::new(file))
    }

    /// Parse an instance from TSP-LIB text
    pub fn parse(text: &str) -> Result<Self, String> {
        Self::from_reader(text.as_bytes())
    }

    /// Parse an instance from any buffered reader (a file, stdin, ...)
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, String> {
        let mut name = String::new();
        let mut comment = String::new();
        let mut problem_type = String::new();
        let mut edge_weight_type = String::new();
        let mut dimension: Option<usize> = None;
        let mut min_node_num: Option<usize> = None;
        let mut in_coords = false;
        let mut nodes: Vec<Node> = Vec::new();

        for line in reader.lines() {
            let line = line.map_err(|e| format!("Read error: {}", e))?;
            let line = line.trim();

            if line.is_empty() {
                continue;
            }
            if line == "EOF" {
                break;
            }

            if !in_coords {
                if line.starts_with("NODE_COORD_SECTION") {
                    in_coords = true;
                    continue;
                }

                let tokens = header_tokens(line);
                if tokens.len() < 2 {
                    continue;
                }
                match tokens[0] {
                    "NAME" => name = tokens[1].to_string(),
                    "COMMENT" => comment = tokens[1..].join(" "),
                    "TYPE" => problem_type = tokens[1].to_string(),
                    "EDGE_WEIGHT_TYPE" => edge_weight_type = tokens[1].to_string(),
                    "DIMENSION" => {
                        dimension = Some(tokens[1].parse().map_err(|_| "Invalid dimension")?);
                    }
                    "MIN_NODE_NUM" => {
                        min_node_num = Some(tokens[1].parse().map_err(|_| "Invalid minimum node count")?);
                    }
                    _ => {}
                }
                continue;
            }

            let dimension = dimension.ok_or("Missing DIMENSION before NODE_COORD_SECTION")?;
            if nodes.len() == dimension {
                break;
            }

            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() < 3 {
                return Err(format!("Invalid coordinate line: {}", line));
            }
            let x: f64 = parts[1].parse().map_err(|_| "Invalid x coordinate")?;
            let y: f64 = parts[2].parse().map_err(|_| "Invalid y coordinate")?;
            nodes.push(Node::new(nodes.len(), x, y));
        }

        if problem_type != "TSP" || edge_weight_type != "EUC_2D" {
            return Err(format!(
                "Invalid instance: expected TYPE TSP and EDGE_WEIGHT_TYPE EUC_2D, found '{}' and '{}'",
                problem_type, edge_weight_type
            ));
        }

        let dimension = dimension.ok_or("Missing DIMENSION")?;
        if dimension == 0 {
            return Err("Invalid dimension: instance has no nodes".to_string());
        }
        if nodes.len() != dimension {
            return Err(format!(
                "Invalid instance: expected {} coordinate lines, found {}",
                dimension,
                nodes.len()
            ));
        }

        let min_node_num = min_node_num.unwrap_or(dimension);
        if min_node_num > dimension {
            return Err(format!(
                "Invalid instance: MIN_NODE_NUM {} exceeds DIMENSION {}",
                min_node_num, dimension
            ));
        }

        Ok(TSPInstance {
            name,
            comment,
            dimension,
            min_node_num,
            nodes,
        })
    }

    /// Get the rounded Euclidean distance between two nodes
    #[inline]
    pub fn distance(&self, i: usize, j: usize) -> i64 {
        let dx = self.nodes[i].x - self.nodes[j].x;
        let dy = self.nodes[i].y - self.nodes[j].y;
        (dx * dx + dy * dy).sqrt().round() as i64
    }

    /// Calculate total tour length, closing the cycle back to the first node.
    ///
    /// `tour` is the visited prefix: a partial tour simply stops earlier.
    pub fn tour_cost(&self, tour: &[usize]) -> i64 {
        if tour.len() < 2 {
            return 0;
        }

        let length: i64 = tour.windows(2)
            .map(|w| self.distance(w[0], w[1]))
            .sum();

        length + self.distance(tour[tour.len() - 1], tour[0])
    }

    /// Verify if a tour is feasible: valid node ids, no repeated visit,
    /// and at least `min_node_num` nodes visited
    pub fn is_feasible(&self, tour: &[usize]) -> bool {
        let mut visited = vec![false; self.dimension];

        for &node in tour {
            if node >= self.dimension || visited[node] {
                return false;
            }
            visited[node] = true;
        }

        tour.len() >= self.min_node_num
    }

    /// The natural order route `0, 1, ..., n-1`
    pub fn identity_tour(&self) -> Vec<usize> {
        (0..self.dimension).collect()
    }

    /// Get statistics about the instance
    pub fn statistics(&self) -> InstanceStatistics {
        let mut min_x = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_y = f64::NEG_INFINITY;

        for node in &self.nodes {
            min_x = min_x.min(node.x);
            max_x = max_x.max(node.x);
            min_y = min_y.min(node.y);
            max_y = max_y.max(node.y);
        }

        let mut total = 0i64;
        let mut pairs = 0usize;
        let mut max_distance = 0i64;
        for i in 0..self.dimension {
            for j in i + 1..self.dimension {
                let d = self.distance(i, j);
                total += d;
                max_distance = max_distance.max(d);
                pairs += 1;
            }
        }
        let avg_distance = if pairs > 0 { total as f64 / pairs as f64 } else { 0.0 };

        InstanceStatistics {
            name: self.name.clone(),
            dimension: self.dimension,
            min_node_num: self.min_node_num,
            bounds: (min_x, max_x, min_y, max_y),
            avg_distance,
            max_distance,
            identity_cost: self.tour_cost(&self.identity_tour()),
        }
    }
}

/// Statistics about a TSP instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceStatistics {
    pub name: String,
    pub dimension: usize,
    pub min_node_num: usize,
    /// (min_x, max_x, min_y, max_y)
    pub bounds: (f64, f64, f64, f64),
    pub avg_distance: f64,
    pub max_distance: i64,
    pub identity_cost: i64,
}

impl std::fmt::Display for InstanceStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Instance: {}", self.name)?;
        writeln!(f, "  Nodes: {}", self.dimension)?;
        writeln!(f, "  Minimum nodes per tour: {}", self.min_node_num)?;
        writeln!(f, "  X range: [{}, {}]", self.bounds.0, self.bounds.1)?;
        writeln!(f, "  Y range: [{}, {}]", self.bounds.2, self.bounds.3)?;
        writeln!(f, "  Avg distance: {:.2}", self.avg_distance)?;
        writeln!(f, "  Max distance: {}", self.max_distance)?;
        writeln!(f, "  Identity tour cost: {}", self.identity_cost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL: &str = "NAME : small5
COMMENT : five points
TYPE : TSP
DIMENSION : 5
EDGE_WEIGHT_TYPE : EUC_2D
MIN_NODE_NUM : 3
NODE_COORD_SECTION
1 0 0
2 0 10
3 10 10
4 10 0
5 0 5
EOF
";

    #[test]
    fn test_parse_instance() {
        let instance = TSPInstance::parse(SMALL).unwrap();

        assert_eq!(instance.name, "small5");
        assert_eq!(instance.comment, "five points");
        assert_eq!(instance.dimension, 5);
        assert_eq!(instance.min_node_num, 3);
        assert_eq!(instance.nodes[2].x, 10.0);
        assert_eq!(instance.nodes[4].y, 5.0);
        assert_eq!(instance.nodes[4].id, 4);
    }

    #[test]
    fn test_missing_min_node_num_means_all_nodes() {
        let text = SMALL.replace("MIN_NODE_NUM : 3\n", "");
        let instance = TSPInstance::parse(&text).unwrap();
        assert_eq!(instance.min_node_num, 5);
    }

    #[test]
    fn test_rejects_invalid_instances() {
        assert!(TSPInstance::parse(&SMALL.replace("EUC_2D", "GEO")).is_err());
        assert!(TSPInstance::parse(&SMALL.replace("TYPE : TSP", "TYPE : TOUR")).is_err());
        assert!(TSPInstance::parse(&SMALL.replace("DIMENSION : 5", "DIMENSION : 6")).is_err());
        assert!(TSPInstance::parse(&SMALL.replace("MIN_NODE_NUM : 3", "MIN_NODE_NUM : 9")).is_err());
        assert!(TSPInstance::parse(&SMALL.replace("3 10 10", "3 ten 10")).is_err());
    }

    #[test]
    fn test_distance_calculation() {
        let instance = TSPInstance::from_coords("t", &[(0.0, 0.0), (3.0, 4.0), (1.0, 1.0)], 3);

        assert_eq!(instance.distance(0, 1), 5);
        assert_eq!(instance.distance(1, 0), 5);
        assert_eq!(instance.distance(1, 1), 0);
        // sqrt(2) rounds down, sqrt(13) rounds up
        assert_eq!(instance.distance(0, 2), 1);
        assert_eq!(instance.distance(1, 2), 4);
    }

    #[test]
    fn test_tour_cost() {
        let instance = TSPInstance::from_coords(
            "square",
            &[(0.0, 0.0), (0.0, 10.0), (10.0, 10.0), (10.0, 0.0)],
            2,
        );

        assert_eq!(instance.tour_cost(&[0, 1, 2, 3]), 40);
        assert_eq!(instance.tour_cost(&[0, 2, 1, 3]), 48);
        // partial tour closes back to its first node
        assert_eq!(instance.tour_cost(&[0, 1]), 20);
        assert_eq!(instance.tour_cost(&[2]), 0);
        assert_eq!(instance.tour_cost(&[]), 0);
    }

    #[test]
    fn test_feasibility() {
        let instance = TSPInstance::parse(SMALL).unwrap();

        assert!(instance.is_feasible(&[0, 1, 2, 3, 4]));
        assert!(instance.is_feasible(&[4, 2, 0]));
        assert!(!instance.is_feasible(&[0, 1]));
        assert!(!instance.is_feasible(&[0, 1, 1]));
        assert!(!instance.is_feasible(&[0, 1, 5]));
    }

    #[test]
    fn test_statistics() {
        let instance = TSPInstance::parse(SMALL).unwrap();
        let stats = instance.statistics();

        assert_eq!(stats.dimension, 5);
        assert_eq!(stats.max_distance, 14);
        assert_eq!(stats.bounds, (0.0, 10.0, 0.0, 10.0));
        assert_eq!(stats.identity_cost, instance.tour_cost(&[0, 1, 2, 3, 4]));
        assert!(stats.to_string().contains("small5"));
    }
}
