//! Reading and writing tours.
//!
//! Two text formats are supported: TSPLIB `TOUR` files (1-based ids,
//! closed by `-1` and `EOF`) and the tsp-view format read by plotting
//! tools (node count, coordinates, then the 0-based visited ids).

use crate::instance::TSPInstance;
use crate::solution::Solution;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufWriter, Write};
use std::path::Path;

/// How a final tour is written out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Nothing is written
    None,
    /// TSPLIB `TOUR` file
    Tsplib,
    /// tsp-view plot input
    TspView,
    /// The serialized `Solution`
    Json,
}

/// Read a TSPLIB tour for an instance of `dimension` nodes.
///
/// Returns the 0-based visited ids. A tour shorter than `dimension` is
/// returned as is; checking it against the instance is left to the caller.
pub fn read_tour<R: BufRead>(reader: R, dimension: usize) -> Result<Vec<usize>, String> {
    let mut tour = Vec::new();
    let mut in_section = false;

    'lines: for line in reader.lines() {
        let line = line.map_err(|e| format!("Read error: {}", e))?;
        let line = line.trim();

        if line.is_empty() {
            continue;
        }
        if line == "EOF" {
            break;
        }

        if !in_section {
            if line.starts_with("TOUR_SECTION") {
                in_section = true;
                continue;
            }

            let tokens: Vec<&str> = line.split(|c: char| c == ':' || c.is_whitespace())
                .filter(|t| !t.is_empty())
                .collect();
            if tokens.len() < 2 {
                continue;
            }
            match tokens[0] {
                "TYPE" if tokens[1] != "TOUR" => {
                    return Err(format!("Unsupported tour type: {}", tokens[1]));
                }
                "DIMENSION" => {
                    let declared: usize = tokens[1].parse()
                        .map_err(|_| format!("Invalid tour dimension: {}", tokens[1]))?;
                    if declared != dimension {
                        return Err(format!(
                            "Tour dimension {} does not match the instance ({})",
                            declared, dimension
                        ));
                    }
                }
                _ => {}
            }
            continue;
        }

        for token in line.split_whitespace() {
            if token == "EOF" {
                break 'lines;
            }
            let id: i64 = token.parse()
                .map_err(|_| format!("Invalid tour entry: {}", token))?;
            if id == -1 {
                break 'lines;
            }
            if id < 1 || id as usize > dimension {
                return Err(format!("Tour node {} is outside [1, {}]", id, dimension));
            }
            if tour.len() == dimension {
                return Err(format!("Tour has more than {} entries", dimension));
            }
            tour.push(id as usize - 1);
        }
    }

    if !in_section {
        return Err("Missing TOUR_SECTION".to_string());
    }
    Ok(tour)
}

/// Read a TSPLIB tour from a file
pub fn read_tour_file<P: AsRef<Path>>(path: P, dimension: usize) -> Result<Vec<usize>, String> {
    let file = File::open(&path)
        .map_err(|e| format!("Cannot open tour file: {}", e))?;
    read_tour(std::io::BufReader::new(file), dimension)
}

/// Write a TSPLIB tour, rotated so that node 0 comes first when visited
pub fn write_tsplib_tour<W: Write>(out: &mut W, instance: &TSPInstance, tour: &[usize]) -> std::io::Result<()> {
    writeln!(out, "NAME : {}", instance.name)?;
    writeln!(out, "COMMENT : tour_length={}", instance.tour_cost(tour))?;
    writeln!(out, "TYPE : TOUR")?;
    writeln!(out, "DIMENSION : {}", instance.dimension)?;
    writeln!(out, "TOUR_SECTION")?;

    let start = tour.iter().position(|&node| node == 0).unwrap_or(0);
    for &node in tour[start..].iter().chain(&tour[..start]) {
        writeln!(out, "{}", node + 1)?;
    }

    writeln!(out, "-1")?;
    writeln!(out, "EOF")
}

/// Write the tsp-view plot input: node count, coordinates, visited ids
pub fn write_tsp_view<W: Write>(out: &mut W, instance: &TSPInstance, tour: &[usize]) -> std::io::Result<()> {
    writeln!(out, "{}", instance.dimension)?;
    for node in &instance.nodes {
        writeln!(out, "{} {}", node.x, node.y)?;
    }
    for &node in tour {
        writeln!(out, "{}", node)?;
    }
    Ok(())
}

/// Write a solution to `path` in the requested format
pub fn write_solution<P: AsRef<Path>>(
    path: P,
    format: OutputFormat,
    instance: &TSPInstance,
    solution: &Solution,
) -> std::io::Result<()> {
    if format == OutputFormat::None {
        return Ok(());
    }

    let mut out = BufWriter::new(File::create(path)?);
    match format {
        OutputFormat::None => {}
        OutputFormat::Tsplib => write_tsplib_tour(&mut out, instance, &solution.tour)?,
        OutputFormat::TspView => write_tsp_view(&mut out, instance, &solution.tour)?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, solution)?;
            writeln!(out)?;
        }
    }
    out.flush()
}
