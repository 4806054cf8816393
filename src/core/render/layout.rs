//! Force-directed layout for in-process drawings
//!
//! Spring-electrical model: every pair of vertices repels, every edge pulls
//! its endpoints together, and a weak gravity keeps components near the
//! centre. Vertices start on a circle, so the result is deterministic.

use crate::core::models::ImmunizationGraph;
use glam::Vec2;
use std::f32::consts::TAU;

/// Keeps coincident vertices from producing infinite forces
const MIN_DISTANCE: f32 = 0.01;

/// Pull towards the centre, relative to a vertex's distance from it
const GRAVITY: f32 = 0.05;

/// Canvas and simulation settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutSettings {
    /// Canvas width in pixels
    pub width: u32,
    /// Canvas height in pixels
    pub height: u32,
    /// Number of simulation steps
    pub iterations: u32,
    /// Drawn vertex radius; also sets the canvas margin
    pub vertex_radius: f32,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            width: 800,
            height: 800,
            iterations: 300,
            vertex_radius: 14.0,
        }
    }
}

/// Vertex positions in canvas coordinates, indexed by vertex
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    /// Centre of each vertex
    pub positions: Vec<Vec2>,
}

/// Compute positions for every vertex of `graph`
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn compute_layout(graph: &ImmunizationGraph, settings: &LayoutSettings) -> Layout {
    let width = settings.width as f32;
    let height = settings.height as f32;
    let count = graph.vertex_count();

    let mut positions = initial_positions(count, width.min(height) / 2.0);
    if count > 1 {
        let edges: Vec<(usize, usize)> = graph.edges().filter(|(a, b)| a != b).collect();
        simulate(&mut positions, &edges, width * height, settings.iterations);
    }

    let margin = settings.vertex_radius * 2.0;
    fit_to_canvas(&mut positions, width, height, margin);

    Layout { positions }
}

#[allow(clippy::cast_precision_loss)]
fn initial_positions(count: usize, radius: f32) -> Vec<Vec2> {
    (0..count)
        .map(|i| {
            let angle = TAU * i as f32 / count as f32;
            Vec2::new(angle.cos(), angle.sin()) * radius
        })
        .collect()
}

/// Repulsion between two vertices, pushing `pos1` away from `pos2`
fn repel_force(pos1: Vec2, pos2: Vec2, ideal: f32) -> Vec2 {
    let delta = pos1 - pos2;
    let distance = delta.length().max(MIN_DISTANCE);
    delta.normalize_or_zero() * (ideal * ideal / distance)
}

/// Spring attraction along an edge, pulling `pos1` towards `pos2`
fn spring_force(pos1: Vec2, pos2: Vec2, ideal: f32) -> Vec2 {
    let delta = pos2 - pos1;
    let distance = delta.length().max(MIN_DISTANCE);
    delta.normalize_or_zero() * (distance * distance / ideal)
}

#[allow(clippy::cast_precision_loss)]
fn simulate(positions: &mut [Vec2], edges: &[(usize, usize)], area: f32, iterations: u32) {
    let count = positions.len();
    let ideal = (area / count as f32).sqrt();
    let mut temperature = area.sqrt() / 10.0;
    let cooling = temperature / (iterations as f32 + 1.0);

    for _ in 0..iterations {
        let mut displacement = vec![Vec2::ZERO; count];

        for i in 0..count {
            for j in (i + 1)..count {
                let push = repel_force(positions[i], positions[j], ideal);
                displacement[i] += push;
                displacement[j] -= push;
            }
        }

        for &(a, b) in edges {
            let pull = spring_force(positions[a], positions[b], ideal);
            displacement[a] += pull;
            displacement[b] -= pull;
        }

        for (position, shift) in positions.iter_mut().zip(&displacement) {
            let shift = *shift - *position * GRAVITY;
            let length = shift.length();
            if length > 0.0 {
                *position += shift / length * length.min(temperature);
            }
        }

        temperature = (temperature - cooling).max(0.0);
    }
}

/// Scale and translate positions into `[margin, size - margin]`, keeping the aspect ratio
fn fit_to_canvas(positions: &mut [Vec2], width: f32, height: f32, margin: f32) {
    let center = Vec2::new(width / 2.0, height / 2.0);
    let Some(first) = positions.first().copied() else {
        return;
    };

    let (min, max) = positions
        .iter()
        .fold((first, first), |(min, max), p| (min.min(*p), max.max(*p)));
    let span = max - min;
    let available = Vec2::new(width - 2.0 * margin, height - 2.0 * margin).max(Vec2::ZERO);

    let scale_x = if span.x > f32::EPSILON {
        available.x / span.x
    } else {
        f32::INFINITY
    };
    let scale_y = if span.y > f32::EPSILON {
        available.y / span.y
    } else {
        f32::INFINITY
    };
    let scale = scale_x.min(scale_y);
    let scale = if scale.is_finite() { scale } else { 0.0 };

    let mid = (min + max) / 2.0;
    for position in positions.iter_mut() {
        *position = center + (*position - mid) * scale;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::Status;

    fn sample_graph() -> ImmunizationGraph {
        let mut graph = ImmunizationGraph::with_vertices(5);
        for v in 0..5 {
            graph.set_status(v, Status::from_flag(i64::try_from(v % 2).unwrap()));
        }
        graph.add_edge(0, 1);
        graph.add_edge(1, 2);
        graph.add_edge(2, 0);
        graph.add_edge(3, 4);
        graph.add_edge(4, 4);
        graph
    }

    #[test]
    fn test_positions_stay_inside_canvas() {
        let settings = LayoutSettings::default();
        let layout = compute_layout(&sample_graph(), &settings);
        let margin = settings.vertex_radius * 2.0;
        let (width, height) = (800.0, 800.0);

        assert_eq!(layout.positions.len(), 5);
        for p in &layout.positions {
            assert!(p.is_finite());
            assert!(p.x >= margin - 0.5 && p.x <= width - margin + 0.5);
            assert!(p.y >= margin - 0.5 && p.y <= height - margin + 0.5);
        }
    }

    #[test]
    fn test_layout_is_deterministic() {
        let settings = LayoutSettings::default();
        let first = compute_layout(&sample_graph(), &settings);
        let second = compute_layout(&sample_graph(), &settings);
        assert_eq!(first, second);
    }

    #[test]
    fn test_single_and_empty_graphs() {
        let settings = LayoutSettings::default();
        let empty = compute_layout(&ImmunizationGraph::with_vertices(0), &settings);
        assert!(empty.positions.is_empty());

        let single = compute_layout(&ImmunizationGraph::with_vertices(1), &settings);
        assert_eq!(single.positions, vec![Vec2::new(400.0, 400.0)]);
    }

    #[test]
    fn test_vertices_are_separated() {
        let settings = LayoutSettings::default();
        let layout = compute_layout(&sample_graph(), &settings);
        for i in 0..layout.positions.len() {
            for j in (i + 1)..layout.positions.len() {
                assert!(layout.positions[i].distance(layout.positions[j]) > 1.0);
            }
        }
    }

    #[test]
    fn test_forces_point_the_right_way() {
        let push = repel_force(Vec2::new(1.0, 0.0), Vec2::ZERO, 10.0);
        assert!(push.x > 0.0);
        let pull = spring_force(Vec2::new(1.0, 0.0), Vec2::new(5.0, 0.0), 10.0);
        assert!(pull.x > 0.0);
        assert_eq!(repel_force(Vec2::ZERO, Vec2::ZERO, 10.0), Vec2::ZERO);
    }
}
