//! Circular layout: nodes evenly spaced on one circle, first node at the top.
//!
//! The same positions drive the renderer and the A* heuristic, so the
//! heuristic a user sees explained matches the distances on screen.

use std::f64::consts::PI;

/// Configuration for the circular layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircularLayoutConfig {
    /// Reference canvas width.
    pub width: f64,
    /// Reference canvas height.
    pub height: f64,
    /// Drawn node radius, kept inside the canvas.
    pub node_radius: f64,
}

impl Default for CircularLayoutConfig {
    fn default() -> Self {
        Self {
            width: 600.0,
            height: 450.0,
            node_radius: 18.0,
        }
    }
}

impl CircularLayoutConfig {
    /// Centre of the canvas.
    pub fn center(&self) -> (f64, f64) {
        (self.width / 2.0, self.height / 2.0)
    }

    /// Circle radius.
    pub fn radius(&self) -> f64 {
        self.width.min(self.height) / 2.3 - self.node_radius
    }

    /// Positions for `count` nodes, in node order.
    ///
    /// A single node sits at the centre.
    pub fn compute(&self, count: usize) -> Vec<(f64, f64)> {
        let (cx, cy) = self.center();
        if count == 1 {
            return vec![(cx, cy)];
        }
        let radius = self.radius();
        (0..count)
            .map(|i| {
                let angle = (i as f64 / count as f64) * 2.0 * PI - PI / 2.0;
                (cx + radius * angle.cos(), cy + radius * angle.sin())
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_empty_and_single() {
        let layout = CircularLayoutConfig::default();
        assert!(layout.compute(0).is_empty());
        assert_eq!(layout.compute(1), vec![(300.0, 225.0)]);
    }

    #[test]
    fn test_first_node_at_top() {
        let layout = CircularLayoutConfig::default();
        let positions = layout.compute(4);
        let (x, y) = positions[0];
        assert!((x - 300.0).abs() < EPS);
        assert!((y - (225.0 - layout.radius())).abs() < EPS);
    }

    #[test]
    fn test_all_on_circle() {
        let layout = CircularLayoutConfig::default();
        let (cx, cy) = layout.center();
        for (x, y) in layout.compute(7) {
            let r = ((x - cx).powi(2) + (y - cy).powi(2)).sqrt();
            assert!((r - layout.radius()).abs() < EPS);
        }
    }
}
