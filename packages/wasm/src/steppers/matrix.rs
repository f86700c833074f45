//! Matrix walks: in-place 90° clockwise rotation of a square matrix, and
//! spiral-order traversal of any rectangular one.
//!
//! Cells are addressed by their row-major index `row * cols + col`, which is
//! also what focus ids and swap effects refer to.

use serde::{Deserialize, Serialize};

use crate::step::{Aux, Effect, Step, StepKind, StepRecorder};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MatrixMode {
    #[default]
    Rotate,
    Spiral,
}

/// Row-major flattening.
pub fn flatten(rows: &[Vec<i64>]) -> Vec<i64> {
    rows.iter().flatten().copied().collect()
}

/// Generate the step sequence for rotating `rows` (n×n) clockwise:
/// transpose, then reverse every row.
pub fn rotate_steps(rows: &[Vec<i64>]) -> Vec<Step> {
    let n = rows.len();
    let mut cells = flatten(rows);
    let mut rec = StepRecorder::new();

    let swap = |cells: &mut Vec<i64>, rec: &mut StepRecorder, a: usize, b: usize, phase: &str| {
        let message = format!(
            "{phase}: swap ({}, {}) = {} with ({}, {}) = {}",
            a / n,
            a % n,
            cells[a],
            b / n,
            b % n,
            cells[b]
        );
        cells.swap(a, b);
        rec.record(Step::new(StepKind::RotateSwap, vec![a, b], message).with_effect(Effect::Swap { a, b }));
    };

    for i in 0..n {
        for j in i + 1..n {
            swap(&mut cells, &mut rec, i * n + j, j * n + i, "Transpose");
        }
    }
    rec.emit(StepKind::Visit, Vec::new(), "Transposed, now reverse each row");
    for i in 0..n {
        for j in 0..n / 2 {
            swap(&mut cells, &mut rec, i * n + j, i * n + (n - 1 - j), "Reverse row");
        }
    }

    rec.record(
        Step::new(StepKind::Done, (0..n * n).collect(), "Rotated 90° clockwise")
            .with_aux(Aux::Array { values: cells }),
    );
    rec.finish()
}

/// Generate the step sequence for reading `rows` in clockwise spiral order,
/// peeling the top row, right column, bottom row and left column in turn.
/// Each cell gets one `visit` carrying the bounds as they stand once that
/// side is done.
pub fn spiral_steps(rows: &[Vec<i64>]) -> Vec<Step> {
    let height = rows.len();
    let width = rows.first().map_or(0, Vec::len);
    let mut rec = StepRecorder::new();
    let mut walk = Spiral {
        width,
        top: 0,
        bottom: height as i64 - 1,
        left: 0,
        right: width as i64 - 1,
        visited: Vec::with_capacity(height * width),
    };

    while walk.top <= walk.bottom && walk.left <= walk.right {
        let top = walk.top;
        for col in walk.left..=walk.right {
            walk.visit(rows, &mut rec, top, col, Side::Top);
        }
        walk.top += 1;

        let right = walk.right;
        for row in walk.top..=walk.bottom {
            walk.visit(rows, &mut rec, row, right, Side::Right);
        }
        walk.right -= 1;

        if walk.top <= walk.bottom {
            let bottom = walk.bottom;
            for col in (walk.left..=walk.right).rev() {
                walk.visit(rows, &mut rec, bottom, col, Side::Bottom);
            }
            walk.bottom -= 1;
        }

        if walk.left <= walk.right {
            let left = walk.left;
            for row in (walk.top..=walk.bottom).rev() {
                walk.visit(rows, &mut rec, row, left, Side::Left);
            }
            walk.left += 1;
        }
    }

    let order: Vec<i64> = walk
        .visited
        .iter()
        .map(|&id| rows[id / width][id % width])
        .collect();
    let listed: Vec<String> = order.iter().map(i64::to_string).collect();
    rec.record(
        Step::new(
            StepKind::Done,
            walk.visited.clone(),
            format!("Spiral order: {}", listed.join(", ")),
        )
        .with_aux(Aux::Array { values: order }),
    );
    rec.finish()
}

#[derive(Debug, Clone, Copy)]
enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

impl Side {
    fn label(self) -> &'static str {
        match self {
            Side::Top => "top row",
            Side::Right => "right column",
            Side::Bottom => "bottom row",
            Side::Left => "left column",
        }
    }
}

struct Spiral {
    width: usize,
    top: i64,
    bottom: i64,
    left: i64,
    right: i64,
    visited: Vec<usize>,
}

impl Spiral {
    fn visit(&mut self, rows: &[Vec<i64>], rec: &mut StepRecorder, row: i64, col: i64, side: Side) {
        let (r, c) = (row as usize, col as usize);
        let id = r * self.width + c;
        self.visited.push(id);
        rec.record(
            Step::new(
                StepKind::Visit,
                vec![id],
                format!("Visit ({r}, {c}) = {} along the {}", rows[r][c], side.label()),
            )
            .with_aux(self.bounds_after(side)),
        );
    }

    /// Bounds once `side` is finished.
    fn bounds_after(&self, side: Side) -> Aux {
        let (mut top, mut bottom, mut left, mut right) = (self.top, self.bottom, self.left, self.right);
        match side {
            Side::Top => top += 1,
            Side::Right => right -= 1,
            Side::Bottom => bottom -= 1,
            Side::Left => left += 1,
        }
        Aux::Spiral {
            top,
            bottom,
            left,
            right,
            visited: self.visited.clone(),
        }
    }
}
