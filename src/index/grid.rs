use crate::geometry::Envelope;

use super::SegmentIndex;

/// Uniform grid over segment envelopes.
///
/// Each segment is registered in every cell its envelope overlaps. A query
/// visits the cells overlapping the (tolerance-expanded) query box and
/// reports each segment once.
#[derive(Debug, Clone)]
pub struct SegmentGrid {
    extent: Envelope,
    cell_width: f64,
    cell_height: f64,
    cols: usize,
    rows: usize,
    cells: Vec<Vec<usize>>,
    envelopes: Vec<Envelope>,
}

impl SegmentGrid {
    /// Builds a grid with `cells_per_axis` columns and rows over the extent
    /// of all envelopes. Axes without extent get a single cell.
    #[must_use]
    pub fn build(envelopes: Vec<Envelope>, cells_per_axis: usize) -> Self {
        let mut extent = Envelope::empty();
        for env in &envelopes {
            extent.expand_to_include(env);
        }

        let cells_per_axis = cells_per_axis.max(1);
        let (cols, cell_width) = axis_layout(extent.width(), cells_per_axis);
        let (rows, cell_height) = axis_layout(extent.height(), cells_per_axis);

        let mut grid = Self {
            extent,
            cell_width,
            cell_height,
            cols,
            rows,
            cells: vec![Vec::new(); if extent.is_empty() { 0 } else { cols * rows }],
            envelopes,
        };

        for i in 0..grid.envelopes.len() {
            let env = grid.envelopes[i];
            if let Some((c0, c1, r0, r1)) = grid.cell_range(&env) {
                for r in r0..=r1 {
                    for c in c0..=c1 {
                        grid.cells[r * grid.cols + c].push(i);
                    }
                }
            }
        }
        grid
    }

    /// Number of cells holding at least one segment.
    #[must_use]
    pub fn occupied_cell_count(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_empty()).count()
    }

    /// Inclusive column and row range covered by `env`, clamped to the grid.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn cell_range(&self, env: &Envelope) -> Option<(usize, usize, usize, usize)> {
        if self.cells.is_empty() || !self.extent.intersects_xy(env, 0.0) {
            return None;
        }
        let col = |x: f64| -> usize {
            let c = ((x - self.extent.min.x) / self.cell_width).floor();
            (c.max(0.0) as usize).min(self.cols - 1)
        };
        let row = |y: f64| -> usize {
            let r = ((y - self.extent.min.y) / self.cell_height).floor();
            (r.max(0.0) as usize).min(self.rows - 1)
        };
        Some((col(env.min.x), col(env.max.x), row(env.min.y), row(env.max.y)))
    }
}

#[allow(clippy::cast_precision_loss)]
fn axis_layout(extent: f64, cells: usize) -> (usize, f64) {
    if extent > 0.0 {
        (cells, extent / cells as f64)
    } else {
        (1, 1.0)
    }
}

impl SegmentIndex for SegmentGrid {
    fn search<'a>(
        &'a self,
        query: &Envelope,
        tolerance: f64,
    ) -> Box<dyn Iterator<Item = usize> + 'a> {
        let query = query.expanded_by(tolerance);
        let Some((c0, c1, r0, r1)) = self.cell_range(&query) else {
            return Box::new(std::iter::empty());
        };

        let cols = self.cols;
        let mut seen = vec![false; self.envelopes.len()];
        Box::new(
            (r0..=r1)
                .flat_map(move |r| (c0..=c1).map(move |c| r * cols + c))
                .flat_map(move |cell| self.cells[cell].iter().copied())
                .filter(move |&i| {
                    if seen[i] {
                        return false;
                    }
                    seen[i] = true;
                    self.envelopes[i].intersects_xy(&query, 0.0)
                }),
        )
    }

    fn len(&self) -> usize {
        self.envelopes.len()
    }
}
