use tracing::{debug, instrument};

use crate::error::{OperationError, Result};
use crate::geometry::{Linestring, MultiLinestring, RingGroup};
use crate::overlay::{assemble_ring_groups, trace_rings, DirectedEdge, Overlay};
use crate::relation::are_bounds_disjoint;

use super::select::{should_keep_fragment, BooleanOp, KeepDecision};

/// Executes a boolean operation on two sets of oriented rings.
///
/// Orchestrates the full pipeline: planarization, fragment classification,
/// selection, ring tracing and assembly. The inputs are only read.
#[instrument(skip_all, fields(op = ?op, tolerance = tolerance))]
pub fn boolean_execute(
    a: &MultiLinestring,
    b: &MultiLinestring,
    tolerance: f64,
    op: BooleanOp,
) -> Result<Vec<RingGroup>> {
    validate_operand(a, "first")?;
    validate_operand(b, "second")?;

    // Step 1: envelope early-out
    if are_bounds_disjoint(a.envelope(), b.envelope(), tolerance) {
        return handle_disjoint(a, b, tolerance, op);
    }

    // Step 2: split both boundaries at their common nodes
    let overlay = Overlay::new(a, b, tolerance);

    // Step 3: classify and select
    let mut edges = Vec::new();
    for (i, fragment) in overlay.fragments().iter().enumerate() {
        let class = overlay.classify(i);
        match should_keep_fragment(fragment.operand, class, op) {
            KeepDecision::Keep => edges.push(DirectedEdge {
                from: fragment.from,
                to: fragment.to,
                tag: i,
            }),
            KeepDecision::KeepReversed => edges.push(DirectedEdge {
                from: fragment.to,
                to: fragment.from,
                tag: i,
            }),
            KeepDecision::Discard => {}
        }
    }
    debug!(
        kept = edges.len(),
        fragments = overlay.fragments().len(),
        "selected fragments"
    );
    if edges.is_empty() {
        return Ok(Vec::new());
    }

    // Step 4: trace and assemble
    let rings: Vec<Linestring> = trace_rings(overlay.nodes(), &edges)?
        .iter()
        .map(|ring| ring.to_linestring(overlay.nodes(), &edges))
        .collect();
    assemble_ring_groups(rings, tolerance)
}

/// Handles operands whose envelopes are apart.
fn handle_disjoint(
    a: &MultiLinestring,
    b: &MultiLinestring,
    tolerance: f64,
    op: BooleanOp,
) -> Result<Vec<RingGroup>> {
    let rings: Vec<Linestring> = match op {
        BooleanOp::Union => a.parts().iter().chain(b.parts()).cloned().collect(),
        BooleanOp::Difference => a.parts().to_vec(),
        BooleanOp::Intersection => return Ok(Vec::new()),
    };
    assemble_ring_groups(rings, tolerance)
}

fn validate_operand(lines: &MultiLinestring, name: &str) -> Result<()> {
    if !lines.parts().iter().all(Linestring::is_closed) {
        return Err(OperationError::InvalidInput(format!(
            "{name} operand of a boolean operation must consist of closed rings"
        ))
        .into());
    }
    // exteriors clockwise, holes counter-clockwise
    if lines.area_xy() <= 0.0 {
        return Err(OperationError::InvalidInput(format!(
            "{name} operand of a boolean operation must have a positive area"
        ))
        .into());
    }
    Ok(())
}
