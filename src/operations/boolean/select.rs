use crate::overlay::{FragmentClass, Operand};

/// The type of boolean operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooleanOp {
    Union,
    Difference,
    Intersection,
}

/// Decision about whether to keep a fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeepDecision {
    Keep,
    KeepReversed,
    Discard,
}

/// Determines whether a fragment should be kept based on its classification
/// relative to the other operand and the boolean operation.
///
/// | Fragment | vs other operand   | Union   | Difference (A-B) | Intersection |
/// |----------|--------------------|---------|------------------|--------------|
/// | from A   | OUTSIDE B          | keep    | keep             | discard      |
/// | from A   | INSIDE B           | discard | discard          | keep         |
/// | from B   | OUTSIDE A          | keep    | discard          | discard      |
/// | from B   | INSIDE A           | discard | keep (reversed)  | keep         |
/// | from A   | coincident, same   | keep    | discard          | keep         |
/// | from A   | coincident, opposite | discard | keep           | discard      |
/// | from B   | coincident         | discard | discard          | discard      |
#[allow(clippy::match_same_arms)]
#[must_use]
pub fn should_keep_fragment(operand: Operand, class: FragmentClass, op: BooleanOp) -> KeepDecision {
    match (operand, class, op) {
        // Fragment from A, classified vs B
        (Operand::A, FragmentClass::Outside, BooleanOp::Union) => KeepDecision::Keep,
        (Operand::A, FragmentClass::Outside, BooleanOp::Difference) => KeepDecision::Keep,
        (Operand::A, FragmentClass::Outside, BooleanOp::Intersection) => KeepDecision::Discard,

        (Operand::A, FragmentClass::Inside, BooleanOp::Union) => KeepDecision::Discard,
        (Operand::A, FragmentClass::Inside, BooleanOp::Difference) => KeepDecision::Discard,
        (Operand::A, FragmentClass::Inside, BooleanOp::Intersection) => KeepDecision::Keep,

        // Fragment from B, classified vs A
        (Operand::B, FragmentClass::Outside, BooleanOp::Union) => KeepDecision::Keep,
        (Operand::B, FragmentClass::Outside, BooleanOp::Difference) => KeepDecision::Discard,
        (Operand::B, FragmentClass::Outside, BooleanOp::Intersection) => KeepDecision::Discard,

        (Operand::B, FragmentClass::Inside, BooleanOp::Union) => KeepDecision::Discard,
        (Operand::B, FragmentClass::Inside, BooleanOp::Difference) => KeepDecision::KeepReversed,
        (Operand::B, FragmentClass::Inside, BooleanOp::Intersection) => KeepDecision::Keep,

        // Shared boundary: A's copy stands for both
        (Operand::A, FragmentClass::CoincidentSame, BooleanOp::Union) => KeepDecision::Keep,
        (Operand::A, FragmentClass::CoincidentSame, BooleanOp::Difference) => {
            KeepDecision::Discard
        }
        (Operand::A, FragmentClass::CoincidentSame, BooleanOp::Intersection) => {
            KeepDecision::Keep
        }

        (Operand::A, FragmentClass::CoincidentOpposite, BooleanOp::Union) => {
            KeepDecision::Discard
        }
        (Operand::A, FragmentClass::CoincidentOpposite, BooleanOp::Difference) => {
            KeepDecision::Keep
        }
        (Operand::A, FragmentClass::CoincidentOpposite, BooleanOp::Intersection) => {
            KeepDecision::Discard
        }

        (Operand::B, FragmentClass::CoincidentSame | FragmentClass::CoincidentOpposite, _) => {
            KeepDecision::Discard
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_keeps_outside_fragments() {
        assert_eq!(
            should_keep_fragment(Operand::A, FragmentClass::Outside, BooleanOp::Union),
            KeepDecision::Keep
        );
        assert_eq!(
            should_keep_fragment(Operand::B, FragmentClass::Outside, BooleanOp::Union),
            KeepDecision::Keep
        );
    }

    #[test]
    fn union_discards_inside_fragments() {
        assert_eq!(
            should_keep_fragment(Operand::A, FragmentClass::Inside, BooleanOp::Union),
            KeepDecision::Discard
        );
        assert_eq!(
            should_keep_fragment(Operand::B, FragmentClass::Inside, BooleanOp::Union),
            KeepDecision::Discard
        );
    }

    #[test]
    fn difference_keeps_a_outside_discards_b_outside() {
        assert_eq!(
            should_keep_fragment(Operand::A, FragmentClass::Outside, BooleanOp::Difference),
            KeepDecision::Keep
        );
        assert_eq!(
            should_keep_fragment(Operand::B, FragmentClass::Outside, BooleanOp::Difference),
            KeepDecision::Discard
        );
    }

    #[test]
    fn difference_reverses_b_inside() {
        assert_eq!(
            should_keep_fragment(Operand::B, FragmentClass::Inside, BooleanOp::Difference),
            KeepDecision::KeepReversed
        );
    }

    #[test]
    fn intersection_keeps_inside_fragments() {
        assert_eq!(
            should_keep_fragment(Operand::A, FragmentClass::Inside, BooleanOp::Intersection),
            KeepDecision::Keep
        );
        assert_eq!(
            should_keep_fragment(Operand::B, FragmentClass::Inside, BooleanOp::Intersection),
            KeepDecision::Keep
        );
    }

    #[test]
    fn shared_boundary_is_kept_once() {
        for op in [BooleanOp::Union, BooleanOp::Difference, BooleanOp::Intersection] {
            let a_same = should_keep_fragment(Operand::A, FragmentClass::CoincidentSame, op);
            let a_opposite = should_keep_fragment(Operand::A, FragmentClass::CoincidentOpposite, op);
            // exactly one of the two coincident cases keeps A's edge
            assert_ne!(a_same, a_opposite, "{op:?}");
            for class in [FragmentClass::CoincidentSame, FragmentClass::CoincidentOpposite] {
                assert_eq!(should_keep_fragment(Operand::B, class, op), KeepDecision::Discard);
            }
        }
    }
}
