mod difference;
mod engine;
mod intersection;
mod select;
mod union;

pub use difference::Difference;
pub use intersection::Intersection;
pub use select::{should_keep_fragment, BooleanOp, KeepDecision};
pub use union::Union;
