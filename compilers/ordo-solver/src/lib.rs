pub mod linearize;
pub mod sampling;
pub mod side;
pub mod tree;

pub use linearize::{linearize, Linearization, Linearizer};
pub use sampling::{sample_grammar, SAMPLE_SPREAD};
pub use side::{logistic, resolve_side, OrderingMode, Side};
pub use tree::DependencyTree;
