//! # llvm-opt
//!
//! The local optimization pipeline: safety predicates, dead code
//! elimination, algebraic simplification, dominator-tree common
//! subexpression elimination, redundant load/store elimination, an
//! optional memory-to-register promotion prelude, and the driver that
//! runs the whole sequence three times per function.

pub mod cse;
pub mod dce;
pub mod driver;
pub mod mem2reg;
pub mod predicates;
pub mod redundant_load;
pub mod redundant_store;
pub mod simplify;
pub mod stats;

pub use driver::{Optimizer, OptimizerOptions};
pub use stats::Stats;
