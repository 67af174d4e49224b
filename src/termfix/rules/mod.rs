//! # Classification Rules
//!
//! Pure heuristics that turn a raw failed-search term into a classification.
//! Every function here is total: any string (including the empty one) yields a result.
//!
//! The rules run in a fixed order and the order is part of their meaning:
//!
//! 1. [`detect`]: which defects the term shows, in rule-declaration order
//! 2. [`categorize`]: the single primary category (issue-derived beats keyword-derived)
//! 3. [`advise`]: a human-readable recommendation
//! 4. [`normalize`]: the automatically cleaned replacement term
//! 5. [`priority`]: how urgent the fix is, from the failed-search count
//!
//! The record builder in [`crate::records`] wires them together.

pub mod advise;
pub mod categorize;
pub mod detect;
pub mod normalize;
pub mod priority;

pub use advise::suggested_fix;
pub use categorize::categorize;
pub use detect::detect_issues;
pub use normalize::normalize;
pub use priority::rank;
