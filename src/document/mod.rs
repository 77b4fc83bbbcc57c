//! Document model shared by the path evaluator and file I/O.

pub mod node;
