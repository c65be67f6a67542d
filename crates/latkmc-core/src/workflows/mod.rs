//! # Workflows Module
//!
//! The highest-level, user-facing layer: complete simulation procedures
//! built from the `core` and `engine` layers. Currently one workflow, the
//! [`growth`] run.

pub mod growth;
