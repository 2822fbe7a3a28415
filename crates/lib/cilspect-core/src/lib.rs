//! Core pipeline for cilspect.
//!
//! This crate owns the metadata extraction, mapping, and formatting
//! pipeline plus the orchestration layer that wraps every capability with
//! input validation, a bounded deadline, deterministic plain-text reports,
//! and a closed error taxonomy. The decompiler engine itself stays behind
//! the seam defined in `cilspect-engine`.

pub mod deadline;
pub mod error;
pub mod extract;
pub mod inspect;
pub mod mapper;
pub mod model;
pub mod report;
