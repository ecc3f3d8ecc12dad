//! matscreen-filters: steps de cribado de materiales.
//!
//! - `elements` / `formula`: tabla periódica mínima y parser de fórmulas.
//! - `steps`: filtros de composición y steps de estructuras CIF.
//! - `registry`: `StepRegistry` con todos los steps disponibles.

pub mod elements;
pub mod formula;
pub mod registry;
pub mod steps;

pub use formula::{Composition, FormulaError};
pub use registry::{default_registry, FilterSettings};
