//! Steps de la cadena.
//!
//! Un Step recibe la colección del artifact anterior y devuelve la
//! colección del siguiente, junto con los registros que no pudo procesar.
//! Este módulo define:
//! - `Step`, `StepKind`, `StepContext` y `StepOutput`.
//! - `StepRegistry`: tabla inmutable nombre → step.
//! - Steps genéricos (`PredicateFilter`, `FnStep`, `BatchMapStep`).
//! - `ProgressTicker` para el reporte de progreso.

pub mod definition;
pub mod helpers;
pub mod progress;
pub mod registry;

pub use definition::{Step, StepContext, StepKind, StepOutput};
pub use helpers::{BatchMapStep, FnStep, PredicateFilter};
pub use progress::ProgressTicker;
pub use registry::{StepRegistry, StepRegistryBuilder};
