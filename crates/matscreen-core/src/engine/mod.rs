//! Orquestador de la cadena de filtros.
//!
//! - `ChainDefinition`: orden de steps resuelto contra el registro.
//! - `ChainEngineBuilder`: configuración y resolución temprana de nombres.
//! - `ChainEngine`: ejecución posición a posición con checkpoints.
//! - `ChainReport` / `PositionOutcome`: resumen de una ejecución.

pub mod builder;
pub mod core;
pub mod definition;
pub mod report;

pub use builder::ChainEngineBuilder;
pub use core::ChainEngine;
pub use definition::ChainDefinition;
pub use report::{ChainReport, PositionOutcome};
