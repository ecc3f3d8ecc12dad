//! Ciclo de vida del pool compartido. Un único test en su propio binario:
//! el pool es estado global del proceso.

use matscreen_core::batch::{initialize, is_initialized, shared_pool, BatchExecutor, BatchHooks, BatchOutcome};
use matscreen_core::errors::{BatchError, TaskError};

fn double(n: u32) -> Result<BatchOutcome<u32>, TaskError> {
    Ok(BatchOutcome::Value(n * 2))
}

#[test]
fn shared_pool_lifecycle() {
    let exec = BatchExecutor::shared();

    assert!(!is_initialized());
    let err = exec.run(double, vec![1, 2], 2, BatchHooks::none()).unwrap_err();
    assert!(matches!(err, BatchError::NotInitialized));

    let guard = initialize(2).expect("first initialize");
    assert!(is_initialized());
    assert!(matches!(initialize(2), Err(BatchError::AlreadyInitialized)));
    assert_eq!(shared_pool().expect("pool").workers(), 2);
    assert_eq!(exec.run(double, vec![1, 2, 3], 2, BatchHooks::none()).unwrap(), vec![Some(2), Some(4), Some(6)]);

    drop(guard);
    assert!(!is_initialized());
    assert!(matches!(exec.run(double, vec![1], 1, BatchHooks::none()), Err(BatchError::NotInitialized)));

    // Tras soltar el guard se puede volver a inicializar.
    let guard = initialize(1).expect("re-initialize");
    guard.shutdown();
    assert!(!is_initialized());
}
