use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use matscreen_core::batch::{batched, BatchExecutor, BatchHooks, BatchOutcome, WorkerPool};
use matscreen_core::errors::{BatchError, TaskError};

fn executor(workers: usize) -> BatchExecutor {
    BatchExecutor::with_pool(Arc::new(WorkerPool::new(workers).expect("pool")))
}

fn tuples() -> Vec<(u64, u64)> {
    (0..13).map(|i| (i, i + 1)).collect()
}

fn multiply((a, b): (u64, u64)) -> Result<BatchOutcome<u64>, TaskError> {
    // Invierte el orden de finalización dentro de cada lote.
    thread::sleep(Duration::from_millis(20 - a.min(19)));
    Ok(BatchOutcome::Value(a * b))
}

const PRODUCTS: [u64; 13] = [0, 2, 6, 12, 20, 30, 42, 56, 72, 90, 110, 132, 156];

#[test]
fn results_follow_input_order_for_any_batch_size() {
    let exec = executor(4);
    for batch_size in [1, 2, 3, 13, 18] {
        let out = exec.run(multiply, tuples(), batch_size, BatchHooks::none()).expect("run");
        let values: Vec<u64> = out.into_iter().map(|v| v.expect("value slot")).collect();
        assert_eq!(values, PRODUCTS.to_vec(), "batch_size={batch_size}");
    }
}

#[test]
fn on_batch_sees_each_batch_once_in_order() {
    let mut seen: Vec<Vec<u64>> = Vec::new();
    let out = executor(3).run(multiply,
                              tuples(),
                              3,
                              BatchHooks::none().on_batch(|batch: &[Option<u64>]| {
                                                    seen.push(batch.iter().map(|v| v.unwrap_or(u64::MAX)).collect())
                                                }))
                         .expect("run");
    assert_eq!(seen.iter().map(Vec::len).collect::<Vec<_>>(), vec![3, 3, 3, 3, 1]);
    assert_eq!(seen.concat(), PRODUCTS.to_vec());
    assert_eq!(out.len(), 13);
}

#[test]
fn on_item_fires_once_per_task() {
    let mut items = 0usize;
    executor(2).run(multiply, tuples(), 5, BatchHooks::none().on_item(|_| items += 1))
               .expect("run");
    assert_eq!(items, 13);
}

#[test]
fn empty_slots_are_kept_and_excluded_items_dropped() {
    let out = executor(2).run(|n: u32| {
                                  let outcome = match n % 3 {
                                      0 => BatchOutcome::Value(n),
                                      1 => BatchOutcome::Empty,
                                      _ => BatchOutcome::Excluded,
                                  };
                                  Ok::<_, TaskError>(outcome)
                              },
                              (0..7).collect(),
                              2,
                              BatchHooks::none())
                         .expect("run");
    // 0 v, 1 empty, 2 excl, 3 v, 4 empty, 5 excl, 6 v
    assert_eq!(out, vec![Some(0), None, Some(3), None, Some(6)]);
}

#[test]
fn on_batch_sees_empty_slots_but_not_excluded_items() {
    let mut seen: Vec<Vec<Option<u32>>> = Vec::new();
    let out = executor(3).run(|n: u32| {
                                  let outcome = match n % 3 {
                                      0 => BatchOutcome::Value(n),
                                      1 => BatchOutcome::Empty,
                                      _ => BatchOutcome::Excluded,
                                  };
                                  Ok::<_, TaskError>(outcome)
                              },
                              (0..7).collect(),
                              3,
                              BatchHooks::none().on_batch(|batch: &[Option<u32>]| seen.push(batch.to_vec())))
                         .expect("run");
    // lotes [0,1,2] [3,4,5] [6]
    assert_eq!(seen, vec![vec![Some(0), None], vec![Some(3), None], vec![Some(6)]]);
    assert_eq!(seen.concat(), out);
}

#[test]
fn task_error_carries_global_index() {
    let err = executor(2).run(|n: usize| {
                                  if n == 7 {
                                      Err::<BatchOutcome<usize>, TaskError>("bad input".into())
                                  } else {
                                      Ok(BatchOutcome::Value(n))
                                  }
                              },
                              (0..10).collect(),
                              3,
                              BatchHooks::none())
                         .unwrap_err();
    match err {
        BatchError::TaskFailed { index, source } => {
            assert_eq!(index, 7);
            assert_eq!(source.to_string(), "bad input");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn failing_batch_stops_later_batches() {
    let started = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&started);
    let mut batches = 0;
    let res = executor(2).run(move |n: usize| {
                                  counter.fetch_add(1, Ordering::SeqCst);
                                  if n == 1 {
                                      Err::<BatchOutcome<usize>, TaskError>("boom".into())
                                  } else {
                                      Ok(BatchOutcome::Value(n))
                                  }
                              },
                              (0..9).collect(),
                              3,
                              BatchHooks::none().on_batch(|_| batches += 1));
    assert!(matches!(res, Err(BatchError::TaskFailed { index: 1, .. })));
    assert_eq!(batches, 0);
    // Sólo el primer lote llegó a despacharse.
    thread::sleep(Duration::from_millis(50));
    assert!(started.load(Ordering::SeqCst) <= 3);
}

#[test]
fn panicking_task_is_isolated_and_pool_stays_usable() {
    let exec = executor(2);
    let err = exec.run(|n: u8| {
                           if n == 2 {
                               panic!("worker exploded on {n}");
                           }
                           Ok::<_, TaskError>(BatchOutcome::Value(n))
                       },
                       (0..4).collect(),
                       4,
                       BatchHooks::none())
                  .unwrap_err();
    match err {
        BatchError::TaskPanicked { index, message } => {
            assert_eq!(index, 2);
            assert!(message.contains("worker exploded on 2"), "{message}");
        }
        other => panic!("unexpected error: {other:?}"),
    }

    let out = exec.run(|n: u8| Ok::<_, TaskError>(BatchOutcome::Value(n + 1)), vec![1, 2], 1, BatchHooks::none())
                  .expect("pool still usable");
    assert_eq!(out, vec![Some(2), Some(3)]);
}

#[test]
fn in_flight_work_is_bounded_by_batch_size() {
    let active = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(Mutex::new(0usize));
    let (a, p) = (Arc::clone(&active), Arc::clone(&peak));
    executor(8).run(move |_: usize| {
                        let now = a.fetch_add(1, Ordering::SeqCst) + 1;
                        {
                            let mut peak = p.lock().unwrap();
                            *peak = (*peak).max(now);
                        }
                        thread::sleep(Duration::from_millis(5));
                        a.fetch_sub(1, Ordering::SeqCst);
                        Ok::<_, TaskError>(BatchOutcome::Value(()))
                    },
                    (0..20).collect(),
                    3,
                    BatchHooks::none())
               .expect("run");
    assert!(*peak.lock().unwrap() <= 3);
}

#[test]
fn batched_wraps_a_function_with_a_fixed_size() {
    let square = batched(executor(2), 4, |n: i64| Ok::<_, TaskError>(BatchOutcome::Value(n * n)));
    assert_eq!(square(vec![1, 2, 3]).unwrap(), vec![Some(1), Some(4), Some(9)]);
    assert!(square(Vec::new()).unwrap().is_empty());
}
