use sovran_cellmap::{Cell, CellKind, MapError, SharedTypedMap, TypedMap};
use std::sync::Arc;
use std::thread;

#[test]
fn test_basic_operations() -> Result<(), MapError> {
    let store = SharedTypedMap::<String, i32>::new();

    // Test empty state
    assert!(store.is_empty()?);
    assert_eq!(store.len()?, 0);

    // Test insertion and retrieval
    store.add_scalar("count".to_string(), 42)?;
    store.add_sequence("list".to_string(), &[1, 2, 3])?;
    store.add_text("name".to_string(), "cells")?;

    assert_eq!(store.get_scalar(&"count".to_string())?, 42);
    assert_eq!(store.get_sequence(&"list".to_string())?, vec![1, 2, 3]);
    assert_eq!(store.get_text(&"name".to_string())?, "cells");
    assert_eq!(store.kind(&"list".to_string())?, Some(CellKind::Sequence));

    // Test contains_key
    assert!(store.contains_key(&"count".to_string())?);
    assert!(!store.contains_key(&"nope".to_string())?);

    // Test removal
    store.remove(&"count".to_string())?;
    assert!(matches!(
        store.remove(&"count".to_string()),
        Err(MapError::KeyNotFound(_))
    ));
    assert!(store.try_remove(&"list".to_string())?);
    assert!(!store.try_remove(&"list".to_string())?);

    store.remove_all()?;
    assert!(store.is_empty()?);

    Ok(())
}

#[test]
fn test_strict_and_lenient_errors() -> Result<(), MapError> {
    let store = SharedTypedMap::<u32, u8>::new();
    store.add_scalar(1, 10)?;

    assert!(matches!(
        store.add_scalar(1, 11),
        Err(MapError::DuplicateKey(_))
    ));
    assert!(!store.try_add_scalar(1, 11)?);
    assert!(store.try_add_text(2, "two")?);
    assert!(store.try_add_sequence(3, &[3, 3])?);

    assert!(matches!(
        store.get_text(&1),
        Err(MapError::WrongVariant { .. })
    ));
    assert_eq!(store.try_get_text(&1)?, None);
    assert_eq!(store.try_get_text(&2)?, Some("two".to_string()));
    assert_eq!(store.try_get_sequence(&3)?, Some(vec![3, 3]));
    assert_eq!(store.try_get_scalar(&1)?, Some(10));

    Ok(())
}

#[test]
fn test_replace_and_get_or_add() -> Result<(), MapError> {
    let store = SharedTypedMap::<u32, i64>::new();

    store.add_or_replace_scalar(1, 5)?;
    store.add_or_replace_text(1, "five")?;
    assert_eq!(store.get_text(&1)?, "five");

    assert_eq!(store.get_or_add_sequence(2, &[7, 8])?, vec![7, 8]);
    assert_eq!(store.get_or_add_sequence(2, &[9])?, vec![7, 8]);
    assert_eq!(store.get_or_add_text(1, "six")?, "five");
    assert!(matches!(
        store.get_or_add_scalar(1, 6),
        Err(MapError::WrongVariant { .. })
    ));

    store.add_or_replace_sequence(1, &[1, 1])?;
    assert_eq!(store.take(&1)?, Cell::Sequence(vec![1, 1]));
    assert_eq!(store.keys()?, vec![2]);

    Ok(())
}

#[test]
fn test_with_borrows_under_lock() -> Result<(), MapError> {
    let store = SharedTypedMap::<&str, i32>::new();
    store.add_sequence("primes", &[2, 3, 5, 7])?;

    let sum = store.with(|map| {
        map.get_sequence(&"primes")
            .map(|values| values.iter().sum::<i32>())
    })??;
    assert_eq!(sum, 17);

    // Several operations under a single lock
    store.with_mut(|map| -> Result<(), MapError> {
        map.remove(&"primes")?;
        map.add_scalar("count", 4)?;
        Ok(())
    })??;
    assert_eq!(store.get_scalar(&"count")?, 4);

    Ok(())
}

#[test]
fn test_from_existing_map() -> Result<(), MapError> {
    let mut map = TypedMap::<u8, u8>::new();
    map.add_text(1, "one")?;

    let store = SharedTypedMap::from(map);
    let other = store.clone();
    other.add_scalar(2, 2)?;

    assert_eq!(store.len()?, 2);
    assert_eq!(store.get_text(&1)?, "one");

    Ok(())
}

#[test]
fn test_thread_safety() -> Result<(), MapError> {
    let store = Arc::new(SharedTypedMap::<String, i32>::new());
    store.add_scalar("counter".to_string(), 0)?;

    let mut handles = vec![];
    for t in 0..10 {
        let store_clone = Arc::clone(&store);
        handles.push(thread::spawn(move || {
            for _ in 0..100 {
                store_clone
                    .with_mut(|map| {
                        let current = map.get_scalar(&"counter".to_string())?;
                        map.add_or_replace_scalar("counter".to_string(), current + 1);
                        Ok::<(), MapError>(())
                    })
                    .unwrap()
                    .unwrap();
            }
            // Each thread also claims its own key exactly once
            assert!(store_clone.try_add_scalar(format!("thread-{}", t), t).unwrap());
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(store.get_scalar(&"counter".to_string())?, 1000);
    assert_eq!(store.len()?, 11);

    Ok(())
}

#[test]
fn test_concurrent_try_add_has_single_winner() -> Result<(), MapError> {
    let store = SharedTypedMap::<u32, u32>::new();

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let store = store.clone();
            thread::spawn(move || store.try_add_scalar(7, t).unwrap())
        })
        .collect();

    let winners = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .filter(|added| *added)
        .count();

    assert_eq!(winners, 1);
    assert_eq!(store.len()?, 1);

    Ok(())
}
