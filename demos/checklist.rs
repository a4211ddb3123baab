//! Walks a TypedMap through its expected behaviors and stops at the first
//! one that doesn't hold.
//!
//! Run with: RUST_LOG=trace cargo run --example checklist

use sovran_cellmap::{CellKind, MapError, TypedMap};
use tracing::info;
use tracing_subscriber::EnvFilter;

type CheckResult = Result<(), Box<dyn std::error::Error>>;

fn check(ok: bool, what: &str) -> CheckResult {
    if ok {
        info!("ok: {}", what);
        Ok(())
    } else {
        Err(format!("failed: {}", what).into())
    }
}

fn simple_insert() -> CheckResult {
    let mut map = TypedMap::<i32, i32>::new();
    check(map.len() == 0, "new map is empty")?;

    map.add_scalar(16, 222)?;
    map.add_scalar(63, 333)?;
    map.add_sequence(142, &[4, 5, 6, 7])?;
    map.add_text(993, "123123")?;
    check(map.len() == 4, "four entries after four adds")?;

    check(map.get_scalar(&16)? == 222, "scalar round-trip")?;
    check(map.get_sequence(&142)? == [4, 5, 6, 7], "sequence round-trip")?;
    check(map.get_text(&993)? == "123123", "text round-trip")?;

    map.remove_all();
    check(map.len() == 0, "remove_all empties the map")
}

fn missing_keys() -> CheckResult {
    let map = TypedMap::<i32, i32>::new();
    check(
        matches!(map.get_scalar(&16), Err(MapError::KeyNotFound(_))),
        "get_scalar on missing key",
    )?;
    check(
        matches!(map.get_sequence(&16), Err(MapError::KeyNotFound(_))),
        "get_sequence on missing key",
    )?;
    check(
        matches!(map.get_text(&16), Err(MapError::KeyNotFound(_))),
        "get_text on missing key",
    )
}

fn duplicates_and_try_add() -> CheckResult {
    let mut map = TypedMap::<i32, i32>::new();
    map.add_scalar(16, 222)?;

    check(
        matches!(map.add_scalar(16, 333), Err(MapError::DuplicateKey(_))),
        "strict add on existing key",
    )?;
    check(!map.try_add_scalar(16, 333), "try_add on existing key")?;
    check(map.get_scalar(&16)? == 222, "existing value kept")?;
    check(map.try_add_scalar(22, 444), "try_add on new key")?;
    check(map.get_scalar(&22)? == 444, "try_add value stored")
}

fn wrong_variants() -> CheckResult {
    let mut map = TypedMap::<i32, i32>::new();
    map.add_scalar(16, 222)?;

    let expected = MapError::WrongVariant {
        key: "16".to_string(),
        expected: CellKind::Text,
        actual: CellKind::Scalar,
    };
    check(map.get_text(&16) == Err(expected), "text read of a scalar")?;
    check(map.try_get_sequence(&16).is_none(), "lenient sequence read of a scalar")?;

    map.add_or_replace_sequence(16, &[2, 3]);
    check(map.get_sequence(&16)? == [2, 3], "replace changes the variant")
}

fn copied_buffers() -> CheckResult {
    let mut map = TypedMap::<i32, i32>::new();

    let values = vec![4, 5, 6, 7];
    map.add_sequence(142, &values)?;
    drop(values);

    let line = String::from("123123");
    map.add_text(993, &line)?;
    drop(line);

    check(map.get_sequence(&142)? == [4, 5, 6, 7], "sequence survives its source")?;
    check(map.get_text(&993)? == "123123", "text survives its source")
}

fn main() -> CheckResult {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    simple_insert()?;
    missing_keys()?;
    duplicates_and_try_add()?;
    wrong_variants()?;
    copied_buffers()?;

    info!("all checks passed");
    Ok(())
}
