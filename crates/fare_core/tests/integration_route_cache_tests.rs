use std::sync::atomic::Ordering;

use fare_core::routing::{CachedDistanceProvider, DistanceProvider, MapServiceError, RouteCacheConfig};
use fare_core::test_helpers::{
    bacubac, basey_center, basiao, coordinate, CountingProvider, FailingProvider,
    FixedDistanceProvider,
};

fn cache_config(ttl_secs: u64) -> RouteCacheConfig {
    RouteCacheConfig {
        enabled: true,
        ttl_secs,
        ..RouteCacheConfig::default()
    }
}

#[test]
fn repeated_pair_is_served_from_cache() {
    let (inner, calls) = CountingProvider::new(FixedDistanceProvider::new(4.2));
    let cached = CachedDistanceProvider::new(Box::new(inner), &cache_config(300));

    let first = cached.measure(basey_center(), bacubac()).expect("first");
    let second = cached.measure(basey_center(), bacubac()).expect("second");

    assert_eq!(first, second);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(cached.len(), 1);
}

#[test]
fn nearby_coordinates_share_a_key() {
    let (inner, calls) = CountingProvider::new(FixedDistanceProvider::new(4.2));
    let cached = CachedDistanceProvider::new(Box::new(inner), &cache_config(300));

    cached.measure(basey_center(), bacubac()).expect("first");
    // within the fourth decimal place of the fixture
    let jittered = coordinate([11.280262, 125.069088]);
    cached.measure(jittered, bacubac()).expect("second");

    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn cache_key_is_directional() {
    let (inner, calls) = CountingProvider::new(FixedDistanceProvider::new(4.2));
    let cached = CachedDistanceProvider::new(Box::new(inner), &cache_config(300));

    cached.measure(basey_center(), basiao()).expect("forward");
    cached.measure(basiao(), basey_center()).expect("backward");

    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn expired_entries_are_refetched() {
    let (inner, calls) = CountingProvider::new(FixedDistanceProvider::new(4.2));
    let cached = CachedDistanceProvider::new(Box::new(inner), &cache_config(0));

    cached.measure(basey_center(), bacubac()).expect("first");
    cached.measure(basey_center(), bacubac()).expect("second");

    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn failures_are_not_cached() {
    let (inner, calls) = CountingProvider::new(FailingProvider::new(MapServiceError::Transport(
        "connection reset".into(),
    )));
    let cached = CachedDistanceProvider::new(Box::new(inner), &cache_config(300));

    assert!(cached.measure(basey_center(), bacubac()).is_err());
    assert!(cached.measure(basey_center(), bacubac()).is_err());

    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert!(cached.is_empty());
}
