use phonelog_rs::carrier::{refresh_carriers, CarrierInfo, StaticCarrierLookup};
use phonelog_rs::storage;
use phonelog_rs::{PhoneError, PhoneNumber};
use tempfile::TempDir;

fn numbers(raw: &[&str]) -> Vec<PhoneNumber> {
    raw.iter().filter_map(|n| PhoneNumber::parse(n)).collect()
}

/// Test that repeated runs only pay for numbers not yet cached
#[tokio::test]
async fn test_cache_survives_runs() {
    let temp_dir = TempDir::new().unwrap();
    let cache_path = temp_dir.path().join("numbers.dat");
    let service = StaticCarrierLookup::new()
        .with("5551234567", CarrierInfo::new("TELNYX LLC", "voip"))
        .with("5559990000", CarrierInfo::new("VERIZON", "landline"));

    let worklist = numbers(&["5551234567", "5559990000"]);

    for run in 0..2 {
        let mut cache = storage::load_carrier_cache(&cache_path).await.unwrap();
        let mut sink = storage::open_cache_appender(&cache_path).await.unwrap();
        let summary = refresh_carriers(&worklist, &mut cache, &service, &mut sink)
            .await
            .unwrap();

        if run == 0 {
            assert_eq!(summary.fetched, 2);
            assert_eq!(summary.carriers.get("TELNYX LLC"), Some(&1));
        } else {
            assert_eq!(summary.fetched, 0);
            assert_eq!(summary.skipped, 2);
        }
    }

    assert_eq!(service.calls(), 2);

    let content = std::fs::read_to_string(&cache_path).unwrap();
    assert_eq!(content.lines().count(), 2);

    let cache = storage::load_carrier_cache(&cache_path).await.unwrap();
    let info = cache
        .lookup(&PhoneNumber::parse("5551234567").unwrap())
        .expect("Number should be cached");
    assert_eq!(info.carrier_type, "voip");
}

/// Test that lines carrying both type spellings load, hyphenated first
#[tokio::test]
async fn test_mixed_type_spellings() {
    let temp_dir = TempDir::new().unwrap();
    let cache_path = temp_dir.path().join("numbers.dat");
    std::fs::write(
        &cache_path,
        "{\"number\":\"5551234567\",\"carrier\":\"BANDWIDTH\",\"carrier_type\":\"landline\",\"carrier-type\":\"voip\"}\n",
    )
    .unwrap();

    let cache = storage::load_carrier_cache(&cache_path).await.unwrap();
    let info = cache
        .lookup(&PhoneNumber::parse("5551234567").unwrap())
        .expect("Number should be cached");
    assert_eq!(info.carrier_type, "voip");
}

/// Test that legacy hyphenated cache lines load
#[tokio::test]
async fn test_legacy_cache_format() {
    let temp_dir = TempDir::new().unwrap();
    let cache_path = temp_dir.path().join("numbers.dat");
    std::fs::write(
        &cache_path,
        "{\"number\": \"5551234567\", \"carrier\": \"BANDWIDTH\", \"carrier-type\": \"voip\"}\n\n",
    )
    .unwrap();

    let cache = storage::load_carrier_cache(&cache_path).await.unwrap();
    assert_eq!(cache.len(), 1);
}

/// Test that a corrupt cache line fails the load
#[tokio::test]
async fn test_corrupt_cache_is_fatal() {
    let temp_dir = TempDir::new().unwrap();
    let cache_path = temp_dir.path().join("numbers.dat");
    std::fs::write(
        &cache_path,
        "{\"number\": \"5551234567\", \"carrier\": \"BANDWIDTH\", \"carrier_type\": \"voip\"}\nnot json\n",
    )
    .unwrap();

    match storage::load_carrier_cache(&cache_path).await {
        Err(PhoneError::CorruptCache { path, line, .. }) => {
            assert_eq!(line, 2);
            assert_eq!(path, cache_path);
        }
        other => panic!("Expected corrupt cache error, got {:?}", other.map(|c| c.len())),
    }
}
