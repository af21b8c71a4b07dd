//! End-to-end classification through the public API.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use uadetect::{
    Classifier, ClassifyOptions, ClientFamily, DetectorConfig, DeviceClass, DeviceType,
    Fingerprint, MemoryStore, RuleCategory, RuleSource, SharedStore, VersionTruncation, UNKNOWN,
};

const ANDROID_PHONE: &str = "Mozilla/5.0 (Linux; Android 10; K) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Mobile Safari/537.36";
const ANDROID_TABLET: &str = "Mozilla/5.0 (Linux; Android 10; K) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const DESKTOP_FIREFOX: &str = "Mozilla/5.0 (Windows; U; Windows NT 6.1; en-US; rv:1.9.2) Gecko/20100101 Firefox/3.6";
const GOOGLEBOT: &str = "Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)";
const IPHONE: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_1_2 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.1 Mobile/15E148 Safari/604.1";

fn classifier() -> Classifier {
    Classifier::new(&DetectorConfig::default()).unwrap()
}

fn copy_dir(from: &Path, to: &Path) {
    fs::create_dir_all(to).unwrap();
    for entry in fs::read_dir(from).unwrap() {
        let entry = entry.unwrap();
        let target = to.join(entry.file_name());
        if entry.file_type().unwrap().is_dir() {
            copy_dir(&entry.path(), &target);
        } else {
            fs::copy(entry.path(), target).unwrap();
        }
    }
}

#[test]
fn test_deterministic_across_classifiers() {
    let first = classifier();
    let second = classifier();
    for ua in [ANDROID_PHONE, DESKTOP_FIREFOX, GOOGLEBOT, IPHONE, "curl/8.4.0"] {
        assert_eq!(*first.classify(ua).unwrap(), *second.classify(ua).unwrap());
    }
}

#[test]
fn test_cached_result_is_identical() {
    let classifier = classifier();
    let first = classifier.classify(IPHONE).unwrap();
    for _ in 0..10 {
        assert!(Arc::ptr_eq(&first, &classifier.classify(IPHONE).unwrap()));
    }
    let stats = classifier.cache_stats().unwrap();
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.hits, 10);
    assert_eq!(stats.local_len, 1);
}

#[test]
fn test_unparseable_user_agents() {
    let classifier = classifier();
    for ua in ["", "12345"] {
        let result = classifier.classify(ua).unwrap();
        assert!(result.is_unknown());
        assert!(!result.is_bot);
        assert_eq!(result.class, DeviceClass::Other);
        assert_eq!(result.os_name(), UNKNOWN);
        assert_eq!(result.device_type_str(), "other");
    }
}

#[test]
fn test_bot_short_circuit() {
    let classifier = classifier();
    let result = classifier.classify(GOOGLEBOT).unwrap();
    assert!(result.is_bot);
    assert_eq!(result.class, DeviceClass::Bot);
    assert_eq!(result.bot_name(), "Googlebot");
    assert!(result.os.is_none());
    assert!(result.client.is_none());

    let bare = classifier
        .classify_with(
            GOOGLEBOT,
            &ClassifyOptions {
                discard_bot_details: true,
                ..ClassifyOptions::default()
            },
        )
        .unwrap();
    assert!(bare.is_bot);
    assert!(bare.bot.is_none());
    assert_eq!(bare.class, DeviceClass::Bot);

    let skipped = classifier
        .classify_with(
            GOOGLEBOT,
            &ClassifyOptions {
                skip_bot_detection: true,
                ..ClassifyOptions::default()
            },
        )
        .unwrap();
    assert!(!skipped.is_bot);
    assert_ne!(skipped.class, DeviceClass::Bot);
}

#[test]
fn test_android_chrome_phone_and_tablet() {
    let classifier = classifier();

    let phone = classifier.classify(ANDROID_PHONE).unwrap();
    assert_eq!(phone.os_name(), "Android");
    assert!(phone.is_device(DeviceType::Smartphone));
    assert_eq!(phone.class, DeviceClass::Mobile);

    let tablet = classifier.classify(ANDROID_TABLET).unwrap();
    assert!(tablet.is_device(DeviceType::Tablet));
    assert_eq!(tablet.class, DeviceClass::Mobile);
}

#[test]
fn test_opera_tv_store_is_tv() {
    let result = classifier()
        .classify("Opera/9.80 (Linux mips; Opera TV Store/5581; U; en) Presto/2.12.362 Version/12.11")
        .unwrap();
    assert!(result.is_device(DeviceType::Tv));
    assert!(!result.is_mobile());
}

#[test]
fn test_ios_brand_is_apple() {
    let classifier = classifier();
    let iphone = classifier.classify(IPHONE).unwrap();
    assert_eq!(iphone.brand(), "Apple");
    assert_eq!(iphone.os_name(), "iOS");
    assert!(iphone.is_client(ClientFamily::Browser));

    let app = classifier.classify("MyApp/1.0 (iOS 16.2; Scale/3.00)").unwrap();
    assert_eq!(app.brand(), "Apple");
    assert_eq!(app.class, DeviceClass::Mobile);
}

#[test]
fn test_desktop_browser() {
    let result = classifier().classify(DESKTOP_FIREFOX).unwrap();
    assert_eq!(result.os_name(), "Windows");
    assert_eq!(result.os_version(), "7");
    assert_eq!(result.client_name(), "Firefox");
    assert_eq!(result.client_version(), "3.6");
    assert_eq!(result.class, DeviceClass::Desktop);
}

#[test]
fn test_version_truncation() {
    let result = classifier()
        .classify_with(
            IPHONE,
            &ClassifyOptions::with_truncation(VersionTruncation::Major),
        )
        .unwrap();
    assert_eq!(result.os_version(), "17");
}

#[test]
fn test_distinct_fingerprints() {
    let options = ClassifyOptions::default();
    let uas = [ANDROID_PHONE, ANDROID_TABLET, DESKTOP_FIREFOX, GOOGLEBOT, IPHONE];
    let fingerprints: std::collections::HashSet<_> = uas
        .iter()
        .map(|ua| Fingerprint::new(ua, &options))
        .collect();
    assert_eq!(fingerprints.len(), uas.len());
}

#[test]
fn test_first_match_wins_from_directory() {
    let dir = tempfile::tempdir().unwrap();
    copy_dir(&Path::new(env!("CARGO_MANIFEST_DIR")).join("data"), dir.path());

    let bots = dir.path().join("bots.yml");
    let original = fs::read_to_string(&bots).unwrap();
    fs::write(
        &bots,
        format!(
            "- regex: 'Firefox/3\\.6'\n  name: 'Legacy Fox'\n- regex: 'Firefox'\n  name: 'Any Fox'\n{}",
            original
        ),
    )
    .unwrap();

    let classifier = classifier();
    assert!(!classifier.classify(DESKTOP_FIREFOX).unwrap().is_bot);

    classifier
        .reload(&RuleSource::Directory(dir.path().to_path_buf()))
        .unwrap();
    let result = classifier.classify(DESKTOP_FIREFOX).unwrap();
    assert!(result.is_bot);
    assert_eq!(result.bot_name(), "Legacy Fox");
    assert_eq!(classifier.classify(GOOGLEBOT).unwrap().bot_name(), "Googlebot");
}

#[test]
fn test_config_rules_dir() {
    let dir = tempfile::tempdir().unwrap();
    copy_dir(&Path::new(env!("CARGO_MANIFEST_DIR")).join("data"), dir.path());
    fs::write(dir.path().join("bots.yml"), "[]\n").unwrap();

    let yaml = format!("rules_dir: {}\n", dir.path().display());
    let config = DetectorConfig::from_yaml_str(&yaml).unwrap();
    let classifier = Classifier::new(&config).unwrap();
    assert!(!classifier.classify(GOOGLEBOT).unwrap().is_bot);
}

#[test]
fn test_invalid_rules_rejected() {
    let source = RuleSource::Overlay(vec![(
        RuleCategory::OperatingSystems,
        "- regex: 'Windows'\n  name: 'Not A Real OS'\n  version: ''\n".to_string(),
    )]);
    assert!(classifier().reload(&source).is_err());
}

#[test]
fn test_shared_tier_survives_local_loss() {
    let store: Arc<dyn SharedStore> = Arc::new(MemoryStore::new(64));
    let config = DetectorConfig::default();

    let warm = Classifier::with_shared_store(&config, Arc::clone(&store)).unwrap();
    let expected = warm.classify(ANDROID_PHONE).unwrap();
    drop(warm);

    let cold = Classifier::with_shared_store(&config, store).unwrap();
    let result = cold.classify(ANDROID_PHONE).unwrap();
    assert_eq!(*result, *expected);
    let stats = cold.cache_stats().unwrap();
    assert_eq!(stats.shared_hits, 1);
    assert_eq!(stats.misses, 0);
}

#[test]
fn test_serialized_result() {
    let result = classifier().classify(IPHONE).unwrap();
    let json = serde_json::to_value(&*result).unwrap();
    assert_eq!(json["class"], "mobile");
    assert_eq!(json["is_bot"], false);
    assert_eq!(json["os"]["name"], "iOS");
    assert_eq!(json["device"]["type"], "smartphone");
    assert_eq!(json["device"]["brand"], "Apple");

    let parsed: uadetect::ClassificationResult = serde_json::from_value(json).unwrap();
    assert_eq!(parsed.class, DeviceClass::Mobile);
}

#[test]
fn test_concurrent_classification() {
    let classifier = Arc::new(classifier());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let classifier = Arc::clone(&classifier);
            std::thread::spawn(move || {
                let ua = if i % 2 == 0 { ANDROID_PHONE } else { IPHONE };
                for _ in 0..50 {
                    assert_eq!(classifier.classify(ua).unwrap().class, DeviceClass::Mobile);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(classifier.cache_stats().unwrap().local_len, 2);
}
