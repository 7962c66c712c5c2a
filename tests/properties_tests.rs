//! End-to-end tests: property files on disk through to typed values.

use hotprops::codec::{Decimal, ServiceAddress};
use hotprops::config::Settings;
use hotprops::props::{ResolutionContext, load_properties, resolve_file_path};
use hotprops::store::TypedStore;
use std::collections::HashMap;
use std::path::Path;
use tempfile::TempDir;

const SAMPLE: &str = r#"# Service configuration
! legacy comment style
readerRefreshIntertime = 0x1388
service.name=inventory
service.address : db.internal:5432
workers   8
ratio=0.125
hosts = alpha, beta ,\
        gamma
routes=api:/v1,admin:/admin
greeting=Ciao\u0020mondo\t!
path=C:\\data\\files
empty=
"#;

fn write_sample(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("service.properties");
    std::fs::write(&path, SAMPLE).unwrap();
    path
}

#[test]
fn sample_file_through_store() {
    let temp = TempDir::new().unwrap();
    let path = write_sample(temp.path());
    let store = TypedStore::with_mapping(load_properties(&path).unwrap());

    assert_eq!(store.get("readerRefreshIntertime", 0i64), 5000);
    assert_eq!(store.get_str("service.name", ""), "inventory");
    assert_eq!(
        store.get("service.address", ServiceAddress::new("", 0)),
        ServiceAddress::new("db.internal", 5432)
    );
    assert_eq!(store.get("workers", 1i32), 8);
    assert_eq!(store.get("ratio", Decimal::new(0, 0)), Decimal::new(125, 3));
    assert_eq!(
        store.get("hosts", Vec::<String>::new()),
        vec!["alpha", "beta", "gamma"]
    );

    let routes: HashMap<String, String> = store.get("routes", HashMap::new());
    assert_eq!(routes["api"], "/v1");
    assert_eq!(routes["admin"], "/admin");

    assert_eq!(store.get_str("greeting", ""), "Ciao mondo\t!");
    assert_eq!(store.get_str("path", ""), "C:\\data\\files");
    assert_eq!(store.get_raw("empty").as_deref(), Some(""));
    assert_eq!(store.get("empty", vec!["x".to_string()]), vec![""]);
    assert!(!store.contains("legacy"));
}

#[test]
fn reload_replaces_rather_than_merges() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("app.properties");
    std::fs::write(&path, "a=1\nb=2\n").unwrap();

    let store = TypedStore::with_mapping(load_properties(&path).unwrap());
    std::fs::write(&path, "b=3\n").unwrap();
    store.install(load_properties(&path).unwrap());

    assert!(!store.contains("a"));
    assert_eq!(store.get("b", 0i32), 3);
    assert_eq!(store.len(), 1);
}

#[test]
fn malformed_unicode_escape_reports_line() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("bad.properties");
    std::fs::write(&path, "ok=1\n# note\nbroken=\\u12\n").unwrap();

    let err = load_properties(&path).unwrap_err();
    assert!(err.to_string().contains(":3:"), "{err}");
}

#[test]
fn resolved_path_loads_file() {
    let temp = TempDir::new().unwrap();
    write_sample(temp.path());

    let ctx = ResolutionContext::new()
        .with_property("configfile.path", temp.path().to_string_lossy());
    let settings = Settings::default().with_overrides(None, Some("service.properties".into()));
    let path = settings.resolve(&ctx);

    assert_eq!(path, temp.path().join("service.properties"));
    assert!(load_properties(&path).is_ok());
}

#[test]
fn unresolved_placeholder_becomes_null_segment() {
    let path = resolve_file_path("${nowhere}", "app.properties", &ResolutionContext::new());
    assert_eq!(path, Path::new("null").join("app.properties"));

    let err = load_properties(&path).unwrap_err();
    assert!(err.is_not_found());
}
