//! Meta-reference tests
//!
//! Loads the module tree in tests/testdata/assorted and checks what each queried object references.

use globalref::addrs::{parse_module_instance, parse_ref, ModuleInstance, Reference};
use globalref::configs::Config;
use globalref::globalref::Analyzer;
use pretty_assertions::assert_eq;
use std::path::{Path, PathBuf};

fn fixture_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/testdata/assorted")
}

fn config() -> Config {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_env("GLOBALREF_LOG"))
        .with_writer(std::io::stderr)
        .try_init();

    Config::load_dir(&fixture_dir()).expect("fixture must load")
}

fn query(analyzer: Analyzer, module_instance: &str, reference: &str) -> (String, Vec<String>) {
    let module_instance = parse_module_instance(module_instance).expect("valid module instance");
    let reference = parse_ref(reference).expect("valid reference");

    let (module, references) = analyzer.meta_references(&module_instance, &reference);
    let mut references: Vec<String> = references.iter().map(Reference::display_string).collect();
    references.sort();
    (module.to_string(), references)
}

#[test]
fn assorted() {
    let config = config();
    let analyzer = Analyzer::new(&config);

    #[rustfmt::skip]
    let cases: &[(&str, &str, &str, &[&str])] = &[
        ("", "local.a", "", &[]),
        ("", "local.single", "", &["test_thing.single.id"]),
        ("", "test_thing.single", "", &["local.a", "local.b"]),
        ("", "test_thing.single.string", "", &["local.a"]),
        ("", "test_thing.for_each", "", &["local.a", "test_thing.single.string"]),
        ("", r#"test_thing.for_each["whatever"]"#, "", &["local.a", "test_thing.single.string"]),
        ("", r#"test_thing.for_each["whatever"].single"#, "", &["test_thing.single.string"]),
        ("", r#"test_thing.for_each["whatever"].single.z"#, "", &["test_thing.single.string"]),
        ("", "test_thing.count", "", &["local.a"]),
        ("", "test_thing.count[0]", "", &["local.a"]),
        ("", "module.single.a", "module.single", &["test_thing.foo", "var.a"]),
        ("", r#"module.for_each["whatever"].a"#, r#"module.for_each["whatever"]"#, &["test_thing.foo", "var.a"]),
        ("", "module.count[0].a", "module.count[0]", &["test_thing.foo", "var.a"]),
        ("", "module.count[0].a.b", "module.count[0]", &["var.a"]),
        ("module.single", "var.a", "", &["test_thing.single"]),
        ("module.single", "test_thing.foo", "module.single", &["var.a"]),
        ("", "var.a", "", &[]),
        ("", "path.module", "", &[]),
        ("", "count.index", "", &[]),
    ];

    for (module_instance, reference, want_module, want_references) in cases {
        let want: (String, Vec<String>) = (
            want_module.to_string(),
            want_references.iter().map(ToString::to_string).collect(),
        );
        assert_eq!(
            query(analyzer, module_instance, reference),
            want,
            "{module_instance} {reference}"
        );
    }
}

#[test]
fn deterministic() {
    let config = config();
    let analyzer = Analyzer::new(&config);

    let first = query(analyzer, "", "test_thing.single");
    for _ in 0..3 {
        assert_eq!(query(analyzer, "", "test_thing.single"), first);
    }
}

#[test]
fn for_each_keys_share_references() {
    let config = config();
    let analyzer = Analyzer::new(&config);

    let a = query(analyzer, "", r#"test_thing.for_each["a"]"#);
    let b = query(analyzer, "", r#"test_thing.for_each["b"]"#);
    assert_eq!(a, b);

    let a = query(analyzer, r#"module.for_each["a"]"#, "test_thing.foo");
    let b = query(analyzer, r#"module.for_each["b"]"#, "test_thing.foo");
    assert_eq!(a.1, b.1);
    assert_ne!(a.0, b.0);
}

#[test]
fn narrowing_returns_subset() {
    let config = config();
    let analyzer = Analyzer::new(&config);

    let whole = query(analyzer, "", "test_thing.for_each").1;
    for path in [".string", ".single", ".single.z", ".missing", ".for_each"] {
        let narrowed = query(analyzer, "", &format!("test_thing.for_each{path}")).1;
        assert!(
            narrowed.iter().all(|reference| whole.contains(reference)),
            "{path}: {narrowed:?} not in {whole:?}"
        );
    }
}

#[test]
fn unresolvable_module_instances() {
    let config = config();
    let analyzer = Analyzer::new(&config);

    assert_eq!(
        query(analyzer, "module.single.module.nope", "local.a"),
        ("module.single".into(), vec![])
    );
    assert_eq!(query(analyzer, "module.nope", "var.a"), ("".into(), vec![]));
    assert_eq!(query(analyzer, "", "module.nope.a"), ("".into(), vec![]));
    assert_eq!(
        query(analyzer, "module.single", "test_thing.nope"),
        ("module.single".into(), vec![])
    );
}

#[test]
fn source_ranges() {
    let config = config();
    let analyzer = Analyzer::new(&config);

    let (module, references) = analyzer.meta_references(
        &ModuleInstance::root(),
        &parse_ref("test_thing.single.string").unwrap(),
    );
    assert!(module.is_root());
    assert_eq!(references.len(), 1);

    let range = references[0].source_range.clone().expect("has a source range");
    let filename = range.filename.expect("loaded from disk");
    assert!(filename.ends_with("assorted-root.tf"), "{}", filename.display());

    let text = std::fs::read_to_string(&filename).unwrap();
    assert_eq!(&text[range.span], "local.a");
}

#[test]
fn child_resources_use_child_files() {
    let config = config();
    let analyzer = Analyzer::new(&config);

    let (_, references) = analyzer.meta_references(
        &parse_module_instance("module.single").unwrap(),
        &parse_ref("test_thing.foo").unwrap(),
    );
    let filename = references[0]
        .source_range
        .as_ref()
        .and_then(|range| range.filename.clone())
        .expect("loaded from disk");
    assert!(filename.ends_with("child/assorted-child.tf"));
}
