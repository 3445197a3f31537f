use std::fs;
use std::path::Path;

use hostfacts_specs::{CollectionConfig, SpecError, SpecRegistry, SpecSource};
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn archive(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for (relative, content) in files {
        write_file(dir.path(), relative, content.as_bytes());
    }
    dir
}

fn write_file(root: &Path, relative: &str, content: &[u8]) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn names(root: &Path, paths: &[std::path::PathBuf]) -> Vec<String> {
    paths
        .iter()
        .map(|p| p.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
        .collect()
}

// ---------------------------------------------------------------------------
// Builtin layout
// ---------------------------------------------------------------------------

#[test]
fn test_collect_gluster_outputs_from_archive() {
    let dir = archive(&[
        ("insights_commands/gluster_volume_info", "Volume Name: v\nType: Distribute\n"),
        ("insights_commands/gluster_volume_status", "Status of volume: v\n"),
    ]);
    let registry = SpecRegistry::builtin();

    let files = registry.collect("gluster_v_info", dir.path()).unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].spec, "gluster_v_info");
    assert!(files[0].content.starts_with("Volume Name: v"));

    let files = registry.collect("gluster_v_status", dir.path()).unwrap();
    assert_eq!(files[0].content, "Status of volume: v\n");
}

#[test]
fn test_missing_file_is_not_collected() {
    let dir = archive(&[("insights_commands/uptime", " 10:00:00 up 3 days")]);
    let err = SpecRegistry::builtin()
        .resolve("gluster_v_info", dir.path())
        .unwrap_err();
    assert!(matches!(err, SpecError::NotCollected(name) if name == "gluster_v_info"));
}

#[test]
fn test_glob_with_ignore_expression() {
    let dir = archive(&[
        ("insights_commands/ethtool_eth0", "Settings for eth0:"),
        ("insights_commands/ethtool_em1", "Settings for em1:"),
        ("insights_commands/ethtool_-S_eth0", "NIC statistics:"),
        ("insights_commands/ethtool_-i_eth0", "driver: e1000"),
    ]);
    let registry = SpecRegistry::builtin();

    let plain = registry.resolve("ethtool", dir.path()).unwrap();
    assert_eq!(
        names(dir.path(), &plain),
        vec!["insights_commands/ethtool_em1", "insights_commands/ethtool_eth0"]
    );

    let stats = registry.resolve("ethtool_S", dir.path()).unwrap();
    assert_eq!(names(dir.path(), &stats), vec!["insights_commands/ethtool_-S_eth0"]);
}

#[test]
fn test_first_of_prefers_earlier_alternative() {
    let registry = SpecRegistry::builtin();

    let both = archive(&[
        ("insights_commands/hostname", "web01"),
        ("insights_commands/hostname_-f", "web01.example.com"),
    ]);
    let files = registry.collect("hostname", both.path()).unwrap();
    assert_eq!(files[0].content, "web01.example.com");

    let short_only = archive(&[("insights_commands/hostname", "web01")]);
    let files = registry.collect("hostname", short_only.path()).unwrap();
    assert_eq!(files[0].content, "web01");
}

#[test]
fn test_head_takes_first_file_of_target() {
    let dir = archive(&[
        ("insights_commands/rpm_-qa_--qf_b", "b"),
        ("insights_commands/rpm_-qa_--qf_a", "a"),
    ]);
    let registry = SpecRegistry::builtin();

    assert_eq!(registry.resolve("all_installed_rpms", dir.path()).unwrap().len(), 2);
    let head = registry.collect("installed_rpms", dir.path()).unwrap();
    assert_eq!(head.len(), 1);
    assert_eq!(head[0].content, "a");
}

#[test]
fn test_invalid_utf8_is_replaced() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "insights_commands/uname_-a", b"Linux \xff host");
    let files = SpecRegistry::builtin().collect("uname", dir.path()).unwrap();
    assert_eq!(files[0].content, "Linux \u{fffd} host");
}

// ---------------------------------------------------------------------------
// Custom registries and configuration
// ---------------------------------------------------------------------------

#[test]
fn test_registry_file_and_nested_glob() {
    let dir = archive(&[
        ("sos_commands/gluster/a/state", "1"),
        ("sos_commands/gluster/b/state", "2"),
        ("sos_commands/gluster/b/other", "3"),
    ]);
    let registry_path = dir.path().join("registry.yml");
    fs::write(
        &registry_path,
        "gluster_state: {kind: glob, pattern: \"sos_commands/gluster/*/state\"}\n",
    )
    .unwrap();

    let registry = SpecRegistry::from_file(&registry_path).unwrap();
    let files = registry.resolve("gluster_state", dir.path()).unwrap();
    assert_eq!(
        names(dir.path(), &files),
        vec!["sos_commands/gluster/a/state", "sos_commands/gluster/b/state"]
    );
}

#[test]
fn test_head_cycle_is_reported_on_resolve() {
    let registry = SpecRegistry::from_yaml_str(
        "a: {kind: head, of: b}\nb: {kind: head, of: a}\n",
    )
    .unwrap();
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        registry.resolve("a", dir.path()),
        Err(SpecError::InvalidRegistry(_))
    ));
}

#[test]
fn test_config_redirects_spec_to_new_location() {
    let dir = archive(&[(
        "sos_commands/gluster/gluster_volume_info",
        "Volume Name: moved\n",
    )]);
    let config_path = dir.path().join("collection.yml");

    let mut config = CollectionConfig::default();
    config.specs.insert(
        "gluster_v_info".into(),
        SpecSource::first_of(vec![
            SpecSource::simple("insights_commands/gluster_volume_info"),
            SpecSource::simple("sos_commands/gluster/gluster_volume_info"),
        ]),
    );
    config.save(&config_path).unwrap();

    let loaded = CollectionConfig::load(&config_path).unwrap();
    let registry = loaded.apply(SpecRegistry::builtin());
    assert!(registry.validate().is_empty());

    let files = registry.collect("gluster_v_info", dir.path()).unwrap();
    assert_eq!(files[0].content, "Volume Name: moved\n");
}

#[test]
fn test_malformed_config_is_a_yaml_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.yml");
    fs::write(&path, "version: [unclosed\n").unwrap();
    assert!(matches!(
        CollectionConfig::load(&path),
        Err(SpecError::YamlError(_))
    ));
    assert!(matches!(
        CollectionConfig::load(dir.path().join("absent.yml")),
        Err(SpecError::IoError(_))
    ));
}
