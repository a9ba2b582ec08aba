//! Expansion binaries are reaped after every call, including failed ones
//!
//! Kept in its own test binary so no other test's children are counted.
#![cfg(target_os = "linux")]

use std::fs;
use std::os::unix::fs::PermissionsExt;

use papi::plugin::Loader;
use papi::{Registry, Resolver};
use tempfile::TempDir;

/// Publishes a manifest, then exits without answering any request
const MUTE: &str = r#"#!/bin/sh
if [ "$1" = "--manifest" ]; then
  echo '{"name":"mute","expansions":[{"identifier":"mute","author":"ops","capabilities":["context_free"]}]}'
  exit 0
fi
exit 0
"#;

/// Counts zombie children of this process
fn zombie_children() -> usize {
    let parent = format!("{}", std::process::id());

    fs::read_dir("/proc")
        .unwrap()
        .flatten()
        .filter_map(|entry| fs::read_to_string(entry.path().join("status")).ok())
        .filter(|status| {
            let field = |name: &str| {
                status
                    .lines()
                    .find_map(|line| line.strip_prefix(name))
                    .map(|value| value.trim().to_string())
            };
            field("PPid:").as_deref() == Some(parent.as_str())
                && field("State:").is_some_and(|state| state.starts_with('Z'))
        })
        .count()
}

#[test]
fn failed_calls_leave_no_zombies() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("mute");
    fs::write(&path, MUTE).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();

    let registry = Registry::new();
    let report = Loader::new(&registry).load_binary(&path);
    assert!(report.is_clean());

    let before = zombie_children();
    let resolver = Resolver::new(&registry);
    for _ in 0..5 {
        assert_eq!(resolver.resolve_without_context("%mute_x%"), "NaN");
    }

    assert_eq!(zombie_children(), before);
    assert_eq!(before, 0);
}
