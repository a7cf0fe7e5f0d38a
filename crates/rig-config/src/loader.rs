// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::debug;

use crate::Config;

/// Ordered list of config file locations searched from lowest to highest
/// priority. Later files override earlier ones — the same layered
/// discovery shape as the teacher's `sven-config::loader`, renamed from
/// `sven` to `rig` and with the workspace-local default
/// (`original_source/packages/rig-cli/rig_cli/config.py`'s
/// `load_config(path: str = "rig.yaml")`) added as the final, highest-
/// priority layer.
fn config_search_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    paths.push(PathBuf::from("/etc/rig/config.yaml"));
    paths.push(PathBuf::from("/etc/rig/config.yml"));

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".config/rig/config.yaml"));
        paths.push(home.join(".config/rig/config.yml"));
    }
    if let Some(cfg) = dirs::config_dir() {
        paths.push(cfg.join("rig/config.yaml"));
        paths.push(cfg.join("rig/config.yml"));
    }

    paths.push(PathBuf::from(".rig/config.yaml"));
    paths.push(PathBuf::from(".rig/config.yml"));
    paths.push(PathBuf::from("rig.yaml"));
    paths.push(PathBuf::from("rig.yml"));

    paths
}

/// Load configuration by deep-merging all discovered YAML files.
/// `extra` may provide an explicit path (e.g. `--config` CLI flag),
/// applied last so it overrides every discovered layer.
pub fn load(extra: Option<&Path>) -> anyhow::Result<Config> {
    let mut merged = serde_yaml::Value::Mapping(serde_yaml::Mapping::new());

    for path in config_search_paths() {
        if path.is_file() {
            debug!(path = %path.display(), "loading config layer");
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            let layer: serde_yaml::Value = serde_yaml::from_str(&text)
                .with_context(|| format!("parsing {}", path.display()))?;
            merge_yaml(&mut merged, layer);
        }
    }

    if let Some(p) = extra {
        debug!(path = %p.display(), "loading explicit config");
        let text =
            std::fs::read_to_string(p).with_context(|| format!("reading {}", p.display()))?;
        let layer: serde_yaml::Value =
            serde_yaml::from_str(&text).with_context(|| format!("parsing {}", p.display()))?;
        merge_yaml(&mut merged, layer);
    }

    let config: Config = if matches!(merged, serde_yaml::Value::Mapping(ref m) if m.is_empty()) {
        Config::default()
    } else {
        serde_yaml::from_value(merged).context("deserializing merged config")?
    };
    Ok(config)
}

/// Deep-merge `src` into `dst`; `src` wins on scalar conflicts.
fn merge_yaml(dst: &mut serde_yaml::Value, src: serde_yaml::Value) {
    match (dst, src) {
        (serde_yaml::Value::Mapping(d), serde_yaml::Value::Mapping(s)) => {
            for (k, v) in s {
                let entry = d
                    .entry(k)
                    .or_insert(serde_yaml::Value::Mapping(serde_yaml::Mapping::new()));
                merge_yaml(entry, v);
            }
        }
        (dst, src) => *dst = src,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn val(s: &str) -> serde_yaml::Value {
        serde_yaml::from_str(s).unwrap()
    }

    #[test]
    fn merge_scalar_src_wins() {
        let mut dst = val("x: 1");
        let src = val("x: 2");
        merge_yaml(&mut dst, src);
        assert_eq!(dst["x"].as_i64(), Some(2));
    }

    #[test]
    fn merge_preserves_keys_not_in_src() {
        let mut dst = val("a: 1\nb: 2");
        let src = val("b: 99");
        merge_yaml(&mut dst, src);
        assert_eq!(dst["a"].as_i64(), Some(1));
        assert_eq!(dst["b"].as_i64(), Some(99));
    }

    #[test]
    fn merge_nested_tables() {
        let mut dst = val("server:\n  host: 127.0.0.1\n  port: 8787");
        let src = val("server:\n  port: 9000");
        merge_yaml(&mut dst, src);
        assert_eq!(dst["server"]["host"].as_str(), Some("127.0.0.1"));
        assert_eq!(dst["server"]["port"].as_i64(), Some(9000));
    }

    #[test]
    fn load_returns_error_when_explicit_path_missing() {
        let result = load(Some(Path::new("/tmp/rig_nonexistent_config_xyz.yaml")));
        assert!(result.is_err());
    }

    #[test]
    fn load_with_no_extra_path_returns_defaults() {
        let cfg = load(None).unwrap();
        assert_eq!(cfg.server.port, 8787);
    }

    #[test]
    fn load_explicit_file_overrides_defaults() {
        use std::io::Write;
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "server:\n  host: 0.0.0.0\n  port: 9999").unwrap();
        let cfg = load(Some(f.path())).unwrap();
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.port, 9999);
    }

    #[test]
    fn load_explicit_file_can_set_policy_allowed_tools() {
        use std::io::Write;
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "policy:\n  allowed_tools: [echo]").unwrap();
        let cfg = load(Some(f.path())).unwrap();
        assert!(cfg.policy.is_allowed("echo"));
        assert!(!cfg.policy.is_allowed("delete_database"));
    }
}
