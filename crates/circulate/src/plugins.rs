// SPDX-FileCopyrightText: 2026 Circulate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The `circulate plugins` commands.

use circulate_config::CirculateConfig;
use circulate_core::CirculateError;
use circulate_plugin::PluginRegistry;
use tracing::error;

use crate::context;

fn describe(registry: &PluginRegistry) -> Vec<String> {
    if registry.is_empty() {
        return vec!["no plugins installed".to_string()];
    }
    registry
        .list_all()
        .into_iter()
        .map(|entry| {
            format!(
                "{} {} [{}] mounted at {}",
                entry.manifest.name,
                entry.manifest.version,
                entry.status,
                entry.mount_point()
            )
        })
        .collect()
}

/// One line per registered plugin.
pub fn list(config: &CirculateConfig) -> Vec<String> {
    describe(&context::load_plugins(config))
}

/// Runs every enabled plugin's scripts; fails if any script failed.
pub async fn run_scripts(config: &CirculateConfig) -> Result<(), CirculateError> {
    let registry = context::load_plugins(config);
    let report = registry.run_all_scripts().await;
    for name in &report.succeeded {
        println!("ok      {name}");
    }
    for (name, message) in &report.failed {
        error!(script = %name, error = %message, "plugin script failed");
        println!("failed  {name}: {message}");
    }
    if report.failed.is_empty() {
        Ok(())
    } else {
        Err(CirculateError::Plugin {
            plugin: "scripts".into(),
            message: format!("{} script(s) failed", report.failed.len()),
        })
    }
}
