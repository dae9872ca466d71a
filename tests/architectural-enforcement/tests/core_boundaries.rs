//! Integration Test: Headless Core
//!
//! **Policy**: `core/src` must build without any terminal UI crate, so the
//! same session, registry and reveal logic can back any surface.

use architectural_enforcement::{assert_clean, scan};

const UI_CRATES: &[&str] = &["ratatui", "crossterm"];

#[test]
fn test_core_has_no_ui_imports() {
    let violations = scan("core/src", |_, code| {
        UI_CRATES.iter().any(|krate| {
            code.contains(&format!("{krate}::")) || code.contains(&format!("use {krate}"))
        })
    });
    assert_clean("core must not depend on terminal UI crates", &violations);
}

#[test]
fn test_core_manifest_has_no_ui_dependencies() {
    let manifest = std::fs::read_to_string(
        architectural_enforcement::workspace_root()
            .join("core")
            .join("Cargo.toml"),
    )
    .expect("core manifest");

    for krate in UI_CRATES {
        let declared = manifest.lines().map(str::trim_start).any(|line| {
            line.starts_with(&format!("{krate} ")) || line.starts_with(&format!("{krate}="))
        });
        assert!(!declared, "core/Cargo.toml declares {krate}");
    }
}
