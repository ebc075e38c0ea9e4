#![cfg(test)]
//! Selectors the shared components emit must exist in the unified theme.
//! Substring presence is enough as an early warning; update this list when a
//! component's markup is renamed.

use ui::THEME_CSS;

const REQUIRED_SELECTORS: &[&str] = &[
    // Global / layout
    ":root",
    "--color-bg",
    "body {",
    ".page {",
    ".visually-hidden",
    // Navbar
    ".navbar {",
    ".navbar__inner",
    ".navbar__brand-mark",
    ".navbar__links",
    ".navbar__link",
    ".navbar__locale",
    // Home
    ".page-home__features",
    ".page-home__cta",
    // Chart page
    ".chart-panel",
    ".chart-controls",
    ".chart-controls__field",
    ".chart-controls__label",
    ".chart-controls__select",
    ".chart-notice",
    ".chart-notice--error",
    ".chart-figure",
    ".chart-canvas",
    ".chart-summary",
    ".chart-placeholder",
    "@media (max-width: 720px)",
];

#[test]
fn unified_theme_contains_required_selectors() {
    let missing: Vec<_> = REQUIRED_SELECTORS
        .iter()
        .filter(|sel| !THEME_CSS.contains(**sel))
        .collect();
    assert!(
        missing.is_empty(),
        "missing {} selector(s) in unified theme: {missing:?}",
        missing.len()
    );
}
