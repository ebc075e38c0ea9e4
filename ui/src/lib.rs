//! Shared UI crate for Control Chart Studio. Chart computation, rendering and
//! the cross-platform views live here.

pub mod chart;
pub mod core;
pub mod i18n;
pub mod state;
pub mod views;

pub mod components {
    // Localized application navbar (components/app_navbar.rs)
    pub mod app_navbar;
    pub use app_navbar::register_nav;
    pub use app_navbar::AppNavbar;
    pub use app_navbar::NavBuilder;
}

/// Shared theme stylesheet, embedded by every platform shell.
pub const THEME_CSS: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/assets/theme/main.css"
));
