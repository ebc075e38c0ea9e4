#![cfg_attr(all(windows, not(debug_assertions)), windows_subsystem = "windows")]

#[cfg(feature = "desktop")]
use dioxus::desktop::{tao::window::WindowBuilder, Config, LogicalSize};
use dioxus::prelude::*;

use ui::components::app_navbar::{register_nav, NavBuilder};
use ui::components::AppNavbar;
use ui::core::platform::PixelRatio;
use ui::views::{Chart, Home};

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[layout(DesktopNavbar)]
    #[route("/")]
    Home {},
    #[route("/chart")]
    Chart {},
}

/// Shared theme (ui/assets/theme/main.css), inlined at startup.
const MAIN_CSS_INLINE: &str = ui::THEME_CSS;

#[cfg(feature = "desktop")]
fn main() {
    LaunchBuilder::desktop()
        .with_cfg(
            Config::new().with_window(
                WindowBuilder::new()
                    .with_title(format!(
                        "Control Chart Studio – v{}",
                        env!("CARGO_PKG_VERSION")
                    ))
                    .with_inner_size(LogicalSize::new(1100.0, 760.0)),
            ),
        )
        .launch(App);
}

#[cfg(all(feature = "server", not(feature = "desktop")))]
fn main() {
    LaunchBuilder::server().launch(App);
}

fn nav_home(label: &str) -> Element {
    rsx!(Link { class: "navbar__link", to: Route::Home {}, "{label}" })
}
fn nav_chart(label: &str) -> Element {
    rsx!(Link { class: "navbar__link", to: Route::Chart {}, "{label}" })
}

#[component]
fn App() -> Element {
    ui::i18n::init();

    // AppNavbar updates this on language selection.
    let lang_code = use_signal(|| "en-US".to_string());
    use_context_provider(|| lang_code);

    // Charts rasterise at the monitor's scale factor.
    #[cfg(feature = "desktop")]
    {
        let window = dioxus::desktop::use_window();
        use_context_provider(|| PixelRatio(window.scale_factor() as f32));
    }
    #[cfg(not(feature = "desktop"))]
    use_context_provider(|| PixelRatio(1.0));

    register_nav(NavBuilder {
        home: nav_home,
        chart: nav_chart,
    });

    rsx! {
        // Always inline the embedded theme; desktop builds ship no asset folder.
        document::Style { "{MAIN_CSS_INLINE}" }

        // Keyed wrapper forces a full remount on language change.
        div {
            key: "{lang_code()}",
            div { style: "display:none", "{lang_code()}" }
            Router::<Route> { }
        }
    }
}

/// Desktop router layout around the shared navbar.
#[component]
fn DesktopNavbar() -> Element {
    rsx! {
        AppNavbar { }

        Outlet::<Route> {}
    }
}
