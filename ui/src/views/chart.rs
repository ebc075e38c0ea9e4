use std::cell::RefCell;
use std::rc::Rc;

use dioxus::prelude::*;

use crate::chart::ChartRenderer;
use crate::core::config::RenderConfig;
use crate::core::format::format_value;
use crate::core::limits::ChartType;
use crate::core::model::LoadError;
use crate::core::platform::{self, PixelRatio};
use crate::state::{redraw, ChartAction, ChartImage, ChartState};
use crate::t;

#[derive(Clone, Debug, PartialEq)]
enum ChartNotice {
    Loading(String),
    InvalidFile(String),
    RenderFailed(String),
}

#[component]
pub fn Chart() -> Element {
    // Re-render when the language changes elsewhere.
    let lang_code: Option<Signal<String>> = try_use_context::<Signal<String>>();
    let lang_marker = lang_code.as_ref().map(|s| s()).unwrap_or_default();

    rsx! {
        div { style: "display:none", "{lang_marker}" }
        section { class: "page page-chart",
            h1 { {t!("page-chart-title")} }
            p { {t!("page-chart-intro")} }
            ChartView {}
        }
    }
}

#[component]
pub fn ChartView() -> Element {
    let pixel_ratio = try_use_context::<PixelRatio>()
        .map(|ratio| ratio.0)
        .unwrap_or_else(platform::device_pixel_ratio);

    let state = use_signal(ChartState::default);
    let image = use_signal(|| Option::<ChartImage>::None);
    let notice = use_signal(|| Option::<ChartNotice>::None);
    let renderer = use_hook(|| {
        Rc::new(RefCell::new(ChartRenderer::new(
            RenderConfig::default().with_pixel_ratio(pixel_ratio),
        )))
    });

    // Every transition goes through here: store the snapshot, then redraw it.
    let dispatch = {
        let renderer = Rc::clone(&renderer);
        let mut state_signal = state;
        let mut image_signal = image;
        let mut notice_signal = notice;
        move |next: ChartState| {
            let outcome = {
                let mut renderer = renderer.borrow_mut();
                renderer.set_pixel_ratio(pixel_ratio);
                redraw(&mut renderer, &next)
            };
            match outcome {
                Ok(drawn) => {
                    image_signal.set(drawn);
                    notice_signal.set(None);
                }
                Err(err) => {
                    tracing::error!(error = %err, "chart redraw failed");
                    notice_signal.set(Some(ChartNotice::RenderFailed(err.to_string())));
                }
            }
            state_signal.set(next);
        }
    };

    let file_handler = {
        let dispatch = dispatch.clone();
        let mut notice_signal = notice;
        move |evt: FormEvent| {
            let Some(engine) = evt.files() else {
                return;
            };
            let Some(name) = engine.files().into_iter().next() else {
                return;
            };
            let mut dispatch = dispatch.clone();
            notice_signal.set(Some(ChartNotice::Loading(name.clone())));
            spawn(async move {
                let loaded = engine
                    .read_file_to_string(&name)
                    .await
                    .ok_or_else(|| LoadError::Unreadable(name.clone()))
                    .and_then(|text| state.peek().load_json(&text));
                match loaded {
                    Ok(next) => {
                        tracing::info!(file = %name, "chart file loaded");
                        dispatch(next);
                    }
                    Err(err) => {
                        notice_signal.set(Some(ChartNotice::InvalidFile(err.to_string())));
                    }
                }
            });
        }
    };

    let group_handler = {
        let mut dispatch = dispatch.clone();
        move |evt: FormEvent| {
            let next = state
                .peek()
                .apply(ChartAction::SelectGroup(evt.value()));
            dispatch(next);
        }
    };

    let chart_type_handler = {
        let mut dispatch = dispatch.clone();
        move |evt: FormEvent| match evt.value().parse::<ChartType>() {
            Ok(chart_type) => {
                let next = state
                    .peek()
                    .apply(ChartAction::SelectChartType(chart_type));
                dispatch(next);
            }
            Err(err) => tracing::warn!(error = %err, "ignoring chart type selection"),
        }
    };

    let snapshot = state();
    let loaded = snapshot.document.is_some();
    let groups = snapshot.group_names();
    let (width, height) = {
        let renderer = renderer.borrow();
        (renderer.config().width, renderer.config().height)
    };

    let alt = t!("page-chart-title");
    let feedback = match notice() {
        None => None,
        Some(ChartNotice::Loading(name)) => Some((
            "chart-notice".to_string(),
            t!("chart-loading", name = name),
        )),
        Some(ChartNotice::InvalidFile(reason)) => Some((
            "chart-notice chart-notice--error".to_string(),
            t!("chart-invalid-file", reason = reason),
        )),
        Some(ChartNotice::RenderFailed(reason)) => Some((
            "chart-notice chart-notice--error".to_string(),
            t!("chart-render-failed", reason = reason),
        )),
    };

    rsx! {
        div { class: "chart-panel",
            div { class: "chart-controls",
                label { class: "chart-controls__field",
                    span { class: "chart-controls__label", {t!("chart-file-label")} }
                    input {
                        id: "chart-file",
                        class: "chart-controls__input",
                        r#type: "file",
                        accept: ".json,application/json",
                        onchange: file_handler,
                    }
                }
                label { class: "chart-controls__field",
                    span { class: "chart-controls__label", {t!("chart-group-label")} }
                    select {
                        id: "chart-group",
                        class: "chart-controls__select",
                        disabled: !loaded,
                        value: "{snapshot.group}",
                        onchange: group_handler,
                        for name in groups {
                            option {
                                key: "{name}",
                                value: "{name}",
                                selected: name == snapshot.group,
                                "{name}"
                            }
                        }
                    }
                }
                label { class: "chart-controls__field",
                    span { class: "chart-controls__label", {t!("chart-type-label")} }
                    select {
                        id: "chart-type",
                        class: "chart-controls__select",
                        disabled: !loaded,
                        value: "{snapshot.chart_type}",
                        onchange: chart_type_handler,
                        for kind in ChartType::ALL {
                            option {
                                key: "{kind}",
                                value: "{kind}",
                                selected: kind == snapshot.chart_type,
                                {chart_type_label(kind)}
                            }
                        }
                    }
                }
            }

            if let Some((class, message)) = feedback {
                p { class: "{class}", role: "status", "{message}" }
            }

            {match image() {
                Some(drawn) => rsx! {
                    figure { class: "chart-figure",
                        img {
                            class: "chart-canvas",
                            src: "{drawn.data_url}",
                            width: "{width}",
                            height: "{height}",
                            alt: "{alt}",
                        }
                        figcaption { class: "chart-summary",
                            {summary_line(&drawn)}
                        }
                    }
                },
                None => rsx! {
                    div { class: "chart-placeholder",
                        p { {t!("chart-placeholder")} }
                    }
                },
            }}
        }
    }
}

fn chart_type_label(kind: ChartType) -> String {
    match kind {
        ChartType::G => t!("chart-type-g"),
        ChartType::T => t!("chart-type-t"),
        ChartType::I => t!("chart-type-i"),
    }
}

fn summary_line(drawn: &ChartImage) -> String {
    let counts = t!(
        "chart-summary",
        points = drawn.points,
        skipped = drawn.skipped
    );
    match drawn.limits {
        Some(limits) => format!(
            "{counts} · {}",
            t!(
                "chart-limits",
                cl = format_value(limits.cl),
                ucl = format_value(limits.ucl),
                lcl = format_value(limits.lcl)
            )
        ),
        None => format!("{counts} · {}", t!("chart-empty-group")),
    }
}
