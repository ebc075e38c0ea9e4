//! Localized strings for `controlplot-ui`.
//!
//! Fluent catalogues live in `i18n/<lang>/controlplot_ui.ftl` and are
//! embedded with `rust-embed`; `en-US` is the fallback every other locale
//! must mirror (same message ids, same `$variables`). Look strings up with
//! [`t!`](crate::t):
//!
//! ```ignore
//! ui::i18n::init();
//! let summary = t!("chart-summary", points = 12, skipped = 1);
//! ```
//!
//! The requested locale comes from the OS on desktop
//! (`DesktopLanguageRequester`) and from `navigator.languages` on the web
//! (`WebLanguageRequester`). Assets are always embedded on WASM through the
//! `debug-embed` feature.
use std::sync::Once;

use i18n_embed::fluent::FluentLanguageLoader;
use once_cell::sync::Lazy;
use rust_embed::Embed;
use unic_langid::LanguageIdentifier;

pub use i18n_embed_fl::fl;

/// Look up a message through the shared [`LOADER`]:
/// `t!("nav-home")` or `t!("chart-invalid-file", reason = err.to_string())`.
#[macro_export]
macro_rules! t {
    ($key:literal) => {
        $crate::i18n::fl!(&*$crate::i18n::LOADER, $key)
    };
    ($key:literal, $( $arg:ident = $value:expr ),+ $(,)?) => {
        $crate::i18n::fl!(&*$crate::i18n::LOADER, $key, $( $arg = $value ),+ )
    };
}

/// Catalogue file stem; also the crate name `fl!` resolves at compile time.
const DOMAIN: &str = "controlplot_ui";
const FALLBACK: &str = "en-US";

#[derive(Embed)]
#[folder = "i18n"]
struct Localizations;

pub static LOADER: Lazy<FluentLanguageLoader> = Lazy::new(|| {
    let fallback: LanguageIdentifier = FALLBACK.parse().unwrap_or_default();
    FluentLanguageLoader::new(DOMAIN, fallback)
});

static INIT: Once = Once::new();

/// Select the platform's preferred languages. Safe to call repeatedly.
pub fn init() {
    INIT.call_once(|| {
        let requested = requested_languages();
        match i18n_embed::select(&*LOADER, &Localizations, &requested) {
            Ok(selected) => tracing::debug!(?selected, "localization initialised"),
            Err(err) => tracing::warn!(error = %err, "language selection failed; using fallback"),
        }
    });
}

/// Switch language at runtime. Unparseable tags are ignored.
pub fn set_language(tag: &str) -> Result<(), i18n_embed::I18nEmbedError> {
    let Ok(language) = tag.parse::<LanguageIdentifier>() else {
        tracing::warn!(tag, "ignoring unparseable language tag");
        return Ok(());
    };
    i18n_embed::select(&*LOADER, &Localizations, &[language]).map(|_| ())
}

/// Embedded locale folders, sorted.
pub fn available_languages() -> Vec<String> {
    let mut languages: Vec<String> = Localizations::iter()
        .filter_map(|path| path.split('/').next().map(str::to_string))
        .collect();
    languages.sort();
    languages.dedup();
    languages
}

#[cfg(target_arch = "wasm32")]
fn requested_languages() -> Vec<LanguageIdentifier> {
    i18n_embed::WebLanguageRequester::requested_languages()
}

#[cfg(not(target_arch = "wasm32"))]
fn requested_languages() -> Vec<LanguageIdentifier> {
    i18n_embed::DesktopLanguageRequester::requested_languages()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_language_is_embedded() {
        assert!(available_languages().iter().any(|l| l == FALLBACK));
    }

    #[test]
    fn catalogues_are_named_after_the_crate_domain() {
        // `fl!` and the loader look for `<crate name with underscores>.ftl`.
        assert_eq!(DOMAIN, env!("CARGO_PKG_NAME").replace('-', "_"));
        for language in available_languages() {
            let path = format!("{language}/{DOMAIN}.ftl");
            assert!(Localizations::get(&path).is_some(), "missing {path}");
        }

        // A private loader, so the shared one keeps its language.
        let loader = FluentLanguageLoader::new(DOMAIN, FALLBACK.parse().unwrap());
        let spanish: LanguageIdentifier = "es-ES".parse().unwrap();
        i18n_embed::select(&loader, &Localizations, &[spanish]).unwrap();
        assert_eq!(loader.get("nav-home"), "Inicio");
    }

    #[test]
    fn fallback_strings_resolve() {
        set_language(FALLBACK).unwrap();
        assert_eq!(fl!(&*LOADER, "nav-home"), "Home");
        assert_eq!(fl!(&*LOADER, "chart-group-label"), "Group");
        assert_eq!(fl!(&*LOADER, "chart-type-i"), "I chart (individuals)");
    }

    #[test]
    fn unknown_language_keeps_the_fallback() {
        set_language(FALLBACK).unwrap();
        let _ = set_language("zz-ZZ");
        assert_eq!(fl!(&*LOADER, "nav-home"), "Home");
    }

    #[test]
    fn unparseable_tag_is_ignored() {
        assert!(set_language("not a tag!").is_ok());
    }
}
