//! Platform detection helpers.

/// Device pixel ratio provided by the platform launcher through context.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelRatio(pub f32);

/// Best-effort pixel ratio when no launcher supplied one.
pub fn device_pixel_ratio() -> f32 {
    #[cfg(target_arch = "wasm32")]
    {
        web_sys::window()
            .map(|window| window.device_pixel_ratio() as f32)
            .unwrap_or(1.0)
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        1.0
    }
}
