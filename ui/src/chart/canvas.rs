//! Minimal 2D drawing surface for chart layers.
//!
//! Primitives are recorded as SVG in logical units and rasterised with
//! `resvg` onto a `tiny_skia::Pixmap`. The device pixel ratio only enters as
//! the rasterisation transform.

use std::fmt::Write as _;
use std::sync::Arc;

use tiny_skia::{Pixmap, Transform};
use usvg::fontdb;

use crate::chart::RenderError;
use crate::core::format::escape_xml;

/// Bundled label face, available on every target including wasm.
const EMBEDDED_FONT: &[u8] = include_bytes!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/assets/fonts/DejaVuSans.ttf"
));
const EMBEDDED_FAMILY: &str = "DejaVu Sans";
const FONT_FAMILY: &str = "'DejaVu Sans', sans-serif";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke<'a> {
    pub color: &'a str,
    pub width: f64,
    /// Dash and gap lengths.
    pub dash: Option<(f64, f64)>,
}

impl<'a> Stroke<'a> {
    pub fn solid(color: &'a str, width: f64) -> Self {
        Self {
            color,
            width,
            dash: None,
        }
    }

    pub fn dashed(color: &'a str, width: f64, dash: (f64, f64)) -> Self {
        Self {
            color,
            width,
            dash: Some(dash),
        }
    }

    fn attributes(&self) -> String {
        let mut attrs = format!(
            "fill='none' stroke='{}' stroke-width='{}'",
            self.color, self.width
        );
        if let Some((on, off)) = self.dash {
            let _ = write!(attrs, " stroke-dasharray='{on} {off}'");
        }
        attrs
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Start,
    Middle,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Baseline {
    Alphabetic,
    Middle,
    Top,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle<'a> {
    pub color: &'a str,
    pub size: f64,
    pub anchor: Anchor,
    pub baseline: Baseline,
}

impl<'a> TextStyle<'a> {
    pub fn new(color: &'a str, size: f64) -> Self {
        Self {
            color,
            size,
            anchor: Anchor::Start,
            baseline: Baseline::Alphabetic,
        }
    }

    pub fn anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn baseline(mut self, baseline: Baseline) -> Self {
        self.baseline = baseline;
        self
    }
}

/// One layer's worth of drawing commands.
#[derive(Debug, Clone)]
pub struct SvgCanvas {
    width: f64,
    height: f64,
    body: String,
    open_groups: usize,
}

impl SvgCanvas {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            body: String::new(),
            open_groups: 0,
        }
    }

    /// Shift the origin for subsequent primitives until `restore`.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        let _ = write!(self.body, "<g transform='translate({dx:.2} {dy:.2})'>");
        self.open_groups += 1;
    }

    pub fn restore(&mut self) {
        if self.open_groups > 0 {
            self.body.push_str("</g>");
            self.open_groups -= 1;
        }
    }

    pub fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: &str) {
        let _ = write!(
            self.body,
            "<rect x='{x:.2}' y='{y:.2}' width='{width:.2}' height='{height:.2}' fill='{color}'/>"
        );
    }

    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, stroke: Stroke<'_>) {
        let _ = write!(
            self.body,
            "<line x1='{x1:.2}' y1='{y1:.2}' x2='{x2:.2}' y2='{y2:.2}' {}/>",
            stroke.attributes()
        );
    }

    /// Connected line through `points`; needs at least two.
    pub fn polyline(&mut self, points: &[(f64, f64)], stroke: Stroke<'_>) {
        if points.len() < 2 {
            return;
        }
        let coords = points
            .iter()
            .map(|(x, y)| format!("{x:.2},{y:.2}"))
            .collect::<Vec<_>>()
            .join(" ");
        let _ = write!(
            self.body,
            "<polyline points='{coords}' stroke-linejoin='round' {}/>",
            stroke.attributes()
        );
    }

    pub fn circle(&mut self, cx: f64, cy: f64, radius: f64, fill: &str, stroke: Stroke<'_>) {
        let attrs = stroke.attributes().replacen("fill='none'", &format!("fill='{fill}'"), 1);
        let _ = write!(
            self.body,
            "<circle cx='{cx:.2}' cy='{cy:.2}' r='{radius:.2}' {attrs}/>"
        );
    }

    pub fn text(&mut self, x: f64, y: f64, content: &str, style: TextStyle<'_>) {
        let anchor = match style.anchor {
            Anchor::Start => "start",
            Anchor::Middle => "middle",
            Anchor::End => "end",
        };
        let baseline = match style.baseline {
            Baseline::Alphabetic => "alphabetic",
            Baseline::Middle => "central",
            Baseline::Top => "hanging",
        };
        let _ = write!(
            self.body,
            "<text x='{x:.2}' y='{y:.2}' fill='{}' font-family=\"{FONT_FAMILY}\" font-size='{}' \
             text-anchor='{anchor}' dominant-baseline='{baseline}'>{}</text>",
            style.color,
            style.size,
            escape_xml(content)
        );
    }

    pub fn is_blank(&self) -> bool {
        self.body.is_empty()
    }

    pub fn to_svg(&self) -> String {
        let mut markup = format!(
            "<svg xmlns='http://www.w3.org/2000/svg' width='{w}' height='{h}' viewBox='0 0 {w} {h}'>",
            w = self.width,
            h = self.height
        );
        markup.push_str(&self.body);
        for _ in 0..self.open_groups {
            markup.push_str("</g>");
        }
        markup.push_str("</svg>");
        markup
    }

    /// Paint this layer onto `target`, scaled by `pixel_ratio`.
    pub fn rasterize(
        &self,
        fonts: &Arc<fontdb::Database>,
        pixel_ratio: f32,
        target: &mut Pixmap,
    ) -> Result<(), RenderError> {
        if self.is_blank() {
            return Ok(());
        }
        let options = usvg::Options {
            fontdb: Arc::clone(fonts),
            ..usvg::Options::default()
        };
        let tree = usvg::Tree::from_str(&self.to_svg(), &options)?;
        resvg::render(
            &tree,
            Transform::from_scale(pixel_ratio, pixel_ratio),
            &mut target.as_mut(),
        );
        Ok(())
    }
}

/// Font database used for chart labels: the bundled face, plus system fonts
/// on native targets.
pub fn load_fonts() -> Arc<fontdb::Database> {
    let mut db = fontdb::Database::new();
    db.load_font_data(EMBEDDED_FONT.to_vec());
    db.set_sans_serif_family(EMBEDDED_FAMILY);
    #[cfg(not(target_arch = "wasm32"))]
    db.load_system_fonts();
    tracing::debug!(faces = db.len(), "loaded chart fonts");
    Arc::new(db)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dashed_stroke_emits_dasharray() {
        let mut canvas = SvgCanvas::new(100.0, 50.0);
        canvas.line(0.0, 10.0, 100.0, 10.0, Stroke::dashed("#ff0000", 1.0, (6.0, 4.0)));
        let svg = canvas.to_svg();
        assert!(svg.contains("stroke-dasharray='6 4'"));
        assert!(svg.contains("stroke='#ff0000'"));
    }

    #[test]
    fn circle_takes_fill_and_outline() {
        let mut canvas = SvgCanvas::new(100.0, 50.0);
        canvas.circle(5.0, 5.0, 4.0, "#ffffff", Stroke::solid("#4682b4", 2.0));
        let svg = canvas.to_svg();
        assert!(svg.contains("fill='#ffffff'"));
        assert!(svg.contains("stroke='#4682b4'"));
        assert!(!svg.contains("fill='none'"));
    }

    #[test]
    fn text_content_is_escaped() {
        let mut canvas = SvgCanvas::new(100.0, 50.0);
        canvas.text(
            0.0,
            0.0,
            "A<B & C",
            TextStyle::new("#fff", 12.0).anchor(Anchor::End),
        );
        let svg = canvas.to_svg();
        assert!(svg.contains("A&lt;B &amp; C"));
        assert!(svg.contains("text-anchor='end'"));
    }

    #[test]
    fn unbalanced_groups_are_closed() {
        let mut canvas = SvgCanvas::new(10.0, 10.0);
        canvas.translate(1.0, 2.0);
        canvas.fill_rect(0.0, 0.0, 1.0, 1.0, "#000");
        assert!(canvas.to_svg().ends_with("</g></svg>"));
        canvas.restore();
        canvas.restore();
        assert!(canvas.to_svg().ends_with("/></g></svg>"));
    }

    #[test]
    fn single_point_polyline_draws_nothing() {
        let mut canvas = SvgCanvas::new(10.0, 10.0);
        canvas.polyline(&[(1.0, 1.0)], Stroke::solid("#000", 1.0));
        assert!(canvas.is_blank());
    }

    fn painted(pixmap: &Pixmap) -> usize {
        pixmap.pixels().iter().filter(|p| p.alpha() > 0).count()
    }

    #[test]
    fn bundled_font_draws_labels() {
        let fonts = load_fonts();
        assert!(fonts
            .faces()
            .any(|face| face.families.iter().any(|(name, _)| name == EMBEDDED_FAMILY)));

        let mut canvas = SvgCanvas::new(120.0, 40.0);
        canvas.text(10.0, 30.0, "16.98", TextStyle::new("#ffffff", 24.0));
        let mut pixmap = Pixmap::new(120, 40).unwrap();
        canvas.rasterize(&fonts, 1.0, &mut pixmap).unwrap();
        assert!(painted(&pixmap) > 50);
    }

    #[test]
    fn rasterize_scales_by_pixel_ratio() {
        let fonts = Arc::new(fontdb::Database::new());
        let mut canvas = SvgCanvas::new(10.0, 10.0);
        canvas.fill_rect(0.0, 0.0, 5.0, 5.0, "#ff0000");
        let mut pixmap = Pixmap::new(20, 20).unwrap();
        canvas.rasterize(&fonts, 2.0, &mut pixmap).unwrap();

        let inside = pixmap.pixel(8, 8).unwrap();
        let outside = pixmap.pixel(12, 12).unwrap();
        assert_eq!((inside.red(), inside.alpha()), (255, 255));
        assert_eq!(outside.alpha(), 0);
    }
}
