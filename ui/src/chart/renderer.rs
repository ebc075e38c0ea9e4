use std::sync::Arc;

use base64::Engine as _;
use tiny_skia::{Color, Pixmap, PixmapPaint, Transform};
use usvg::fontdb;

use crate::chart::canvas::{load_fonts, Anchor, Baseline, Stroke, SvgCanvas, TextStyle};
use crate::chart::{palette, ChartFrame, RenderError};
use crate::core::config::RenderConfig;
use crate::core::format::format_value;

const LABEL_SIZE: f64 = 12.0;
const TICK_LENGTH: f64 = 5.0;
const LIMIT_DASH: (f64, f64) = (6.0, 4.0);

/// Draws chart frames onto a raster surface.
///
/// Limit lines and the data series live on separate offscreen layers so
/// either can be repainted without touching the other. Layers are allocated
/// on first use and reused while the surface size stays the same.
pub struct ChartRenderer {
    config: RenderConfig,
    fonts: Arc<fontdb::Database>,
    limits_layer: Option<Pixmap>,
    series_layer: Option<Pixmap>,
}

impl ChartRenderer {
    pub fn new(config: RenderConfig) -> Self {
        Self::with_fonts(config, load_fonts())
    }

    pub fn with_fonts(config: RenderConfig, fonts: Arc<fontdb::Database>) -> Self {
        Self {
            config,
            fonts,
            limits_layer: None,
            series_layer: None,
        }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn set_pixel_ratio(&mut self, ratio: f32) {
        let config = self.config.clone().with_pixel_ratio(ratio);
        if config.pixel_ratio != self.config.pixel_ratio {
            tracing::debug!(pixel_ratio = config.pixel_ratio, "pixel ratio changed");
            self.config = config;
        }
    }

    /// Full redraw: base axes, then the limit layer, then the series layer.
    pub fn render(&mut self, frame: &ChartFrame) -> Result<Pixmap, RenderError> {
        let (width, height) = self.config.surface_size();
        let mut surface =
            Pixmap::new(width, height).ok_or(RenderError::Surface { width, height })?;

        self.axes_canvas(frame)
            .rasterize(&self.fonts, self.config.pixel_ratio, &mut surface)?;
        self.paint_limits(frame)?;
        self.paint_series(frame)?;
        self.composite(&mut surface);

        tracing::debug!(
            group = %frame.group,
            chart_type = %frame.chart_type,
            points = frame.points.len(),
            skipped = frame.skipped,
            "chart rendered"
        );
        Ok(surface)
    }

    /// Repaint only the limit layer.
    pub fn paint_limits(&mut self, frame: &ChartFrame) -> Result<(), RenderError> {
        let canvas = self.limits_canvas(frame);
        let (width, height) = self.config.surface_size();
        let layer = prepare_layer(&mut self.limits_layer, width, height)?;
        canvas.rasterize(&self.fonts, self.config.pixel_ratio, layer)
    }

    /// Repaint only the line and marker layer.
    pub fn paint_series(&mut self, frame: &ChartFrame) -> Result<(), RenderError> {
        let canvas = self.series_canvas(frame);
        let (width, height) = self.config.surface_size();
        let layer = prepare_layer(&mut self.series_layer, width, height)?;
        canvas.rasterize(&self.fonts, self.config.pixel_ratio, layer)
    }

    /// Stack the layers onto `surface`: limits below, series on top.
    pub fn composite(&self, surface: &mut Pixmap) {
        for layer in [&self.limits_layer, &self.series_layer].into_iter().flatten() {
            surface.draw_pixmap(
                0,
                0,
                layer.as_ref(),
                &PixmapPaint::default(),
                Transform::identity(),
                None,
            );
        }
    }

    pub fn limits_layer(&self) -> Option<&Pixmap> {
        self.limits_layer.as_ref()
    }

    pub fn series_layer(&self) -> Option<&Pixmap> {
        self.series_layer.as_ref()
    }

    fn plot_canvas(&self) -> SvgCanvas {
        let mut canvas = SvgCanvas::new(self.config.width, self.config.height);
        canvas.translate(self.config.margins.left, self.config.margins.top);
        canvas
    }

    fn axes_canvas(&self, frame: &ChartFrame) -> SvgCanvas {
        let mut canvas = SvgCanvas::new(self.config.width, self.config.height);
        canvas.fill_rect(
            0.0,
            0.0,
            self.config.width,
            self.config.height,
            &self.config.background,
        );
        canvas.translate(self.config.margins.left, self.config.margins.top);

        let axis = Stroke::solid(palette::AXIS, 1.0);
        let (w, h) = (frame.plot_width, frame.plot_height);

        canvas.line(0.0, 0.0, 0.0, h, axis);
        let tick_label = TextStyle::new(palette::TEXT, LABEL_SIZE)
            .anchor(Anchor::End)
            .baseline(Baseline::Middle);
        for tick in frame.y.ticks(self.config.y_ticks) {
            let y = frame.y.map(tick);
            canvas.line(-TICK_LENGTH, y, 0.0, y, axis);
            canvas.text(-2.0 * TICK_LENGTH, y, &format_value(tick), tick_label);
        }

        canvas.line(0.0, h, w, h, axis);
        let category_label = TextStyle::new(palette::TEXT, LABEL_SIZE)
            .anchor(Anchor::Middle)
            .baseline(Baseline::Top);
        for label in &frame.categories {
            canvas.line(label.x, h, label.x, h + TICK_LENGTH, axis);
            canvas.text(label.x, h + TICK_LENGTH + 3.0, &label.text, category_label);
        }

        canvas.restore();
        canvas
    }

    fn limits_canvas(&self, frame: &ChartFrame) -> SvgCanvas {
        let Some(limits) = frame.limits else {
            return SvgCanvas::new(self.config.width, self.config.height);
        };
        let mut canvas = self.plot_canvas();

        let lines = [
            (limits.cl, palette::CENTER_LINE),
            (limits.ucl, palette::UPPER_LIMIT),
            (limits.lcl, palette::LOWER_LIMIT),
        ];
        for (value, color) in lines {
            let y = frame.y.map(value);
            canvas.line(
                0.0,
                y,
                frame.plot_width,
                y,
                Stroke::dashed(color, 1.5, LIMIT_DASH),
            );
            canvas.text(
                frame.plot_width,
                y - 4.0,
                &format_value(value),
                TextStyle::new(color, LABEL_SIZE).anchor(Anchor::End),
            );
        }

        canvas.restore();
        canvas
    }

    fn series_canvas(&self, frame: &ChartFrame) -> SvgCanvas {
        if frame.is_empty() {
            return SvgCanvas::new(self.config.width, self.config.height);
        }
        let mut canvas = self.plot_canvas();

        // Missing values are dropped before this point, so their neighbours
        // are joined directly.
        let path: Vec<(f64, f64)> = frame.points.iter().map(|p| (p.x, p.y)).collect();
        canvas.polyline(&path, Stroke::solid(frame.color, 2.0));

        let radius = self.config.marker_radius;
        let value_label = TextStyle::new(palette::TEXT, LABEL_SIZE).anchor(Anchor::Middle);
        for point in &frame.points {
            canvas.circle(
                point.x,
                point.y,
                radius,
                palette::MARKER_FILL,
                Stroke::solid(frame.color, 2.0),
            );
            canvas.text(
                point.x,
                point.y - radius - 6.0,
                &format_value(point.value),
                value_label,
            );
        }

        canvas.restore();
        canvas
    }
}

fn prepare_layer(
    slot: &mut Option<Pixmap>,
    width: u32,
    height: u32,
) -> Result<&mut Pixmap, RenderError> {
    let reusable = matches!(slot.as_ref(), Some(layer) if layer.width() == width && layer.height() == height);
    if !reusable {
        let layer = Pixmap::new(width, height).ok_or(RenderError::Surface { width, height })?;
        tracing::debug!(width, height, "allocated chart layer");
        *slot = Some(layer);
    }
    let Some(layer) = slot.as_mut() else {
        return Err(RenderError::Surface { width, height });
    };
    layer.fill(Color::TRANSPARENT);
    Ok(layer)
}

/// Encode a rendered surface as PNG (straight, non-premultiplied RGBA).
pub fn encode_png(pixmap: &Pixmap) -> Result<Vec<u8>, RenderError> {
    let mut rgba = Vec::with_capacity(pixmap.data().len());
    for pixel in pixmap.pixels() {
        let color = pixel.demultiply();
        rgba.extend_from_slice(&[color.red(), color.green(), color.blue(), color.alpha()]);
    }

    let mut buffer = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut buffer, pixmap.width(), pixmap.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.write_header()?.write_image_data(&rgba)?;
    }
    Ok(buffer)
}

pub fn png_data_url(png: &[u8]) -> String {
    format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(png)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::limits::ChartType;
    use crate::core::model::ChartData;

    const DOC: &str = r#"{
        "groupMapping": {
            "NO_GROUP": [
                { "categoryId": "R0-%-A", "dataRowId": "1" },
                { "categoryId": "R0-%-B", "dataRowId": "2" },
                { "categoryId": "R0-%-C", "dataRowId": "x" },
                { "categoryId": "R0-%-D", "dataRowId": "3" }
            ],
            "HOLLOW": [
                { "categoryId": "A", "dataRowId": "x" }
            ]
        },
        "dataRowMapping": {
            "1": { "AC": 10, "WATERFALL_AC": [] },
            "2": { "AC": 12, "WATERFALL_AC": [] },
            "3": { "AC": 9, "WATERFALL_AC": [] }
        }
    }"#;

    fn renderer(ratio: f32) -> ChartRenderer {
        ChartRenderer::with_fonts(
            RenderConfig::default().with_pixel_ratio(ratio),
            Arc::new(fontdb::Database::new()),
        )
    }

    fn frame(group: &str, config: &RenderConfig) -> ChartFrame {
        let data = ChartData::from_json(DOC).unwrap();
        ChartFrame::build(&data, group, ChartType::I, config).unwrap()
    }

    fn painted(pixmap: &Pixmap) -> usize {
        pixmap.pixels().iter().filter(|p| p.alpha() > 0).count()
    }

    #[test]
    fn surface_is_scaled_by_pixel_ratio() {
        let mut renderer = renderer(2.0);
        let frame = frame("NO_GROUP", renderer.config());
        let surface = renderer.render(&frame).unwrap();
        assert_eq!((surface.width(), surface.height()), (1800, 800));
        assert_eq!(renderer.limits_layer().unwrap().width(), 1800);
    }

    #[test]
    fn layers_are_painted_independently() {
        let mut renderer = renderer(1.0);
        let frame = frame("NO_GROUP", renderer.config());
        renderer.render(&frame).unwrap();
        assert!(painted(renderer.limits_layer().unwrap()) > 0);
        assert!(painted(renderer.series_layer().unwrap()) > 0);
    }

    #[test]
    fn empty_group_draws_no_limits_or_series() {
        let mut renderer = renderer(1.0);
        let frame = frame("HOLLOW", renderer.config());
        let surface = renderer.render(&frame).unwrap();
        assert_eq!(painted(renderer.limits_layer().unwrap()), 0);
        assert_eq!(painted(renderer.series_layer().unwrap()), 0);
        // Background and axes are still there.
        assert!(painted(&surface) > 0);
    }

    #[test]
    fn layers_are_reused_and_cleared_between_renders() {
        let mut renderer = renderer(1.0);
        let full = frame("NO_GROUP", renderer.config());
        renderer.render(&full).unwrap();
        let before = renderer.series_layer().unwrap().data().as_ptr();

        let hollow = frame("HOLLOW", renderer.config());
        renderer.render(&hollow).unwrap();
        let after = renderer.series_layer().unwrap();
        assert_eq!(before, after.data().as_ptr());
        assert_eq!(painted(after), 0);
    }

    #[test]
    fn pixel_ratio_change_reallocates_layers() {
        let mut renderer = renderer(1.0);
        let frame = frame("NO_GROUP", renderer.config());
        renderer.render(&frame).unwrap();
        renderer.set_pixel_ratio(2.0);
        renderer.render(&frame).unwrap();
        assert_eq!(renderer.series_layer().unwrap().width(), 1800);
    }

    #[test]
    fn series_layer_sits_on_top_of_limits() {
        let mut renderer = renderer(1.0);
        let frame = frame("NO_GROUP", renderer.config());
        let surface = renderer.render(&frame).unwrap();

        // Centre of the first marker: white fill from the series layer.
        let point = &frame.points[0];
        let x = (renderer.config().margins.left + point.x).round() as u32;
        let y = (renderer.config().margins.top + point.y).round() as u32;
        let pixel = surface.pixel(x, y).unwrap();
        assert!(pixel.red() > 200 && pixel.green() > 200 && pixel.blue() > 200);
    }

    #[test]
    fn png_output_has_signature() {
        let mut renderer = renderer(1.0);
        let frame = frame("NO_GROUP", renderer.config());
        let surface = renderer.render(&frame).unwrap();
        let png = encode_png(&surface).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
        assert!(png_data_url(&png).starts_with("data:image/png;base64,iVBORw0KGgo"));
    }

    #[test]
    fn line_joins_neighbours_across_missing_items() {
        let renderer = renderer(1.0);
        let frame = frame("NO_GROUP", renderer.config());
        let svg = renderer.series_canvas(&frame).to_svg();

        let start = svg.find("<polyline points='").unwrap() + "<polyline points='".len();
        let end = start + svg[start..].find('\'').unwrap();
        let vertices: Vec<&str> = svg[start..end].split(' ').collect();
        let expected: Vec<String> = frame
            .points
            .iter()
            .map(|p| format!("{:.2},{:.2}", p.x, p.y))
            .collect();
        assert_eq!(vertices, expected);

        // B connects straight to D; C has no vertex of its own.
        let b = frame.x.center("R0-%-B").unwrap();
        let c = frame.x.center("R0-%-C").unwrap();
        let d = frame.x.center("R0-%-D").unwrap();
        assert!(vertices[1].starts_with(&format!("{b:.2},")));
        assert!(vertices[2].starts_with(&format!("{d:.2},")));
        assert!(!vertices.iter().any(|v| v.starts_with(&format!("{c:.2},"))));
    }

    #[test]
    fn labels_are_drawn_with_the_bundled_font() {
        let config = RenderConfig::default();
        let frame = frame("NO_GROUP", &config);

        let mut bare = renderer(1.0);
        bare.render(&frame).unwrap();
        let mut labelled = ChartRenderer::with_fonts(config, load_fonts());
        labelled.render(&frame).unwrap();

        // Same dashed lines on both; the difference is the three limit labels.
        let without = painted(bare.limits_layer().unwrap());
        let with = painted(labelled.limits_layer().unwrap());
        assert!(with > without + 30, "limit labels missing: {with} vs {without}");
    }
}
