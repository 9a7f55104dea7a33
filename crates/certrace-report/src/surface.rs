// Deterministic SVG chart surface.
//
// Handlers describe panels (bars, lines, markers, tick labels) in data
// coordinates; the surface lays them out as a vertical stack and
// serializes everything at once. Identical input produces identical
// SVG bytes. Colors come from a fixed palette and carry no meaning.

use std::fmt::Write as _;

const WIDTH: f64 = 800.0;
const PANEL_HEIGHT: f64 = 150.0;
const PANEL_PAD: f64 = 28.0;
const MARGIN_LEFT: f64 = 170.0;
const MARGIN_RIGHT: f64 = 30.0;
const TITLE_HEIGHT: f64 = 42.0;

const PALETTE: [&str; 5] = ["#4e79a7", "#f28e2b", "#59a14f", "#e15759", "#76b7b2"];
const MARK_COLOR: &str = "#59a14f";
const VLINE_COLOR: &str = "#e15759";

/// One chart row on the surface.
#[derive(Debug, Default)]
pub struct Panel {
    label: String,
    bars: Vec<(f64, f64, f64)>,
    lines: Vec<Vec<(f64, f64)>>,
    vlines: Vec<(f64, String)>,
    marks: Vec<(f64, f64)>,
    center_text: Option<String>,
    x_ticks: Vec<(f64, String)>,
    y_ticks: Vec<(f64, String)>,
    x_range: Option<(f64, f64)>,
    y_range: Option<(f64, f64)>,
}

impl Panel {
    /// Add one bar at `x`, `width` wide and `height` tall (height >= 0).
    pub fn bar(&mut self, x: f64, width: f64, height: f64) {
        self.bars.push((x, width, height.max(0.0)));
    }

    pub fn bars(&mut self, bars: &[(f64, f64, f64)]) {
        for &(x, width, height) in bars {
            self.bar(x, width, height);
        }
    }

    /// Add one polyline series through `points`.
    pub fn line(&mut self, points: &[(f64, f64)]) {
        if !points.is_empty() {
            self.lines.push(points.to_vec());
        }
    }

    /// Full-height event marker at `x`.
    pub fn vline(&mut self, x: f64, label: impl Into<String>) {
        self.vlines.push((x, label.into()));
    }

    /// Point marker at (`x`, `y`).
    pub fn mark(&mut self, x: f64, y: f64) {
        self.marks.push((x, y));
    }

    /// Text centered in the panel, for summary figures.
    pub fn center_text(&mut self, text: impl Into<String>) {
        self.center_text = Some(text.into());
    }

    pub fn x_tick(&mut self, x: f64, label: impl Into<String>) {
        self.x_ticks.push((x, label.into()));
    }

    pub fn y_tick(&mut self, y: f64, label: impl Into<String>) {
        self.y_ticks.push((y, label.into()));
    }

    pub fn x_limits(&mut self, lo: f64, hi: f64) {
        self.x_range = Some((lo, hi));
    }

    pub fn y_limits(&mut self, lo: f64, hi: f64) {
        self.y_range = Some((lo, hi));
    }

    fn data_x_range(&self) -> (f64, f64) {
        if let Some(range) = self.x_range {
            return range;
        }
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for &(x, width, _) in &self.bars {
            lo = lo.min(x);
            hi = hi.max(x + width);
        }
        for series in &self.lines {
            for &(x, _) in series {
                lo = lo.min(x);
                hi = hi.max(x);
            }
        }
        for &(x, _) in &self.marks {
            lo = lo.min(x);
            hi = hi.max(x);
        }
        for &(x, _) in &self.vlines {
            lo = lo.min(x);
            hi = hi.max(x);
        }
        if lo.is_finite() && hi.is_finite() {
            (lo.min(0.0), hi)
        } else {
            (0.0, 1.0)
        }
    }

    fn data_y_range(&self) -> (f64, f64) {
        if let Some(range) = self.y_range {
            return range;
        }
        let mut lo = 0.0_f64;
        let mut hi = f64::NEG_INFINITY;
        for &(_, _, height) in &self.bars {
            hi = hi.max(height);
        }
        for series in &self.lines {
            for &(_, y) in series {
                lo = lo.min(y);
                hi = hi.max(y);
            }
        }
        for &(_, y) in &self.marks {
            lo = lo.min(y);
            hi = hi.max(y);
        }
        if hi.is_finite() {
            (lo, hi)
        } else {
            (0.0, 1.0)
        }
    }
}

/// A titled stack of panels, rendered to SVG in one pass.
///
/// The surface is an in-memory description until `into_svg`; dropping
/// it without finalizing discards everything, so an aborted render
/// leaves nothing behind.
#[derive(Debug, Default)]
pub struct PlotSurface {
    title: String,
    panels: Vec<Panel>,
}

impl PlotSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Append a panel labeled `label` and return it for drawing.
    pub fn panel(&mut self, label: impl Into<String>) -> &mut Panel {
        self.panels.push(Panel {
            label: label.into(),
            ..Panel::default()
        });
        self.panels.last_mut().expect("panel just pushed")
    }

    pub fn panel_count(&self) -> usize {
        self.panels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    /// Serialize the whole surface. Infallible: every panel renders,
    /// empty ones as a blank frame.
    pub fn into_svg(self) -> String {
        let height = TITLE_HEIGHT + self.panels.len() as f64 * (PANEL_HEIGHT + PANEL_PAD);
        let mut svg = String::new();
        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{height}" viewBox="0 0 {WIDTH} {height}" font-family="sans-serif">"#
        );
        let _ = writeln!(
            svg,
            r##"<rect x="0" y="0" width="{WIDTH}" height="{height}" fill="#ffffff"/>"##
        );
        if !self.title.is_empty() {
            let _ = writeln!(
                svg,
                r#"<text x="{:.1}" y="26" font-size="18" text-anchor="middle">{}</text>"#,
                WIDTH / 2.0,
                escape(&self.title)
            );
        }

        for (index, panel) in self.panels.into_iter().enumerate() {
            let top = TITLE_HEIGHT + index as f64 * (PANEL_HEIGHT + PANEL_PAD);
            render_panel(&mut svg, &panel, top);
        }

        svg.push_str("</svg>\n");
        svg
    }
}

fn render_panel(svg: &mut String, panel: &Panel, top: f64) {
    let plot_w = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let (x0, x1) = panel.data_x_range();
    let (y0, y1) = panel.data_y_range();
    let x_span = if x1 > x0 { x1 - x0 } else { 1.0 };
    let y_span = if y1 > y0 { y1 - y0 } else { 1.0 };

    let px = |x: f64| MARGIN_LEFT + (x - x0) / x_span * plot_w;
    let py = |y: f64| top + PANEL_HEIGHT - (y - y0) / y_span * PANEL_HEIGHT;

    // frame + label
    let _ = writeln!(
        svg,
        r##"<rect x="{MARGIN_LEFT}" y="{top:.1}" width="{plot_w:.1}" height="{PANEL_HEIGHT}" fill="none" stroke="#999999"/>"##
    );
    let _ = writeln!(
        svg,
        r#"<text x="{:.1}" y="{:.1}" font-size="12" text-anchor="end">{}</text>"#,
        MARGIN_LEFT - 8.0,
        top + PANEL_HEIGHT / 2.0,
        escape(&panel.label)
    );

    for &(x, width, height) in &panel.bars {
        let rect_x = px(x);
        let rect_w = (width / x_span * plot_w).max(1.0);
        let rect_y = py(height);
        let rect_h = py(y0.max(0.0)) - rect_y;
        if rect_h > 0.0 {
            let _ = writeln!(
                svg,
                r#"<rect x="{rect_x:.1}" y="{rect_y:.1}" width="{rect_w:.1}" height="{rect_h:.1}" fill="{}"/>"#,
                PALETTE[0]
            );
        }
    }

    for (series_index, series) in panel.lines.iter().enumerate() {
        let color = PALETTE[series_index % PALETTE.len()];
        let points: Vec<String> = series
            .iter()
            .map(|&(x, y)| format!("{:.1},{:.1}", px(x), py(y)))
            .collect();
        let _ = writeln!(
            svg,
            r#"<polyline points="{}" fill="none" stroke="{color}" stroke-width="1.5"/>"#,
            points.join(" ")
        );
    }

    for &(x, ref label) in &panel.vlines {
        let line_x = px(x);
        let _ = writeln!(
            svg,
            r#"<line x1="{line_x:.1}" y1="{top:.1}" x2="{line_x:.1}" y2="{:.1}" stroke="{VLINE_COLOR}"/>"#,
            top + PANEL_HEIGHT
        );
        if !label.is_empty() {
            let _ = writeln!(
                svg,
                r#"<text x="{:.1}" y="{:.1}" font-size="9" fill="{VLINE_COLOR}">{}</text>"#,
                line_x + 2.0,
                top + 10.0,
                escape(label)
            );
        }
    }

    for &(x, y) in &panel.marks {
        let _ = writeln!(
            svg,
            r#"<circle cx="{:.1}" cy="{:.1}" r="3" fill="{MARK_COLOR}"/>"#,
            px(x),
            py(y)
        );
    }

    if let Some(text) = &panel.center_text {
        let _ = writeln!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" font-size="14" text-anchor="middle">{}</text>"#,
            MARGIN_LEFT + plot_w / 2.0,
            top + PANEL_HEIGHT / 2.0,
            escape(text)
        );
    }

    for &(x, ref label) in &panel.x_ticks {
        let _ = writeln!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" font-size="10" text-anchor="middle">{}</text>"#,
            px(x),
            top + PANEL_HEIGHT + 14.0,
            escape(label)
        );
    }

    for &(y, ref label) in &panel.y_ticks {
        let _ = writeln!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" font-size="10" text-anchor="end">{}</text>"#,
            MARGIN_LEFT - 4.0,
            py(y) + 3.0,
            escape(label)
        );
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_surface_still_renders() {
        let mut surface = PlotSurface::new();
        surface.set_title("Empty");
        let svg = surface.into_svg();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("Empty"));
        assert!(svg.ends_with("</svg>\n"));
    }

    #[test]
    fn test_panels_render_marks_and_bars() {
        let mut surface = PlotSurface::new();
        let panel = surface.panel("cpu_0");
        panel.bars(&[(0.0, 0.8, 3.0), (1.0, 0.8, 1.0)]);
        panel.x_tick(0.4, "Startup");
        let panel = surface.panel("temperature");
        panel.line(&[(0.0, 30.0), (1.0, 42.5)]);
        panel.mark(0.5, 31.0);

        let svg = surface.into_svg();
        assert!(svg.contains("<polyline"));
        assert!(svg.contains("<circle"));
        assert!(svg.contains("Startup"));
        assert_eq!(svg.matches("cpu_0").count(), 1);
    }

    #[test]
    fn test_identical_input_identical_output() {
        let build = || {
            let mut surface = PlotSurface::new();
            surface.set_title("Deterministic");
            surface.panel("a").bars(&[(0.0, 1.0, 2.0)]);
            surface.into_svg()
        };
        assert_eq!(build(), build());
    }

    #[test]
    fn test_escapes_markup() {
        let mut surface = PlotSurface::new();
        surface.set_title("a < b & c");
        let svg = surface.into_svg();
        assert!(svg.contains("a &lt; b &amp; c"));
    }
}
