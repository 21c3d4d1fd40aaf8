use crate::config::RenderConfig;
use crate::layout::{Connection, LabelBox, Layout, PositionedNode};
use crate::store::EvolutionStore;
use std::fmt::Write;

pub struct SvgRenderer {
    config: RenderConfig,
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self {
            config: RenderConfig::default(),
        }
    }
}

struct Palette {
    background: &'static str,
    card: &'static str,
    image: &'static str,
    text: &'static str,
    muted: &'static str,
    label_bg: &'static str,
    label_text: &'static str,
}

const LIGHT: Palette = Palette {
    background: "#f3f4f6",
    card: "#ffffff",
    image: "#f3f4f6",
    text: "#111827",
    muted: "#4b5563",
    label_bg: "#ffffff",
    label_text: "#374151",
};

const DARK: Palette = Palette {
    background: "#3e3d32",
    card: "#49483e",
    image: "#75715e",
    text: "#f8f8f2",
    muted: "#75715e",
    label_bg: "#49483e",
    label_text: "#f8f8f2",
};

impl SvgRenderer {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    fn palette(&self) -> &'static Palette {
        if self.config.dark_mode { &DARK } else { &LIGHT }
    }

    pub fn render(&self, store: &EvolutionStore, layout: &Layout) -> String {
        let mut svg = String::new();
        let palette = self.palette();

        writeln!(
            &mut svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
            layout.width, layout.height, layout.width, layout.height
        )
        .unwrap();

        writeln!(
            &mut svg,
            r#"<style>
  .card {{ fill: {card}; stroke: {line}; stroke-width: 4; }}
  .card-image {{ fill: {image}; }}
  .card-name {{ font-family: {font}; font-size: 14px; fill: {text}; }}
  .card-stage {{ font-family: {font}; font-size: 12px; fill: {muted}; }}
  .toggle {{ stroke: none; }}
  .toggle-glyph {{ font-family: {font}; font-size: 18px; font-weight: bold; fill: #000; }}
  .connection {{ stroke: {line}; stroke-width: 3; fill: none; stroke-linecap: round; stroke-linejoin: round; }}
  .requirement {{ fill: {label_bg}; stroke: {line}; stroke-width: 2; }}
  .requirement-text {{ font-family: {font}; font-size: 10px; fill: {label_text}; }}
</style>"#,
            card = palette.card,
            line = self.config.line_color,
            image = palette.image,
            font = self.config.font_family,
            text = palette.text,
            muted = palette.muted,
            label_bg = palette.label_bg,
            label_text = palette.label_text,
        )
        .unwrap();

        writeln!(
            &mut svg,
            r#"<rect width="100%" height="100%" fill="{}" />"#,
            palette.background
        )
        .unwrap();

        // Paths first so requirement boxes sit on top of them
        for conn in &layout.connections {
            self.render_path(&mut svg, conn);
        }
        for conn in &layout.connections {
            if let Some(label) = &conn.label {
                self.render_label(&mut svg, label);
            }
        }

        for node in &layout.nodes {
            self.render_node(&mut svg, store, node);
        }

        writeln!(&mut svg, "</svg>").unwrap();
        svg
    }

    fn render_path(&self, svg: &mut String, conn: &Connection) {
        writeln!(
            svg,
            r#"<path class="connection" data-from="{}" data-to="{}" d="{}" />"#,
            escape_xml(&conn.from),
            escape_xml(&conn.to),
            conn.path
        )
        .unwrap();
    }

    fn render_label(&self, svg: &mut String, label: &LabelBox) {
        writeln!(
            svg,
            r#"<rect class="requirement" x="{}" y="{}" width="{}" height="{}" rx="4" />"#,
            label.x, label.y, label.width, label.height
        )
        .unwrap();

        for (i, line) in label.lines.iter().enumerate() {
            writeln!(
                svg,
                r#"<text class="requirement-text" x="{}" y="{}" text-anchor="middle">{}</text>"#,
                label.center_x,
                label.line_y(i) + 4.0,
                escape_xml(line)
            )
            .unwrap();
        }
    }

    fn render_node(&self, svg: &mut String, store: &EvolutionStore, node: &PositionedNode) {
        let (x, y, w, h) = (node.x, node.y, node.width, node.height);
        let name = store.get(&node.id).map(|e| e.name.as_str()).unwrap_or(node.id.as_str());

        writeln!(svg, r#"<g class="node" data-id="{}">"#, escape_xml(&node.id)).unwrap();

        writeln!(
            svg,
            r#"<rect class="card" x="{}" y="{}" width="{}" height="{}" rx="12" />"#,
            x, y, w, h
        )
        .unwrap();

        // Image well covers the upper part of the card
        let inset = 12.0;
        let image_h = (h * 0.64).min(h - 60.0).max(0.0);
        writeln!(
            svg,
            r#"<rect class="card-image" x="{}" y="{}" width="{}" height="{}" rx="8" />"#,
            x + inset,
            y + inset,
            w - inset * 2.0,
            image_h
        )
        .unwrap();

        if let Some(href) = store.get(&node.id).map(|e| e.image.as_str()).filter(|s| !s.is_empty()) {
            writeln!(
                svg,
                r#"<image href="{}" x="{}" y="{}" width="{}" height="{}" preserveAspectRatio="xMidYMid meet" />"#,
                escape_xml(href),
                x + inset,
                y + inset,
                w - inset * 2.0,
                image_h
            )
            .unwrap();
        }

        writeln!(
            svg,
            r#"<text class="card-name" x="{}" y="{}" text-anchor="middle">{}</text>"#,
            x + w / 2.0,
            y + h - 30.0,
            escape_xml(name)
        )
        .unwrap();
        writeln!(
            svg,
            r#"<text class="card-stage" x="{}" y="{}" text-anchor="middle">{}</text>"#,
            x + w / 2.0,
            y + h - 12.0,
            node.stage.as_str()
        )
        .unwrap();

        if node.collapsible {
            let (fill, glyph) = if node.collapsed {
                ("#86efac", "+")
            } else {
                ("#fca5a5", "-")
            };
            let cx = x + w - 24.0;
            let cy = y + 24.0;
            writeln!(
                svg,
                r#"<circle class="toggle" cx="{}" cy="{}" r="16" fill="{}" />"#,
                cx, cy, fill
            )
            .unwrap();
            writeln!(
                svg,
                r#"<text class="toggle-glyph" x="{}" y="{}" text-anchor="middle">{}</text>"#,
                cx,
                cy + 6.0,
                glyph
            )
            .unwrap();
        }

        writeln!(svg, "</g>").unwrap();
    }
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
