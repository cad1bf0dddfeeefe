//! Standalone SVG snapshot of a draw list.

use std::fmt::Write as _;

use formats::Palette;
use scene::components::{Color, Layer, Paint, Shape};

use crate::projection::Viewport;
use crate::render::DrawItem;

const OCEAN_GRADIENT_ID: &str = "ocean";
const GLOW_FILTER_ID: &str = "glow";
const LABEL_FONT_PX: f64 = 10.0;

pub fn render_svg(items: &[DrawItem<'_>], viewport: Viewport, palette: &Palette) -> String {
    let [w, h] = viewport.size();
    let mut out = String::with_capacity(64 * 1024);
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w:.0}" height="{h:.0}" viewBox="0 0 {w:.0} {h:.0}">"#
    );
    write_defs(&mut out, palette);
    let _ = writeln!(
        out,
        r#"<rect width="100%" height="100%" fill="{}"/>"#,
        palette.background.to_hex()
    );
    for item in items {
        write_item(&mut out, item);
    }
    out.push_str("</svg>\n");
    out
}

fn write_defs(out: &mut String, palette: &Palette) {
    let _ = writeln!(
        out,
        concat!(
            r#"<defs><radialGradient id="{id}" cx="40%" cy="35%" r="75%">"#,
            r#"<stop offset="0%" stop-color="{inner}"/>"#,
            r#"<stop offset="100%" stop-color="{outer}"/></radialGradient>"#,
            r#"<filter id="{glow}" x="-50%" y="-50%" width="200%" height="200%">"#,
            r#"<feGaussianBlur stdDeviation="2.5" result="blur"/>"#,
            r#"<feMerge><feMergeNode in="blur"/><feMergeNode in="SourceGraphic"/></feMerge>"#,
            r#"</filter></defs>"#
        ),
        id = OCEAN_GRADIENT_ID,
        inner = palette.ocean_inner.to_hex(),
        outer = palette.ocean_outer.to_hex(),
        glow = GLOW_FILTER_ID,
    );
}

fn write_item(out: &mut String, item: &DrawItem<'_>) {
    let style = style_attrs(item.paint, item.layer == Layer::Ocean);
    match item.shape {
        Shape::Empty => {}
        Shape::Path(path) => {
            let _ = writeln!(out, r#"<path d="{}"{style}/>"#, path.to_svg_d());
        }
        Shape::Circle { center, radius } => {
            let _ = writeln!(
                out,
                r#"<circle cx="{:.1}" cy="{:.1}" r="{:.2}"{style}/>"#,
                center[0], center[1], radius
            );
        }
        Shape::Points(points) => {
            let _ = write!(out, "<g{style}>");
            for p in points {
                let _ = write!(
                    out,
                    r#"<circle cx="{:.1}" cy="{:.1}" r="{:.2}"/>"#,
                    p[0], p[1], p[2]
                );
            }
            out.push_str("</g>\n");
        }
        Shape::Text { anchor, text } => {
            let _ = writeln!(
                out,
                r#"<text x="{:.1}" y="{:.1}" font-size="{LABEL_FONT_PX}"{style}>{}</text>"#,
                anchor[0],
                anchor[1],
                escape_text(text)
            );
        }
    }
}

fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

fn style_attrs(paint: &Paint, gradient_fill: bool) -> String {
    let mut s = String::new();
    match paint.fill {
        Some(_) if gradient_fill => {
            let _ = write!(s, r#" fill="url(#{OCEAN_GRADIENT_ID})""#);
        }
        Some(c) => color_attr(&mut s, "fill", c),
        None => s.push_str(r#" fill="none""#),
    }
    if let Some(c) = paint.stroke {
        color_attr(&mut s, "stroke", c);
        let _ = write!(s, r#" stroke-width="{}""#, paint.stroke_width);
        if let Some([on, off]) = paint.dash {
            let _ = write!(
                s,
                r#" stroke-dasharray="{on} {off}" stroke-dashoffset="{:.2}""#,
                paint.dash_offset
            );
        }
    }
    if paint.opacity < 1.0 {
        let _ = write!(s, r#" opacity="{:.3}""#, paint.opacity);
    }
    if paint.glow {
        let _ = write!(s, r#" filter="url(#{GLOW_FILTER_ID})""#);
    }
    s
}

fn color_attr(s: &mut String, name: &str, c: Color) {
    let _ = write!(s, r#" {name}="{}""#, c.to_hex());
    if c.a < 255 {
        let _ = write!(s, r#" {name}-opacity="{:.3}""#, c.alpha());
    }
}
