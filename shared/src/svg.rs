//! Standalone SVG rendering of a map scene.

use std::fmt::{self, Write};

use crate::controller::MapScene;
use crate::legend::Legend;

/// Render the scene as an SVG document: legend, counties, then the
/// state-border mesh on top.
pub fn render_svg(scene: &MapScene) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_scene(&mut out, scene);
    out
}

fn write_scene(out: &mut String, scene: &MapScene) -> fmt::Result {
    let (width, height) = (scene.width, scene.height);
    writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
    )?;
    write_legend(out, &scene.legend)?;

    writeln!(out, r#"<g class="counties">"#)?;
    for county in &scene.counties {
        if county.shape.is_empty() {
            continue;
        }
        write!(out, "<path")?;
        if let Some(id) = &county.id {
            write!(out, r#" data-id="{}""#, escape(id))?;
        }
        writeln!(
            out,
            r#" d="{}" fill="{}" stroke="{}" stroke-width="{}"/>"#,
            county.shape.svg_path(),
            county.style.fill,
            county.style.stroke,
            scene.style.county_stroke_width,
        )?;
    }
    writeln!(out, "</g>")?;

    writeln!(
        out,
        r#"<path class="states" d="{}" fill="none" stroke="{}" stroke-width="{}" stroke-linejoin="round"/>"#,
        scene.state_mesh.svg_path(),
        scene.style.state_mesh_stroke,
        scene.style.state_mesh_width,
    )?;
    writeln!(out, "</svg>")
}

fn write_legend(out: &mut String, legend: &Legend) -> fmt::Result {
    let (ox, oy) = legend.origin;
    writeln!(out, r#"<g class="key" transform="translate({ox},{oy})">"#)?;
    for swatch in &legend.swatches {
        writeln!(
            out,
            r#"<rect x="{}" y="0" width="{}" height="{}" fill="{}"/>"#,
            swatch.x, swatch.width, legend.swatch_height, swatch.fill
        )?;
    }
    writeln!(
        out,
        r##"<text class="caption" x="{}" y="{}" fill="#000" text-anchor="start" font-weight="bold" font-size="10" font-family="sans-serif">{}</text>"##,
        legend.caption.x,
        legend.caption.y,
        escape(&legend.caption.text)
    )?;
    for tick in &legend.ticks {
        writeln!(
            out,
            r##"<g class="tick" transform="translate({},0)"><line y2="{}" stroke="#000"/><text y="{}" dy="0.71em" text-anchor="middle" font-size="10" font-family="sans-serif">{}</text></g>"##,
            tick.x,
            legend.tick_size,
            legend.tick_size + 3.0,
            escape(&tick.label)
        )?;
    }
    writeln!(out, "</g>")
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
