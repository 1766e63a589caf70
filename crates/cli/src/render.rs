//! Output writers for a finished layout.
//!
//! Layout coordinates are y-up; SVG is y-down, so every y is flipped
//! against the output height.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::Result;
use serde::Serialize;
use tonefill_core::metrics::FontFace;
use tonefill_core::pipeline::Layout;

/// Drawing options shared by the writers.
#[derive(Debug, Clone, Copy)]
pub struct Style {
    pub face: FontFace,
    pub font_size: f64,
    pub show_slots: bool,
}

fn escape_xml(ch: char, out: &mut String) {
    match ch {
        '&' => out.push_str("&amp;"),
        '<' => out.push_str("&lt;"),
        '>' => out.push_str("&gt;"),
        '"' => out.push_str("&quot;"),
        '\'' => out.push_str("&apos;"),
        _ => out.push(ch),
    }
}

/// Renders the layout as a standalone SVG document, one `<text>` element
/// per placed character.
pub fn svg(layout: &Layout, style: &Style) -> String {
    let (w, h) = (layout.width, layout.height);
    let mut out = String::with_capacity(64 * layout.placements.len() + 256);
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
    );

    if style.show_slots {
        out.push_str(r##"<g fill="none" stroke="#e03030" stroke-width="0.3">"##);
        out.push('\n');
        for slot in &layout.slots {
            let _ = writeln!(
                out,
                r#"<rect x="{:.3}" y="{:.3}" width="{:.3}" height="{:.3}"/>"#,
                slot.left,
                h - slot.top,
                slot.right - slot.left,
                slot.top - slot.bottom
            );
        }
        out.push_str("</g>\n");
    }

    let _ = writeln!(
        out,
        r#"<g font-family="{}" font-size="{}" fill="black" xml:space="preserve">"#,
        style.face.family(),
        style.font_size
    );
    for p in &layout.placements {
        if p.ch == ' ' {
            continue;
        }
        let _ = write!(out, r#"<text x="{:.3}" y="{:.3}">"#, p.x, h - p.y);
        escape_xml(p.ch, &mut out);
        out.push_str("</text>\n");
    }
    out.push_str("</g>\n</svg>\n");
    out
}

#[derive(Debug, Serialize)]
struct PlanSlot {
    index: usize,
    left: f64,
    bottom: f64,
    right: f64,
    top: f64,
}

#[derive(Debug, Serialize)]
struct PlanGlyph {
    slot: usize,
    ch: char,
    x: f64,
    y: f64,
    advance: f64,
}

#[derive(Debug, Serialize)]
struct PlanLine {
    slot: usize,
    text: String,
    extra: f64,
}

/// Machine-readable placement plan.
#[derive(Debug, Serialize)]
struct Plan<'a> {
    width: f64,
    height: f64,
    font: &'a str,
    font_size: f64,
    consumed: usize,
    total: usize,
    unconsumed: String,
    lines: Vec<PlanLine>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    slots: Vec<PlanSlot>,
    glyphs: Vec<PlanGlyph>,
}

/// Writes the layout as pretty-printed JSON.
pub fn json<W: Write>(layout: &Layout, style: &Style, writer: W) -> Result<()> {
    let slots = if style.show_slots {
        layout
            .slots
            .iter()
            .map(|s| PlanSlot {
                index: s.index,
                left: s.left,
                bottom: s.bottom,
                right: s.right,
                top: s.top,
            })
            .collect()
    } else {
        Vec::new()
    };
    let plan = Plan {
        width: layout.width,
        height: layout.height,
        font: style.face.family(),
        font_size: style.font_size,
        consumed: layout.consumed,
        total: layout.total(),
        unconsumed: layout.unconsumed(),
        lines: layout
            .lines
            .iter()
            .map(|line| PlanLine {
                slot: line.slot,
                text: layout.stream[line.drawn.clone()].iter().collect(),
                extra: line.extra,
            })
            .collect(),
        slots,
        glyphs: layout
            .placements
            .iter()
            .map(|p| PlanGlyph {
                slot: p.slot,
                ch: p.ch,
                x: p.x,
                y: p.y,
                advance: p.advance,
            })
            .collect(),
    };
    serde_json::to_writer_pretty(writer, &plan)?;
    Ok(())
}
