//! Printable label layout.
//!
//! Geometry (millimetres, origin top-left, A6 page by default):
//!
//! ```text
//! 0..105      QR code, full width square
//! y=110       "Recipient" heading, 15pt bold
//! y=115,119   recipient person, address (10pt)
//! y=130       "Sender" heading, 8pt bold
//! y=134,136   sender name, address (5pt)
//! ```
//!
//! Output is a self-contained SVG document sized in millimetres so it prints
//! at physical scale.

use std::fmt::Write as _;

use labelseal_core::claims::LabelFields;
use qrcode::{Color, QrCode};
use tracing::debug;

use crate::config::LabelConfig;
use crate::error::RenderResult;
use crate::qr::encode_qr;

const MM_PER_PT: f64 = 25.4 / 72.0;
const MARGIN_X: f64 = 5.0;

struct TextBlock<'a> {
    heading: &'static str,
    heading_y: f64,
    heading_pt: f64,
    lines: [&'a str; 2],
    first_line_y: f64,
    line_step: f64,
    line_pt: f64,
}

/// Render the label for a finished envelope.
pub fn render_label_svg(
    envelope_text: &str,
    fields: &LabelFields,
    cfg: &LabelConfig,
) -> RenderResult<String> {
    cfg.validate()?;
    let code = encode_qr(envelope_text, &cfg.qr)?;

    let w = cfg.page.width_mm;
    let h = cfg.page.height_mm;

    let mut out = String::new();
    let _ = writeln!(
        out,
        r##"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="{w}mm" height="{h}mm" viewBox="0 0 {w} {h}">
<rect x="0" y="0" width="{w}" height="{h}" fill="#fff"/>"##
    );

    write_qr(&mut out, &code, w, cfg.qr.quiet_zone);

    let blocks = [
        TextBlock {
            heading: "Recipient",
            heading_y: 110.0,
            heading_pt: 15.0,
            lines: fields.recipient_lines(),
            first_line_y: 115.0,
            line_step: 4.0,
            line_pt: 10.0,
        },
        TextBlock {
            heading: "Sender",
            heading_y: 130.0,
            heading_pt: 8.0,
            lines: fields.sender_lines(),
            first_line_y: 134.0,
            line_step: 2.0,
            line_pt: 5.0,
        },
    ];
    for block in &blocks {
        write_text(&mut out, block.heading, block.heading_y, block.heading_pt, true);
        for (i, line) in block.lines.iter().enumerate() {
            let y = block.first_line_y + block.line_step * i as f64;
            write_text(&mut out, line, y, block.line_pt, false);
        }
    }

    out.push_str("</svg>\n");

    debug!(modules = code.width(), bytes = out.len(), "label rendered");
    Ok(out)
}

/// Draw dark modules as a single path scaled into a `size` x `size` square.
fn write_qr(out: &mut String, code: &QrCode, size: f64, quiet_zone: bool) {
    let modules = code.width();
    let pad = if quiet_zone { 4 } else { 0 };
    let scale = size / (modules + 2 * pad) as f64;

    let mut d = String::new();
    for (i, color) in code.to_colors().into_iter().enumerate() {
        if color == Color::Dark {
            let x = i % modules + pad;
            let y = i / modules + pad;
            let _ = write!(d, "M{x} {y}h1v1h-1z");
        }
    }

    let _ = writeln!(
        out,
        r##"<path transform="scale({scale})" fill="#000" shape-rendering="crispEdges" d="{d}"/>"##
    );
}

fn write_text(out: &mut String, text: &str, y: f64, pt: f64, bold: bool) {
    let size = pt * MM_PER_PT;
    let weight = if bold { "bold" } else { "normal" };
    let _ = writeln!(
        out,
        r#"<text x="{MARGIN_X}" y="{y}" font-family="Arial, Helvetica, sans-serif" font-size="{size:.3}" font-weight="{weight}">{}</text>"#,
        escape_xml(text)
    );
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RenderError;
    use assert_matches::assert_matches;

    fn fields() -> LabelFields {
        LabelFields {
            recipient_person: "Alice".into(),
            recipient_address: "1 Main St".into(),
            sender_name: "Parcel & Co".into(),
            sender_address: "<9> Dock Rd".into(),
        }
    }

    #[test]
    fn label_contains_fields_and_qr() {
        let svg = render_label_svg("a: b\nx_sig: AAAA\n", &fields(), &LabelConfig::default()).unwrap();
        assert!(svg.contains(r#"width="105mm" height="148mm""#));
        assert!(svg.contains(">Recipient</text>"));
        assert!(svg.contains(">Alice</text>"));
        assert!(svg.contains(">1 Main St</text>"));
        assert!(svg.contains(">Sender</text>"));
        assert!(svg.contains("<path transform="));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn text_is_escaped() {
        let svg = render_label_svg("a: b", &fields(), &LabelConfig::default()).unwrap();
        assert!(svg.contains(">Parcel &amp; Co</text>"));
        assert!(svg.contains(">&lt;9&gt; Dock Rd</text>"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let a = render_label_svg("a: b", &fields(), &LabelConfig::default()).unwrap();
        let b = render_label_svg("a: b", &fields(), &LabelConfig::default()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn oversized_envelope_fails() {
        let big = "z".repeat(5000);
        assert_matches!(
            render_label_svg(&big, &fields(), &LabelConfig::default()),
            Err(RenderError::Capacity { .. })
        );
    }
}
