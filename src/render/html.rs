// This file is part of face-overlay, a renderer for face-detection results.
//
// You can redistribute face-overlay source codes and/or modify it under the
// terms of the BSD 2-Clause License.
//
// You should have received a copy of the BSD 2-Clause License along with the software.
// If not, see < https://opensource.org/licenses/BSD-2-Clause>.

use std::fmt;

use crate::overlay::{DirectionLine, OverlayGeometry};
use crate::session::SessionView;

const YAW_COLOR: &str = "red";
const PITCH_COLOR: &str = "blue";
const ROLL_COLOR: &str = "green";

const STYLE: &str = "\
body { font-family: sans-serif; display: grid; justify-content: center; }
.stage { position: relative; width: 50vw; }
.stage img { display: block; width: 100%; height: auto; }
.face-box { position: absolute; border: 2px solid #00FF00; pointer-events: none; box-sizing: border-box; }
.face-label { position: absolute; top: -15px; left: 50%; transform: translate(-50%, -50%); \
color: white; background-color: rgba(0, 0, 0, 0.5); padding: 2px 5px; border-radius: 4px; }
.face-lines { position: absolute; pointer-events: none; }
.status { color: #555; }
.error { color: #842029; background-color: #f8d7da; padding: 8px 12px; border-radius: 4px; }
table { border-collapse: collapse; margin-top: 1em; }
th, td { padding: 4px 12px; border-bottom: 1px solid #ddd; text-align: left; }
.yaw { color: red; }
.pitch { color: blue; }
.roll { color: green; }
";

/// Standalone HTML page for a session: the image with its overlay boxes,
/// direction lines and the results table.
pub struct HtmlPage<'a, 'b> {
    view: &'b SessionView<'a>,
}

impl<'a, 'b> HtmlPage<'a, 'b> {
    pub fn new(view: &'b SessionView<'a>) -> Self {
        HtmlPage { view }
    }
}

impl<'a, 'b> fmt::Display for HtmlPage<'a, 'b> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let view = self.view;
        let title = view.image.map(|image| image.name()).unwrap_or("face overlay");

        writeln!(f, "<!DOCTYPE html>")?;
        writeln!(f, "<html>")?;
        writeln!(f, "<head>")?;
        writeln!(f, "<meta charset=\"utf-8\">")?;
        writeln!(f, "<title>{}</title>", Escaped(title))?;
        writeln!(f, "<style>\n{}</style>", STYLE)?;
        writeln!(f, "</head>")?;
        writeln!(f, "<body>")?;

        if view.processing {
            writeln!(f, "<p class=\"status\">Processing&hellip;</p>")?;
        }
        if let Some(error) = view.error {
            writeln!(f, "<div class=\"error\" role=\"alert\">{}</div>", Escaped(error))?;
        }

        writeln!(f, "<div class=\"stage\">")?;
        match view.image {
            Some(image) => writeln!(
                f,
                "<img src=\"{}\" alt=\"{}\">",
                image.data_url(),
                Escaped(image.name())
            )?,
            None => writeln!(f, "<img hidden alt=\"\">")?,
        }
        for overlay in &view.overlays {
            write_box(f, overlay)?;
        }
        for overlay in &view.overlays {
            write_lines(f, overlay)?;
        }
        writeln!(f, "</div>")?;

        write_table(f, &view.overlays)?;

        writeln!(f, "</body>")?;
        writeln!(f, "</html>")
    }
}

fn write_position(f: &mut fmt::Formatter, overlay: &OverlayGeometry) -> fmt::Result {
    let b = &overlay.box_percent;
    write!(
        f,
        "left: {}%; top: {}%; width: {}%; height: {}%;",
        b.left, b.top, b.width, b.height
    )
}

fn write_box(f: &mut fmt::Formatter, overlay: &OverlayGeometry) -> fmt::Result {
    write!(f, "<div class=\"face-box\" style=\"")?;
    write_position(f, overlay)?;
    writeln!(
        f,
        "\"><span class=\"face-label\">{}</span></div>",
        overlay.index
    )
}

fn write_line(f: &mut fmt::Formatter, line: &DirectionLine, color: &str) -> fmt::Result {
    writeln!(
        f,
        "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"{}\" stroke-width=\"2\"/>",
        line.start.x, line.start.y, line.end.x, line.end.y, color
    )
}

// Line coordinates are in image percent space while the viewBox spans the
// face box, matching how the overlay has always been drawn.
fn write_lines(f: &mut fmt::Formatter, overlay: &OverlayGeometry) -> fmt::Result {
    write!(f, "<svg class=\"face-lines\" viewBox=\"0 0 100 100\" style=\"")?;
    write_position(f, overlay)?;
    writeln!(f, "\">")?;
    write_line(f, &overlay.lines.yaw, YAW_COLOR)?;
    write_line(f, &overlay.lines.pitch, PITCH_COLOR)?;
    write_line(f, &overlay.lines.roll, ROLL_COLOR)?;
    writeln!(f, "</svg>")
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

fn write_table(f: &mut fmt::Formatter, overlays: &[OverlayGeometry]) -> fmt::Result {
    if overlays.is_empty() {
        writeln!(f, "<table class=\"results\" hidden>")?;
    } else {
        writeln!(f, "<table class=\"results\">")?;
    }
    writeln!(
        f,
        "<thead><tr><th>Face</th><th>Frontal</th><th>Head down</th>\
         <th class=\"yaw\">Yaw (y)</th><th class=\"pitch\">Pitch (x)</th>\
         <th class=\"roll\">Roll (z)</th></tr></thead>"
    )?;
    writeln!(f, "<tbody>")?;
    for overlay in overlays {
        writeln!(
            f,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            overlay.index,
            yes_no(overlay.frontal),
            yes_no(overlay.head_down),
            overlay.pose.yaw(),
            overlay.pose.pitch(),
            overlay.pose.roll()
        )?;
    }
    writeln!(f, "</tbody>")?;
    writeln!(f, "</table>")
}

/// Escapes text for use in element content and quoted attributes.
struct Escaped<'a>(&'a str);

impl<'a> fmt::Display for Escaped<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for c in self.0.chars() {
            match c {
                '&' => f.write_str("&amp;")?,
                '<' => f.write_str("&lt;")?,
                '>' => f.write_str("&gt;")?,
                '"' => f.write_str("&quot;")?,
                '\'' => f.write_str("&#39;")?,
                c => write!(f, "{}", c)?,
            }
        }
        Ok(())
    }
}
