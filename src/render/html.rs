//! Absolutely positioned HTML output.
//!
//! Shapes are placed on the scene at native pixel coordinates; the scene
//! div carries one `transform:scale(..)` so the browser does the fitting
//! and relative layout can never drift between widths.

use crate::model::{Presentation, Shape};
use crate::render::options::RenderOptions;
use crate::render::scene::{SceneRect, SlideScene};
use crate::units::pt_to_px;

const PAGE_CSS: &str = "\
body{margin:0;padding:16px;background:#53585f;font-family:system-ui,sans-serif}\
.slide{background:#fff;margin:0 auto 16px;box-shadow:0 1px 4px rgba(0,0,0,0.4)}\
.shape-text{line-height:1.2;word-wrap:break-word}";

/// Render a presentation to an HTML fragment for embedding.
///
/// Every slide reserves its scaled height up front, so the page doesn't
/// reflow as images decode.
pub fn to_html(presentation: &Presentation, options: &RenderOptions) -> String {
    let scene = SlideScene::new(presentation.size);
    let scale = scene.scale_for_width(options.container_width);
    let reserved = scene.reserved_height(scale);

    let mut out = String::new();
    out.push_str("<div class=\"deck\">\n");
    for slide in &presentation.slides {
        out.push_str(&format!(
            "<div class=\"slide\" data-slide=\"{}\" style=\"position:relative;overflow:hidden;width:{}px;height:{}px\">\n",
            slide.index, options.container_width, reserved
        ));
        out.push_str(&format!(
            "<div class=\"scene\" style=\"position:absolute;top:0;left:0;width:{}px;height:{}px;transform:scale({});transform-origin:top left\">\n",
            scene.width, scene.height, scale
        ));
        for shape in &slide.shapes {
            render_shape(&mut out, shape);
        }
        out.push_str("</div>\n</div>\n");
    }
    out.push_str("</div>\n");
    out
}

fn render_shape(out: &mut String, shape: &Shape) {
    let rect = SceneRect::from_geometry(shape.geometry());
    match shape {
        Shape::Text(text) => {
            let lines: Vec<String> = text.lines.iter().map(|line| escape_html(line)).collect();
            out.push_str(&format!(
                "<div class=\"shape-text\" style=\"position:absolute;left:{}px;top:{}px;width:{}px;height:{}px;font-size:{}px;overflow:hidden\">{}</div>\n",
                rect.x,
                rect.y,
                rect.width,
                rect.height,
                pt_to_px(text.font_size_pt),
                lines.join("<br>")
            ));
        }
        Shape::Image(image) => {
            let alt = escape_html(image.alt_label.as_deref().unwrap_or(""));
            out.push_str(&format!(
                "<img class=\"shape-image\" src=\"{}\" alt=\"{}\" style=\"position:absolute;left:{}px;top:{}px;width:{}px;height:{}px\">\n",
                image.image_source, alt, rect.x, rect.y, rect.width, rect.height
            ));
        }
    }
}

/// Render a presentation to a standalone HTML page.
pub fn to_html_page(presentation: &Presentation, options: &RenderOptions) -> String {
    let title = options
        .title
        .clone()
        .or_else(|| presentation.metadata.title.clone())
        .unwrap_or_else(|| "Presentation".to_string());

    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n<style>{}</style>\n</head>\n<body>\n{}</body>\n</html>\n",
        escape_html(&title),
        PAGE_CSS,
        to_html(presentation, options)
    )
}

/// Render a standalone page that frames a hosted viewer URL.
pub fn to_embed_page(src: &str, options: &RenderOptions) -> String {
    let title = options
        .title
        .clone()
        .unwrap_or_else(|| "Presentation".to_string());

    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n<style>body{{margin:0}}iframe{{border:0;width:100%;height:100vh}}</style>\n</head>\n<body>\n<iframe src=\"{}\" allowfullscreen></iframe>\n</body>\n</html>\n",
        escape_html(&title),
        escape_html(src)
    )
}

/// Escape text for HTML element and attribute contexts.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
