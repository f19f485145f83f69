use crate::core::layout::ASCENT;
use crate::domain::model::WordCloud;

const FONT_FAMILY: &str = "'DejaVu Sans', 'Segoe UI', Arial, sans-serif";

pub fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

pub fn render_svg(cloud: &WordCloud) -> String {
    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n",
        w = cloud.width,
        h = cloud.height
    ));
    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>\n",
        xml_escape(&cloud.background_color)
    ));
    svg.push_str(&format!(
        "<g font-family=\"{}\" font-weight=\"600\">\n",
        xml_escape(FONT_FAMILY)
    ));

    for word in &cloud.words {
        let ascent = (word.font_size as f64 * ASCENT).round() as u32;
        if word.vertical {
            // 逆時針旋轉 90 度，字頭朝左
            let origin_x = word.x + ascent;
            let origin_y = word.y + word.height;
            svg.push_str(&format!(
                "<text transform=\"translate({},{}) rotate(-90)\" font-size=\"{}\" fill=\"{}\">{}</text>\n",
                origin_x,
                origin_y,
                word.font_size,
                xml_escape(&word.color),
                xml_escape(&word.word)
            ));
        } else {
            svg.push_str(&format!(
                "<text x=\"{}\" y=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text>\n",
                word.x,
                word.y + ascent,
                word.font_size,
                xml_escape(&word.color),
                xml_escape(&word.word)
            ));
        }
    }

    svg.push_str("</g>\n</svg>\n");
    svg
}
