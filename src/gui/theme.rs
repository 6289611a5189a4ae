use crate::wheel::Rgb;
use cairo::Context;
use gtk::gdk;
use gtk4 as gtk;

const DARK_TEXT: Rgb = Rgb::new(10, 10, 10);
const LIGHT_TEXT: Rgb = Rgb::new(255, 255, 255);

/// Perceived brightness, 0..=255.
pub fn luma(color: Rgb) -> f64 {
    color.red as f64 * 0.299 + color.green as f64 * 0.587 + color.blue as f64 * 0.114
}

/// Dark text on bright backgrounds, white otherwise.
pub fn text_color(background: Rgb) -> Rgb {
    if luma(background) > 149.0 {
        DARK_TEXT
    } else {
        LIGHT_TEXT
    }
}

pub fn set_source(cr: &Context, color: Rgb) {
    let (r, g, b) = color.into_format::<f64>().into_components();
    cr.set_source_rgb(r, g, b);
}

pub fn load_css() {
    let provider = gtk::CssProvider::new();
    let css_data = "
.sorcle-window, .sorcle-drawing-area {
    background: none;
    background-color: transparent;
}
";
    provider.load_from_data(css_data);

    if let Some(display) = gdk::Display::default() {
        gtk::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_color_contrast() {
        assert_eq!(text_color(Rgb::new(255, 255, 255)), DARK_TEXT);
        assert_eq!(text_color(Rgb::new(255, 183, 3)), DARK_TEXT);
        assert_eq!(text_color(Rgb::new(29, 53, 87)), LIGHT_TEXT);
        assert_eq!(text_color(Rgb::new(0, 0, 0)), LIGHT_TEXT);
    }
}
