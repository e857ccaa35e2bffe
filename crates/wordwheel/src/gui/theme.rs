use gdk4 as gdk;
use gtk::prelude::*;
use gtk4 as gtk;
use palette::Srgba;

pub struct ThemeColors {
    pub highlight: Srgba<f64>,
    pub dimmed: Srgba<f64>,
}

impl ThemeColors {
    pub fn from_context(context: &gtk::StyleContext) -> Self {
        Self {
            highlight: Self::lookup_color(
                context,
                "theme_selected_bg_color",
                // #1f538d
                Srgba::new(0.122, 0.325, 0.553, 1.0),
            ),
            dimmed: Self::lookup_color(
                context,
                "insensitive_fg_color",
                // #7a7a7a
                Srgba::new(0.478, 0.478, 0.478, 1.0),
            ),
        }
    }

    fn lookup_color(context: &gtk::StyleContext, name: &str, fallback: Srgba<f64>) -> Srgba<f64> {
        context
            .lookup_color(name)
            .map(|c| {
                Srgba::new(
                    c.red() as f64,
                    c.green() as f64,
                    c.blue() as f64,
                    c.alpha() as f64,
                )
            })
            .unwrap_or(fallback)
    }
}

pub fn load_css() {
    let provider = gtk::CssProvider::new();
    let css_data = "
.wordwheel-canvas {
    background: none;
    background-color: transparent;
}
.wordwheel-status {
    font-style: italic;
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
