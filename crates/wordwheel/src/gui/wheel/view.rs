use super::model::{Item, Placement, WheelState};
use super::{FONT_SCALE_DIVISOR, MIN_FONT_SIZE, MIN_SCORE_FONT_SIZE, SCORE_FONT_DROP};
use crate::gui::theme::ThemeColors;
use cairo::Context;
use palette::Srgba;
use std::iter::zip;

struct ItemRenderer<'a> {
    item: &'a Item,
    placement: &'a Placement,
    base_font: f64,
}

impl<'a> ItemRenderer<'a> {
    fn new(item: &'a Item, placement: &'a Placement, base_font: f64) -> Self {
        Self {
            item,
            placement,
            base_font,
        }
    }

    fn draw(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        let font_size = self.base_font * self.placement.prominence;
        let score_font = (font_size - SCORE_FONT_DROP).max(MIN_SCORE_FONT_SIZE);
        let word_offset = (font_size * 0.6).max(8.0);
        let score_offset = (score_font * 0.8).max(8.0);

        let color = if self.placement.selected {
            colors.highlight
        } else {
            colors.dimmed
        };

        self.draw_label(
            cr,
            &self.item.label,
            font_size,
            cairo::FontWeight::Bold,
            self.placement.y - word_offset,
            color,
        )?;
        self.draw_label(
            cr,
            &format!("{}%", self.item.score),
            score_font,
            cairo::FontWeight::Normal,
            self.placement.y + score_offset,
            color,
        )
    }

    fn draw_label(
        &self,
        cr: &Context,
        text: &str,
        font_size: f64,
        weight: cairo::FontWeight,
        y: f64,
        color: Srgba<f64>,
    ) -> Result<(), cairo::Error> {
        let (r, g, b, a) = color.into_components();
        cr.set_source_rgba(r, g, b, a);
        cr.select_font_face("Sans", cairo::FontSlant::Normal, weight);
        cr.set_font_size(font_size);
        if let Ok(ext) = cr.text_extents(text) {
            cr.move_to(self.placement.x - ext.width() / 2.0, y + ext.height() / 2.0);
            cr.show_text(text)?;
        }
        Ok(())
    }
}

/// Draw the wheel for the current canvas size. An unsized canvas yields no
/// placements and nothing is drawn; the next resize retries.
pub fn draw(
    cr: &Context,
    state: &mut WheelState,
    width: f64,
    height: f64,
    colors: &ThemeColors,
) -> Result<(), cairo::Error> {
    let placements = state.placements(width, height);
    if placements.is_empty() {
        return Ok(());
    }

    let base_font = MIN_FONT_SIZE.max(width.min(height) / FONT_SCALE_DIVISOR);
    for (item, placement) in zip(state.items(), &placements) {
        ItemRenderer::new(item, placement, base_font).draw(cr, colors)?;
    }
    Ok(())
}
