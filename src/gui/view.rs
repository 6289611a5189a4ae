use super::assets::Assets;
use super::theme;
use super::{
    BANNER_MAX_WIDTH, BANNER_PADDING, LABEL_MARGIN, LABEL_MAX_CHARS, LABEL_MAX_FONT,
    WHEEL_CENTER, WHEEL_RADIUS, WINNER_FONT_SIZE, WINNER_SUB_FONT_SIZE,
};
use crate::config::Config;
use crate::engine::Engine;
use crate::events::Winner;
use crate::wheel::Slice;
use cairo::Context;
use gdk_pixbuf::Pixbuf;
use gdk4::prelude::*;

/// Long names are cut so they fit between the hub and the rim.
pub fn label_text(name: &str) -> String {
    if name.chars().count() > LABEL_MAX_CHARS {
        let head: String = name.chars().take(LABEL_MAX_CHARS - 2).collect();
        format!("{}...", head)
    } else {
        name.to_string()
    }
}

/// Thin slices get a smaller floor so neighbouring labels don't overlap.
pub fn label_font_size(angle: f64) -> f64 {
    let floor = if angle < 1.6 {
        6.0
    } else if angle < 3.2 {
        10.0
    } else {
        14.0
    };
    (angle * 0.7 + floor).min(LABEL_MAX_FONT)
}

/// Wheel angles run counter-clockwise; cairo's y axis points down.
fn screen_angle(degrees: f64) -> f64 {
    -degrees.to_radians()
}

struct SliceRenderer<'a> {
    slice: &'a Slice,
    rotation: f64,
    font: &'a str,
}

impl SliceRenderer<'_> {
    fn draw(&self, cr: &Context) -> Result<(), cairo::Error> {
        self.draw_wedge(cr)?;
        self.draw_label(cr)
    }

    fn draw_wedge(&self, cr: &Context) -> Result<(), cairo::Error> {
        let (cx, cy) = WHEEL_CENTER;
        let start = self.slice.start_angle + self.rotation;
        let end = start + self.slice.angle;

        theme::set_source(cr, self.slice.color);
        cr.move_to(cx, cy);
        cr.arc_negative(cx, cy, WHEEL_RADIUS, screen_angle(start), screen_angle(end));
        cr.close_path();
        cr.fill()
    }

    fn draw_label(&self, cr: &Context) -> Result<(), cairo::Error> {
        let (cx, cy) = WHEEL_CENTER;
        let text = label_text(self.slice.name.as_str());

        cr.save()?;
        cr.translate(cx, cy);
        cr.rotate(screen_angle(self.slice.label_angle() + self.rotation));
        cr.select_font_face(self.font, cairo::FontSlant::Normal, cairo::FontWeight::Bold);
        cr.set_font_size(label_font_size(self.slice.angle));
        theme::set_source(cr, theme::text_color(self.slice.color));

        let ext = cr.text_extents(&text)?;
        // right-aligned against the rim, vertically centered on the ray
        cr.move_to(
            WHEEL_RADIUS - LABEL_MARGIN - ext.width() - ext.x_bearing(),
            -(ext.y_bearing() + ext.height() / 2.0),
        );
        cr.show_text(&text)?;
        cr.restore()
    }
}

fn draw_image(
    cr: &Context,
    pixbuf: &Pixbuf,
    center: (f64, f64),
    scale: f64,
    rotation: f64,
    nearest: bool,
) -> Result<(), cairo::Error> {
    let (w, h) = (pixbuf.width() as f64, pixbuf.height() as f64);
    cr.save()?;
    cr.translate(center.0, center.1);
    cr.rotate(screen_angle(rotation));
    cr.scale(scale, scale);
    cr.set_source_pixbuf(pixbuf, -w / 2.0, -h / 2.0);
    if nearest {
        cr.source().set_filter(cairo::Filter::Nearest);
    }
    cr.paint()?;
    cr.restore()
}

fn draw_banner(cr: &Context, winner: &Winner, font: &str) -> Result<(), cairo::Error> {
    let (cx, cy) = WHEEL_CENTER;
    cr.select_font_face(font, cairo::FontSlant::Normal, cairo::FontWeight::Bold);

    let mut name_size = WINNER_FONT_SIZE;
    cr.set_font_size(name_size);
    let mut name_ext = cr.text_extents(&winner.name)?;
    if name_ext.width() > BANNER_MAX_WIDTH {
        name_size *= BANNER_MAX_WIDTH / name_ext.width();
        cr.set_font_size(name_size);
        name_ext = cr.text_extents(&winner.name)?;
    }

    let sub = winner.sub.as_deref().filter(|s| !s.is_empty());
    let sub_ext = match sub {
        Some(s) => {
            cr.set_font_size(WINNER_SUB_FONT_SIZE);
            Some(cr.text_extents(s)?)
        }
        None => None,
    };

    let text_width = sub_ext
        .as_ref()
        .map_or(name_ext.width(), |e| e.width().max(name_ext.width()));
    let text_height = name_ext.height()
        + sub_ext
            .as_ref()
            .map_or(0.0, |e| e.height() + BANNER_PADDING / 2.0);
    let (w, h) = (
        text_width + BANNER_PADDING * 2.0,
        text_height + BANNER_PADDING * 2.0,
    );
    let (x, y) = (cx - w / 2.0, cy - h / 2.0);

    theme::set_source(cr, winner.color);
    cr.rectangle(x, y, w, h);
    cr.fill()?;

    theme::set_source(cr, theme::text_color(winner.color));
    cr.set_font_size(name_size);
    let baseline = y + BANNER_PADDING - name_ext.y_bearing();
    cr.move_to(cx - name_ext.width() / 2.0 - name_ext.x_bearing(), baseline);
    cr.show_text(&winner.name)?;

    if let (Some(s), Some(ext)) = (sub, &sub_ext) {
        cr.set_font_size(WINNER_SUB_FONT_SIZE);
        cr.move_to(
            cx - ext.width() / 2.0 - ext.x_bearing(),
            baseline + name_ext.height() + BANNER_PADDING / 2.0 - ext.y_bearing(),
        );
        cr.show_text(s)?;
    }
    Ok(())
}

fn draw_overlays(
    cr: &Context,
    config: &Config,
    assets: &Assets,
    rotation: f64,
) -> Result<(), cairo::Error> {
    let nearest = config.window.nearest_neighbour;
    if let Some(center) = &assets.center {
        let turn = if config.center.rotate { rotation } else { 0.0 };
        draw_image(cr, &center.frame(), WHEEL_CENTER, config.center.scale, turn, nearest)?;
    }
    if let Some(pointer) = &assets.pointer {
        let at = (config.pointer.x_pos, config.pointer.y_pos);
        draw_image(cr, &pointer.frame(), at, config.pointer.scale, 0.0, nearest)?;
    }
    Ok(())
}

pub fn draw(cr: &Context, engine: &Engine, assets: &Assets) -> Result<(), cairo::Error> {
    let config = engine.config();
    let wheel = engine.wheel();
    let rotation = wheel.rotation();

    for slice in wheel.slices() {
        SliceRenderer {
            slice,
            rotation,
            font: &config.wheel.font,
        }
        .draw(cr)?;
    }

    draw_overlays(cr, config, assets, rotation)?;

    if let Some(winner) = engine.winner() {
        draw_banner(cr, winner, &config.wheel.font)?;
    }
    Ok(())
}
