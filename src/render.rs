use std::path::Path;

use ab_glyph::{point, Font, FontArc, PxScale, ScaleFont};
use anyhow::{anyhow, Context, Result};
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_text_mut, Blend};
use imageproc::rect::Rect as PixelRect;
use tiny_skia::{
    Color, FillRule, IntSize, Paint, Path as SkPath, PathBuilder, Pixmap, Rect, Stroke, Transform,
};

use crate::board::{Arrow, BoardState, MatchState, Player, Team, Zone, PITCH_MAX, PITCH_MIN};
use crate::config::BoardConfig;

// Pitch-unit geometry.
const STRIPE_PERIOD: usize = 10;
const STRIPE_WIDTH: f32 = 5.0;
const BORDER_INSET: f32 = 2.0;
const CENTER_CIRCLE_RADIUS: f32 = 9.0;
const ARROW_SHAFT_WIDTH: f32 = 0.6;
const ARROW_HEAD_WIDTH: f32 = 3.0;
const ARROW_HEAD_LENGTH: f32 = 3.0;
const OVERLAY_ANCHOR: (f32, f32) = (2.0, 98.0);

// Pixel sizes for a 1000 px tall canvas.
const LINE_WIDTH: f32 = 2.8;
const MARKER_RADIUS: f32 = 18.4;
const MARKER_EDGE_WIDTH: f32 = 1.5;
const NUMBER_FONT_SIZE: f32 = 14.0;
const OVERLAY_FONT_SIZE: f32 = 22.0;
const OVERLAY_PADDING: f32 = 8.0;

const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/usr/share/fonts/liberation-sans/LiberationSans-Bold.ttf",
    "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arialbd.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
];

/// Maps pitch units (origin bottom-left, y up) onto canvas pixels.
#[derive(Clone, Copy, Debug)]
pub struct PitchFrame {
    width: f32,
    height: f32,
}

impl PitchFrame {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width as f32,
            height: height as f32,
        }
    }

    pub fn to_px(&self, x: f32, y: f32) -> (f32, f32) {
        let span = PITCH_MAX - PITCH_MIN;
        (
            (x - PITCH_MIN) / span * self.width,
            (1.0 - (y - PITCH_MIN) / span) * self.height,
        )
    }

    fn transform(&self) -> Transform {
        let span = PITCH_MAX - PITCH_MIN;
        let sx = self.width / span;
        let sy = self.height / span;
        Transform::from_row(sx, 0.0, 0.0, -sy, -PITCH_MIN * sx, self.height + PITCH_MIN * sy)
    }
}

/// Draws a [`BoardState`] into an image. The output depends only on the board
/// and the config the renderer was built with.
pub struct Renderer {
    config: BoardConfig,
    font: Option<FontArc>,
}

impl Renderer {
    pub fn new(config: BoardConfig) -> Self {
        let config = config.sanitized();
        let font = load_font(config.font_path.as_deref());
        Self { config, font }
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn frame(&self) -> PitchFrame {
        PitchFrame::new(self.config.canvas_width, self.config.canvas_height)
    }

    pub fn render(&self, board: &BoardState) -> Result<RgbaImage> {
        let (width, height) = (self.config.canvas_width, self.config.canvas_height);
        let frame = self.frame();
        let mut pixmap = Pixmap::new(width, height)
            .ok_or_else(|| anyhow!("cannot allocate {width}x{height} pixmap"))?;

        self.draw_pitch(&mut pixmap, frame)?;

        for zone in &board.zones {
            self.draw_zone(&mut pixmap, frame, &zone.clamped())?;
        }
        for arrow in &board.arrows {
            self.draw_arrow(&mut pixmap, frame, &arrow.clamped())?;
        }

        // Discs go through tiny-skia and numbers through the glyph rasterizer,
        // so each marker is finished before the next one starts.
        let mut image = RgbaImage::from_raw(width, height, pixmap.take())
            .ok_or_else(|| anyhow!("cannot construct output image"))?;
        for player in &board.players {
            image = self.draw_player(image, frame, &player.clamped())?;
        }

        let image = self.draw_overlay(image, frame, &board.match_state.clamped());

        log::debug!(
            "rendered {}x{} board with {} entities",
            width,
            height,
            board.entity_count()
        );
        Ok(image)
    }

    fn draw_pitch(&self, pixmap: &mut Pixmap, frame: PitchFrame) -> Result<()> {
        let palette = &self.config.palette;
        pixmap.fill(color(palette.grass));

        let stripe = paint(palette.stripe);
        for left in (0..100).step_by(STRIPE_PERIOD) {
            let left = left as f32;
            let rect = Rect::from_ltrb(left, PITCH_MIN, left + STRIPE_WIDTH, PITCH_MAX)
                .ok_or_else(|| anyhow!("invalid stripe rectangle"))?;
            pixmap.fill_rect(rect, &stripe, frame.transform(), None);
        }

        let lines = paint(palette.lines);
        let stroke = Stroke {
            width: self.config.px(LINE_WIDTH),
            ..Default::default()
        };

        let (left, top) = frame.to_px(BORDER_INSET, PITCH_MAX - BORDER_INSET);
        let (right, bottom) = frame.to_px(PITCH_MAX - BORDER_INSET, BORDER_INSET);
        let border = Rect::from_ltrb(left, top, right, bottom)
            .ok_or_else(|| anyhow!("invalid border rectangle"))?;
        pixmap.stroke_path(
            &PathBuilder::from_rect(border),
            &lines,
            &stroke,
            Transform::identity(),
            None,
        );

        let mid = (PITCH_MIN + PITCH_MAX) / 2.0;
        let halfway = line_path(
            frame.to_px(mid, BORDER_INSET),
            frame.to_px(mid, PITCH_MAX - BORDER_INSET),
        )?;
        pixmap.stroke_path(&halfway, &lines, &stroke, Transform::identity(), None);

        let (cl, ct) = frame.to_px(mid - CENTER_CIRCLE_RADIUS, mid + CENTER_CIRCLE_RADIUS);
        let (cr, cb) = frame.to_px(mid + CENTER_CIRCLE_RADIUS, mid - CENTER_CIRCLE_RADIUS);
        let oval = Rect::from_ltrb(cl, ct, cr, cb)
            .ok_or_else(|| anyhow!("invalid centre circle bounds"))?;
        let circle =
            PathBuilder::from_oval(oval).ok_or_else(|| anyhow!("cannot build centre circle"))?;
        pixmap.stroke_path(&circle, &lines, &stroke, Transform::identity(), None);
        Ok(())
    }

    fn draw_zone(&self, pixmap: &mut Pixmap, frame: PitchFrame, zone: &Zone) -> Result<()> {
        let (min_x, min_y, max_x, max_y) = zone.bounds();
        let rect = Rect::from_ltrb(min_x, min_y, max_x, max_y)
            .ok_or_else(|| anyhow!("invalid zone rectangle {zone:?}"))?;
        pixmap.fill_rect(rect, &paint(self.config.palette.zone), frame.transform(), None);
        Ok(())
    }

    fn draw_arrow(&self, pixmap: &mut Pixmap, frame: PitchFrame, arrow: &Arrow) -> Result<()> {
        let Some(path) = arrow_path(arrow)? else {
            return Ok(());
        };
        pixmap.fill_path(
            &path,
            &paint(self.config.palette.arrow),
            FillRule::Winding,
            frame.transform(),
            None,
        );
        Ok(())
    }

    fn draw_player(
        &self,
        image: RgbaImage,
        frame: PitchFrame,
        player: &Player,
    ) -> Result<RgbaImage> {
        let palette = &self.config.palette;
        let (cx, cy) = frame.to_px(player.x, player.y);
        let radius = self.config.px(MARKER_RADIUS);

        let (width, height) = image.dimensions();
        let size = IntSize::from_wh(width, height)
            .ok_or_else(|| anyhow!("invalid canvas size {width}x{height}"))?;
        let mut pixmap = Pixmap::from_vec(image.into_raw(), size)
            .ok_or_else(|| anyhow!("cannot wrap canvas for {player:?}"))?;

        let disc = PathBuilder::from_circle(cx, cy, radius)
            .ok_or_else(|| anyhow!("cannot build marker for {player:?}"))?;
        let fill = match player.team {
            Team::Home => palette.home,
            Team::Away => palette.away,
        };
        pixmap.fill_path(
            &disc,
            &paint(fill),
            FillRule::Winding,
            Transform::identity(),
            None,
        );
        let edge = Stroke {
            width: self.config.px(MARKER_EDGE_WIDTH),
            ..Default::default()
        };
        pixmap.stroke_path(
            &disc,
            &paint(palette.marker_edge),
            &edge,
            Transform::identity(),
            None,
        );
        let mut image = RgbaImage::from_raw(width, height, pixmap.take())
            .ok_or_else(|| anyhow!("cannot construct output image"))?;

        if let Some(font) = &self.font {
            let label = player.number.to_string();
            let scale = self.config.px(NUMBER_FONT_SIZE);
            if let Some(ink) = InkBounds::measure(font, scale, &label) {
                draw_text_mut(
                    &mut image,
                    Rgba(palette.marker_text),
                    (cx - ink.width() / 2.0 - ink.min_x).round() as i32,
                    (cy - ink.height() / 2.0 - ink.min_y).round() as i32,
                    scale,
                    font,
                    &label,
                );
            }
        }
        Ok(image)
    }

    fn draw_overlay(&self, image: RgbaImage, frame: PitchFrame, state: &MatchState) -> RgbaImage {
        let palette = &self.config.palette;
        let text = state.overlay_text();
        let scale = self.config.px(OVERLAY_FONT_SIZE);
        let (backdrop, ink) = self.overlay_layout(frame, &text);

        let mut canvas = Blend(image);
        draw_filled_rect_mut(&mut canvas, backdrop, Rgba(palette.overlay_background));
        let mut image = canvas.0;

        if let (Some(font), Some(ink)) = (&self.font, ink) {
            let padding = self.config.px(OVERLAY_PADDING);
            draw_text_mut(
                &mut image,
                Rgba(palette.overlay_text),
                (backdrop.left() as f32 + padding - ink.min_x).round() as i32,
                (backdrop.top() as f32 + padding - ink.min_y).round() as i32,
                scale,
                font,
                &text,
            );
        }
        image
    }

    /// Backdrop rect sized to the inked glyphs plus even padding on all sides.
    fn overlay_layout(&self, frame: PitchFrame, text: &str) -> (PixelRect, Option<InkBounds>) {
        let scale = self.config.px(OVERLAY_FONT_SIZE);
        let padding = self.config.px(OVERLAY_PADDING);
        let ink = self
            .font
            .as_ref()
            .and_then(|font| InkBounds::measure(font, scale, text));

        let (text_w, text_h) = match ink {
            Some(ink) => (ink.width(), ink.height()),
            // Rough glyph metrics so the box still reserves its space.
            None => (text.chars().count() as f32 * scale * 0.6, scale * 1.2),
        };

        let (x, y) = frame.to_px(OVERLAY_ANCHOR.0, OVERLAY_ANCHOR.1);
        let box_w = (text_w + padding * 2.0).round().max(1.0) as u32;
        let box_h = (text_h + padding * 2.0).round().max(1.0) as u32;
        let backdrop = PixelRect::at(x.round() as i32, y.round() as i32).of_size(box_w, box_h);
        (backdrop, ink)
    }
}

/// Pixel extent of the glyphs `draw_text_mut` paints for `text` when drawn at
/// the origin. Glyphs sit on a baseline at the font's ascent, so the top of
/// the ink is usually below `y = 0`.
#[derive(Clone, Copy, Debug, PartialEq)]
struct InkBounds {
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl InkBounds {
    fn measure(font: &FontArc, scale: f32, text: &str) -> Option<Self> {
        let scale = PxScale::from(scale);
        let scaled = font.as_scaled(scale);
        let mut caret = 0.0;
        let mut last = None;
        let mut bounds: Option<Self> = None;

        // Same caret and kerning walk as imageproc's glyph layout.
        for c in text.chars() {
            let id = scaled.glyph_id(c);
            let glyph = id.with_scale_and_position(scale, point(caret, scaled.ascent()));
            caret += scaled.h_advance(id);
            let Some(outlined) = font.outline_glyph(glyph) else {
                continue;
            };
            if let Some(last) = last {
                caret += scaled.kern(id, last);
            }
            last = Some(id);

            let px = outlined.px_bounds();
            let glyph_bounds = Self {
                min_x: px.min.x.round(),
                min_y: px.min.y.round(),
                max_x: px.min.x.round() + px.width(),
                max_y: px.min.y.round() + px.height(),
            };
            bounds = Some(match bounds {
                Some(b) => Self {
                    min_x: b.min_x.min(glyph_bounds.min_x),
                    min_y: b.min_y.min(glyph_bounds.min_y),
                    max_x: b.max_x.max(glyph_bounds.max_x),
                    max_y: b.max_y.max(glyph_bounds.max_y),
                },
                None => glyph_bounds,
            });
        }
        bounds
    }

    fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    fn height(&self) -> f32 {
        self.max_y - self.min_y
    }
}

/// Filled arrow outline in pitch units: shaft plus triangular head, with the
/// head counted in the total length. `None` for zero-length arrows.
fn arrow_path(arrow: &Arrow) -> Result<Option<SkPath>> {
    let length = arrow.length();
    if length <= f32::EPSILON {
        return Ok(None);
    }
    let dir = (
        (arrow.end.0 - arrow.start.0) / length,
        (arrow.end.1 - arrow.start.1) / length,
    );
    let perp = (-dir.1, dir.0);
    let head_len = ARROW_HEAD_LENGTH.min(length);
    let neck = length - head_len;
    let shaft = ARROW_SHAFT_WIDTH / 2.0;
    let head = ARROW_HEAD_WIDTH / 2.0;

    let at = |along: f32, side: f32| {
        (
            arrow.start.0 + dir.0 * along + perp.0 * side,
            arrow.start.1 + dir.1 * along + perp.1 * side,
        )
    };
    let outline = [
        at(0.0, shaft),
        at(neck, shaft),
        at(neck, head),
        at(length, 0.0),
        at(neck, -head),
        at(neck, -shaft),
        at(0.0, -shaft),
    ];

    let mut pb = PathBuilder::new();
    pb.move_to(outline[0].0, outline[0].1);
    for (x, y) in &outline[1..] {
        pb.line_to(*x, *y);
    }
    pb.close();
    let path = pb
        .finish()
        .ok_or_else(|| anyhow!("cannot build arrow path for {arrow:?}"))?;
    Ok(Some(path))
}

fn line_path(from: (f32, f32), to: (f32, f32)) -> Result<SkPath> {
    let mut pb = PathBuilder::new();
    pb.move_to(from.0, from.1);
    pb.line_to(to.0, to.1);
    pb.finish().ok_or_else(|| anyhow!("cannot build line"))
}

fn color(rgba: [u8; 4]) -> Color {
    Color::from_rgba8(rgba[0], rgba[1], rgba[2], rgba[3])
}

fn paint(rgba: [u8; 4]) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(rgba[0], rgba[1], rgba[2], rgba[3]);
    paint.anti_alias = true;
    paint
}

fn read_font(path: &Path) -> Result<FontArc> {
    let bytes = std::fs::read(path).with_context(|| format!("cannot read {}", path.display()))?;
    FontArc::try_from_vec(bytes).with_context(|| format!("{} is not a usable font", path.display()))
}

fn load_font(configured: Option<&Path>) -> Option<FontArc> {
    if let Some(path) = configured {
        match read_font(path) {
            Ok(font) => {
                log::info!("using font {}", path.display());
                return Some(font);
            }
            Err(err) => log::warn!("{err:#}; trying system fonts"),
        }
    }

    for candidate in FONT_CANDIDATES {
        if let Ok(font) = read_font(Path::new(candidate)) {
            log::info!("using font {candidate}");
            return Some(font);
        }
    }

    log::warn!("no usable font found; player numbers and scoreboard text will not be drawn");
    None
}
