use eframe::egui;

use crate::command::Session;
use crate::panel::{self, PanelState};
use crate::render::Renderer;

pub struct TacticalBoardApp {
    session: Session,
    panel: PanelState,
    renderer: Renderer,
    texture: Option<egui::TextureHandle>,
    needs_render: bool,
}

impl TacticalBoardApp {
    pub fn new(renderer: Renderer) -> Self {
        let session = Session::default();
        let panel = PanelState::from_session(&session);
        Self {
            session,
            panel,
            renderer,
            texture: None,
            needs_render: true,
        }
    }

    /// Re-render the full board and push it into the texture. On failure the
    /// previous image stays up.
    fn redraw(&mut self, ctx: &egui::Context) {
        self.needs_render = false;
        let image = match self.renderer.render(&self.session.board) {
            Ok(image) => image,
            Err(err) => {
                log::error!("board render failed: {err:#}");
                return;
            }
        };
        let size = [image.width() as usize, image.height() as usize];
        let color_image = egui::ColorImage::from_rgba_unmultiplied(size, image.as_raw());
        match &mut self.texture {
            Some(texture) => texture.set(color_image, egui::TextureOptions::LINEAR),
            None => {
                self.texture =
                    Some(ctx.load_texture("board", color_image, egui::TextureOptions::LINEAR));
            }
        }
    }
}

/// Largest rect with the given aspect ratio centred inside `outer`.
fn fit_rect(outer: egui::Rect, aspect: f32) -> egui::Rect {
    let outer_aspect = outer.width() / outer.height().max(1.0);
    let size = if outer_aspect > aspect {
        egui::vec2(outer.height() * aspect, outer.height())
    } else {
        egui::vec2(outer.width(), outer.width() / aspect)
    };
    egui::Rect::from_center_size(outer.center(), size)
}

// ── eframe App impl ────────────────────────────────────────────────────────

impl eframe::App for TacticalBoardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let commands = egui::SidePanel::left("input_panel")
            .resizable(false)
            .default_width(300.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .show(ui, |ui| panel::show(ui, &mut self.panel, &self.session))
                    .inner
            })
            .inner;

        if self.session.apply_all(commands) {
            self.needs_render = true;
        }
        if self.needs_render {
            self.redraw(ctx);
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            let (response, painter) =
                ui.allocate_painter(ui.available_size(), egui::Sense::hover());
            let canvas_rect = response.rect;
            painter.rect_filled(canvas_rect, 0.0, egui::Color32::from_gray(40));

            if let Some(ref tex) = self.texture {
                let config = self.renderer.config();
                let aspect = config.canvas_width as f32 / config.canvas_height as f32;
                painter.image(
                    tex.id(),
                    fit_rect(canvas_rect, aspect),
                    egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                    egui::Color32::WHITE,
                );
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::fit_rect;
    use eframe::egui;

    #[test]
    fn wide_space_is_limited_by_height() {
        let outer = egui::Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(1000.0, 300.0));
        let fitted = fit_rect(outer, 1.8);
        assert_eq!(fitted.height(), 300.0);
        assert_eq!(fitted.width(), 540.0);
        assert_eq!(fitted.center(), outer.center());
    }

    #[test]
    fn tall_space_is_limited_by_width() {
        let outer = egui::Rect::from_min_size(egui::pos2(10.0, 10.0), egui::vec2(360.0, 900.0));
        let fitted = fit_rect(outer, 1.8);
        assert_eq!(fitted.width(), 360.0);
        assert_eq!(fitted.height(), 200.0);
    }
}
