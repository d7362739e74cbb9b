use eframe::egui;
use egui_extras::{Column, TableBuilder};

use crate::board::{
    Arrow, BoardState, MatchState, Player, Team, Zone, MINUTE_MAX, NUMBER_MAX, NUMBER_MIN,
    PITCH_MAX, PITCH_MIN, SCORE_MAX, ZONE_MAX, ZONE_MIN,
};
use crate::command::{Command, Mode, Session};

/// Widget-side copies of everything the user is editing. Drafts survive mode
/// switches and adds, so the same entity can be placed repeatedly.
#[derive(Clone, Debug, Default)]
pub struct PanelState {
    pub match_info: MatchState,
    pub player: Player,
    pub arrow: Arrow,
    pub zone: Zone,
}

impl PanelState {
    pub fn from_session(session: &Session) -> Self {
        Self {
            match_info: session.board.match_state.clone(),
            ..Self::default()
        }
    }
}

/// Draw the sidebar and return the commands the user triggered this frame.
pub fn show(ui: &mut egui::Ui, panel: &mut PanelState, session: &Session) -> Vec<Command> {
    let mut commands = Vec::new();

    ui.heading("⚽ Tactical Board");
    ui.add_space(4.0);

    match_info_section(ui, panel, &mut commands);
    ui.separator();

    let mut mode = session.mode;
    egui::ComboBox::from_label("Mode")
        .selected_text(mode.to_string())
        .show_ui(ui, |ui| {
            for option in Mode::ALL {
                ui.selectable_value(&mut mode, option, option.to_string());
            }
        });
    if mode != session.mode {
        commands.push(Command::SelectMode(mode));
    }

    match mode {
        Mode::Player => player_form(ui, &mut panel.player, &mut commands),
        Mode::Arrow => arrow_form(ui, &mut panel.arrow, &mut commands),
        Mode::Zone => zone_form(ui, &mut panel.zone, &mut commands),
    }

    ui.separator();
    if ui.button("🧹 Clear Board").clicked() {
        commands.push(Command::ClearBoard);
    }

    ui.separator();
    board_summary(ui, &session.board);

    commands
}

fn match_info_section(ui: &mut egui::Ui, panel: &mut PanelState, commands: &mut Vec<Command>) {
    ui.strong("Match Info");
    let info = &mut panel.match_info;
    let mut changed = false;

    egui::Grid::new("match_info").num_columns(2).show(ui, |ui| {
        ui.label("Home Team");
        changed |= ui.text_edit_singleline(&mut info.home_name).changed();
        ui.end_row();

        ui.label("Away Team");
        changed |= ui.text_edit_singleline(&mut info.away_name).changed();
        ui.end_row();

        ui.label("Home Score");
        changed |= ui
            .add(egui::DragValue::new(&mut info.home_score).range(0..=SCORE_MAX))
            .changed();
        ui.end_row();

        ui.label("Away Score");
        changed |= ui
            .add(egui::DragValue::new(&mut info.away_score).range(0..=SCORE_MAX))
            .changed();
        ui.end_row();

        ui.label("Minute");
        changed |= ui
            .add(egui::DragValue::new(&mut info.minute).range(0..=MINUTE_MAX))
            .changed();
        ui.end_row();
    });

    if changed {
        commands.push(Command::SetMatchInfo(info.clone()));
    }
}

fn pitch_slider<'a>(value: &'a mut f32, label: &str) -> egui::Slider<'a> {
    egui::Slider::new(value, PITCH_MIN..=PITCH_MAX)
        .step_by(1.0)
        .text(label)
}

fn player_form(ui: &mut egui::Ui, draft: &mut Player, commands: &mut Vec<Command>) {
    egui::ComboBox::from_label("Team")
        .selected_text(draft.team.to_string())
        .show_ui(ui, |ui| {
            for team in Team::ALL {
                ui.selectable_value(&mut draft.team, team, team.to_string());
            }
        });
    ui.horizontal(|ui| {
        ui.label("Player Number");
        ui.add(egui::DragValue::new(&mut draft.number).range(NUMBER_MIN..=NUMBER_MAX));
    });
    ui.add(pitch_slider(&mut draft.x, "X position"));
    ui.add(pitch_slider(&mut draft.y, "Y position"));

    if ui.button("➕ Add Player").clicked() {
        commands.push(Command::AddPlayer(*draft));
    }
}

fn arrow_form(ui: &mut egui::Ui, draft: &mut Arrow, commands: &mut Vec<Command>) {
    ui.strong("Arrow");
    ui.add(pitch_slider(&mut draft.start.0, "Start X"));
    ui.add(pitch_slider(&mut draft.start.1, "Start Y"));
    ui.add(pitch_slider(&mut draft.end.0, "End X"));
    ui.add(pitch_slider(&mut draft.end.1, "End Y"));

    if ui.button("➕ Add Arrow").clicked() {
        commands.push(Command::AddArrow(*draft));
    }
}

fn zone_form(ui: &mut egui::Ui, draft: &mut Zone, commands: &mut Vec<Command>) {
    ui.strong("Zone");
    ui.add(pitch_slider(&mut draft.center.0, "Center X"));
    ui.add(pitch_slider(&mut draft.center.1, "Center Y"));
    ui.add(
        egui::Slider::new(&mut draft.width, ZONE_MIN..=ZONE_MAX)
            .step_by(1.0)
            .text("Width"),
    );
    ui.add(
        egui::Slider::new(&mut draft.height, ZONE_MIN..=ZONE_MAX)
            .step_by(1.0)
            .text("Height"),
    );

    if ui.button("➕ Add Zone").clicked() {
        commands.push(Command::AddZone(*draft));
    }
}

// ── Board summary ───────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct EntityRow {
    pub kind: &'static str,
    pub position: String,
    pub detail: String,
}

/// One row per placed entity, zones first, then arrows, then players, each
/// group in insertion order (the same order they are drawn in).
pub fn entity_rows(board: &BoardState) -> Vec<EntityRow> {
    let zones = board.zones.iter().map(|z| EntityRow {
        kind: "Zone",
        position: format!("({:.0}, {:.0})", z.center.0, z.center.1),
        detail: format!("{:.0} × {:.0}", z.width, z.height),
    });
    let arrows = board.arrows.iter().map(|a| EntityRow {
        kind: "Arrow",
        position: format!("({:.0}, {:.0})", a.start.0, a.start.1),
        detail: format!("→ ({:.0}, {:.0})", a.end.0, a.end.1),
    });
    let players = board.players.iter().map(|p| EntityRow {
        kind: "Player",
        position: format!("({:.0}, {:.0})", p.x, p.y),
        detail: format!("{} #{}", p.team, p.number),
    });
    zones.chain(arrows).chain(players).collect()
}

fn board_summary(ui: &mut egui::Ui, board: &BoardState) {
    ui.strong("Board");
    if board.is_empty() {
        ui.weak("Nothing placed yet");
        return;
    }

    let rows = entity_rows(board);
    TableBuilder::new(ui)
        .striped(true)
        .max_scroll_height(240.0)
        .column(Column::auto())
        .column(Column::auto())
        .column(Column::remainder())
        .header(18.0, |mut header| {
            header.col(|ui| {
                ui.strong("Kind");
            });
            header.col(|ui| {
                ui.strong("Position");
            });
            header.col(|ui| {
                ui.strong("Detail");
            });
        })
        .body(|body| {
            body.rows(18.0, rows.len(), |mut row| {
                let entry = &rows[row.index()];
                row.col(|ui| {
                    ui.label(entry.kind);
                });
                row.col(|ui| {
                    ui.label(&entry.position);
                });
                row.col(|ui| {
                    ui.label(&entry.detail);
                });
            });
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drafts_start_at_form_defaults() {
        let panel = PanelState::from_session(&Session::default());
        assert_eq!(
            panel.player,
            Player {
                x: 50.0,
                y: 50.0,
                team: Team::Home,
                number: 1,
            }
        );
        assert_eq!(
            panel.arrow,
            Arrow {
                start: (40.0, 50.0),
                end: (70.0, 50.0),
            }
        );
        assert_eq!(
            panel.zone,
            Zone {
                center: (50.0, 50.0),
                width: 20.0,
                height: 20.0,
            }
        );
        assert_eq!(panel.match_info, MatchState::default());
    }

    #[test]
    fn rows_follow_draw_order() {
        let mut board = BoardState::default();
        board.players.push(Player {
            x: 30.0,
            y: 50.0,
            team: Team::Home,
            number: 9,
        });
        board.arrows.push(Arrow::default());
        board.zones.push(Zone::default());

        let kinds: Vec<&str> = entity_rows(&board).iter().map(|r| r.kind).collect();
        assert_eq!(kinds, vec!["Zone", "Arrow", "Player"]);
        assert_eq!(entity_rows(&board)[2].detail, "Home #9");
    }
}
