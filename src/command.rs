use std::fmt;

use crate::board::{Arrow, BoardState, MatchState, Player, Zone};

/// Which add-form the panel shows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Player,
    Arrow,
    Zone,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Player, Mode::Arrow, Mode::Zone];
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Player => f.write_str("Player"),
            Mode::Arrow => f.write_str("Arrow"),
            Mode::Zone => f.write_str("Zone"),
        }
    }
}

/// One user action against the session.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    SetMatchInfo(MatchState),
    SelectMode(Mode),
    AddPlayer(Player),
    AddArrow(Arrow),
    AddZone(Zone),
    ClearBoard,
}

/// Per-window session. Created once at start-up and owned by the app.
#[derive(Clone, Debug, Default)]
pub struct Session {
    pub board: BoardState,
    pub mode: Mode,
}

impl Session {
    /// Apply a command. Returns `true` when the board (and so the image) may
    /// have changed.
    pub fn apply(&mut self, command: Command) -> bool {
        log::debug!("apply {:?}", command);
        match command {
            Command::SetMatchInfo(state) => {
                self.board.match_state = state;
                true
            }
            Command::SelectMode(mode) => {
                self.mode = mode;
                false
            }
            Command::AddPlayer(player) => {
                self.board.players.push(player);
                true
            }
            Command::AddArrow(arrow) => {
                self.board.arrows.push(arrow);
                true
            }
            Command::AddZone(zone) => {
                self.board.zones.push(zone);
                true
            }
            Command::ClearBoard => {
                self.board.clear_entities();
                true
            }
        }
    }

    pub fn apply_all<I>(&mut self, commands: I) -> bool
    where
        I: IntoIterator<Item = Command>,
    {
        commands
            .into_iter()
            .fold(false, |dirty, command| self.apply(command) || dirty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Team;

    fn home_nine() -> Player {
        Player {
            x: 30.0,
            y: 50.0,
            team: Team::Home,
            number: 9,
        }
    }

    #[test]
    fn add_player_appends_exact_record() {
        let mut session = Session::default();
        assert!(session.apply(Command::AddPlayer(home_nine())));
        assert_eq!(session.board.players, vec![home_nine()]);
    }

    #[test]
    fn add_arrow_appends_exact_record() {
        let run = Arrow {
            start: (40.0, 50.0),
            end: (60.0, 50.0),
        };
        let cross = Arrow {
            start: (10.0, 90.0),
            end: (85.0, 15.0),
        };
        let mut session = Session::default();
        assert!(session.apply(Command::AddArrow(run)));
        assert!(session.apply(Command::AddArrow(cross)));

        assert_eq!(session.board.arrows, vec![run, cross]);
        assert!(session.board.players.is_empty());
        assert!(session.board.zones.is_empty());
    }

    #[test]
    fn add_zone_appends_exact_record() {
        let box_area = Zone {
            center: (50.0, 50.0),
            width: 20.0,
            height: 20.0,
        };
        let wing = Zone {
            center: (85.0, 20.0),
            width: 12.0,
            height: 35.0,
        };
        let mut session = Session::default();
        assert!(session.apply(Command::AddZone(box_area)));
        assert!(session.apply(Command::AddZone(wing)));

        assert_eq!(session.board.zones, vec![box_area, wing]);
        assert!(session.board.players.is_empty());
        assert!(session.board.arrows.is_empty());
    }

    #[test]
    fn repeated_adds_keep_insertion_order() {
        let mut session = Session::default();
        let mut player = home_nine();
        for number in 1..=5 {
            player.number = number;
            session.apply(Command::AddPlayer(player));
        }
        let numbers: Vec<u8> = session.board.players.iter().map(|p| p.number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5]);

        // Mutating the draft afterwards doesn't touch stored copies.
        player.x = 99.0;
        assert!(session.board.players.iter().all(|p| p.x == 30.0));
    }

    #[test]
    fn clear_keeps_match_state() {
        let mut session = Session::default();
        let state = MatchState {
            home_name: "Ajax".to_string(),
            away_name: "PSV".to_string(),
            home_score: 3,
            away_score: 1,
            minute: 88,
        };
        session.apply_all([
            Command::SetMatchInfo(state.clone()),
            Command::AddPlayer(home_nine()),
            Command::AddArrow(Arrow::default()),
            Command::AddZone(Zone::default()),
            Command::ClearBoard,
        ]);
        assert!(session.board.is_empty());
        assert_eq!(session.board.match_state, state);
    }

    #[test]
    fn set_match_info_is_idempotent() {
        let state = MatchState {
            home_score: 2,
            away_score: 2,
            minute: 90,
            ..MatchState::default()
        };
        let mut once = Session::default();
        once.apply(Command::SetMatchInfo(state.clone()));
        let mut twice = Session::default();
        twice.apply(Command::SetMatchInfo(state.clone()));
        twice.apply(Command::SetMatchInfo(state));
        assert_eq!(once.board, twice.board);
    }

    #[test]
    fn select_mode_leaves_entities_alone() {
        let mut session = Session::default();
        session.apply(Command::AddZone(Zone::default()));
        let before = session.board.clone();
        assert!(!session.apply(Command::SelectMode(Mode::Arrow)));
        assert_eq!(session.mode, Mode::Arrow);
        assert_eq!(session.board, before);
    }

    #[test]
    fn apply_all_reports_dirty_if_any_command_changes_board() {
        let mut session = Session::default();
        assert!(!session.apply_all([Command::SelectMode(Mode::Zone)]));
        assert!(session.apply_all([
            Command::SelectMode(Mode::Player),
            Command::AddPlayer(home_nine()),
        ]));
    }
}
