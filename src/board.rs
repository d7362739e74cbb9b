use std::fmt;

// ── Bounds ──────────────────────────────────────────────────────────────────

pub const PITCH_MIN: f32 = 0.0;
pub const PITCH_MAX: f32 = 100.0;
pub const ZONE_MIN: f32 = 5.0;
pub const ZONE_MAX: f32 = 50.0;
pub const NUMBER_MIN: u8 = 1;
pub const NUMBER_MAX: u8 = 99;
pub const SCORE_MAX: u8 = 20;
pub const MINUTE_MAX: u16 = 130;

/// Clamp a float into `[min, max]`, sending NaN to `min`.
pub fn clamp_unit(value: f32, min: f32, max: f32) -> f32 {
    if value.is_nan() {
        min
    } else {
        value.clamp(min, max)
    }
}

fn clamp_pitch(value: f32) -> f32 {
    clamp_unit(value, PITCH_MIN, PITCH_MAX)
}

// ── Entities ────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Team {
    #[default]
    Home,
    Away,
}

impl Team {
    pub const ALL: [Team; 2] = [Team::Home, Team::Away];
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Team::Home => f.write_str("Home"),
            Team::Away => f.write_str("Away"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    pub team: Team,
    pub number: u8,
}

impl Player {
    pub fn clamped(&self) -> Self {
        Self {
            x: clamp_pitch(self.x),
            y: clamp_pitch(self.y),
            team: self.team,
            number: self.number.clamp(NUMBER_MIN, NUMBER_MAX),
        }
    }
}

impl Default for Player {
    fn default() -> Self {
        Self {
            x: 50.0,
            y: 50.0,
            team: Team::Home,
            number: NUMBER_MIN,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Arrow {
    pub start: (f32, f32),
    pub end: (f32, f32),
}

impl Arrow {
    pub fn clamped(&self) -> Self {
        Self {
            start: (clamp_pitch(self.start.0), clamp_pitch(self.start.1)),
            end: (clamp_pitch(self.end.0), clamp_pitch(self.end.1)),
        }
    }

    pub fn length(&self) -> f32 {
        let dx = self.end.0 - self.start.0;
        let dy = self.end.1 - self.start.1;
        (dx * dx + dy * dy).sqrt()
    }
}

impl Default for Arrow {
    fn default() -> Self {
        Self {
            start: (40.0, 50.0),
            end: (70.0, 50.0),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Zone {
    pub center: (f32, f32),
    pub width: f32,
    pub height: f32,
}

impl Zone {
    pub fn clamped(&self) -> Self {
        Self {
            center: (clamp_pitch(self.center.0), clamp_pitch(self.center.1)),
            width: clamp_unit(self.width, ZONE_MIN, ZONE_MAX),
            height: clamp_unit(self.height, ZONE_MIN, ZONE_MAX),
        }
    }

    /// Pitch-space extent as `(min_x, min_y, max_x, max_y)`.
    pub fn bounds(&self) -> (f32, f32, f32, f32) {
        let (hw, hh) = (self.width / 2.0, self.height / 2.0);
        (
            self.center.0 - hw,
            self.center.1 - hh,
            self.center.0 + hw,
            self.center.1 + hh,
        )
    }
}

impl Default for Zone {
    fn default() -> Self {
        Self {
            center: (50.0, 50.0),
            width: 20.0,
            height: 20.0,
        }
    }
}

// ── Match state ─────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchState {
    pub home_name: String,
    pub away_name: String,
    pub home_score: u8,
    pub away_score: u8,
    pub minute: u16,
}

impl MatchState {
    pub fn clamped(&self) -> Self {
        Self {
            home_name: self.home_name.clone(),
            away_name: self.away_name.clone(),
            home_score: self.home_score.min(SCORE_MAX),
            away_score: self.away_score.min(SCORE_MAX),
            minute: self.minute.min(MINUTE_MAX),
        }
    }

    /// Scoreboard line, e.g. `HOME 2 - 1 AWAY   45'`.
    pub fn overlay_text(&self) -> String {
        format!(
            "{} {} - {} {}   {}'",
            self.home_name, self.home_score, self.away_score, self.away_name, self.minute
        )
    }
}

impl Default for MatchState {
    fn default() -> Self {
        Self {
            home_name: "HOME".to_string(),
            away_name: "AWAY".to_string(),
            home_score: 0,
            away_score: 0,
            minute: 0,
        }
    }
}

// ── Store ───────────────────────────────────────────────────────────────────

/// Everything the renderer needs. Lists are append-only and only emptied by
/// [`BoardState::clear_entities`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BoardState {
    pub players: Vec<Player>,
    pub arrows: Vec<Arrow>,
    pub zones: Vec<Zone>,
    pub match_state: MatchState,
}

impl BoardState {
    pub fn clear_entities(&mut self) {
        self.players.clear();
        self.arrows.clear();
        self.zones.clear();
    }

    pub fn entity_count(&self) -> usize {
        self.players.len() + self.arrows.len() + self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entity_count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_fresh_session() {
        let board = BoardState::default();
        assert!(board.is_empty());
        assert_eq!(board.match_state.home_name, "HOME");
        assert_eq!(board.match_state.away_name, "AWAY");
        assert_eq!(board.match_state.home_score, 0);
        assert_eq!(board.match_state.away_score, 0);
        assert_eq!(board.match_state.minute, 0);
    }

    #[test]
    fn overlay_text_at_maxima() {
        let state = MatchState {
            home_score: 20,
            away_score: 20,
            minute: 130,
            ..MatchState::default()
        };
        assert_eq!(state.overlay_text(), "HOME 20 - 20 AWAY   130'");
    }

    #[test]
    fn clamping_pulls_values_into_range() {
        let player = Player {
            x: -10.0,
            y: 150.0,
            team: Team::Away,
            number: 0,
        }
        .clamped();
        assert_eq!((player.x, player.y, player.number), (0.0, 100.0, 1));

        let zone = Zone {
            center: (f32::NAN, 101.0),
            width: 1.0,
            height: 80.0,
        }
        .clamped();
        assert_eq!(zone.center, (0.0, 100.0));
        assert_eq!((zone.width, zone.height), (5.0, 50.0));

        let state = MatchState {
            home_score: 99,
            away_score: 21,
            minute: 500,
            ..MatchState::default()
        }
        .clamped();
        assert_eq!((state.home_score, state.away_score, state.minute), (20, 20, 130));
    }

    #[test]
    fn zone_bounds_are_centered() {
        let zone = Zone {
            center: (50.0, 50.0),
            width: 20.0,
            height: 20.0,
        };
        assert_eq!(zone.bounds(), (40.0, 40.0, 60.0, 60.0));
    }
}
