pub mod client;
pub mod wire;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Domain types, independent of the back-office wire format
// ---------------------------------------------------------------------------

pub type LeagueId = i64;
pub type StandingId = i64;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct League {
    pub id: LeagueId,
    pub name: String,
}

/// Stage reference data (group, zone, round). Near-static on the server.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stage {
    pub id: i64,
    pub name: String,
}

/// Normalized stage grouping key for a standings row.
///
/// `key` is the stage id when the row carries a valid one, otherwise the
/// stage name. `name` is whatever label the row itself carried, used when the
/// stage metadata has no entry for the key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StageRef {
    pub key: String,
    pub name: Option<String>,
}

/// Whether a team's row is included in the automated standings scrape.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Status {
    #[default]
    On,
    Off,
}

impl Status {
    /// 0 is ON; any other stored value is OFF.
    pub fn from_code(code: i64) -> Self {
        if code == 0 { Status::On } else { Status::Off }
    }

    pub fn code(self) -> u8 {
        match self {
            Status::On => 0,
            Status::Off => 1,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Status::On => Status::Off,
            Status::Off => Status::On,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Status::On => "ON",
            Status::Off => "OFF",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StandingRow {
    pub id: StandingId,
    pub league_id: Option<LeagueId>,
    pub team_id: Option<i64>,
    pub team_name: Option<String>,
    pub stage: Option<StageRef>,
    pub matches_played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub goal_difference: i32,
    pub points: u32,
    /// `None` when the server has no rank or an invalid (non-positive) one.
    pub current_rank: Option<u32>,
    pub status: Status,
}

impl StandingRow {
    pub fn display_name(&self) -> &str {
        match self.team_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => "-",
        }
    }

    pub fn stage_key(&self) -> Option<&str> {
        self.stage.as_ref().map(|s| s.key.as_str())
    }
}

// ---------------------------------------------------------------------------
// Outbound payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RankAssignment {
    pub id: StandingId,
    pub current_rank: u32,
}

/// Body of `POST /api/standings/order`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderUpdate {
    pub league_id: LeagueId,
    pub order: Vec<RankAssignment>,
}

/// Body of `PUT /api/standings/{id}`. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StandingUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matches_played: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wins: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draws: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub losses: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goals_for: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goals_against: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goal_difference: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_rank: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u8>,
}

impl StandingUpdate {
    pub fn status_only(status: Status) -> Self {
        Self {
            status: Some(status.code()),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_normalize_to_on_off() {
        assert_eq!(Status::from_code(0), Status::On);
        assert_eq!(Status::from_code(1), Status::Off);
        assert_eq!(Status::from_code(7), Status::Off);
        assert_eq!(Status::default().code(), 0);
    }

    #[test]
    fn toggling_twice_is_identity() {
        for status in [Status::On, Status::Off] {
            assert_eq!(status.toggled().toggled(), status);
            assert_ne!(status.toggled(), status);
        }
    }

    #[test]
    fn missing_team_name_uses_placeholder() {
        let mut row = StandingRow::default();
        assert_eq!(row.display_name(), "-");
        row.team_name = Some("  ".into());
        assert_eq!(row.display_name(), "-");
        row.team_name = Some("Buriram United".into());
        assert_eq!(row.display_name(), "Buriram United");
    }

    #[test]
    fn status_only_update_serializes_single_field() {
        let body = serde_json::to_value(StandingUpdate::status_only(Status::Off)).unwrap();
        assert_eq!(body, serde_json::json!({ "status": 1 }));
    }
}
