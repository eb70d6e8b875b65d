//! Raw back-office wire types: serde shapes for deserializing responses.
//! These map to the clean domain types via the adapters at the bottom.
use crate::{League, Stage, StageRef, StandingRow, Status};
use serde::Deserialize;

/// Every endpoint wraps its payload as `{success, data?, error?}`.
#[derive(Debug, Deserialize, Default)]
pub struct Envelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Integer column that may arrive bare, as a string, or as a SQL null
/// wrapper (`{"Int64": 3, "Valid": true}`).
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum NullableInt {
    Plain(i64),
    Wrapped {
        #[serde(rename = "Int64")]
        int64: i64,
        #[serde(rename = "Valid")]
        valid: bool,
    },
    Text(String),
}

impl NullableInt {
    pub fn value(&self) -> Option<i64> {
        match self {
            NullableInt::Plain(v) => Some(*v),
            NullableInt::Wrapped { int64, valid } => valid.then_some(*int64),
            NullableInt::Text(s) => s.trim().parse().ok(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct WireLeague {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WireStage {
    pub id: i64,
    #[serde(default)]
    pub stage_name: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct WireStanding {
    pub id: i64,
    pub league_id: Option<NullableInt>,
    pub team_id: Option<NullableInt>,
    pub team_name: Option<String>,
    pub stage_id: Option<NullableInt>,
    pub stage_name: Option<String>,
    pub status: Option<NullableInt>,
    pub matches_played: Option<NullableInt>,
    pub wins: Option<NullableInt>,
    pub draws: Option<NullableInt>,
    pub losses: Option<NullableInt>,
    pub goals_for: Option<NullableInt>,
    pub goals_against: Option<NullableInt>,
    pub goal_difference: Option<NullableInt>,
    pub points: Option<NullableInt>,
    pub current_rank: Option<NullableInt>,
}

// ---------------------------------------------------------------------------
// Mapping: wire types → domain types
// ---------------------------------------------------------------------------

/// Single adapter for both historical stage shapes: a numeric `stage_id`
/// (bare or null-wrapped) wins; otherwise a non-empty `stage_name` is the key.
pub fn stage_ref(stage_id: Option<&NullableInt>, stage_name: Option<&str>) -> Option<StageRef> {
    let name = stage_name
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(ToString::to_string);

    if let Some(id) = stage_id.and_then(NullableInt::value) {
        return Some(StageRef { key: id.to_string(), name });
    }
    name.map(|n| StageRef { key: n.clone(), name: Some(n) })
}

fn int(v: &Option<NullableInt>) -> Option<i64> {
    v.as_ref().and_then(NullableInt::value)
}

fn count(v: &Option<NullableInt>) -> u32 {
    int(v).and_then(|n| u32::try_from(n).ok()).unwrap_or(0)
}

impl From<WireStanding> for StandingRow {
    fn from(w: WireStanding) -> Self {
        let stage = stage_ref(w.stage_id.as_ref(), w.stage_name.as_deref());
        let current_rank = int(&w.current_rank)
            .filter(|r| *r > 0)
            .and_then(|r| u32::try_from(r).ok());
        let goal_difference = int(&w.goal_difference)
            .and_then(|gd| i32::try_from(gd).ok())
            .unwrap_or(0);

        StandingRow {
            id: w.id,
            league_id: int(&w.league_id),
            team_id: int(&w.team_id),
            team_name: w.team_name,
            stage,
            matches_played: count(&w.matches_played),
            wins: count(&w.wins),
            draws: count(&w.draws),
            losses: count(&w.losses),
            goals_for: count(&w.goals_for),
            goals_against: count(&w.goals_against),
            goal_difference,
            points: count(&w.points),
            current_rank,
            status: int(&w.status).map(Status::from_code).unwrap_or_default(),
        }
    }
}

impl From<WireLeague> for League {
    fn from(w: WireLeague) -> Self {
        League {
            name: w.name.unwrap_or_else(|| format!("League {}", w.id)),
            id: w.id,
        }
    }
}

impl From<WireStage> for Stage {
    fn from(w: WireStage) -> Self {
        Stage {
            name: w.stage_name.unwrap_or_default(),
            id: w.id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> StandingRow {
        serde_json::from_value::<WireStanding>(value).unwrap().into()
    }

    #[test]
    fn nullable_int_accepts_all_shapes() {
        let plain: NullableInt = serde_json::from_value(json!(4)).unwrap();
        let wrapped: NullableInt = serde_json::from_value(json!({"Int64": 9, "Valid": true})).unwrap();
        let invalid: NullableInt = serde_json::from_value(json!({"Int64": 0, "Valid": false})).unwrap();
        let text: NullableInt = serde_json::from_value(json!("12")).unwrap();
        assert_eq!(plain.value(), Some(4));
        assert_eq!(wrapped.value(), Some(9));
        assert_eq!(invalid.value(), None);
        assert_eq!(text.value(), Some(12));
    }

    #[test]
    fn stage_key_prefers_valid_stage_id() {
        let row = parse(json!({
            "id": 1,
            "stage_id": {"Int64": 3, "Valid": true},
            "stage_name": "Zone North"
        }));
        let stage = row.stage.unwrap();
        assert_eq!(stage.key, "3");
        assert_eq!(stage.name.as_deref(), Some("Zone North"));
    }

    #[test]
    fn stage_key_falls_back_to_stage_name() {
        let row = parse(json!({
            "id": 1,
            "stage_id": {"Int64": 0, "Valid": false},
            "stage_name": "Group B"
        }));
        assert_eq!(row.stage_key(), Some("Group B"));

        let bare = parse(json!({"id": 2, "stage_name": "Group B"}));
        assert_eq!(bare.stage, row.stage);
    }

    #[test]
    fn row_without_stage_has_no_key() {
        let row = parse(json!({"id": 1, "stage_id": null, "stage_name": ""}));
        assert_eq!(row.stage, None);
    }

    #[test]
    fn rank_and_status_are_normalized() {
        let row = parse(json!({
            "id": 5,
            "status": null,
            "current_rank": {"Int64": 0, "Valid": true},
            "goal_difference": -4,
            "points": 10
        }));
        assert_eq!(row.status, Status::On);
        assert_eq!(row.current_rank, None);
        assert_eq!(row.goal_difference, -4);
        assert_eq!(row.points, 10);

        let off = parse(json!({"id": 6, "status": {"Int64": 1, "Valid": true}, "current_rank": 2}));
        assert_eq!(off.status, Status::Off);
        assert_eq!(off.current_rank, Some(2));
    }

    #[test]
    fn full_server_row_maps_every_stat() {
        let row = parse(json!({
            "id": 16,
            "league_id": 2,
            "team_id": 44,
            "team_name": "Port FC",
            "stage_id": {"Int64": 1, "Valid": true},
            "status": {"Int64": 0, "Valid": true},
            "matches_played": 10,
            "wins": 6,
            "draws": 2,
            "losses": 2,
            "goals_for": 18,
            "goals_against": 9,
            "goal_difference": 9,
            "points": 20,
            "current_rank": {"Int64": 1, "Valid": true}
        }));
        assert_eq!(row.league_id, Some(2));
        assert_eq!(row.team_id, Some(44));
        assert_eq!(
            (row.matches_played, row.wins, row.draws, row.losses),
            (10, 6, 2, 2)
        );
        assert_eq!((row.goals_for, row.goals_against, row.goal_difference), (18, 9, 9));
        assert_eq!(row.current_rank, Some(1));
    }
}
