use backoffice_api::{StandingId, StandingRow, StandingUpdate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditField {
    MatchesPlayed,
    Wins,
    Draws,
    Losses,
    GoalsFor,
    GoalsAgainst,
    GoalDifference,
    Points,
    CurrentRank,
    Status,
}

impl EditField {
    pub const ALL: [EditField; 10] = [
        EditField::MatchesPlayed,
        EditField::Wins,
        EditField::Draws,
        EditField::Losses,
        EditField::GoalsFor,
        EditField::GoalsAgainst,
        EditField::GoalDifference,
        EditField::Points,
        EditField::CurrentRank,
        EditField::Status,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            EditField::MatchesPlayed => "Played",
            EditField::Wins => "Wins",
            EditField::Draws => "Draws",
            EditField::Losses => "Losses",
            EditField::GoalsFor => "Goals for",
            EditField::GoalsAgainst => "Goals against",
            EditField::GoalDifference => "Goal difference",
            EditField::Points => "Points",
            EditField::CurrentRank => "Rank",
            EditField::Status => "Status (0=ON 1=OFF)",
        }
    }

    fn allows_negative(&self) -> bool {
        matches!(self, EditField::GoalDifference)
    }
}

/// Full-record edit of one standings row. Values stay as typed text so a
/// failed submit leaves the user's input intact.
#[derive(Debug, Clone)]
pub struct EditForm {
    pub standing_id: StandingId,
    pub team_name: String,
    pub values: [String; 10],
    pub focus: usize,
    pub errors: Vec<(EditField, String)>,
    /// Set while the PUT is in flight; blocks a second submit.
    pub submitting: bool,
}

impl EditForm {
    /// `display_rank` prefills the rank when the row has none stored.
    pub fn from_row(row: &StandingRow, display_rank: u32) -> Self {
        let values = EditField::ALL.map(|field| match field {
            EditField::MatchesPlayed => row.matches_played.to_string(),
            EditField::Wins => row.wins.to_string(),
            EditField::Draws => row.draws.to_string(),
            EditField::Losses => row.losses.to_string(),
            EditField::GoalsFor => row.goals_for.to_string(),
            EditField::GoalsAgainst => row.goals_against.to_string(),
            EditField::GoalDifference => row.goal_difference.to_string(),
            EditField::Points => row.points.to_string(),
            EditField::CurrentRank => row.current_rank.unwrap_or(display_rank).to_string(),
            EditField::Status => row.status.code().to_string(),
        });

        Self {
            standing_id: row.id,
            team_name: row.display_name().to_string(),
            values,
            focus: 0,
            errors: Vec::new(),
            submitting: false,
        }
    }

    pub fn focused_field(&self) -> EditField {
        EditField::ALL[self.focus]
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % EditField::ALL.len();
    }

    pub fn focus_prev(&mut self) {
        self.focus = (self.focus + EditField::ALL.len() - 1) % EditField::ALL.len();
    }

    /// Digits anywhere, a minus sign only as the first character.
    pub fn push_char(&mut self, c: char) {
        let value = &mut self.values[self.focus];
        if c.is_ascii_digit() || (c == '-' && value.is_empty()) {
            value.push(c);
        }
    }

    pub fn backspace(&mut self) {
        self.values[self.focus].pop();
    }

    pub fn error_for(&self, field: EditField) -> Option<&str> {
        self.errors
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, msg)| msg.as_str())
    }

    /// Coerce every field to an integer. On any error the messages are kept
    /// on the form and nothing is returned.
    pub fn validate(&mut self) -> Option<StandingUpdate> {
        self.errors.clear();
        let mut parsed = [0i64; 10];

        for (i, field) in EditField::ALL.iter().enumerate() {
            let raw = self.values[i].trim();
            match raw.parse::<i64>() {
                Err(_) if raw.is_empty() => self.errors.push((*field, "required".into())),
                Err(_) => self.errors.push((*field, "not an integer".into())),
                Ok(v) if v < 0 && !field.allows_negative() => {
                    self.errors.push((*field, "must not be negative".into()))
                }
                Ok(v) if *field == EditField::Status && v > 1 => {
                    self.errors.push((*field, "must be 0 or 1".into()))
                }
                Ok(v) => parsed[i] = v,
            }
        }

        if !self.errors.is_empty() {
            return None;
        }

        let [matches_played, wins, draws, losses, goals_for, goals_against, goal_difference, points, current_rank, status] =
            parsed;
        Some(StandingUpdate {
            matches_played: Some(matches_played),
            wins: Some(wins),
            draws: Some(draws),
            losses: Some(losses),
            goals_for: Some(goals_for),
            goals_against: Some(goals_against),
            goal_difference: Some(goal_difference),
            points: Some(points),
            current_rank: Some(current_rank),
            status: Some(if status == 0 { 0 } else { 1 }),
        })
    }
}
