use backoffice_api::{
    LeagueId, OrderUpdate, RankAssignment, Stage, StandingId, StandingRow, Status,
};
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Standings table state
// ---------------------------------------------------------------------------

/// The standings of one league, plus the ordered view the user is editing.
///
/// `rows` is the full fetched collection. `order` holds the ids of the rows
/// in the visible stage, in display order; moves mutate only `order`, and
/// everything drawn is a projection of it.
#[derive(Debug, Default)]
pub struct StandingsTable {
    pub league_id: Option<LeagueId>,
    pub rows: Vec<StandingRow>,
    pub stage_names: HashMap<String, String>,
    /// Distinct stage keys present in `rows`, in first-appearance order.
    pub stage_keys: Vec<String>,
    pub selected_stage: Option<String>,
    pub order: Vec<StandingId>,
    /// `order` as it was when the view was last rebuilt from `rows`.
    rendered_order: Vec<StandingId>,
    display_ranks: HashMap<StandingId, u32>,
    pub cursor: usize,
}

/// One projected table line.
#[derive(Debug, Clone, Copy)]
pub struct TableRow<'a> {
    pub row: &'a StandingRow,
    pub display_rank: u32,
    pub can_move_up: bool,
    pub can_move_down: bool,
}

impl StandingsTable {
    /// Replace the collection. The remembered stage survives only when the
    /// league is unchanged and the stage still has rows.
    pub fn load(&mut self, league_id: LeagueId, rows: Vec<StandingRow>, stages: &[Stage]) {
        if self.league_id != Some(league_id) {
            self.selected_stage = None;
            self.cursor = 0;
        }
        self.league_id = Some(league_id);
        self.rows = rows;
        self.stage_names = stages
            .iter()
            .filter(|s| !s.name.is_empty())
            .map(|s| (s.id.to_string(), s.name.clone()))
            .collect();

        self.stage_keys.clear();
        for key in self.rows.iter().filter_map(StandingRow::stage_key) {
            if !self.stage_keys.iter().any(|k| k == key) {
                self.stage_keys.push(key.to_string());
            }
        }

        let remembered = self
            .selected_stage
            .as_ref()
            .is_some_and(|key| self.stage_keys.contains(key));
        if !self.has_stage_selector() {
            self.selected_stage = None;
        } else if !remembered {
            self.selected_stage = self.stage_keys.first().cloned();
        }

        self.rebuild_view();
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_loaded(&self) -> bool {
        self.league_id.is_some()
    }

    pub fn has_stage_selector(&self) -> bool {
        self.stage_keys.len() > 1
    }

    pub fn stage_label(&self, key: &str) -> String {
        if let Some(name) = self.stage_names.get(key) {
            return name.clone();
        }
        self.rows
            .iter()
            .filter_map(|r| r.stage.as_ref())
            .find(|s| s.key == key)
            .and_then(|s| s.name.clone())
            .unwrap_or_else(|| format!("Stage {key}"))
    }

    pub fn select_stage(&mut self, key: &str) -> bool {
        if !self.has_stage_selector() || !self.stage_keys.iter().any(|k| k == key) {
            return false;
        }
        self.selected_stage = Some(key.to_string());
        self.cursor = 0;
        self.rebuild_view();
        true
    }

    pub fn next_stage(&mut self) -> bool {
        self.step_stage(1)
    }

    pub fn prev_stage(&mut self) -> bool {
        self.step_stage(self.stage_keys.len().saturating_sub(1))
    }

    fn step_stage(&mut self, offset: usize) -> bool {
        if !self.has_stage_selector() {
            return false;
        }
        let current = self
            .selected_stage
            .as_ref()
            .and_then(|key| self.stage_keys.iter().position(|k| k == key))
            .unwrap_or(0);
        let next = self.stage_keys[(current + offset) % self.stage_keys.len()].clone();
        self.select_stage(&next)
    }

    /// Filter to the selected stage, stable-sort by rank (missing ranks sort
    /// as 0), and fix each row's displayed rank. Discards unsaved moves.
    fn rebuild_view(&mut self) {
        let selected = self.selected_stage.as_deref();
        let mut visible: Vec<&StandingRow> = self
            .rows
            .iter()
            .filter(|r| selected.is_none() || r.stage_key() == selected)
            .collect();
        visible.sort_by_key(|r| r.current_rank.unwrap_or(0));

        self.display_ranks = visible
            .iter()
            .enumerate()
            .map(|(i, r)| (r.id, r.current_rank.unwrap_or(i as u32 + 1)))
            .collect();
        self.order = visible.iter().map(|r| r.id).collect();
        self.rendered_order = self.order.clone();
        self.cursor = self.cursor.min(self.order.len().saturating_sub(1));
    }

    pub fn visible_rows(&self) -> Vec<TableRow<'_>> {
        let last = self.order.len().saturating_sub(1);
        self.order
            .iter()
            .enumerate()
            .filter_map(|(i, id)| {
                let row = self.find(*id)?;
                Some(TableRow {
                    row,
                    display_rank: self.display_ranks.get(id).copied().unwrap_or(i as u32 + 1),
                    can_move_up: i > 0,
                    can_move_down: i < last,
                })
            })
            .collect()
    }

    pub fn find(&self, id: StandingId) -> Option<&StandingRow> {
        self.rows.iter().find(|r| r.id == id)
    }

    pub fn selected_id(&self) -> Option<StandingId> {
        self.order.get(self.cursor).copied()
    }

    pub fn cursor_down(&mut self) {
        if self.cursor + 1 < self.order.len() {
            self.cursor += 1;
        }
    }

    pub fn cursor_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Swap the row at `index` with the one above it. The cursor follows.
    pub fn move_up(&mut self, index: usize) -> bool {
        if index == 0 || index >= self.order.len() {
            return false;
        }
        self.order.swap(index, index - 1);
        self.cursor = index - 1;
        true
    }

    pub fn move_down(&mut self, index: usize) -> bool {
        if index + 1 >= self.order.len() {
            return false;
        }
        self.order.swap(index, index + 1);
        self.cursor = index + 1;
        true
    }

    pub fn is_dirty(&self) -> bool {
        self.order != self.rendered_order
    }

    /// Ranks `1..=N` over the visible order.
    pub fn order_update(&self) -> Option<OrderUpdate> {
        let league_id = self.league_id?;
        if self.order.is_empty() {
            return None;
        }
        let order = self
            .order
            .iter()
            .enumerate()
            .map(|(i, id)| RankAssignment { id: *id, current_rank: i as u32 + 1 })
            .collect();
        Some(OrderUpdate { league_id, order })
    }

    /// Patch one cached row in place. Returns false if the row is gone.
    pub fn set_status(&mut self, id: StandingId, status: Status) -> bool {
        match self.rows.iter_mut().find(|r| r.id == id) {
            Some(row) => {
                row.status = status;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backoffice_api::StageRef;

    fn row(id: StandingId, rank: Option<u32>, name: &str) -> StandingRow {
        StandingRow {
            id,
            team_name: Some(name.to_string()),
            current_rank: rank,
            ..StandingRow::default()
        }
    }

    fn staged(id: StandingId, rank: u32, stage: &str) -> StandingRow {
        StandingRow {
            stage: Some(StageRef { key: stage.to_string(), name: None }),
            ..row(id, Some(rank), &format!("T{id}"))
        }
    }

    fn names(table: &StandingsTable) -> Vec<String> {
        table
            .visible_rows()
            .iter()
            .map(|r| r.row.display_name().to_string())
            .collect()
    }

    fn ranks(table: &StandingsTable) -> Vec<u32> {
        table.visible_rows().iter().map(|r| r.display_rank).collect()
    }

    #[test]
    fn rows_render_sorted_by_rank() {
        let mut table = StandingsTable::default();
        table.load(1, vec![row(1, Some(2), "A"), row(2, Some(1), "B")], &[]);
        assert_eq!(names(&table), ["B", "A"]);
        assert_eq!(ranks(&table), [1, 2]);
    }

    #[test]
    fn sorted_ranks_are_non_decreasing_and_ties_keep_fetch_order() {
        let mut table = StandingsTable::default();
        table.load(
            1,
            vec![
                row(1, Some(3), "C"),
                row(2, Some(1), "A1"),
                row(3, Some(2), "B"),
                row(4, Some(1), "A2"),
            ],
            &[],
        );
        assert_eq!(names(&table), ["A1", "A2", "B", "C"]);
        let r = ranks(&table);
        assert!(r.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn missing_rank_displays_position() {
        let mut table = StandingsTable::default();
        table.load(1, vec![row(1, Some(1), "A"), row(2, None, "B"), row(3, Some(2), "C")], &[]);
        // Missing ranks sort as 0, then show index + 1.
        assert_eq!(names(&table), ["B", "A", "C"]);
        assert_eq!(ranks(&table), [1, 1, 2]);
    }

    #[test]
    fn single_stage_shows_all_rows_without_selector() {
        let mut table = StandingsTable::default();
        table.load(1, vec![staged(1, 1, "4"), staged(2, 2, "4"), row(3, Some(3), "X")], &[]);
        assert!(!table.has_stage_selector());
        assert_eq!(table.selected_stage, None);
        assert_eq!(table.visible_rows().len(), 3);
    }

    #[test]
    fn stage_filter_restricts_to_selected_key() {
        let mut table = StandingsTable::default();
        let rows = vec![staged(1, 1, "a"), staged(2, 1, "b"), staged(3, 2, "a"), staged(4, 2, "b")];
        table.load(1, rows, &[]);
        assert!(table.has_stage_selector());
        assert_eq!(table.stage_keys, ["a", "b"]);
        assert_eq!(table.selected_stage.as_deref(), Some("a"));
        assert!(table.visible_rows().iter().all(|r| r.row.stage_key() == Some("a")));

        assert!(table.select_stage("b"));
        let ids: Vec<_> = table.visible_rows().iter().map(|r| r.row.id).collect();
        assert_eq!(ids, [2, 4]);
        assert!(!table.select_stage("zzz"));
    }

    #[test]
    fn selected_stage_survives_reload_of_same_league_only() {
        let rows = || vec![staged(1, 1, "a"), staged(2, 1, "b")];
        let mut table = StandingsTable::default();
        table.load(1, rows(), &[]);
        table.select_stage("b");

        table.load(1, rows(), &[]);
        assert_eq!(table.selected_stage.as_deref(), Some("b"));

        table.load(2, rows(), &[]);
        assert_eq!(table.selected_stage.as_deref(), Some("a"));
    }

    #[test]
    fn stage_cycling_wraps_both_ways() {
        let mut table = StandingsTable::default();
        table.load(1, vec![staged(1, 1, "a"), staged(2, 1, "b"), staged(3, 1, "c")], &[]);
        assert!(table.prev_stage());
        assert_eq!(table.selected_stage.as_deref(), Some("c"));
        assert!(table.next_stage());
        assert_eq!(table.selected_stage.as_deref(), Some("a"));
    }

    #[test]
    fn stage_labels_resolve_metadata_then_row_then_key() {
        let mut table = StandingsTable::default();
        let mut named = staged(2, 1, "Group B");
        named.stage = Some(StageRef { key: "Group B".into(), name: Some("Group B".into()) });
        table.load(
            1,
            vec![staged(1, 1, "3"), named, staged(3, 1, "9")],
            &[Stage { id: 3, name: "Zone North".into() }],
        );
        assert_eq!(table.stage_label("3"), "Zone North");
        assert_eq!(table.stage_label("Group B"), "Group B");
        assert_eq!(table.stage_label("9"), "Stage 9");
    }

    #[test]
    fn move_controls_are_disabled_at_boundaries() {
        let mut table = StandingsTable::default();
        table.load(1, vec![row(1, Some(1), "A"), row(2, Some(2), "B"), row(3, Some(3), "C")], &[]);
        let rows = table.visible_rows();
        assert!(!rows[0].can_move_up && rows[0].can_move_down);
        assert!(rows[1].can_move_up && rows[1].can_move_down);
        assert!(rows[2].can_move_up && !rows[2].can_move_down);

        assert!(!table.move_up(0));
        assert!(!table.move_down(2));
        assert!(!table.is_dirty());
    }

    #[test]
    fn moves_reorder_locally_and_keep_row_ranks() {
        let mut table = StandingsTable::default();
        table.load(1, vec![row(1, Some(1), "A"), row(2, Some(2), "B"), row(3, Some(3), "C")], &[]);
        assert!(table.move_down(0));
        assert_eq!(table.cursor, 1);
        assert_eq!(names(&table), ["B", "A", "C"]);
        assert_eq!(ranks(&table), [2, 1, 3]);
        assert!(table.is_dirty());

        assert!(table.move_up(1));
        assert!(!table.is_dirty());
        // The stored collection is untouched by moves.
        assert_eq!(table.find(1).unwrap().current_rank, Some(1));
    }

    #[test]
    fn order_update_is_a_permutation_matching_display() {
        let mut table = StandingsTable::default();
        table.load(
            9,
            vec![row(10, Some(1), "A"), row(11, Some(2), "B"), row(12, Some(3), "C"), row(13, Some(4), "D")],
            &[],
        );
        table.move_up(3);
        table.move_up(2);
        table.move_down(0);

        let update = table.order_update().unwrap();
        assert_eq!(update.league_id, 9);
        assert_eq!(update.order.len(), 4);
        let displayed: Vec<_> = table.visible_rows().iter().map(|r| r.row.id).collect();
        let sent: Vec<_> = update.order.iter().map(|a| a.id).collect();
        assert_eq!(sent, displayed);
        let sent_ranks: Vec<_> = update.order.iter().map(|a| a.current_rank).collect();
        assert_eq!(sent_ranks, [1, 2, 3, 4]);
    }

    #[test]
    fn order_update_is_scoped_to_visible_stage() {
        let mut table = StandingsTable::default();
        table.load(1, vec![staged(1, 1, "a"), staged(2, 1, "b"), staged(3, 2, "a")], &[]);
        let update = table.order_update().unwrap();
        let ids: Vec<_> = update.order.iter().map(|a| a.id).collect();
        assert_eq!(ids, [1, 3]);
    }

    #[test]
    fn empty_table_has_no_order_update() {
        let mut table = StandingsTable::default();
        assert!(table.order_update().is_none());
        table.load(1, vec![], &[]);
        assert!(table.is_loaded());
        assert!(table.order_update().is_none());
        assert!(table.selected_id().is_none());
    }

    #[test]
    fn stage_switch_discards_unsaved_moves() {
        let mut table = StandingsTable::default();
        table.load(1, vec![staged(1, 1, "a"), staged(2, 2, "a"), staged(3, 1, "b")], &[]);
        table.move_down(0);
        assert!(table.is_dirty());
        table.next_stage();
        table.prev_stage();
        assert!(!table.is_dirty());
        let ids: Vec<_> = table.visible_rows().iter().map(|r| r.row.id).collect();
        assert_eq!(ids, [1, 2]);
    }

    #[test]
    fn set_status_patches_cached_row() {
        let mut table = StandingsTable::default();
        table.load(1, vec![row(5, Some(1), "A")], &[]);
        assert!(table.set_status(5, Status::Off));
        assert_eq!(table.visible_rows()[0].row.status, Status::Off);
        assert!(!table.set_status(99, Status::Off));
    }
}
