pub mod edit_modal;
pub mod standings_table;
