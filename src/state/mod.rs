pub mod app_settings;
pub mod app_state;
pub mod edit_form;
pub mod messages;
pub mod network;
pub mod standings;
