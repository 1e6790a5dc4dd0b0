pub mod lobby_session;
pub mod session;
