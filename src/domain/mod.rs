//! The game-rule domain: pure card catalog (L1), trick evaluator (L2), and
//! the stateful Room engine (L3). Nothing in this module touches I/O or the
//! wall clock except through an explicit `now_ms` parameter.

pub mod announcement;
pub mod cards;
pub mod cards_types;
pub mod combos;
pub mod evaluator;
pub mod room;
pub mod table_config;
pub mod trick;
