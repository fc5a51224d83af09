//! Game logistics: who goes where, who gets which role, who is told what.
//!
//! Everything here works on a `GuildSnapshot` and returns plans; the Discord side
//! carries them out.

pub mod evil;
pub mod names;
pub mod reset;
pub mod seating;
pub mod sync;

pub use evil::{EvilArgs, EvilTeam};
pub use seating::assign_cottages;
pub use sync::plan_role_sync;
