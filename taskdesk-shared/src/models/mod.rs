/// Database models
///
/// This module contains the two record types the whole system revolves
/// around:
///
/// - `user`: User accounts with roles and admin-assignment relationships
/// - `task`: Tasks with lifecycle status and completion reporting fields

pub mod task;
pub mod user;
