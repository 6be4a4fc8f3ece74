pub mod catalog;
pub mod gesture;
pub mod init_data;
pub mod nav_bar;
pub mod persistence;
pub mod role;
pub mod settings;
pub mod slots;

pub use catalog::{RoleFilter, available_buttons, default_buttons, filter_buttons_for_role};
pub use role::{Access, Role};
pub use settings::*;
pub use slots::{SLOT_COUNT, SlotAssignment};
