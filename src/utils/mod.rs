pub mod date;
pub mod formatting;
pub mod table;

pub use formatting::pad_member_id;
