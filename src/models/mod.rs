pub mod photo;
pub mod roster;
pub mod staff;
