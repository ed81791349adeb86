//! Command implementations

pub mod common;
pub mod down;
pub mod fresh;
pub mod make;
pub mod reset;
pub mod rollback;
pub mod status;
pub mod up;
pub mod version;
