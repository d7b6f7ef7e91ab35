//! UI handlers
//!
//! Author: hephaex@gmail.com

pub mod form;
pub mod health;
