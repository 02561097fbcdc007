#![warn(clippy::all, clippy::pedantic)]

pub mod collision_tests;
pub mod integration_tests;
