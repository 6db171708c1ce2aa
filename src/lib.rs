pub mod board;
pub mod config;
pub mod controller;
pub mod event;
pub mod ranking;
pub mod results;
pub mod source;
pub mod time;
