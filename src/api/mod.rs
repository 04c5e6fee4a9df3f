pub mod endpoints;
pub mod rest;
pub mod state;
