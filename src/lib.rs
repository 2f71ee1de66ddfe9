//! Shared trip itinerary service: schedule, flights, lodging and photos for
//! the Barcelona + Ibiza trip.

pub mod address;
pub mod app;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod itinerary;
pub mod models;
pub mod photos;
pub mod schedule;
pub mod seed;
pub mod state;
pub mod timefmt;
