pub mod antenna;
pub mod cli;
pub mod colormap;
pub mod config;
pub mod error;
pub mod export;
pub mod helper;
pub mod helper_traits;
pub mod metrics;
pub mod pattern_chart;
pub mod polar;
pub mod projector;
pub mod sampler;
pub mod scene;
pub mod schedule;
