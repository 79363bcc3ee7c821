pub mod client;
pub mod error;
pub mod models;


pub use client::{OpenMeteoClient, OpenMeteoConfig};
pub use error::{OpenMeteoClientResult, OpenMeteoError};
pub use models::{GeoResult, ResolvedForecast, Stage};
