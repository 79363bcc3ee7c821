pub mod codec;
pub mod error;

pub use codec::{FrequencyMap, History};
pub use error::HistoryDecodeError;
