pub mod history;
pub mod payload;
pub mod request_id;
pub mod validations;
