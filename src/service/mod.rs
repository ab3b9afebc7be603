pub mod accounts;
pub mod uploads;
