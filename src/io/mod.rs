/// CSV export of hourly, monthly and projection tables.
pub mod export;
