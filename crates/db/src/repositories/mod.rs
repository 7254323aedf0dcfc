pub mod availability_exception;
pub mod booking;
pub mod business_hours;
pub mod service;
pub mod settings;
