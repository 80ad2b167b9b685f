mod sms_repository;

pub use sms_repository::SmsRepository;
