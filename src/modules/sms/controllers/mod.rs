mod generate_controller;
mod sms_log_controller;

pub use generate_controller::GenerateController;
pub use sms_log_controller::SmsLogController;
