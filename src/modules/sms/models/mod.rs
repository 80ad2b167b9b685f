mod sms_record;

pub use sms_record::{SmsRecord, SmsStatus};
