pub mod identity;
pub mod leap;
pub mod mailer;
pub mod pluggable_mailer;
pub mod pricing_table;
pub mod resend_mailer;
