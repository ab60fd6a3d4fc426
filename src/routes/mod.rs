pub mod billing;
pub mod train_webhook;
