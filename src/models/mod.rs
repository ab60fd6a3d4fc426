pub mod generation;
pub mod training_model;
pub mod user;
pub mod webhook;
