pub mod mock_db;
pub mod postgres_training_repository;
pub mod training_repository;
