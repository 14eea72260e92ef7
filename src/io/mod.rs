pub mod blob_store;
pub mod config_io;
pub mod data_dir;
pub mod persistence;
pub mod recovery;
