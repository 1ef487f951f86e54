pub mod acquire;
pub mod archive;
pub mod asset;
pub mod cache;
pub mod commands;
pub mod config;
pub mod dotfile;
pub mod download;
pub mod error;
pub mod github;
pub mod http;
pub mod repository;
pub mod runtime;
pub mod version;
