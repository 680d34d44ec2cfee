pub mod controller;
pub mod db;
pub mod demo;
pub mod domain;
pub mod error;
pub mod ingest;
pub mod profiles;
pub mod refdata;
pub mod registration;
pub mod repo;
pub mod validate;
