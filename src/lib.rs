pub mod api;

pub mod config;

pub mod db;

pub mod entity;

pub mod form;

pub mod options;

mod migration;

pub(crate) mod util;
