#![allow(non_snake_case)]

pub mod clients;
pub mod extract;
pub mod models;
pub mod service;
