//! SeaORM entities for the relational store.

pub mod user;
