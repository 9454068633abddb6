#![allow(dead_code)]

pub mod cards;
pub mod maps;
pub mod orchestrators;
