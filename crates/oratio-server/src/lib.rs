//! HTTP front end for OratioScore.

pub mod gateway;
