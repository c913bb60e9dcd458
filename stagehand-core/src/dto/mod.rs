//! Data Transfer Objects
//!
//! Wire shapes of the donation tracker API. These stay close to what the
//! tracker actually sends and are reshaped by [`crate::normalize`] before
//! anything is published.

pub mod tracker;
