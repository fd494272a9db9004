//! Collection of numerical routines and related constructs.

pub mod converge;
pub mod search;
pub mod integrate;
pub mod romberg;
