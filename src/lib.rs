//! Payroll sheet engine for monthly payroll exports
//!
//! This crate normalizes a tabular payroll export into one record per
//! operator and company, resolves each company's delivery date with the
//! day-of-month cutoff rule, and groups the result per operator for the
//! document renderer.

#![warn(missing_docs)]

pub mod api;
pub mod config;
pub mod error;
pub mod input;
pub mod models;
pub mod processing;
