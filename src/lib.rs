//! # Shawarma Ordering Telegram Bot
//!
//! A Telegram bot that walks a customer through choosing food, delivery
//! details and a comment, then hands the order to a single operator who
//! moves it through its statuses and can message the customer.

pub mod action;
pub mod bot;
pub mod catalog;
pub mod config;
pub mod desk;
pub mod dialogue;
pub mod localization;
pub mod order_seq;
pub mod pricing;
pub mod registry;
pub mod relay;
pub mod sink;
pub mod wizard;
