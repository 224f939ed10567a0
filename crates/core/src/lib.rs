//! # LeGM Core
//!
//! Domain types, traits, and error definitions for the LeGM take-analysis bot.
//! This crate has **no framework dependencies**: it defines the domain model
//! that every other crate implements against.
//!
//! ## Design Philosophy
//!
//! Every external collaborator is a trait here: the model gateway
//! ([`Provider`]), the stats backend ([`StatsBackend`]), the chart renderer
//! ([`ChartRenderer`]), the social platform ([`SocialClient`]) and the
//! persistence layer ([`TakeRepository`]). Implementations live in their
//! respective crates, so the analysis loop can be tested against mocks.

pub mod analysis;
pub mod chart;
pub mod error;
pub mod message;
pub mod provider;
pub mod repository;
pub mod social;
pub mod stats;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use analysis::TakeAnalysis;
pub use chart::{ChartFormat, ChartRenderer, ChartRow, ChartSpec};
pub use error::{Error, Result};
pub use message::{Conversation, Message, Role};
pub use provider::{Provider, ProviderRequest, ProviderResponse, StopReason, ToolDefinition};
pub use repository::{TakeRecord, TakeRepository, TweetRecord};
pub use social::{SocialClient, SocialPost};
pub use stats::StatsBackend;
pub use tool::{Tool, ToolCall};
