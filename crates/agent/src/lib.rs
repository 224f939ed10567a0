//! The take analysis loop: the heart of LeGM.
//!
//! 1. **Receive** a take
//! 2. **Send to the model** with the LeGM system prompt and the stats tools
//! 3. **If tool calls**: execute them, append the results, loop back to step 2
//! 4. **If text**: parse it into a [`TakeAnalysis`](legm_core::TakeAnalysis)
//!    and render the chart, if any
//!
//! The loop continues until the model answers without tool calls or the
//! round limit is reached.

pub mod analyzer;
pub mod parser;
pub mod prompt;

#[cfg(test)]
mod test_helpers;

pub use analyzer::{DEFAULT_MAX_ROUNDS, TakeAnalyzer};
pub use parser::parse_analysis;
pub use prompt::SYSTEM_PROMPT;
