#[cfg(feature = "gemini")]
pub mod analyst;
#[cfg(feature = "gemini")]
pub mod client;
pub mod prompts;
pub mod types;

#[cfg(feature = "gemini")]
pub use analyst::*;
#[cfg(feature = "gemini")]
pub use client::*;
pub use prompts::*;
pub use types::*;
