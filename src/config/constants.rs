// Project-wide constants
//
// Centralised here so defaults have one source of truth.
// Import via `use crate::config::constants::*;`.

/// Maximum number of completed rounds before a run gives up.
pub const DEFAULT_MAX_ATTEMPTS: usize = 15;

/// Instruction handed to the generator on round 0, before any coaching.
pub const DEFAULT_INITIAL_INSTRUCTION: &str = "generate something";

/// Default bind address for the HTTP server (localhost only).
pub const DEFAULT_HTTP_ADDR: &str = "127.0.0.1:8000";

/// Default OpenAI-compatible endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// Default chat model for all three roles.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default completion budget per agent call.
pub const DEFAULT_MAX_TOKENS: u32 = 1024;

/// Per-request HTTP timeout for agent calls.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Transport attempts per agent call (1 = no retry).
pub const DEFAULT_TRANSPORT_ATTEMPTS: u32 = 3;

/// Generator samples exploratively.
pub const GENERATOR_TEMPERATURE: f32 = 0.7;

/// Validator must be deterministic.
pub const VALIDATOR_TEMPERATURE: f32 = 0.0;

/// Coach samples exploratively, slightly hotter than the generator.
pub const COACH_TEMPERATURE: f32 = 0.8;

/// Request body ceiling for the HTTP server.
pub const DEFAULT_BODY_LIMIT_BYTES: usize = 64 * 1024;

/// Error body returned whenever a run ends without a usable instruction.
pub const NO_PROMPT_FOUND: &str = "No suitable prompt found.";
