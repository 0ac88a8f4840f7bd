//! Persona chat relay over the Gemini streaming API.
//!
//! The crate wires four pieces together: credential resolution
//! ([`credentials`]), a persona-seeded session ([`session`]), an
//! append-only round history ([`history`]), and the streaming relay itself
//! ([`relay::ChatRelay`]), which owns retry-once overload handling and the
//! in-band downgrade of terminal failures. Provider transport lives in the
//! `gemini_api` and `turn_provider_gemini` member crates behind the
//! `turn_provider` contract.

pub mod credentials;
pub mod history;
pub mod persona;
pub mod relay;
pub mod retry;
pub mod session;

pub use credentials::{Credential, CredentialError};
pub use history::{TurnHistory, TurnRecord};
pub use persona::{PersonaPreamble, PERSONA_ACK, PERSONA_PROMPT};
pub use relay::{ChatRelay, StartupError, OVERLOADED_MESSAGE};
pub use retry::RetryPolicy;
pub use session::ChatSession;

pub use turn_provider::{ProviderProfile, Turn, TurnError, TurnProvider, TurnRole};
