//! Chat Module
//!
//! Career counselor conversations: the text-generation seam and the HTTP
//! handlers that persist each exchange to the session transcript.
//!
//! # Module Structure
//!
//! ```text
//! chat/
//! ├── mod.rs        - Module exports
//! ├── responder.rs  - Responder trait and the Gemini client
//! └── handlers.rs   - POST /api/chat, GET /api/chat/{session_id}
//! ```

/// Text-generation client
pub mod responder;

/// Chat HTTP handlers
pub mod handlers;

pub use handlers::{get_transcript, send_message, ChatRequest, ChatResponse};
pub use responder::{ChatTurn, GeminiResponder, Responder, ResponderError};
