pub mod error;
pub mod message;
pub mod openai;
pub mod util;

pub use error::{AiError, Result};
pub use message::{Message, MessageRole};
pub use openai::{ChatOptions, OpenAi, GROQ_API_URL, OPENAI_API_URL};
pub use util::truncate_to_char_boundary;
