//! # caption-forge
//!
//! Social-media captions for images, generated by Gemini and parsed into
//! clean, display-ready options.
//!
//! ## Features
//!
//! - **Caption parsing** with a 4-strategy segmenter that handles the usual
//!   model output shapes (blank-line separated options, `**Option N:**`
//!   headers, numbered lists, one caption per line, short sentence runs)
//! - **Header and noise cleanup**: category labels, bold markers, quotes and
//!   copy/share UI tokens are stripped from every caption
//! - **Gemini gateway** with explicit, injected configuration and a mock mode
//! - **Sessions and history** for upload interactions, with WhatsApp share links
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use caption_forge::{GatewayConfig, GeminiGateway, DEFAULT_PROMPT};
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let gateway = GeminiGateway::new(reqwest::Client::new(), GatewayConfig::from_env());
//!
//!     let image = caption_forge::read_image_data_uri(Path::new("beach.jpg"))?;
//!     let session = caption_forge::generate_captions(&gateway, &image, DEFAULT_PROMPT).await?;
//!
//!     for caption in session.options() {
//!         println!("{}", caption);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Parsing Robustness
//!
//! The parser never fails and always returns at least one caption:
//!
//! ```rust
//! use caption_forge::parse_captions;
//!
//! assert_eq!(parse_captions(""), vec![""]);
//!
//! let raw = "**Option 1 (Playful):**\nLiving for golden hour.\n\n**Option 2 (Short):**\nSun. Smiles. Repeat.";
//! assert_eq!(parse_captions(raw), vec!["Living for golden hour.", "Sun. Smiles. Repeat."]);
//!
//! assert_eq!(parse_captions("\"Living the dream\" 📋 Copy 💬 Share"), vec!["Living the dream"]);
//! ```

pub mod gateway;
pub mod image;
pub mod parser;
pub mod session;
pub mod types;

// Re-export main types at crate root
pub use gateway::{CaptionGateway, GatewayError, GeminiGateway, MOCK_RESPONSE};
pub use image::{encode_data_uri, parse_data_uri, read_image_data_uri, DataUri};
pub use parser::{
    clean_caption, parse_captions, strip_header_lines, strip_ui_tokens, SegmentStrategy,
    SENTENCE_LIMIT, SHORT_LINE_LIMIT,
};
pub use session::{
    generate_captions, share_link, CaptionHistory, CaptionSession, DEFAULT_PROMPT,
};
pub use types::{CaptionRequest, CaptionResponse, ErrorKind, GatewayConfig};
