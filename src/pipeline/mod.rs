//! Pipeline stages for image-to-recipe extraction.
//!
//! Each submodule implements exactly one transformation step. Keeping
//! stages separate makes each independently testable and lets us swap an
//! implementation (e.g. a different provider) without touching the others.
//!
//! ## Data Flow
//!
//! ```text
//! scan ──▶ shrink ──▶ encode ──▶ request ──▶ persist
//! (.jpg)  (>5 MiB?)  (base64)   (tool_use)  (<title>.json)
//! ```
//!
//! 1. [`scan`]    — list the directory, keep `.jpg`/`.jpeg` entries only
//! 2. [`shrink`]  — recompress oversized images in place, quality 95
//! 3. [`encode`]  — raw bytes to a base64 `EncodedImage`
//! 4. [`request`] — the one network stage: forced-tool call, match the
//!    `tool_use` block, deserialize its payload
//! 5. [`persist`] — render 4-space-indented JSON and write `<title>.json`

pub mod encode;
pub mod persist;
pub mod request;
pub mod scan;
pub mod shrink;
