//! Everything a view module needs in one import.
//!
//! ```rust,ignore
//! use chopin_jsonable::prelude::*;
//! ```

// ── Encoding ───────────────────────────────────────────────────
pub use crate::{Encodable, JsonEncoder, JsonResponse, Model, ModelEncoder, ToEncodable};

// ── Forms & views ──────────────────────────────────────────────
pub use crate::{CreateView, FormData, FormErrors, FormView, FormViewExt, Saved};
pub use crate::{form_route, jsonable_route};

// ── Request classification ─────────────────────────────────────
pub use crate::{AcceptsJson, AsyncDetector, XRequestedWith};

// ── Errors & config ────────────────────────────────────────────
pub use crate::{Config, JsonableError};

// ── Re-exports (almost every form needs these) ─────────────────
pub use serde::{Deserialize, Serialize};
pub use validator::Validate;
