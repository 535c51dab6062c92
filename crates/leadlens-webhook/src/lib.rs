//! Outbound webhook delivery with at-most-once semantics.
//!
//! Every delivery attempt writes exactly one `webhook_logs` row; unset
//! targets and gated events short-circuit without logging. Delivery
//! failures are recorded and swallowed, never propagated to the caller.

mod client;
mod events;

pub use client::{DeliveryOutcome, WebhookClient, HIGH_SCORE_THRESHOLD};
pub use events::{
    high_score_payload, lead_analyzed_payload, signup_payload, social_post_payload, WebhookEvent,
};
