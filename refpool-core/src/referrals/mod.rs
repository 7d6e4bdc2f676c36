//! Referral event ingestion.
//!
//! Raw registry logs are paginated out of a [`LogSource`](crate::processors::LogSource),
//! decoded into [`ReferralEvent`](refpool_sdk::objects::ReferralEvent)s in
//! on-chain order and reduced to one event per user.

pub mod decoder;
pub mod dedup;
pub mod pipeline;

pub use decoder::{DecodeError, REFERRAL_REGISTERED_TOPIC, decode_referral_event};
pub use dedup::remove_duplicates;
pub use pipeline::{PipelineError, ReferralEventPipeline, ReferralFetch};
