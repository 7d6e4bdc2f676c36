//! Referral event pipeline.
//!
//! The pipeline is responsible for:
//! - Resolving the exclusive end block from the end timestamp
//! - Choosing the block to start from
//! - Paginating the log source over `[from_block, end_block)` strictly in
//!   increasing block order, retrying a failed page from the same cursor
//! - Decoding every log in arrival order
//!
//! Pages depend on each other through the `next_block` cursor, so one
//! protocol is always fetched serially. Independent protocols are fetched
//! concurrently by [`ReferralEventPipeline::fetch_referral_events_for_protocols`].

use super::decoder::{DecodeError, REFERRAL_REGISTERED_TOPIC, decode_referral_event};
use super::dedup::remove_duplicates;
use crate::config::ReferralConfig;
use crate::processors::{FirstBlockAtOrAfter, LogSource, SyncError};
use crate::utils::retry::RetryPolicy;
use futures_util::future::try_join_all;
use kanau::processor::Processor;
use refpool_sdk::objects::{LogPage, LogQuery, Protocol, ReferralEvent};
use std::time::Duration;
use thiserror::Error;
use time::OffsetDateTime;
use tracing::{debug, error, info, warn};

/// Errors that abort a pipeline run.
///
/// No partial result is returned with any of them.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to resolve end block: {0}")]
    ResolveEndBlock(#[source] SyncError),

    #[error(
        "page fetch for {protocol} failed after {attempts} attempts, resume from block {resume_from}: {source}"
    )]
    PageFetch {
        protocol: Protocol,
        resume_from: u64,
        attempts: u32,
        #[source]
        source: SyncError,
    },

    #[error("failed to decode log at block {block_number} index {log_index}: {source}")]
    Decode {
        block_number: u64,
        log_index: u64,
        #[source]
        source: DecodeError,
    },

    #[error("log source returned cursor {next_block} for a page starting at {from_block}")]
    CursorRegression { from_block: u64, next_block: u64 },
}

/// Parameters of one pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferralFetch {
    pub protocol: Protocol,
    /// Explicit first block; overrides `include_all`.
    pub start_block: Option<u64>,
    /// Start at the protocol's genesis block instead of a recent lookback.
    pub include_all: bool,
    /// Events in blocks at or after the first block with this timestamp are
    /// not included.
    pub end_timestamp: OffsetDateTime,
}

pub struct ReferralEventPipeline<L, R> {
    log_source: L,
    resolver: R,
    config: ReferralConfig,
    retry: RetryPolicy,
}

impl<L, R> ReferralEventPipeline<L, R>
where
    L: LogSource,
    R: Processor<FirstBlockAtOrAfter, Output = u64, Error = SyncError>,
{
    pub fn new(log_source: L, resolver: R, config: ReferralConfig, retry: RetryPolicy) -> Self {
        Self {
            log_source,
            resolver,
            config,
            retry,
        }
    }

    /// Fetch every referral event for one protocol, in on-chain order.
    pub async fn fetch_referral_events(
        &self,
        request: ReferralFetch,
    ) -> Result<Vec<ReferralEvent>, PipelineError> {
        let end_block = self
            .resolver
            .process(FirstBlockAtOrAfter {
                network: self.config.network,
                timestamp: request.end_timestamp,
            })
            .await
            .map_err(PipelineError::ResolveEndBlock)?;
        let start_block = self.start_block(&request, end_block);

        info!(
            protocol = %request.protocol,
            start_block,
            end_block,
            "Fetching referral events"
        );

        let registry = self.config.registry(request.protocol);
        let mut from_block = start_block;
        let mut events = Vec::new();
        let mut pages = 0u32;

        while from_block < end_block {
            let query = LogQuery {
                from_block,
                to_block: end_block,
                event_signature: REFERRAL_REGISTERED_TOPIC.to_string(),
                registry,
            };
            let page = self.fetch_page(request.protocol, &query).await?;
            pages += 1;

            for log in &page.data {
                // The page may run past the boundary block; the boundary was
                // fixed by block number, so filter by block number.
                if log.block_number >= end_block {
                    continue;
                }
                let event = decode_referral_event(log, request.protocol).map_err(|source| {
                    PipelineError::Decode {
                        block_number: log.block_number,
                        log_index: log.log_index,
                        source,
                    }
                })?;
                events.push(event);
            }

            debug!(
                protocol = %request.protocol,
                from_block,
                next_block = page.next_block,
                logs = page.data.len(),
                "Processed referral log page"
            );

            if page.next_block < from_block || (page.next_block == from_block && !page.data.is_empty()) {
                return Err(PipelineError::CursorRegression {
                    from_block,
                    next_block: page.next_block,
                });
            }
            // An empty page that does not move the cursor means the indexer
            // has nothing more for this range.
            if page.next_block == from_block {
                break;
            }
            from_block = page.next_block;
        }

        info!(
            protocol = %request.protocol,
            pages,
            events = events.len(),
            "Fetched referral events"
        );

        Ok(events)
    }

    /// Fetch referral events for one protocol and keep the first event per
    /// user.
    pub async fn fetch_unique_referral_events(
        &self,
        request: ReferralFetch,
    ) -> Result<Vec<ReferralEvent>, PipelineError> {
        let events = self.fetch_referral_events(request).await?;
        let total = events.len();
        let unique = remove_duplicates(events);
        debug!(
            protocol = %request.protocol,
            total,
            unique = unique.len(),
            "Removed duplicate referrals"
        );
        Ok(unique)
    }

    /// Fetch several protocols concurrently; each one is deduplicated on its
    /// own. Fails as a whole if any protocol fails.
    pub async fn fetch_referral_events_for_protocols(
        &self,
        protocols: &[Protocol],
        start_block: Option<u64>,
        include_all: bool,
        end_timestamp: OffsetDateTime,
    ) -> Result<Vec<(Protocol, Vec<ReferralEvent>)>, PipelineError> {
        try_join_all(protocols.iter().map(|&protocol| async move {
            let events = self
                .fetch_unique_referral_events(ReferralFetch {
                    protocol,
                    start_block,
                    include_all,
                    end_timestamp,
                })
                .await?;
            Ok::<_, PipelineError>((protocol, events))
        }))
        .await
    }

    fn start_block(&self, request: &ReferralFetch, end_block: u64) -> u64 {
        let genesis = self.config.genesis_block(request.protocol);
        match request.start_block {
            Some(block) => block,
            None if request.include_all => genesis,
            None => end_block
                .saturating_sub(self.config.lookback_blocks)
                .max(genesis),
        }
    }

    /// Fetch one page, bounded by the page timeout and retried from the same
    /// cursor with exponential backoff.
    async fn fetch_page(&self, protocol: Protocol, query: &LogQuery) -> Result<LogPage, PipelineError> {
        let attempts = self.retry.max_retries + 1;
        let mut attempt = 0u32;
        loop {
            let result = tokio::time::timeout(self.retry.page_timeout, self.log_source.get_events(query))
                .await
                .unwrap_or(Err(SyncError::Timeout(self.retry.page_timeout)));

            let err = match result {
                Ok(page) => return Ok(page),
                Err(err) => err,
            };

            attempt += 1;
            if attempt >= attempts {
                error!(
                    %protocol,
                    from_block = query.from_block,
                    attempts,
                    error = %err,
                    "Giving up on referral log page"
                );
                return Err(PipelineError::PageFetch {
                    protocol,
                    resume_from: query.from_block,
                    attempts,
                    source: err,
                });
            }

            let mut delay = self.retry.delay_for(attempt - 1);
            if let SyncError::RateLimited { retry_after_secs } = &err {
                delay = delay.max(Duration::from_secs(*retry_after_secs));
            }
            warn!(
                %protocol,
                from_block = query.from_block,
                attempt,
                error = %err,
                ?delay,
                "Referral log page failed, retrying"
            );
            tokio::time::sleep(delay).await;
        }
    }
}
