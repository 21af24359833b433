// src/schedule/sampler.rs
// =============================================================================
// Picks which llms.txt links actually get requested.
//
// Two steps:
// 1. Ignore policy: a link to /llms-full.txt on the same host as the llms.txt
//    itself is skipped. That file is usually huge and repeats the docs the
//    index already points to.
// 2. Sampling: shuffle the rest and keep the first `limit`. A document with
//    thousands of links is spot-checked instead of fully crawled.
//
// The shuffle is driven by a seedable RNG. By default the seed is a hash of
// the llms.txt body, so validating the same document twice checks the same
// links.
// =============================================================================

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use sha2::{Digest, Sha256};
use url::Url;

use crate::config::{clamp_limit, SamplingMode};

const IGNORED_SUFFIX: &str = "/llms-full.txt";

// Links split by what happens to them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sample {
    /// Links to request, in the order they will be reported
    pub checked: Vec<String>,
    /// Links skipped by the ignore policy, in discovery order
    pub ignored: Vec<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct LinkSampler {
    limit: usize,
}

impl LinkSampler {
    // `limit` above MAX_LINK_LIMIT is clamped
    pub fn new(limit: usize) -> Self {
        Self {
            limit: clamp_limit(limit),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    // Splits `links` into ignored and sampled
    //
    // Parameters:
    //   links: every absolute link extracted from the document
    //   root_host: host of the llms.txt URL
    //   rng: shuffle source (see sampling_rng)
    pub fn sample(&self, links: &[String], root_host: &str, rng: &mut StdRng) -> Sample {
        let (ignored, mut candidates): (Vec<String>, Vec<String>) = links
            .iter()
            .cloned()
            .partition(|link| should_ignore(link, root_host));

        candidates.shuffle(rng);
        candidates.truncate(self.limit);

        Sample {
            checked: candidates,
            ignored,
        }
    }
}

// Same host and a path ending in /llms-full.txt
//
// Links that do not parse as absolute URLs are never ignored; they get
// checked and fail there with a proper reason.
pub fn should_ignore(link: &str, root_host: &str) -> bool {
    match Url::parse(link) {
        Ok(url) => url.host_str() == Some(root_host) && url.path().ends_with(IGNORED_SUFFIX),
        Err(_) => false,
    }
}

// Builds the RNG for one run
pub fn sampling_rng(mode: SamplingMode, document: &str) -> StdRng {
    match mode {
        SamplingMode::ContentHash => StdRng::seed_from_u64(content_seed(document)),
        SamplingMode::Seeded(seed) => StdRng::seed_from_u64(seed),
        SamplingMode::Random => StdRng::from_os_rng(),
    }
}

// First 8 bytes of SHA-256(document)
pub fn content_seed(document: &str) -> u64 {
    let digest = Sha256::digest(document.as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(bytes)
}
