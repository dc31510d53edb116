//! Compiled edge tables
//!
//! Edge cities must exist in [`crate::locations::CITIES`]; coordinates,
//! country and grid zone come from there.

use crate::{CapacityClass, EdgeSelectionStrategy, EdgeTier};

/// Edge row before city resolution
#[derive(Debug, Clone, Copy)]
pub struct EdgeSeed {
    /// Unique id within the provider
    pub id: &'static str,
    /// Gazetteer city name
    pub city: &'static str,
    /// Tier
    pub tier: EdgeTier,
    /// Capacity class
    pub capacity: CapacityClass,
    /// Renewable commitment
    pub renewable: bool,
}

/// Provider row
#[derive(Debug, Clone, Copy)]
pub struct ProviderSeed {
    /// Registry key
    pub name: &'static str,
    /// Human-readable name
    pub display_name: &'static str,
    /// Default routing strategy
    pub strategy: EdgeSelectionStrategy,
    /// Carbon-aware routing support
    pub carbon_aware: bool,
    /// Edges
    pub edges: &'static [EdgeSeed],
}

use CapacityClass::{Large, Medium, Small, Xlarge};
use EdgeTier::{Local, Primary, Regional};

const fn edge(
    id: &'static str,
    city: &'static str,
    tier: EdgeTier,
    capacity: CapacityClass,
    renewable: bool,
) -> EdgeSeed {
    EdgeSeed { id, city, tier, capacity, renewable }
}

const CLOUDFLARE: &[EdgeSeed] = &[
    edge("cf-ams", "Amsterdam", Primary, Xlarge, true),
    edge("cf-arn", "Stockholm", Regional, Large, true),
    edge("cf-ber", "Berlin", Regional, Medium, true),
    edge("cf-cdg", "Paris", Primary, Xlarge, true),
    edge("cf-fra", "Frankfurt", Primary, Xlarge, true),
    edge("cf-gru", "Sao Paulo", Regional, Large, true),
    edge("cf-hel", "Helsinki", Local, Small, true),
    edge("cf-iad", "Ashburn", Primary, Xlarge, true),
    edge("cf-jnb", "Johannesburg", Regional, Medium, true),
    edge("cf-lax", "Los Angeles", Primary, Xlarge, true),
    edge("cf-lhr", "London", Primary, Xlarge, true),
    edge("cf-mad", "Madrid", Regional, Large, true),
    edge("cf-nrt", "Tokyo", Primary, Xlarge, true),
    edge("cf-osl", "Oslo", Local, Medium, true),
    edge("cf-sea", "Seattle", Regional, Large, true),
    edge("cf-sin", "Singapore", Primary, Xlarge, true),
    edge("cf-syd", "Sydney", Regional, Large, true),
    edge("cf-waw", "Warsaw", Local, Medium, true),
    edge("cf-yul", "Montreal", Regional, Medium, true),
    edge("cf-zrh", "Zurich", Regional, Medium, true),
];

const FASTLY: &[EdgeSeed] = &[
    edge("fastly-ams", "Amsterdam", Primary, Large, false),
    edge("fastly-arn", "Stockholm", Regional, Medium, true),
    edge("fastly-cdg", "Paris", Primary, Large, false),
    edge("fastly-fra", "Frankfurt", Primary, Xlarge, false),
    edge("fastly-iad", "Ashburn", Primary, Xlarge, false),
    edge("fastly-lhr", "London", Primary, Xlarge, false),
    edge("fastly-mad", "Madrid", Regional, Medium, true),
    edge("fastly-nrt", "Tokyo", Primary, Large, false),
    edge("fastly-ord", "Chicago", Primary, Large, false),
    edge("fastly-sin", "Singapore", Primary, Large, false),
    edge("fastly-sjc", "San Francisco", Primary, Xlarge, true),
    edge("fastly-syd", "Sydney", Regional, Medium, false),
    edge("fastly-yyz", "Toronto", Regional, Medium, true),
];

const AKAMAI: &[EdgeSeed] = &[
    edge("akamai-ams", "Amsterdam", Primary, Large, true),
    edge("akamai-ber", "Berlin", Regional, Medium, true),
    edge("akamai-bom", "Mumbai", Regional, Large, false),
    edge("akamai-bru", "Brussels", Local, Small, false),
    edge("akamai-cph", "Copenhagen", Regional, Medium, true),
    edge("akamai-dfw", "Dallas", Primary, Large, false),
    edge("akamai-dub", "Dublin", Regional, Medium, true),
    edge("akamai-dxb", "Dubai", Regional, Medium, false),
    edge("akamai-fco", "Rome", Local, Small, false),
    edge("akamai-fra", "Frankfurt", Primary, Xlarge, true),
    edge("akamai-ham", "Hamburg", Local, Small, false),
    edge("akamai-hkg", "Hong Kong", Primary, Large, false),
    edge("akamai-icn", "Seoul", Regional, Large, false),
    edge("akamai-jfk", "New York", Primary, Xlarge, false),
    edge("akamai-lhr", "London", Primary, Xlarge, true),
    edge("akamai-lis", "Lisbon", Local, Small, true),
    edge("akamai-man", "Manchester", Local, Small, false),
    edge("akamai-mia", "Miami", Regional, Medium, false),
    edge("akamai-muc", "Munich", Regional, Medium, false),
    edge("akamai-mxp", "Milan", Regional, Medium, false),
    edge("akamai-prg", "Prague", Local, Small, false),
    edge("akamai-vie", "Vienna", Regional, Medium, true),
];

const CLOUDFRONT: &[EdgeSeed] = &[
    edge("cloudfront-arn", "Stockholm", Regional, Large, true),
    edge("cloudfront-bom", "Mumbai", Regional, Large, false),
    edge("cloudfront-cdg", "Paris", Primary, Large, true),
    edge("cloudfront-dub", "Dublin", Primary, Xlarge, true),
    edge("cloudfront-fra", "Frankfurt", Primary, Xlarge, true),
    edge("cloudfront-gru", "Sao Paulo", Regional, Large, false),
    edge("cloudfront-iad", "Ashburn", Primary, Xlarge, true),
    edge("cloudfront-kix", "Osaka", Regional, Medium, false),
    edge("cloudfront-lhr", "London", Primary, Xlarge, true),
    edge("cloudfront-mxp", "Milan", Regional, Medium, false),
    edge("cloudfront-nrt", "Tokyo", Primary, Xlarge, false),
    edge("cloudfront-ord", "Chicago", Regional, Large, false),
    edge("cloudfront-sea", "Seattle", Regional, Large, true),
    edge("cloudfront-sfo", "San Francisco", Primary, Large, true),
    edge("cloudfront-sin", "Singapore", Primary, Large, false),
    edge("cloudfront-syd", "Sydney", Regional, Large, false),
];

/// Every provider compiled into the binary
pub static PROVIDERS: &[ProviderSeed] = &[
    ProviderSeed {
        name: "cloudflare",
        display_name: "Cloudflare",
        strategy: EdgeSelectionStrategy::Anycast,
        carbon_aware: true,
        edges: CLOUDFLARE,
    },
    ProviderSeed {
        name: "fastly",
        display_name: "Fastly",
        strategy: EdgeSelectionStrategy::Anycast,
        carbon_aware: false,
        edges: FASTLY,
    },
    ProviderSeed {
        name: "akamai",
        display_name: "Akamai",
        strategy: EdgeSelectionStrategy::Geo,
        carbon_aware: false,
        edges: AKAMAI,
    },
    ProviderSeed {
        name: "cloudfront",
        display_name: "Amazon CloudFront",
        strategy: EdgeSelectionStrategy::Latency,
        carbon_aware: true,
        edges: CLOUDFRONT,
    },
];
