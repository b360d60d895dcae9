//! Declarative extraction profiles, one per storefront family.
//!
//! A profile says where listings live, how to read their name and brand,
//! and how to reach the enlarged product images. [`crate::SiteDriver`]
//! interprets any profile the same way.

use std::time::Duration;

use shopseed_core::SiteType;

use crate::locator::LocatorStrategy;
use crate::session::ENTER_KEY;

/// Consecutive listing misses after which a site is treated as exhausted.
pub const DEFAULT_MAX_CONSECUTIVE_MISSES: usize = 60;

const SCROLL_STEP_SCRIPT: &str = "window.scrollBy(0, 100);";

/// What to do when no listing is found at the current cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MissPolicy {
    /// Try the next index.
    Advance,
    /// Run a script (typically a scroll to trigger lazy loading), then try the next index.
    ScriptThenAdvance(String),
    /// Move to the next outer group and restart at index 1.
    RollGroup,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameSource {
    /// The located listing element's own text.
    ListingText,
    Locator(LocatorStrategy),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameTransform {
    Trim,
    /// Drop everything up to the last `]`, removing promo tags like `[단독]`.
    StripBracketPrefix,
}

impl NameTransform {
    #[must_use]
    pub fn apply(self, raw: &str) -> String {
        match self {
            NameTransform::Trim => raw.trim().to_string(),
            NameTransform::StripBracketPrefix => raw
                .rsplit(']')
                .next()
                .unwrap_or_default()
                .trim()
                .to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrandSource {
    Constant(String),
    Locator {
        strategy: LocatorStrategy,
        transform: BrandTransform,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrandTransform {
    Trim,
    /// Split on `separator` and keep the segment at `position` (0-based).
    Segment { separator: char, position: usize },
}

impl BrandTransform {
    /// `None` when the requested segment does not exist.
    #[must_use]
    pub fn apply(self, raw: &str) -> Option<String> {
        match self {
            BrandTransform::Trim => Some(raw.trim().to_string()),
            BrandTransform::Segment {
                separator,
                position,
            } => raw
                .split(separator)
                .nth(position)
                .map(|segment| segment.trim().to_string()),
        }
    }
}

/// A one-time interstitial to close before enumerating listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayDismissal {
    pub close: LocatorStrategy,
    pub confirm: LocatorStrategy,
    pub confirm_keys: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSlots {
    pub count: u32,
    /// Pause before working on each slot.
    pub before_slot: Duration,
    /// Element to click to bring slot `{slot}` into the main viewer.
    pub thumbnail: Option<LocatorStrategy>,
    /// Pause between the thumbnail click and reading the enlarged image.
    pub zoom_settle: Duration,
    pub enlarged: LocatorStrategy,
    /// Read the enlarged image even when the thumbnail could not be clicked.
    pub read_on_click_failure: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteProfile {
    pub target_count: usize,
    /// Pause before each listing lookup.
    pub list_settle: Duration,
    /// Pause after opening a listing's detail view.
    pub detail_settle: Duration,
    pub maximize_window: bool,
    pub overlay: Option<OverlayDismissal>,
    pub item: LocatorStrategy,
    pub miss_policy: MissPolicy,
    pub max_consecutive_misses: usize,
    pub name: NameSource,
    pub name_transform: NameTransform,
    pub brand: BrandSource,
    pub images: ImageSlots,
}

/// Built-in profile for a storefront family.
#[must_use]
pub fn profile_for(site_type: SiteType) -> SiteProfile {
    match site_type {
        SiteType::SamsungStore => samsung_store(),
        SiteType::OliveYoungRanking => olive_young_ranking(),
        SiteType::SsfShop => ssf_shop(),
        SiteType::DaisoSearch => daiso_search(),
        SiteType::KyoboBestseller => kyobo_bestseller(),
    }
}

fn secs(n: u64) -> Duration {
    Duration::from_secs(n)
}

fn samsung_store() -> SiteProfile {
    SiteProfile {
        target_count: 5,
        list_settle: secs(3),
        detail_settle: Duration::ZERO,
        maximize_window: false,
        overlay: None,
        item: LocatorStrategy::xpath([
            "/html/body/div[2]/div[7]/div[4]/div[6]/div[2]/div[2]/ul/li[{index}]/div/div[4]/a/span",
            "/html/body/div[2]/div[7]/div[4]/div[5]/div[2]/div[2]/ul/li[{index}]/div/div[4]/a/span",
        ]),
        miss_policy: MissPolicy::Advance,
        max_consecutive_misses: DEFAULT_MAX_CONSECUTIVE_MISSES,
        name: NameSource::ListingText,
        name_transform: NameTransform::Trim,
        brand: BrandSource::Constant("삼성".to_string()),
        images: ImageSlots {
            count: 3,
            before_slot: secs(3),
            thumbnail: Some(LocatorStrategy::xpath([
                "/html/body/div[2]/div[7]/div[3]/section[1]/div/div/div[1]/div[2]/div[3]/ol/div/div/li[{slot}]/span/a/img",
            ])),
            zoom_settle: secs(3),
            enlarged: LocatorStrategy::xpath([
                "/html/body/div[2]/div[7]/div[3]/section[1]/div/div/div[1]/div[2]/div[2]/div/div/div[{slot}]/img",
            ]),
            read_on_click_failure: false,
        },
    }
}

fn olive_young_ranking() -> SiteProfile {
    const ROW: &str = "/html/body/div[3]/div[8]/div[2]/div[2]/ul[{group}]/li[{index}]";
    SiteProfile {
        target_count: 30,
        list_settle: secs(1),
        detail_settle: Duration::ZERO,
        maximize_window: false,
        overlay: None,
        item: LocatorStrategy::xpath([format!("{ROW}/div/a/img")]),
        miss_policy: MissPolicy::RollGroup,
        max_consecutive_misses: DEFAULT_MAX_CONSECUTIVE_MISSES,
        name: NameSource::Locator(LocatorStrategy::xpath([format!("{ROW}/div/div/a/p")])),
        name_transform: NameTransform::StripBracketPrefix,
        brand: BrandSource::Locator {
            strategy: LocatorStrategy::xpath([format!("{ROW}/div/div/a/span")]),
            transform: BrandTransform::Trim,
        },
        images: ImageSlots {
            count: 3,
            before_slot: secs(3),
            thumbnail: Some(LocatorStrategy::xpath([
                "/html/body/div[3]/div[8]/div/div[2]/div[1]/ul/li[{slot}]/a/img",
            ])),
            zoom_settle: secs(3),
            enlarged: LocatorStrategy::xpath(["/html/body/div[3]/div[8]/div/div[2]/div[1]/div[1]/img"]),
            read_on_click_failure: false,
        },
    }
}

fn ssf_shop() -> SiteProfile {
    const ROW: &str = "/html/body/div[5]/main/section/div[3]/div[1]/ul/li[{index}]";
    SiteProfile {
        target_count: 30,
        list_settle: secs(3),
        detail_settle: Duration::ZERO,
        maximize_window: false,
        overlay: None,
        item: LocatorStrategy::xpath([format!("{ROW}/a/div[1]")]),
        miss_policy: MissPolicy::Advance,
        max_consecutive_misses: DEFAULT_MAX_CONSECUTIVE_MISSES,
        name: NameSource::Locator(LocatorStrategy::xpath([format!("{ROW}/a/div[2]/span[2]")])),
        name_transform: NameTransform::StripBracketPrefix,
        brand: BrandSource::Constant("GALAXY LIFESTYLE".to_string()),
        images: ImageSlots {
            count: 3,
            before_slot: secs(3),
            thumbnail: Some(LocatorStrategy::xpath([
                "/html/body/div[5]/main/section/div[2]/div[1]/div[1]/div[{slot}]/button",
            ])),
            zoom_settle: secs(3),
            enlarged: LocatorStrategy::xpath([
                "/html/body/div[5]/main/section/div[2]/div[1]/div[2]/div[2]/div[{slot}]/img",
            ]),
            read_on_click_failure: false,
        },
    }
}

fn daiso_search() -> SiteProfile {
    SiteProfile {
        target_count: 30,
        list_settle: secs(3),
        detail_settle: secs(5),
        maximize_window: false,
        overlay: None,
        item: LocatorStrategy::xpath([
            "/html/body/div[1]/div/section/div[1]/div/div[4]/div[2]/div/div[2]/div[2]/div[{index}]/div[2]/a/div[2]",
        ]),
        miss_policy: MissPolicy::ScriptThenAdvance(SCROLL_STEP_SCRIPT.to_string()),
        max_consecutive_misses: DEFAULT_MAX_CONSECUTIVE_MISSES,
        name: NameSource::ListingText,
        name_transform: NameTransform::Trim,
        brand: BrandSource::Constant("다이소".to_string()),
        images: ImageSlots {
            count: 3,
            before_slot: Duration::ZERO,
            thumbnail: Some(LocatorStrategy::xpath([
                "/html/body/div[1]/div/section/div[1]/div/div[2]/div[1]/div[2]/div[1]/div[{slot}]",
            ])),
            zoom_settle: secs(3),
            enlarged: LocatorStrategy::xpath([
                "/html/body/div[1]/div/section/div[1]/div/div[2]/div[1]/div[1]/div[1]/div[1]/div[{slot}]/img",
            ]),
            read_on_click_failure: true,
        },
    }
}

fn kyobo_bestseller() -> SiteProfile {
    const ROW: &str =
        "/html/body/div[1]/main/section/div/div/section/ol[{group}]/li[{index}]/div/div[2]/div[2]";
    const COVER: &str =
        "main/section[2]/div[1]/div/div[2]/div[2]/div[2]/div[1]/div[1]/ul/li[1]/div/div[2]/img";
    SiteProfile {
        target_count: 30,
        list_settle: secs(5),
        detail_settle: secs(5),
        maximize_window: true,
        overlay: Some(OverlayDismissal {
            close: LocatorStrategy::xpath(["/html/body/div[1]/div[3]/div/button/img"]),
            confirm: LocatorStrategy::xpath(["/html/body/div[1]/div/div[2]/button[2]"]),
            confirm_keys: ENTER_KEY.to_string(),
        }),
        item: LocatorStrategy::xpath([format!("{ROW}/a")]),
        miss_policy: MissPolicy::RollGroup,
        max_consecutive_misses: DEFAULT_MAX_CONSECUTIVE_MISSES,
        name: NameSource::ListingText,
        name_transform: NameTransform::Trim,
        // Rendered as "author · publisher · date"; the publisher becomes the brand.
        brand: BrandSource::Locator {
            strategy: LocatorStrategy::xpath([format!("{ROW}/div[2]")]),
            transform: BrandTransform::Segment {
                separator: '·',
                position: 1,
            },
        },
        images: ImageSlots {
            count: 1,
            before_slot: Duration::ZERO,
            thumbnail: None,
            zoom_settle: Duration::ZERO,
            enlarged: LocatorStrategy::xpath([
                format!("/html/body/div[3]/{COVER}"),
                "/html/body/div[3]/main/section[2]/div[1]/div/div[2]/div/div[2]/div[1]/div[1]/ul/li[1]/div/div[2]/img".to_string(),
                format!("/html/body/div[4]/{COVER}"),
                format!("/html/body/div[5]/{COVER}"),
            ]),
            read_on_click_failure: false,
        },
    }
}
