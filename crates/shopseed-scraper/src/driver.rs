//! Generic site extraction state machine.
//!
//! For each listing the driver:
//!
//! 1. settles, then locates the listing at the current cursor, applying the
//!    profile's miss policy when nothing is there;
//! 2. reads the name and brand;
//! 3. opens the detail view and collects up to `images.count` enlarged image URLs;
//! 4. emits the item and its images into [`ExtractionState`];
//! 5. navigates back and advances the cursor.
//!
//! Locator misses never abort a site. A listing whose name or brand cannot be
//! read is stepped over within its group; only an empty cursor triggers the
//! miss policy. Session failures outside the
//! best-effort steps (overlay, image slots) do.

use shopseed_core::SiteConfig;

use crate::error::SessionError;
use crate::locator::Cursor;
use crate::profile::{BrandSource, ImageSlots, MissPolicy, NameSource, OverlayDismissal, SiteProfile};
use crate::session::PageSession;
use crate::state::ExtractionState;

/// Result of driving one site to completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SiteRun {
    pub items: usize,
    pub images: usize,
    /// `true` when the site ran out of listings before reaching its target.
    pub exhausted: bool,
}

struct Listing<E> {
    element: E,
    name: String,
    brand: String,
}

/// What the cursor points at on the listing page.
enum ListingSlot<E> {
    Found(Listing<E>),
    /// Nothing at the cursor; the profile's miss policy decides where to look next.
    Empty,
    /// A listing is there but its name or brand cannot be read. Skipped in place.
    Unreadable,
}

pub struct SiteDriver<'p> {
    profile: &'p SiteProfile,
}

impl<'p> SiteDriver<'p> {
    #[must_use]
    pub fn new(profile: &'p SiteProfile) -> Self {
        Self { profile }
    }

    /// Extract up to `target_count` listings from the page the session is on.
    ///
    /// # Errors
    ///
    /// Returns the first [`SessionError`] raised outside the best-effort steps.
    /// Records emitted before the failure stay in `state`.
    pub async fn run<S>(
        &self,
        session: &S,
        site: &SiteConfig,
        state: &mut ExtractionState,
    ) -> Result<SiteRun, SessionError>
    where
        S: PageSession + ?Sized,
    {
        let profile = self.profile;

        if profile.maximize_window {
            session.maximize_window().await?;
        }
        if let Some(overlay) = &profile.overlay {
            dismiss_overlay(session, overlay).await;
        }

        let mut cursor = Cursor::start();
        let mut run = SiteRun {
            items: 0,
            images: 0,
            exhausted: false,
        };
        let mut consecutive_misses = 0usize;

        while run.items < profile.target_count {
            session.settle(profile.list_settle).await;

            let listing = match self.locate_listing(session, &cursor).await? {
                ListingSlot::Found(listing) => listing,
                miss => {
                    consecutive_misses += 1;
                    if consecutive_misses >= profile.max_consecutive_misses {
                        tracing::warn!(
                            site = %site.entry_url,
                            collected = run.items,
                            target = profile.target_count,
                            misses = consecutive_misses,
                            "no more listings found; stopping site early"
                        );
                        run.exhausted = true;
                        break;
                    }
                    if matches!(miss, ListingSlot::Empty) {
                        self.apply_miss_policy(session, &mut cursor).await?;
                    } else {
                        cursor.index += 1;
                    }
                    continue;
                }
            };
            consecutive_misses = 0;

            session.click(&listing.element).await?;
            session.settle(profile.detail_settle).await;

            let urls = collect_images(session, &profile.images, cursor).await;
            if urls.is_empty() {
                tracing::warn!(
                    site = %site.entry_url,
                    name = %listing.name,
                    "no images found for listing"
                );
            }
            let image_count = urls.len();
            let item_id = state.emit_listing(listing.name, listing.brand, site.category_id, urls);
            tracing::debug!(item_id, images = image_count, "listing extracted");

            run.items += 1;
            run.images += image_count;

            session.back().await?;
            cursor.index += 1;
        }

        Ok(run)
    }

    async fn locate_listing<S>(
        &self,
        session: &S,
        cursor: &Cursor,
    ) -> Result<ListingSlot<S::Element>, SessionError>
    where
        S: PageSession + ?Sized,
    {
        let profile = self.profile;

        let Some(element) = profile.item.resolve(session, cursor).await? else {
            tracing::debug!(group = cursor.group, index = cursor.index, "no listing at cursor");
            return Ok(ListingSlot::Empty);
        };

        let raw_name = match &profile.name {
            NameSource::ListingText => session.text(&element).await?,
            NameSource::Locator(strategy) => match strategy.resolve(session, cursor).await? {
                Some(name_el) => session.text(&name_el).await?,
                None => {
                    tracing::debug!(index = cursor.index, "listing has no name element");
                    return Ok(ListingSlot::Unreadable);
                }
            },
        };
        let name = profile.name_transform.apply(&raw_name);

        let brand = match &profile.brand {
            BrandSource::Constant(brand) => brand.clone(),
            BrandSource::Locator {
                strategy,
                transform,
            } => {
                let Some(brand_el) = strategy.resolve(session, cursor).await? else {
                    tracing::debug!(index = cursor.index, "listing has no brand element");
                    return Ok(ListingSlot::Unreadable);
                };
                let raw = session.text(&brand_el).await?;
                let Some(brand) = transform.apply(&raw) else {
                    tracing::debug!(raw = %raw, "brand text not in expected format");
                    return Ok(ListingSlot::Unreadable);
                };
                brand
            }
        };

        Ok(ListingSlot::Found(Listing {
            element,
            name,
            brand,
        }))
    }

    async fn apply_miss_policy<S>(&self, session: &S, cursor: &mut Cursor) -> Result<(), SessionError>
    where
        S: PageSession + ?Sized,
    {
        match &self.profile.miss_policy {
            MissPolicy::Advance => cursor.index += 1,
            MissPolicy::ScriptThenAdvance(script) => {
                session.execute_script(script).await?;
                cursor.index += 1;
            }
            MissPolicy::RollGroup => {
                cursor.group += 1;
                cursor.index = 1;
            }
        }
        Ok(())
    }
}

/// Close a one-time interstitial if it is showing. Every failure is ignored.
async fn dismiss_overlay<S>(session: &S, overlay: &OverlayDismissal)
where
    S: PageSession + ?Sized,
{
    let cursor = Cursor::start();

    let close = match overlay.close.resolve(session, &cursor).await {
        Ok(Some(el)) => el,
        Ok(None) => {
            tracing::debug!("no overlay to dismiss");
            return;
        }
        Err(e) => {
            tracing::debug!(error = %e, "overlay lookup failed");
            return;
        }
    };
    if let Err(e) = session.click(&close).await {
        tracing::debug!(error = %e, "overlay close click failed");
        return;
    }

    match overlay.confirm.resolve(session, &cursor).await {
        Ok(Some(confirm)) => {
            if let Err(e) = session.send_keys(&confirm, &overlay.confirm_keys).await {
                tracing::debug!(error = %e, "overlay confirm failed");
            }
        }
        Ok(None) => tracing::debug!("overlay confirm button not present"),
        Err(e) => tracing::debug!(error = %e, "overlay confirm lookup failed"),
    }
}

/// Read enlarged image URLs slot by slot. A failing slot is omitted.
async fn collect_images<S>(session: &S, slots: &ImageSlots, cursor: Cursor) -> Vec<String>
where
    S: PageSession + ?Sized,
{
    let mut urls = Vec::new();
    for slot in 1..=slots.count {
        session.settle(slots.before_slot).await;
        match read_slot(session, slots, cursor.with_slot(slot)).await {
            Ok(Some(url)) => urls.push(url),
            Ok(None) => tracing::debug!(slot, "image slot empty"),
            Err(e) => tracing::debug!(slot, error = %e, "image slot failed"),
        }
    }
    urls
}

async fn read_slot<S>(
    session: &S,
    slots: &ImageSlots,
    cursor: Cursor,
) -> Result<Option<String>, SessionError>
where
    S: PageSession + ?Sized,
{
    if let Some(thumbnail) = &slots.thumbnail {
        let zoomed = match thumbnail.resolve(session, &cursor).await? {
            Some(thumb) => match session.click(&thumb).await {
                Ok(()) => true,
                Err(e) => {
                    tracing::debug!(slot = cursor.slot, error = %e, "thumbnail click failed");
                    false
                }
            },
            None => false,
        };

        if zoomed {
            session.settle(slots.zoom_settle).await;
        } else if !slots.read_on_click_failure {
            return Ok(None);
        }
    }

    let Some(image) = slots.enlarged.resolve(session, &cursor).await? else {
        return Ok(None);
    };
    Ok(session
        .attribute(&image, "src")
        .await?
        .filter(|src| !src.trim().is_empty()))
}

#[cfg(test)]
#[path = "driver_test.rs"]
mod tests;
