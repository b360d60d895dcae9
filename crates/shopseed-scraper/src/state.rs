use chrono::Utc;
use shopseed_core::{Image, Item, ItemDefaults};

/// Records and id sequences for one extraction run.
///
/// Item and image ids are separate sequences, both starting at 1 and shared
/// across every site visited in the run.
#[derive(Debug)]
pub struct ExtractionState {
    next_item_id: u64,
    next_image_id: u64,
    items: Vec<Item>,
    images: Vec<Image>,
    defaults: ItemDefaults,
}

impl ExtractionState {
    #[must_use]
    pub fn new(defaults: ItemDefaults) -> Self {
        Self {
            next_item_id: 1,
            next_image_id: 1,
            items: Vec::new(),
            images: Vec::new(),
            defaults,
        }
    }

    /// Record one located listing and its image URLs. Returns the item id.
    ///
    /// The item is stored before its images, so every image references an
    /// item that already exists.
    pub fn emit_listing(
        &mut self,
        name: String,
        brand: String,
        category_id: u32,
        image_urls: Vec<String>,
    ) -> u64 {
        let now = Utc::now();
        let item_id = self.next_item_id;
        self.next_item_id += 1;

        self.items.push(Item {
            id: item_id,
            name,
            detail: self.defaults.detail.clone(),
            price: self.defaults.price,
            brand,
            category_id,
            quantity: self.defaults.quantity,
            sales_count: 0,
            status: false,
            created_at: now,
            updated_at: now,
        });

        for url in image_urls {
            self.images.push(Image {
                id: self.next_image_id,
                url,
                item_id,
                created_at: now,
                updated_at: now,
            });
            self.next_image_id += 1;
        }

        item_id
    }

    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    #[must_use]
    pub fn images(&self) -> &[Image] {
        &self.images
    }

    #[must_use]
    pub fn into_records(self) -> (Vec<Item>, Vec<Image>) {
        (self.items, self.images)
    }
}

impl Default for ExtractionState {
    fn default() -> Self {
        Self::new(ItemDefaults::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_dense_and_separate() {
        let mut state = ExtractionState::default();
        let first = state.emit_listing(
            "TV".to_string(),
            "삼성".to_string(),
            1,
            vec!["https://a/1.jpg".to_string(), "https://a/2.jpg".to_string()],
        );
        let second = state.emit_listing("Soap".to_string(), "다이소".to_string(), 6, vec![]);
        let third = state.emit_listing(
            "Book".to_string(),
            "창비".to_string(),
            5,
            vec!["https://a/3.jpg".to_string()],
        );

        assert_eq!((first, second, third), (1, 2, 3));
        let image_ids: Vec<u64> = state.images().iter().map(|i| i.id).collect();
        assert_eq!(image_ids, vec![1, 2, 3]);
        let owners: Vec<u64> = state.images().iter().map(|i| i.item_id).collect();
        assert_eq!(owners, vec![1, 1, 3]);
    }

    #[test]
    fn defaults_are_applied_to_items() {
        let defaults = ItemDefaults {
            detail: "n/a".to_string(),
            price: 500,
            quantity: 2,
        };
        let mut state = ExtractionState::new(defaults);
        state.emit_listing("Pen".to_string(), "다이소".to_string(), 6, vec![]);

        let item = &state.items()[0];
        assert_eq!(item.detail, "n/a");
        assert_eq!(item.price, 500);
        assert_eq!(item.quantity, 2);
        assert_eq!(item.sales_count, 0);
        assert!(!item.status);
        assert_eq!(item.created_at, item.updated_at);
    }

    #[test]
    fn into_records_hands_over_collections() {
        let mut state = ExtractionState::default();
        state.emit_listing("a".to_string(), "b".to_string(), 1, vec!["u".to_string()]);
        let (items, images) = state.into_records();
        assert_eq!(items.len(), 1);
        assert_eq!(images.len(), 1);
    }
}
