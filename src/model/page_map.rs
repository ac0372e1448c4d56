//! Page-keyed grouping of records.

use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;

use serde::de::{self, DeserializeOwned, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

const PAGE_KEY_PREFIX: &str = "page_";

/// A record that belongs to a page.
pub trait Paged {
    fn page(&self) -> u32;
    fn set_page(&mut self, page: u32);
}

/// Ordered mapping from page number to the records found on that page.
///
/// Serializes as a JSON object keyed `"page_<n>"`, pages in ascending numeric
/// order (so `page_10` follows `page_9`). Pages that yielded nothing are kept
/// as empty sequences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageMap<T> {
    pages: BTreeMap<u32, Vec<T>>,
}

impl<T> PageMap<T> {
    pub fn new() -> Self {
        Self {
            pages: BTreeMap::new(),
        }
    }

    /// Register a page with no records yet. Existing records are kept.
    pub fn ensure_page(&mut self, page: u32) {
        self.pages.entry(page).or_default();
    }

    /// Append a record to a page.
    pub fn push(&mut self, page: u32, item: T) {
        self.pages.entry(page).or_default().push(item);
    }

    /// Append several records to a page, registering it even if `items` is empty.
    pub fn extend_page(&mut self, page: u32, items: impl IntoIterator<Item = T>) {
        self.pages.entry(page).or_default().extend(items);
    }

    /// Records on a page, if the page was processed.
    pub fn get(&self, page: u32) -> Option<&[T]> {
        self.pages.get(&page).map(Vec::as_slice)
    }

    /// Processed page numbers in ascending order.
    pub fn page_numbers(&self) -> impl Iterator<Item = u32> + '_ {
        self.pages.keys().copied()
    }

    /// Iterate `(page, records)` in ascending page order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &[T])> + '_ {
        self.pages.iter().map(|(p, items)| (*p, items.as_slice()))
    }

    /// Iterate every record in page-then-position order.
    pub fn records(&self) -> impl Iterator<Item = &T> + '_ {
        self.pages.values().flatten()
    }

    /// Number of processed pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Number of records across all pages.
    pub fn total_items(&self) -> usize {
        self.pages.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

impl<T> Default for PageMap<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Format the on-disk key for a page.
pub(crate) fn page_key(page: u32) -> String {
    format!("{}{}", PAGE_KEY_PREFIX, page)
}

fn parse_page_key(key: &str) -> Option<u32> {
    key.strip_prefix(PAGE_KEY_PREFIX)?.parse().ok()
}

impl<T: Serialize> Serialize for PageMap<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.pages.len()))?;
        for (page, items) in &self.pages {
            map.serialize_entry(&page_key(*page), items)?;
        }
        map.end()
    }
}

impl<'de, T: DeserializeOwned + Paged> Deserialize<'de> for PageMap<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(PageMapVisitor(PhantomData))
    }
}

struct PageMapVisitor<T>(PhantomData<T>);

impl<'de, T: DeserializeOwned + Paged> Visitor<'de> for PageMapVisitor<T> {
    type Value = PageMap<T>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an object keyed by \"page_<n>\"")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut result = PageMap::new();
        while let Some(key) = access.next_key::<String>()? {
            let page = parse_page_key(&key)
                .ok_or_else(|| de::Error::custom(format!("invalid page key: {}", key)))?;
            let mut items: Vec<T> = access.next_value()?;
            for item in &mut items {
                item.set_page(page);
            }
            result.extend_page(page, items);
        }
        Ok(result)
    }
}
