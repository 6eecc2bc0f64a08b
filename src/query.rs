//! Decoding and updating the grid's externally visible query state.
//!
//! The grid's pagination cursors, sort, search, and filters live in a flat
//! string-keyed parameter bag (typically surfaced in a URL). `decode`
//! turns that bag into a typed [`QueryDescriptor`] with a total set of
//! fallback rules: no input, however malformed, makes it panic or error.
//! [`QueryDecoder`] memoizes the last decode so repeated reads of an
//! unchanged bag within one render pass cost nothing.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Page size used when neither `first` nor `last` carries a usable value.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Mutable, string-keyed parameter bag.
///
/// The codec reads and writes query state only through this interface and
/// never assumes a particular transport. `entries` must return a
/// deterministic snapshot (it is the memoization fingerprint).
pub trait ParamBag {
    fn get(&self, key: &str) -> Option<&str>;
    fn set(&mut self, key: &str, value: &str);
    fn remove(&mut self, key: &str);
    /// Deterministically ordered snapshot of every entry.
    fn entries(&self) -> Vec<(String, String)>;
}

impl ParamBag for BTreeMap<String, String> {
    fn get(&self, key: &str) -> Option<&str> {
        BTreeMap::get(self, key).map(String::as_str)
    }

    fn set(&mut self, key: &str, value: &str) {
        self.insert(key.to_string(), value.to_string());
    }

    fn remove(&mut self, key: &str) {
        BTreeMap::remove(self, key);
    }

    fn entries(&self) -> Vec<(String, String)> {
        self.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }
}

/// Sort direction. Anything that is not exactly `ASC` decodes as `Desc`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortOrder {
    #[serde(rename = "ASC")]
    Asc,
    #[default]
    #[serde(rename = "DESC")]
    Desc,
}

impl SortOrder {
    /// Wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

/// Typed, validated view of the parameter bag.
///
/// `page` is a display-only counter; nothing ties it to the cursors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryDescriptor {
    /// Forward cursor: rows after this opaque position
    pub after: Option<String>,
    /// Backward cursor: rows before this opaque position
    pub before: Option<String>,
    /// Forward page size; suppressed entirely when `last` is present
    pub first: Option<u32>,
    /// Backward page size; wins over `first` when both are supplied
    pub last: Option<u32>,
    /// 1-based display page counter
    pub page: u32,
    /// Column key to sort by
    pub sort_by: Option<String>,
    pub order: SortOrder,
    pub search: String,
    /// Per-column filter values
    pub filters: BTreeMap<String, String>,
    pub show_deleted: bool,
}

impl Default for QueryDescriptor {
    fn default() -> Self {
        Self {
            after: None,
            before: None,
            first: Some(DEFAULT_PAGE_SIZE),
            last: None,
            page: 1,
            sort_by: None,
            order: SortOrder::Desc,
            search: String::new(),
            filters: BTreeMap::new(),
            show_deleted: false,
        }
    }
}

impl QueryDescriptor {
    /// Effective page size regardless of paging direction.
    pub fn page_size(&self) -> u32 {
        self.last.or(self.first).unwrap_or(DEFAULT_PAGE_SIZE)
    }

    /// Whether any narrowing input (search or filters) is active.
    pub fn is_filtered(&self) -> bool {
        !self.search.is_empty() || !self.filters.is_empty()
    }
}

/// Parse a count parameter: non-numeric or `< 1` values normalize to
/// `fallback`.
fn parse_count(raw: Option<&str>, fallback: u32) -> u32 {
    raw.and_then(|value| value.trim().parse::<u32>().ok())
        .filter(|count| *count >= 1)
        .unwrap_or(fallback)
}

/// Parse the `filters` parameter as a JSON string-to-string object.
/// Absent, empty, or malformed input yields an empty map.
fn parse_filters(raw: Option<&str>) -> BTreeMap<String, String> {
    let raw = match raw {
        Some(value) if !value.is_empty() => value,
        _ => return BTreeMap::new(),
    };
    match serde_json::from_str(raw) {
        Ok(filters) => filters,
        Err(err) => {
            log::warn!("ignoring malformed filters parameter: {}", err);
            BTreeMap::new()
        }
    }
}

/// Decode a parameter bag into a [`QueryDescriptor`].
///
/// Every field has a fallback; decoding never fails. See the field rules
/// on [`QueryDescriptor`].
pub fn decode(bag: &dyn ParamBag) -> QueryDescriptor {
    let last = bag.get("last").map(|raw| parse_count(Some(raw), DEFAULT_PAGE_SIZE));
    // `last` wins: its mere presence suppresses `first`
    let first = if last.is_some() {
        None
    } else {
        Some(parse_count(bag.get("first"), DEFAULT_PAGE_SIZE))
    };

    QueryDescriptor {
        after: bag.get("after").map(str::to_string),
        before: bag.get("before").map(str::to_string),
        first,
        last,
        page: parse_count(bag.get("page"), 1),
        sort_by: bag.get("sortBy").map(str::to_string),
        order: match bag.get("order") {
            Some("ASC") => SortOrder::Asc,
            _ => SortOrder::Desc,
        },
        search: bag.get("search").unwrap_or("").to_string(),
        filters: parse_filters(bag.get("filters")),
        show_deleted: bag.get("showDeleted") == Some("true"),
    }
}

/// Memoizing wrapper around [`decode`].
///
/// Caches the last `(bag snapshot, descriptor)` pair; decoding an
/// identical bag returns the cached descriptor without recomputation, so
/// every consumer in a render pass sees the same `Arc`.
#[derive(Debug, Default)]
pub struct QueryDecoder {
    cache: RefCell<Option<(Vec<(String, String)>, Arc<QueryDescriptor>)>>,
}

impl QueryDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn decode(&self, bag: &dyn ParamBag) -> Arc<QueryDescriptor> {
        let snapshot = bag.entries();
        if let Some((cached_snapshot, cached)) = &*self.cache.borrow() {
            if *cached_snapshot == snapshot {
                return Arc::clone(cached);
            }
        }

        let decoded = Arc::new(decode(bag));
        *self.cache.borrow_mut() = Some((snapshot, Arc::clone(&decoded)));
        decoded
    }
}

/// Reset the bag to page one, keeping the page size.
///
/// Used whenever a filter, sort, or search change invalidates the current
/// page position: cursors and `last` are cleared, `first` is set to the
/// override if given (else the existing value, else the default), and the
/// display counter returns to `1`.
pub fn reset_pagination(bag: &mut dyn ParamBag, first_override: Option<u32>) {
    let first = first_override
        .map(|count| count.to_string())
        .or_else(|| bag.get("first").map(str::to_string))
        .unwrap_or_else(|| DEFAULT_PAGE_SIZE.to_string());

    bag.remove("after");
    bag.remove("before");
    bag.remove("last");
    bag.set("first", &first);
    bag.set("page", "1");
}

/// Direction reported by the pagination controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageDirection {
    /// Jump back to the first page
    First,
    /// One page backward from the current position
    Prev,
    /// One page forward from the current position
    Next,
}

/// Page metadata reported by the data source alongside each page of rows.
/// The engine only consumes these cursors; it never fabricates them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub has_next_page: bool,
    pub has_previous_page: bool,
    pub start_cursor: Option<String>,
    pub end_cursor: Option<String>,
}

/// Thread a pagination step back into the parameter bag.
///
/// `Next` pages forward with `after` + `first`; `Prev` pages backward with
/// `before` + `last` (matching decode's "`last` wins" rule); `First`
/// clears both cursors. The display counter moves with the step, floored
/// at 1. `cursor` is the opaque cursor the data source last reported for
/// the crossed edge (`end_cursor` for `Next`, `start_cursor` for `Prev`).
pub fn step_page(bag: &mut dyn ParamBag, direction: PageDirection, cursor: Option<&str>) {
    let page = parse_count(bag.get("page"), 1);

    match direction {
        PageDirection::First => {
            bag.remove("after");
            bag.remove("before");
            bag.remove("last");
            bag.set("page", "1");
        }
        PageDirection::Next => {
            match cursor {
                Some(cursor) => bag.set("after", cursor),
                None => bag.remove("after"),
            }
            bag.remove("before");
            bag.remove("last");
            bag.set("page", &page.saturating_add(1).to_string());
        }
        PageDirection::Prev => {
            let size = parse_count(bag.get("last").or(bag.get("first")), DEFAULT_PAGE_SIZE);
            match cursor {
                Some(cursor) => bag.set("before", cursor),
                None => bag.remove("before"),
            }
            bag.remove("after");
            bag.set("last", &size.to_string());
            bag.set("page", &page.saturating_sub(1).max(1).to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bag(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_decode_empty_bag_defaults() {
        let decoded = decode(&bag(&[]));
        assert_eq!(decoded, QueryDescriptor::default());
        assert_eq!(decoded.first, Some(20));
        assert_eq!(decoded.page, 1);
        assert_eq!(decoded.order, SortOrder::Desc);
    }

    #[test]
    fn test_decode_last_suppresses_first() {
        let decoded = decode(&bag(&[("first", "10"), ("last", "5")]));
        assert_eq!(decoded.first, None);
        assert_eq!(decoded.last, Some(5));
        assert_eq!(decoded.page_size(), 5);
    }

    #[test]
    fn test_decode_normalizes_bad_counts() {
        let decoded = decode(&bag(&[("first", "xyz"), ("page", "abc")]));
        assert_eq!(decoded.first, Some(20));
        assert_eq!(decoded.page, 1);

        let decoded = decode(&bag(&[("first", "0"), ("page", "-3"), ("last", "0")]));
        assert_eq!(decoded.last, Some(20));
        assert_eq!(decoded.page, 1);
    }

    #[test]
    fn test_decode_order_requires_exact_match() {
        assert_eq!(decode(&bag(&[("order", "ASC")])).order, SortOrder::Asc);
        assert_eq!(decode(&bag(&[("order", "asc")])).order, SortOrder::Desc);
        assert_eq!(decode(&bag(&[("order", "DESC")])).order, SortOrder::Desc);
        assert_eq!(decode(&bag(&[("order", "anything")])).order, SortOrder::Desc);
    }

    #[test]
    fn test_decode_malformed_filters_degrade_to_empty() {
        let decoded = decode(&bag(&[("filters", "not json")]));
        assert!(decoded.filters.is_empty());

        let decoded = decode(&bag(&[("filters", "")]));
        assert!(decoded.filters.is_empty());

        let decoded = decode(&bag(&[("filters", r#"{"status":"active"}"#)]));
        assert_eq!(decoded.filters.get("status").map(String::as_str), Some("active"));
    }

    #[test]
    fn test_decode_show_deleted_exact_string() {
        assert!(decode(&bag(&[("showDeleted", "true")])).show_deleted);
        assert!(!decode(&bag(&[("showDeleted", "TRUE")])).show_deleted);
        assert!(!decode(&bag(&[("showDeleted", "1")])).show_deleted);
    }

    #[test]
    fn test_decoder_memoizes_identical_bags() {
        let decoder = QueryDecoder::new();
        let params = bag(&[("search", "ada"), ("page", "3")]);

        let first = decoder.decode(&params);
        let second = decoder.decode(&params);
        assert!(Arc::ptr_eq(&first, &second));

        let mut changed = params.clone();
        ParamBag::set(&mut changed, "page", "4");
        let third = decoder.decode(&changed);
        assert!(!Arc::ptr_eq(&first, &third));
        assert_eq!(third.page, 4);
    }

    #[test]
    fn test_reset_pagination_clears_cursors() {
        let mut params = bag(&[
            ("after", "cursor-a"),
            ("before", "cursor-b"),
            ("last", "10"),
            ("first", "50"),
            ("page", "7"),
        ]);

        reset_pagination(&mut params, None);
        assert_eq!(ParamBag::get(&params, "after"), None);
        assert_eq!(ParamBag::get(&params, "before"), None);
        assert_eq!(ParamBag::get(&params, "last"), None);
        assert_eq!(ParamBag::get(&params, "first"), Some("50"));
        assert_eq!(ParamBag::get(&params, "page"), Some("1"));
    }

    #[test]
    fn test_reset_pagination_override_and_default() {
        let mut params = bag(&[("first", "50")]);
        reset_pagination(&mut params, Some(100));
        assert_eq!(ParamBag::get(&params, "first"), Some("100"));

        let mut params = bag(&[]);
        reset_pagination(&mut params, None);
        assert_eq!(ParamBag::get(&params, "first"), Some("20"));
    }

    #[test]
    fn test_step_page_next_and_prev() {
        let mut params = bag(&[("first", "20"), ("page", "2")]);

        step_page(&mut params, PageDirection::Next, Some("end-9"));
        assert_eq!(ParamBag::get(&params, "after"), Some("end-9"));
        assert_eq!(ParamBag::get(&params, "before"), None);
        assert_eq!(ParamBag::get(&params, "page"), Some("3"));

        step_page(&mut params, PageDirection::Prev, Some("start-5"));
        assert_eq!(ParamBag::get(&params, "before"), Some("start-5"));
        assert_eq!(ParamBag::get(&params, "after"), None);
        assert_eq!(ParamBag::get(&params, "last"), Some("20"));
        assert_eq!(ParamBag::get(&params, "page"), Some("2"));
    }

    #[test]
    fn test_step_page_first_clears_everything() {
        let mut params = bag(&[("after", "x"), ("last", "10"), ("page", "4")]);
        step_page(&mut params, PageDirection::First, None);
        assert_eq!(ParamBag::get(&params, "after"), None);
        assert_eq!(ParamBag::get(&params, "before"), None);
        assert_eq!(ParamBag::get(&params, "last"), None);
        assert_eq!(ParamBag::get(&params, "page"), Some("1"));
    }

    #[test]
    fn test_step_page_floors_at_one() {
        let mut params = bag(&[("page", "1")]);
        step_page(&mut params, PageDirection::Prev, None);
        assert_eq!(ParamBag::get(&params, "page"), Some("1"));
    }
}
