//! `granja-capture` — the feed and packaging capture sheets.
//!
//! Each sheet keeps a fixed table of items whose quantities are typed as free
//! text, recomputes derived values and totals on every edit, and on save
//! writes one row per filled item to the offline store before returning to
//! the menu. Rendering is left to the host; everything here is plain state.

pub mod disclosure;
pub mod feed;
pub mod packaging;
pub mod save;
pub mod screen;
pub mod section;
pub mod store;
pub mod table;

#[cfg(test)]
pub(crate) mod testing;

pub use disclosure::Disclosure;
pub use feed::{FEED_HOUSES, FeedEntry, FeedField, FeedRow, FeedSheet, FeedTotals};
pub use packaging::{
    FinalStock, OverridePolicy, PACKAGING_TYPES, PackagingEntry, PackagingField, PackagingRow,
    PackagingSheet, PackagingTotals,
};
pub use save::{SaveError, SavePipeline, SaveReport, SaveState};
pub use screen::{Navigator, Notice, NoticeKind, Notifier, Screen, ScreenHost};
pub use section::SectionContext;
pub use store::{PersistRow, RecordStore, StoreError};
pub use table::EntryTable;
