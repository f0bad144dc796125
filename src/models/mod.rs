//! Request and response models for the dealership API
//!
//! `requests` holds outgoing filter sets and payloads; `responses` holds
//! the domain entities the API returns.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{
    ArticleParams, CarSearchFilters, CatalogParams, Kondisi, NewJanjiTemu, SortBy, StockFilters,
};
pub use responses::{
    Article, FotoMobil, Homepage, JanjiTemu, Kategori, Merek, Mobil, Paginated, RiwayatServis,
    StokMobil, Varian,
};
