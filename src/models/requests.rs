//! Outgoing request types: filter sets, catalog parameters and the
//! appointment-creation payload.
//!
//! Filter types render themselves to query parameters, omitting unset
//! and empty values so logically identical requests produce identical
//! parameter sets.

use serde::Serialize;

/// Car condition filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kondisi {
    Baru,
    Bekas,
}

impl Kondisi {
    pub fn as_str(self) -> &'static str {
        match self {
            Kondisi::Baru => "baru",
            Kondisi::Bekas => "bekas",
        }
    }
}

/// User-facing sort options mapped to backend sort expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortBy {
    Newest,
    Oldest,
    PriceLow,
    PriceHigh,
    YearNewest,
    YearOldest,
}

impl SortBy {
    /// Backend-compatible sort value (`-` prefix = descending).
    pub fn api_value(self) -> &'static str {
        match self {
            SortBy::Newest => "-created_at",
            SortBy::Oldest => "created_at",
            SortBy::PriceLow => "harga_jual",
            SortBy::PriceHigh => "-harga_jual",
            SortBy::YearNewest => "-tahun",
            SortBy::YearOldest => "tahun",
        }
    }
}

fn push(params: &mut Vec<(String, String)>, name: &str, value: Option<String>) {
    if let Some(value) = value {
        if !value.is_empty() {
            params.push((name.to_string(), value));
        }
    }
}

/// Filters for the car-model listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CarSearchFilters {
    pub search: Option<String>,
    pub merek_id: Option<u64>,
    pub kategori_id: Option<u64>,
    pub harga_min: Option<u64>,
    pub harga_max: Option<u64>,
    pub tahun_min: Option<u16>,
    pub tahun_max: Option<u16>,
    pub transmisi: Option<String>,
    pub bahan_bakar: Option<String>,
    pub kondisi: Option<Kondisi>,
    pub sort: Option<String>,
    pub page: Option<u32>,
}

impl CarSearchFilters {
    /// Renders the filter set as query parameters, omitting unset and
    /// empty values.
    pub fn query_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        push(&mut params, "search", self.search.clone());
        push(&mut params, "merek_id", self.merek_id.map(|v| v.to_string()));
        push(
            &mut params,
            "kategori_id",
            self.kategori_id.map(|v| v.to_string()),
        );
        push(
            &mut params,
            "harga_min",
            self.harga_min.map(|v| v.to_string()),
        );
        push(
            &mut params,
            "harga_max",
            self.harga_max.map(|v| v.to_string()),
        );
        push(
            &mut params,
            "tahun_min",
            self.tahun_min.map(|v| v.to_string()),
        );
        push(
            &mut params,
            "tahun_max",
            self.tahun_max.map(|v| v.to_string()),
        );
        push(&mut params, "transmisi", self.transmisi.clone());
        push(&mut params, "bahan_bakar", self.bahan_bakar.clone());
        push(
            &mut params,
            "kondisi",
            self.kondisi.map(|v| v.as_str().to_string()),
        );
        push(&mut params, "sort", self.sort.clone());
        push(&mut params, "page", self.page.map(|v| v.to_string()));
        params
    }
}

/// Filters for the stock-item listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StockFilters {
    pub mobil_id: Option<u64>,
    pub varian_id: Option<u64>,
    pub kondisi: Option<Kondisi>,
    pub status: Option<String>,
    pub min_harga_jual: Option<u64>,
    pub max_harga_jual: Option<u64>,
    pub merek_id: Option<u64>,
    pub kategori_id: Option<u64>,
    pub search: Option<String>,
    pub tahun: Option<String>,
    pub warna: Option<String>,
    pub sort: Option<String>,
    pub page: Option<u32>,
}

impl StockFilters {
    /// Renders the filter set as query parameters, omitting unset and
    /// empty values.
    pub fn query_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        push(&mut params, "mobil_id", self.mobil_id.map(|v| v.to_string()));
        push(
            &mut params,
            "varian_id",
            self.varian_id.map(|v| v.to_string()),
        );
        push(
            &mut params,
            "kondisi",
            self.kondisi.map(|v| v.as_str().to_string()),
        );
        push(&mut params, "status", self.status.clone());
        push(
            &mut params,
            "min_harga_jual",
            self.min_harga_jual.map(|v| v.to_string()),
        );
        push(
            &mut params,
            "max_harga_jual",
            self.max_harga_jual.map(|v| v.to_string()),
        );
        push(&mut params, "merek_id", self.merek_id.map(|v| v.to_string()));
        push(
            &mut params,
            "kategori_id",
            self.kategori_id.map(|v| v.to_string()),
        );
        push(&mut params, "search", self.search.clone());
        push(&mut params, "tahun", self.tahun.clone());
        push(&mut params, "warna", self.warna.clone());
        push(&mut params, "sort", self.sort.clone());
        push(&mut params, "page", self.page.map(|v| v.to_string()));
        params
    }
}

/// Public catalog parameters, translated into stock filters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogParams {
    pub page: Option<u32>,
    pub search: Option<String>,
    pub merek_id: Option<u64>,
    pub kategori_id: Option<u64>,
    pub mobil_id: Option<u64>,
    pub varian_id: Option<u64>,
    pub min_price: Option<u64>,
    pub max_price: Option<u64>,
    pub tahun: Option<String>,
    pub kondisi: Option<Kondisi>,
    pub sort_by: Option<SortBy>,
}

/// Price ceiling treated as "no upper bound" by the catalog.
const MAX_PRICE_UNBOUNDED: u64 = 1_000_000_000;

impl CatalogParams {
    /// Builds the stock filter set for the public catalog.
    ///
    /// Always pins `status=tersedia` so sold and reserved stock never
    /// appears, and drops a max price at or above the unbounded ceiling.
    pub fn into_filters(self) -> StockFilters {
        StockFilters {
            mobil_id: self.mobil_id,
            varian_id: self.varian_id,
            kondisi: self.kondisi,
            status: Some("tersedia".to_string()),
            min_harga_jual: self.min_price,
            max_harga_jual: self.max_price.filter(|&max| max < MAX_PRICE_UNBOUNDED),
            merek_id: self.merek_id,
            kategori_id: self.kategori_id,
            search: self.search,
            tahun: self.tahun,
            warna: None,
            sort: self.sort_by.map(|sort| sort.api_value().to_string()),
            page: self.page,
        }
    }
}

/// Article listing parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArticleParams {
    pub page: Option<u32>,
    pub status: Option<String>,
}

impl ArticleParams {
    pub fn query_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        push(&mut params, "page", self.page.map(|v| v.to_string()));
        push(&mut params, "status", self.status.clone());
        params
    }
}

/// Payload for creating an appointment.
///
/// `stok_mobil_id` serializes as an explicit `null` when unset, matching
/// the backend's validation rules.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewJanjiTemu {
    pub nama_pelanggan: String,
    pub email_pelanggan: String,
    pub telepon_pelanggan: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alamat_pelanggan: Option<String>,
    pub stok_mobil_id: Option<u64>,
    pub waktu_mulai: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub waktu_selesai: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub waktu_alternatif: Option<String>,
    pub jenis: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lokasi: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tujuan: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pesan_tambahan: Option<String>,
}

impl NewJanjiTemu {
    /// Validates the payload before submission.
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.nama_pelanggan.trim().is_empty() {
            return Some("Customer name cannot be empty".to_string());
        }
        if self.email_pelanggan.trim().is_empty() {
            return Some("Customer email cannot be empty".to_string());
        }
        if self.telepon_pelanggan.trim().is_empty() {
            return Some("Customer phone cannot be empty".to_string());
        }
        if self.waktu_mulai.trim().is_empty() {
            return Some("Start time cannot be empty".to_string());
        }
        if !matches!(self.jenis.as_str(), "test_drive" | "konsultasi" | "negosiasi") {
            return Some(format!("Unknown appointment type: {}", self.jenis));
        }
        None
    }
}
