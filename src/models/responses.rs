//! Domain entities returned by the dealership API
//!
//! Field names mirror the backend's wire format exactly so every type
//! round-trips through serde without rename maps.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Standard paginated envelope wrapping list endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub current_page: u32,
    #[serde(default)]
    pub last_page: u32,
    #[serde(default)]
    pub per_page: u32,
    #[serde(default)]
    pub total: u64,
}

/// Car brand.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Merek {
    pub id: u64,
    pub nama: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub negara_asal: Option<String>,
    #[serde(default)]
    pub deskripsi: Option<String>,
    #[serde(default)]
    pub tahun_berdiri: Option<u16>,
    #[serde(default)]
    pub aktif: Option<bool>,
}

/// Car category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Kategori {
    pub id: u64,
    pub nama: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub deskripsi: Option<String>,
    #[serde(default)]
    pub ikon: Option<String>,
    #[serde(default)]
    pub urutan_tampil: Option<u32>,
    #[serde(default)]
    pub unggulan: Option<bool>,
}

/// Car model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Mobil {
    pub id: u64,
    pub nama: String,
    #[serde(default)]
    pub slug: Option<String>,
    pub merek_id: u64,
    pub kategori_id: u64,
    #[serde(default)]
    pub tahun_mulai: Option<u16>,
    #[serde(default)]
    pub tahun_akhir: Option<u16>,
    #[serde(default)]
    pub kapasitas_penumpang: Option<u8>,
    #[serde(default)]
    pub tipe_bodi: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub deskripsi: Option<String>,
    #[serde(default)]
    pub fitur_unggulan: Option<String>,
    #[serde(default)]
    pub merek: Option<Merek>,
    #[serde(default)]
    pub kategori: Option<Kategori>,
    #[serde(default)]
    pub foto_mobils: Option<Vec<FotoMobil>>,
}

/// Car variant with drivetrain details.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Varian {
    pub id: u64,
    pub mobil_id: u64,
    pub nama: String,
    #[serde(default)]
    pub kode: Option<String>,
    #[serde(default)]
    pub deskripsi: Option<String>,
    #[serde(default)]
    pub harga_otr: Option<u64>,
    #[serde(default)]
    pub tipe_mesin: Option<String>,
    #[serde(default)]
    pub kapasitas_mesin_cc: Option<u32>,
    #[serde(default)]
    pub transmisi: Option<String>,
    #[serde(default)]
    pub daya_hp: Option<u32>,
    #[serde(default)]
    pub jenis_bahan_bakar: Option<String>,
    #[serde(default)]
    pub aktif: Option<bool>,
}

/// A physical car in stock.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StokMobil {
    pub id: u64,
    pub mobil_id: u64,
    #[serde(default)]
    pub varian_id: Option<u64>,
    #[serde(default)]
    pub warna: Option<String>,
    #[serde(default)]
    pub tahun: Option<u16>,
    #[serde(default)]
    pub kilometer: Option<u64>,
    #[serde(default)]
    pub kondisi: Option<String>,
    pub status: String,
    pub harga_jual: u64,
    #[serde(default)]
    pub lokasi: Option<String>,
    #[serde(default)]
    pub catatan: Option<String>,
    #[serde(default)]
    pub kelengkapan: Option<Vec<String>>,
    #[serde(default)]
    pub mobil: Option<Mobil>,
    #[serde(default)]
    pub varian: Option<Varian>,
}

/// Car photo.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FotoMobil {
    pub id: u64,
    pub mobil_id: u64,
    pub path_file: String,
    #[serde(default)]
    pub jenis_gambar: Option<String>,
    #[serde(default)]
    pub urutan_tampil: Option<u32>,
    #[serde(default)]
    pub teks_alternatif: Option<String>,
    #[serde(default)]
    pub keterangan: Option<String>,
}

/// Service history record of a stock item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RiwayatServis {
    pub id: u64,
    pub stok_mobil_id: u64,
    pub tanggal_servis: String,
    pub jenis_servis: String,
    #[serde(default)]
    pub tempat_servis: Option<String>,
    #[serde(default)]
    pub deskripsi: Option<String>,
    #[serde(default)]
    pub biaya: Option<u64>,
    #[serde(default)]
    pub kilometer_servis: Option<u64>,
}

/// Customer appointment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JanjiTemu {
    pub id: u64,
    pub nama_pelanggan: String,
    pub email_pelanggan: String,
    pub telepon_pelanggan: String,
    #[serde(default)]
    pub alamat_pelanggan: Option<String>,
    #[serde(default)]
    pub stok_mobil_id: Option<u64>,
    pub waktu_mulai: String,
    #[serde(default)]
    pub waktu_selesai: Option<String>,
    #[serde(default)]
    pub waktu_alternatif: Option<String>,
    pub jenis: String,
    #[serde(default)]
    pub metode: Option<String>,
    #[serde(default)]
    pub lokasi: Option<String>,
    #[serde(default)]
    pub tujuan: Option<String>,
    #[serde(default)]
    pub pesan_tambahan: Option<String>,
    pub status: String,
    #[serde(default)]
    pub tanggal_request: Option<String>,
}

/// Marketing article.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Article {
    pub id: u64,
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub featured_image: Option<String>,
    #[serde(default)]
    pub featured_image_url: Option<String>,
    pub status: String,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Homepage hero content.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Homepage {
    pub id: u64,
    #[serde(default)]
    pub foto_homepage: Option<Vec<String>>,
    #[serde(default)]
    pub pelanggan_puas: Option<String>,
    #[serde(default)]
    pub rating_puas: Option<String>,
    #[serde(default)]
    pub extra: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_paginated_deserialize() {
        let body = json!({
            "data": [{"id": 1, "nama": "Toyota"}],
            "current_page": 1,
            "last_page": 3,
            "per_page": 15,
            "total": 42
        });

        let page: Paginated<Merek> = serde_json::from_value(body).unwrap();
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.data[0].nama, "Toyota");
        assert_eq!(page.total, 42);
    }

    #[test]
    fn test_paginated_defaults_missing_meta() {
        let body = json!({"data": []});
        let page: Paginated<Merek> = serde_json::from_value(body).unwrap();
        assert_eq!(page.current_page, 0);
        assert!(page.data.is_empty());
    }

    #[test]
    fn test_stok_mobil_with_relations() {
        let body = json!({
            "id": 7,
            "mobil_id": 3,
            "warna": "Hitam",
            "kondisi": "bekas",
            "status": "tersedia",
            "harga_jual": 215_000_000u64,
            "mobil": {
                "id": 3,
                "nama": "Avanza",
                "merek_id": 1,
                "kategori_id": 2
            }
        });

        let stok: StokMobil = serde_json::from_value(body).unwrap();
        assert_eq!(stok.status, "tersedia");
        assert_eq!(stok.mobil.unwrap().nama, "Avanza");
        assert!(stok.varian.is_none());
    }

    #[test]
    fn test_janji_temu_deserialize() {
        let body = json!({
            "id": 1,
            "nama_pelanggan": "Budi",
            "email_pelanggan": "budi@example.com",
            "telepon_pelanggan": "0812345678",
            "waktu_mulai": "2024-06-01T10:00:00Z",
            "jenis": "test_drive",
            "status": "pending"
        });

        let janji: JanjiTemu = serde_json::from_value(body).unwrap();
        assert_eq!(janji.jenis, "test_drive");
        assert!(janji.stok_mobil_id.is_none());
    }

    #[test]
    fn test_article_deserialize() {
        let body = json!({
            "id": 5,
            "title": "Tips Merawat Mobil",
            "slug": "tips-merawat-mobil",
            "status": "published",
            "published_at": "2024-05-01T00:00:00Z"
        });

        let article: Article = serde_json::from_value(body).unwrap();
        assert_eq!(article.slug, "tips-merawat-mobil");
        assert!(article.excerpt.is_none());
    }
}
