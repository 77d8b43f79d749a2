//! In-memory catalog used by view-model and app tests.

#![allow(dead_code)]

use dextui::error::CatalogError;
use dextui::fetch::Catalog;
use dextui::models::{Detail, NamedResource, Page, Sprites, Stat, Summary, TypeSlot};
use std::collections::HashSet;
use std::sync::Mutex;

pub struct FakeCatalog {
    names: Vec<String>,
    failing_offsets: Mutex<HashSet<usize>>,
    failing_ids: Mutex<HashSet<u32>>,
    // ids whose detail comes back with a different id
    mismatched_ids: Mutex<HashSet<u32>>,
    page_calls: Mutex<Vec<(usize, usize)>>,
    sprite_calls: Mutex<Vec<String>>,
}

impl FakeCatalog {
    pub fn new(names: &[&str]) -> Self {
        Self {
            names: names.iter().map(|n| n.to_string()).collect(),
            failing_offsets: Mutex::new(HashSet::new()),
            failing_ids: Mutex::new(HashSet::new()),
            mismatched_ids: Mutex::new(HashSet::new()),
            page_calls: Mutex::new(Vec::new()),
            sprite_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn fail_page_at(&self, offset: usize) {
        self.failing_offsets.lock().unwrap().insert(offset);
    }

    pub fn fail_detail(&self, id: u32) {
        self.failing_ids.lock().unwrap().insert(id);
    }

    pub fn mismatch_detail(&self, id: u32) {
        self.mismatched_ids.lock().unwrap().insert(id);
    }

    pub fn page_calls(&self) -> Vec<(usize, usize)> {
        self.page_calls.lock().unwrap().clone()
    }

    pub fn sprite_calls(&self) -> Vec<String> {
        self.sprite_calls.lock().unwrap().clone()
    }

    fn detail_for(&self, id: u32) -> Option<Detail> {
        let name = self.names.get(id.checked_sub(1)? as usize)?;
        Some(detail(id, name))
    }
}

pub fn decode_error() -> CatalogError {
    CatalogError::Decode {
        url: "fake://".to_string(),
        source: serde_json::from_str::<u32>("not json").unwrap_err(),
    }
}

pub fn summary(id: u32, name: &str) -> Summary {
    Summary {
        id,
        name: name.to_string(),
        url: format!("fake://pokemon/{}", id),
        image: Some(format!("fake://sprites/{}.png", id)),
    }
}

pub fn detail(id: u32, name: &str) -> Detail {
    let mut sprites = Sprites::default();
    sprites.front_default = Some(format!("fake://sprites/{}.png", id));
    Detail {
        id,
        name: name.to_string(),
        height: 7,
        weight: 69,
        base_experience: Some(64),
        sprites,
        types: vec![TypeSlot {
            slot: 1,
            kind: NamedResource {
                name: "grass".to_string(),
                url: String::new(),
            },
        }],
        stats: vec![Stat {
            base_stat: 45,
            effort: 0,
            stat: NamedResource {
                name: "hp".to_string(),
                url: String::new(),
            },
        }],
        ..Detail::default()
    }
}

pub fn png_bytes() -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(4, 4, image::Rgba([0, 128, 0, 255]));
    let mut out = std::io::Cursor::new(Vec::new());
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut out, image::ImageOutputFormat::Png)
        .unwrap();
    out.into_inner()
}

impl Catalog for FakeCatalog {
    async fn fetch_page(&self, offset: usize, limit: usize) -> Result<Page, CatalogError> {
        self.page_calls.lock().unwrap().push((offset, limit));
        if self.failing_offsets.lock().unwrap().contains(&offset) {
            return Err(decode_error());
        }
        let end = (offset + limit).min(self.names.len());
        let start = offset.min(end);
        Ok(Page::complete(
            self.names[start..end]
                .iter()
                .enumerate()
                .map(|(i, n)| summary((start + i + 1) as u32, n))
                .collect(),
        ))
    }

    async fn fetch_by_id(&self, id: u32) -> Result<Detail, CatalogError> {
        if self.failing_ids.lock().unwrap().contains(&id) {
            return Err(decode_error());
        }
        let mut detail = self.detail_for(id).ok_or_else(decode_error)?;
        if self.mismatched_ids.lock().unwrap().contains(&id) {
            detail.id = 0;
        }
        Ok(detail)
    }

    async fn fetch_by_name(&self, name: &str) -> Result<Detail, CatalogError> {
        let name = name.to_lowercase();
        let idx = self
            .names
            .iter()
            .position(|n| *n == name)
            .ok_or_else(decode_error)?;
        self.detail_for(idx as u32 + 1).ok_or_else(decode_error)
    }

    async fn fetch_sprite(&self, url: &str) -> Result<Vec<u8>, CatalogError> {
        self.sprite_calls.lock().unwrap().push(url.to_string());
        Ok(png_bytes())
    }
}
