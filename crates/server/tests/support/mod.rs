#![allow(dead_code)]

use std::net::{Ipv4Addr, SocketAddr};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use chrono::{Duration, TimeZone, Utc};
use configs::AdminConfig;
use models::listing::{Listing, ListingInsert, ListingPatch};
use server::routes::build_router;
use server::state::ServerState;
use service::errors::ServiceError;
use service::listings::ListingService;
use service::pagination::RowRange;
use service::storage::ObjectStorage;
use service::store::{AreaBounds, CountedPage, ListingStore, TextColumn};
use service::uploads::UploadService;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

/// In-memory listing store mimicking the hosted store's semantics:
/// newest-first ordering, exact counts, comparison filters that skip
/// NULL areas, case-insensitive substring text match.
#[derive(Default)]
pub struct InMemoryStore {
    rows: Mutex<Vec<Listing>>,
    seq: AtomicI64,
}

fn matched_window(matched: Vec<Listing>, range: RowRange) -> CountedPage {
    let count = matched.len() as u64;
    let mut rows = matched;
    rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    let page = rows
        .into_iter()
        .skip(range.from as usize)
        .take((range.to - range.from + 1) as usize)
        .collect();
    (page, count)
}

#[async_trait]
impl ListingStore for InMemoryStore {
    async fn select_by_area(
        &self,
        range: RowRange,
        bounds: AreaBounds,
    ) -> Result<CountedPage, ServiceError> {
        let matched = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| {
                if bounds.is_open() {
                    return true;
                }
                match r.area_py {
                    None => false,
                    Some(v) => {
                        bounds.min_py.map_or(true, |m| v >= m)
                            && bounds.max_py.map_or(true, |m| v <= m)
                    }
                }
            })
            .cloned()
            .collect();
        Ok(matched_window(matched, range))
    }

    async fn select_by_text(
        &self,
        column: TextColumn,
        term: &str,
        range: RowRange,
    ) -> Result<CountedPage, ServiceError> {
        let needle = term.to_lowercase();
        let matched = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| {
                let haystack = match column {
                    TextColumn::Title => Some(r.title.as_str()),
                    TextColumn::Address => r.address.as_deref(),
                };
                haystack.is_some_and(|h| h.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect();
        Ok(matched_window(matched, range))
    }

    async fn insert(&self, row: ListingInsert) -> Result<Listing, ServiceError> {
        let seq = self.seq.fetch_add(1, Ordering::SeqCst);
        let listing = Listing {
            id: Uuid::new_v4(),
            title: row.title,
            address: row.address,
            area_m2: row.area_m2,
            area_py: row.area_py,
            deposit: row.deposit,
            rent: row.rent,
            contact_phone: row.contact_phone,
            image_url: row.image_url,
            created_at: Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()
                + Duration::seconds(seq),
        };
        self.rows.lock().unwrap().push(listing.clone());
        Ok(listing)
    }

    async fn fetch(&self, id: Uuid) -> Result<Listing, ServiceError> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| ServiceError::not_found("listing"))
    }

    async fn update(&self, id: Uuid, patch: ListingPatch) -> Result<Listing, ServiceError> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| ServiceError::not_found("listing"))?;
        if let Some(title) = patch.title {
            row.title = title;
        }
        if let Some(address) = patch.address {
            row.address = Some(address);
        }
        if let Some(area_m2) = patch.area_m2 {
            row.area_m2 = Some(area_m2);
        }
        if let Some(area_py) = patch.area_py {
            row.area_py = Some(area_py);
        }
        if let Some(deposit) = patch.deposit {
            row.deposit = Some(deposit);
        }
        if let Some(rent) = patch.rent {
            row.rent = Some(rent);
        }
        if let Some(contact_phone) = patch.contact_phone {
            row.contact_phone = Some(contact_phone);
        }
        if let Some(image_url) = patch.image_url {
            row.image_url = Some(image_url);
        }
        Ok(row.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        self.rows.lock().unwrap().retain(|r| r.id != id);
        Ok(())
    }
}

/// Store that fails every call the way an unreachable upstream would.
pub struct FailingStore;

fn unavailable() -> ServiceError {
    ServiceError::Upstream {
        status: 503,
        message: "upstream unavailable".into(),
    }
}

#[async_trait]
impl ListingStore for FailingStore {
    async fn select_by_area(
        &self,
        _range: RowRange,
        _bounds: AreaBounds,
    ) -> Result<CountedPage, ServiceError> {
        Err(unavailable())
    }

    async fn select_by_text(
        &self,
        _column: TextColumn,
        _term: &str,
        _range: RowRange,
    ) -> Result<CountedPage, ServiceError> {
        Err(unavailable())
    }

    async fn insert(&self, _row: ListingInsert) -> Result<Listing, ServiceError> {
        Err(unavailable())
    }

    async fn fetch(&self, _id: Uuid) -> Result<Listing, ServiceError> {
        Err(unavailable())
    }

    async fn update(&self, _id: Uuid, _patch: ListingPatch) -> Result<Listing, ServiceError> {
        Err(unavailable())
    }

    async fn delete(&self, _id: Uuid) -> Result<(), ServiceError> {
        Err(unavailable())
    }
}

/// Object storage double that keeps uploads in memory.
#[derive(Default)]
pub struct MemoryStorage {
    pub puts: Mutex<Vec<(String, String, usize)>>,
}

#[async_trait]
impl ObjectStorage for MemoryStorage {
    async fn put(
        &self,
        key: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<(), ServiceError> {
        self.puts
            .lock()
            .unwrap()
            .push((key.to_string(), content_type.to_string(), bytes.len()));
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!("https://cdn.test/{key}")
    }
}

pub struct TestApp {
    pub base_url: String,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

pub fn admin_creds() -> AdminConfig {
    AdminConfig {
        user: "admin".into(),
        pass: "secret".into(),
    }
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(Arc::new(InMemoryStore::default()), admin_creds()).await
}

pub async fn spawn_app_with(store: Arc<dyn ListingStore>, admin: AdminConfig) -> TestApp {
    let state = ServerState {
        listings: ListingService::new(store),
        uploads: UploadService::new(Arc::new(MemoryStorage::default())),
        admin,
    };
    let app: Router = build_router(state, CorsLayer::very_permissive());

    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            eprintln!("test server error: {e}");
        }
    });

    TestApp {
        base_url: format!("http://{addr}"),
    }
}
