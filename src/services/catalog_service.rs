//! Catalog management service
//!
//! One generic service drives the four catalog collections (beans, brewing
//! techniques, barista tools, glossary). Shared by the HTTP handlers and the CLI.

use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::errors::{KopiError, Result};
use crate::seed;
use crate::storage::{CatalogItem, GlossaryTerm, SeaOrmStorage};
use crate::utils::{generate_item_id, generate_item_id_with_suffix};

/// 新建条目时 id 冲突的最大重试次数
const MAX_ID_ATTEMPTS: usize = 4;

// ============ Request/Response DTOs ============

/// List query (`?search=&page=&page_size=`)
#[derive(Debug, Clone, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_page_size")]
    pub page_size: u64,
}

fn default_page() -> u64 {
    1
}

fn default_page_size() -> u64 {
    20
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            search: None,
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

/// One page of catalog records
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
    pub total_pages: u64,
}

/// Import conflict resolution mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportMode {
    /// Keep the stored record
    #[default]
    Skip,
    /// Replace the stored record
    Overwrite,
    /// Count the record as failed
    Error,
}

/// Result of an import
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportResult {
    pub success: usize,
    pub skipped: usize,
    pub failed: usize,
    pub errors: Vec<ImportError>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportError {
    /// Position in the imported array
    pub index: usize,
    pub id: Option<String>,
    pub message: String,
}

/// Glossary terms sharing a first letter
#[derive(Debug, Clone, Serialize)]
pub struct GlossaryGroup {
    pub letter: String,
    pub terms: Vec<GlossaryTerm>,
}

// ============ CatalogService Implementation ============

pub struct CatalogService<T: CatalogItem> {
    storage: Arc<SeaOrmStorage>,
    _item: PhantomData<fn() -> T>,
}

impl<T: CatalogItem> Clone for CatalogService<T> {
    fn clone(&self) -> Self {
        Self {
            storage: self.storage.clone(),
            _item: PhantomData,
        }
    }
}

impl<T: CatalogItem> CatalogService<T> {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self {
            storage,
            _item: PhantomData,
        }
    }

    fn sort(items: &mut [T]) {
        if T::sorted_by_title() {
            items.sort_by_cached_key(|item| item.title().to_lowercase());
        }
    }

    /// 全部条目；读取失败时退回内置种子数据
    pub async fn all(&self) -> Vec<T> {
        let mut items = match self.storage.list_items::<T>().await {
            Ok(items) => items,
            Err(e) => {
                warn!(
                    "Failed to read {} from storage, serving seed data: {}",
                    T::KIND,
                    e
                );
                seed::catalog_seed::<T>().unwrap_or_else(|e| {
                    warn!("Seed data for {} unavailable: {}", T::KIND, e);
                    Vec::new()
                })
            }
        };
        Self::sort(&mut items);
        items
    }

    /// 全部匹配搜索词的条目（大小写不敏感）
    pub async fn search(&self, search: Option<&str>) -> Vec<T> {
        let needle = search.map(|s| s.trim().to_lowercase()).unwrap_or_default();
        let mut items = self.all().await;
        items.retain(|item| item.matches(&needle));
        items
    }

    pub async fn list(&self, query: &ListQuery) -> Page<T> {
        let page = query.page.max(1);
        let page_size = query.page_size.clamp(1, 100);

        let items = self.search(query.search.as_deref()).await;
        let total = items.len() as u64;
        let offset = usize::try_from((page - 1).saturating_mul(page_size)).unwrap_or(usize::MAX);
        let items = items
            .into_iter()
            .skip(offset)
            .take(page_size as usize)
            .collect();

        Page {
            items,
            total,
            page,
            page_size,
            total_pages: total.div_ceil(page_size),
        }
    }

    pub async fn get(&self, id: &str) -> Result<T> {
        self.storage
            .get_item::<T>(id)
            .await?
            .ok_or_else(|| KopiError::not_found(format!("{} '{}' tidak ditemukan", T::KIND, id)))
    }

    /// 新建条目，id 由服务端生成（`<prefix>-<unix millis>`）
    pub async fn create(&self, mut draft: T) -> Result<T> {
        draft.validate()?;

        for attempt in 0..MAX_ID_ATTEMPTS {
            let prefix = T::KIND.id_prefix();
            draft.set_id(if attempt == 0 {
                generate_item_id(prefix)
            } else {
                generate_item_id_with_suffix(prefix)
            });

            match self.storage.insert_item(&draft).await {
                Ok(()) => {
                    info!("CatalogService: created {} '{}'", T::KIND, draft.id());
                    return Ok(draft);
                }
                Err(KopiError::Conflict(_)) => continue,
                Err(e) => return Err(e),
            }
        }

        Err(KopiError::conflict(format!(
            "could not allocate a unique {} id",
            T::KIND
        )))
    }

    /// 替换条目字段，id 不变
    pub async fn update(&self, id: &str, mut draft: T) -> Result<T> {
        draft.validate()?;
        if !self.storage.item_exists(T::KIND, id).await? {
            return Err(KopiError::not_found(format!(
                "{} '{}' tidak ditemukan",
                T::KIND,
                id
            )));
        }

        draft.set_id(id.to_string());
        self.storage.upsert_item(&draft).await?;
        info!("CatalogService: updated {} '{}'", T::KIND, id);
        Ok(draft)
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.storage.remove_item(T::KIND, id).await?;
        info!("CatalogService: deleted {} '{}'", T::KIND, id);
        Ok(())
    }

    /// 复制条目，字段不变，分配新 id
    pub async fn duplicate(&self, id: &str) -> Result<T> {
        let original = self.get(id).await?;
        self.create(original).await
    }

    /// `{"<export key>": [...]}`
    pub async fn export(&self) -> Result<Value> {
        let items = self.storage.list_items::<T>().await?;
        let mut doc = serde_json::Map::new();
        doc.insert(T::KIND.export_key().to_string(), serde_json::to_value(items)?);
        Ok(Value::Object(doc))
    }

    pub async fn export_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.export().await?)?)
    }

    /// 解析导入文本后调用 `import_value`
    pub async fn import_str(&self, raw: &str, mode: ImportMode) -> Result<ImportResult> {
        let doc: Value = serde_json::from_str(raw)
            .map_err(|_| KopiError::serialization("Failed to parse JSON file."))?;
        self.import_value(&doc, mode).await
    }

    /// 将导入数组中的条目追加到集合
    pub async fn import_value(&self, doc: &Value, mode: ImportMode) -> Result<ImportResult> {
        let key = T::KIND.export_key();
        let entries = seed::extract_array(doc, key).ok_or_else(|| {
            KopiError::validation(format!(
                "Invalid JSON format. Expected an object with a \"{}\" array.",
                key
            ))
        })?;

        let mut result = ImportResult::default();

        for (index, entry) in entries.into_iter().enumerate() {
            let mut item: T = match serde_json::from_value(entry) {
                Ok(item) => item,
                Err(e) => {
                    result.failed += 1;
                    result.errors.push(ImportError {
                        index,
                        id: None,
                        message: e.to_string(),
                    });
                    continue;
                }
            };

            if let Err(e) = item.validate() {
                result.failed += 1;
                result.errors.push(ImportError {
                    index,
                    id: Some(item.id().to_string()).filter(|s| !s.is_empty()),
                    message: e.message().to_string(),
                });
                continue;
            }

            if item.id().trim().is_empty() {
                item.set_id(generate_item_id_with_suffix(T::KIND.id_prefix()));
            }

            if self.storage.item_exists(T::KIND, item.id()).await? {
                match mode {
                    ImportMode::Skip => {
                        result.skipped += 1;
                        continue;
                    }
                    ImportMode::Error => {
                        result.failed += 1;
                        result.errors.push(ImportError {
                            index,
                            id: Some(item.id().to_string()),
                            message: "Already exists".to_string(),
                        });
                        continue;
                    }
                    ImportMode::Overwrite => {}
                }
            }

            self.storage.upsert_item(&item).await?;
            result.success += 1;
        }

        info!(
            "CatalogService: imported {} (success={}, skipped={}, failed={})",
            T::KIND,
            result.success,
            result.skipped,
            result.failed
        );
        Ok(result)
    }

    /// 用内置种子数据替换集合
    pub async fn reset_to_seed(&self) -> Result<usize> {
        let items = seed::catalog_seed::<T>()?;
        self.storage.replace_collection(&items).await?;
        info!("CatalogService: {} reset to {} seed entries", T::KIND, items.len());
        Ok(items.len())
    }

    /// 集合为空时写入种子数据，返回写入条数
    pub async fn seed_if_empty(&self) -> Result<usize> {
        if self.storage.count_items(T::KIND).await? > 0 {
            return Ok(0);
        }
        self.reset_to_seed().await
    }

    pub async fn count(&self) -> Result<u64> {
        self.storage.count_items(T::KIND).await
    }
}

impl CatalogService<GlossaryTerm> {
    /// 按首字母（大写）分组，组按字母排序，组内按词条排序
    pub async fn grouped(&self, search: Option<&str>) -> Vec<GlossaryGroup> {
        group_terms(self.search(search).await)
    }
}

pub fn group_terms(terms: Vec<GlossaryTerm>) -> Vec<GlossaryGroup> {
    let mut groups: BTreeMap<String, Vec<GlossaryTerm>> = BTreeMap::new();
    for term in terms {
        let letter = term
            .term
            .trim()
            .chars()
            .next()
            .map(|c| c.to_uppercase().collect::<String>())
            .unwrap_or_else(|| "#".to_string());
        groups.entry(letter).or_default().push(term);
    }

    groups
        .into_iter()
        .map(|(letter, mut terms)| {
            terms.sort_by_cached_key(|t| t.term.to_lowercase());
            GlossaryGroup { letter, terms }
        })
        .collect()
}
