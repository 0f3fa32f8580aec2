use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::errors::{KopiError, Result};

/// 目录集合种类
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display, EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum CatalogKind {
    Beans,
    Techniques,
    Tools,
    Glossary,
}

impl CatalogKind {
    /// 存储中的集合键
    pub fn collection(self) -> &'static str {
        match self {
            CatalogKind::Beans => "coffee-beans",
            CatalogKind::Techniques => "brewing-techniques",
            CatalogKind::Tools => "barista-tools",
            CatalogKind::Glossary => "coffee-glossary",
        }
    }

    /// 新条目 id 前缀
    pub fn id_prefix(self) -> &'static str {
        match self {
            CatalogKind::Beans => "bean",
            CatalogKind::Techniques => "technique",
            CatalogKind::Tools => "tool",
            CatalogKind::Glossary => "term",
        }
    }

    /// 导入/导出 JSON 中数组所在的键
    pub fn export_key(self) -> &'static str {
        match self {
            CatalogKind::Beans => "beans",
            CatalogKind::Techniques => "techniques",
            CatalogKind::Tools => "tools",
            CatalogKind::Glossary => "terms",
        }
    }

    /// 内置种子文件名，同时用作导出文件名
    pub fn seed_file(self) -> &'static str {
        match self {
            CatalogKind::Beans => "coffee-beans.json",
            CatalogKind::Techniques => "brewing-techniques.json",
            CatalogKind::Tools => "barista-tools.json",
            CatalogKind::Glossary => "glossary.json",
        }
    }
}

/// 目录条目的公共行为
pub trait CatalogItem:
    Serialize + DeserializeOwned + Clone + Send + Sync + std::fmt::Debug + 'static
{
    const KIND: CatalogKind;

    fn id(&self) -> &str;

    fn set_id(&mut self, id: String);

    /// 显示名称（name 或 term）
    fn title(&self) -> &str;

    /// 参与搜索的文本字段
    fn search_fields(&self) -> Vec<&str>;

    /// 大小写不敏感的子串匹配，needle 需已小写
    fn matches(&self, needle: &str) -> bool {
        needle.is_empty()
            || self
                .search_fields()
                .iter()
                .any(|f| f.to_lowercase().contains(needle))
    }

    /// 为 true 时列表按 title 排序，否则保持插入顺序
    fn sorted_by_title() -> bool {
        false
    }

    fn validate(&self) -> Result<()> {
        if self.title().trim().is_empty() {
            return Err(KopiError::validation(match Self::KIND {
                CatalogKind::Glossary => "Istilah tidak boleh kosong.",
                _ => "Nama tidak boleh kosong.",
            }));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bean {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub origin: String,
    #[serde(rename = "type", default)]
    pub bean_type: String,
    #[serde(default)]
    pub flavor: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub image_hint: String,
}

impl CatalogItem for Bean {
    const KIND: CatalogKind = CatalogKind::Beans;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn title(&self) -> &str {
        &self.name
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![
            &self.name,
            &self.origin,
            &self.bean_type,
            &self.flavor,
            &self.description,
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Technique {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub image_hint: String,
}

impl CatalogItem for Technique {
    const KIND: CatalogKind = CatalogKind::Techniques;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn title(&self) -> &str {
        &self.name
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![&self.name, &self.description]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub image_hint: String,
}

impl CatalogItem for Tool {
    const KIND: CatalogKind = CatalogKind::Tools;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn title(&self) -> &str {
        &self.name
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![&self.name, &self.description]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlossaryTerm {
    #[serde(default)]
    pub id: String,
    pub term: String,
    #[serde(default)]
    pub definition: String,
}

impl CatalogItem for GlossaryTerm {
    const KIND: CatalogKind = CatalogKind::Glossary;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn title(&self) -> &str {
        &self.term
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![&self.term, &self.definition]
    }

    fn sorted_by_title() -> bool {
        true
    }

    fn validate(&self) -> Result<()> {
        if self.term.trim().is_empty() {
            return Err(KopiError::validation("Istilah tidak boleh kosong."));
        }
        if self.definition.trim().is_empty() {
            return Err(KopiError::validation("Definisi tidak boleh kosong."));
        }
        Ok(())
    }
}

/// 用户角色
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, EnumString, Display, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Role {
    #[default]
    User,
    Admin,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// 一条材料完成记录（保留最高分与首次完成时间）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialCompletion {
    pub user_id: String,
    pub material_id: String,
    pub score: f64,
    pub completed_at: DateTime<Utc>,
}

/// 存储统计
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageStats {
    pub beans: u64,
    pub techniques: u64,
    pub tools: u64,
    pub glossary: u64,
    pub users: u64,
    pub completions: u64,
}
