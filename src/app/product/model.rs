//! 产品数据模型

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub category: String,
    pub in_stock: bool,
}

impl Product {
    /// 启动时写入的三条示例产品
    pub fn seed() -> Vec<Product> {
        vec![
            Product {
                id: "1".to_string(),
                name: "Laptop".to_string(),
                description: Some("High-performance laptop with 16GB RAM".to_string()),
                price: 1200.0,
                category: "electronics".to_string(),
                in_stock: true,
            },
            Product {
                id: "2".to_string(),
                name: "Smartphone".to_string(),
                description: Some("Latest model with 128GB storage".to_string()),
                price: 800.0,
                category: "electronics".to_string(),
                in_stock: true,
            },
            Product {
                id: "3".to_string(),
                name: "Coffee Maker".to_string(),
                description: Some("Programmable coffee maker with timer".to_string()),
                price: 50.0,
                category: "kitchen".to_string(),
                in_stock: false,
            },
        ]
    }

    pub fn in_category(&self, category: &str) -> bool {
        self.category.to_lowercase() == category.to_lowercase()
    }

    /// 应用已校验的部分更新，未出现的字段保持不变
    pub fn apply(&mut self, patch: ProductPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = Some(description);
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(in_stock) = patch.in_stock {
            self.in_stock = in_stock;
        }
    }
}

/// 创建产品请求
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    #[validate(required, length(min = 1))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(required, range(exclusive_min = 0.0))]
    pub price: Option<f64>,
    #[validate(required, length(min = 1))]
    pub category: Option<String>,
    pub in_stock: Option<bool>,
}

/// 更新产品请求，字段出现即生效
#[derive(Debug, Default, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    #[validate(length(min = 1))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(range(exclusive_min = 0.0))]
    pub price: Option<f64>,
    #[validate(length(min = 1))]
    pub category: Option<String>,
    pub in_stock: Option<bool>,
}

/// 原始查询串的键值对，同名参数按出现顺序保留
pub type QueryPairs = Vec<(String, String)>;

fn first_value(pairs: &[(String, String)], key: &str) -> Option<String> {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.clone())
}

/// 列表查询参数，数字字段按字符串接收以便容忍非法输入
#[derive(Debug, Default)]
pub struct ListQuery {
    pub category: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl ListQuery {
    /// 重复参数取第一个值
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        Self {
            category: first_value(pairs, "category"),
            page: first_value(pairs, "page"),
            limit: first_value(pairs, "limit"),
        }
    }
}

#[derive(Debug, Default)]
pub struct SearchQuery {
    pub name: Option<String>,
}

impl SearchQuery {
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        Self {
            name: first_value(pairs, "name"),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPage {
    pub page: i64,
    pub total_products: usize,
    pub products: Vec<Product>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogStats {
    pub total_products: usize,
    pub stats: BTreeMap<String, usize>,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: &'static str,
    pub deleted: Vec<Product>,
}
