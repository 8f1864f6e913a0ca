//! 产品业务服务

use std::collections::BTreeMap;

use tracing::{debug, info};
use uuid::Uuid;
use validator::Validate;

use super::{
    model::{CatalogStats, CreateProductRequest, ListQuery, Product, ProductPage, ProductPatch},
    store::CatalogStore,
};
use crate::core::error::CoreError;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 2;

const REQUIRED_FIELDS_MESSAGE: &str = "Name, price, and category are required";
const SEARCH_NAME_MESSAGE: &str = "Please provide a name to search";

/// 读取字符串开头的整数：跳过前导空白，可带正负号，`0x` 前缀按十六进制，
/// 遇到第一个非数字字符即停止，溢出时饱和
pub fn leading_int(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, s) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let (radix, digits) = match s.get(..2) {
        Some("0x") | Some("0X") => (16, &s[2..]),
        _ => (10, s),
    };

    let mut value: Option<i64> = None;
    for digit in digits.chars().map_while(|c| c.to_digit(radix)) {
        let acc = value.unwrap_or(0);
        let step = i64::from(digit);
        value = Some(if negative {
            acc.saturating_mul(i64::from(radix)).saturating_sub(step)
        } else {
            acc.saturating_mul(i64::from(radix)).saturating_add(step)
        });
    }
    value
}

/// 无法读出整数或结果为 0 时回退到默认值，负数原样保留
pub fn parse_or_default(raw: Option<&str>, default: i64) -> i64 {
    match raw.and_then(leading_int) {
        Some(0) | None => default,
        Some(value) => value,
    }
}

/// 计算 `[(page-1)*limit, page*limit)` 并截断到 `[0, len]`
pub fn page_bounds(page: i64, limit: i64, len: usize) -> (usize, usize) {
    let clamp = |index: i64| index.clamp(0, len as i64) as usize;
    let start = clamp(page.saturating_sub(1).saturating_mul(limit));
    let end = clamp(page.saturating_mul(limit));
    (start, end.max(start))
}

/// 只用于校验的去空白副本，存储时保留原值
fn trimmed(value: &Option<String>) -> Option<String> {
    value.as_deref().map(|s| s.trim().to_string())
}

#[derive(Clone)]
pub struct ProductService {
    store: CatalogStore,
}

impl ProductService {
    pub fn new(store: CatalogStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &CatalogStore {
        &self.store
    }

    /// 先按分类过滤，再分页
    pub fn list(&self, query: &ListQuery) -> Result<ProductPage, CoreError> {
        let mut filtered = self.store.snapshot()?;
        if let Some(category) = query.category.as_deref().filter(|c| !c.is_empty()) {
            filtered.retain(|p| p.in_category(category));
        }

        let page = parse_or_default(query.page.as_deref(), DEFAULT_PAGE);
        let limit = parse_or_default(query.limit.as_deref(), DEFAULT_LIMIT);
        let total_products = filtered.len();
        let (start, end) = page_bounds(page, limit, total_products);
        debug!(page, limit, start, end, total_products, "分页产品列表");

        let products = filtered.drain(start..end).collect();
        Ok(ProductPage {
            page,
            total_products,
            products,
        })
    }

    pub fn search(&self, name: Option<&str>) -> Result<Vec<Product>, CoreError> {
        let needle = match name {
            Some(name) if !name.is_empty() => name.to_lowercase(),
            _ => return Err(CoreError::BadRequest(SEARCH_NAME_MESSAGE.to_string())),
        };

        let mut products = self.store.snapshot()?;
        products.retain(|p| p.name.to_lowercase().contains(&needle));
        Ok(products)
    }

    /// 按小写分类统计数量
    pub fn stats(&self) -> Result<CatalogStats, CoreError> {
        let products = self.store.snapshot()?;
        let mut stats = BTreeMap::new();
        for product in &products {
            *stats.entry(product.category.to_lowercase()).or_insert(0) += 1;
        }

        Ok(CatalogStats {
            total_products: products.len(),
            stats,
        })
    }

    pub fn get(&self, id: &str) -> Result<Product, CoreError> {
        self.store
            .find(id)?
            .ok_or_else(|| CoreError::NotFound("Product can't be found".to_string()))
    }

    pub fn create(&self, request: CreateProductRequest) -> Result<Product, CoreError> {
        CreateProductRequest {
            name: trimmed(&request.name),
            description: None,
            price: request.price,
            category: trimmed(&request.category),
            in_stock: request.in_stock,
        }
        .validate()
        .map_err(|_| CoreError::BadRequest(REQUIRED_FIELDS_MESSAGE.to_string()))?;

        let (Some(name), Some(price), Some(category)) =
            (request.name, request.price, request.category)
        else {
            return Err(CoreError::BadRequest(REQUIRED_FIELDS_MESSAGE.to_string()));
        };

        let product = Product {
            id: Uuid::new_v4().to_string(),
            name,
            description: request.description,
            price,
            category,
            in_stock: request.in_stock.unwrap_or(true),
        };

        self.store.insert(product.clone())?;
        info!(id = %product.id, name = %product.name, "产品已创建");
        Ok(product)
    }

    pub fn update(&self, id: &str, patch: ProductPatch) -> Result<Product, CoreError> {
        ProductPatch {
            name: trimmed(&patch.name),
            description: None,
            price: patch.price,
            category: trimmed(&patch.category),
            in_stock: patch.in_stock,
        }
        .validate()
        .map_err(|errors| CoreError::BadRequest(patch_error_message(&errors)))?;

        let product = self
            .store
            .update(id, patch)?
            .ok_or_else(|| CoreError::NotFound("Product not found".to_string()))?;
        info!(id = %product.id, "产品已更新");
        Ok(product)
    }

    pub fn delete(&self, id: &str) -> Result<Product, CoreError> {
        let product = self
            .store
            .remove(id)?
            .ok_or_else(|| CoreError::NotFound("Product not found".to_string()))?;
        info!(id = %product.id, "产品已删除");
        Ok(product)
    }
}

fn patch_error_message(errors: &validator::ValidationErrors) -> String {
    let errors = errors.field_errors();
    if errors.contains_key("price") {
        "Price must be a positive number".to_string()
    } else {
        let mut fields: Vec<String> = errors.keys().map(|k| k.to_string()).collect();
        fields.sort_unstable();
        format!("{} must not be empty", fields.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> ProductService {
        ProductService::new(CatalogStore::seeded())
    }

    fn query(category: Option<&str>, page: Option<&str>, limit: Option<&str>) -> ListQuery {
        ListQuery {
            category: category.map(str::to_string),
            page: page.map(str::to_string),
            limit: limit.map(str::to_string),
        }
    }

    fn mouse() -> CreateProductRequest {
        CreateProductRequest {
            name: Some("Mouse".to_string()),
            price: Some(25.0),
            category: Some("electronics".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn parse_or_default_follows_lenient_integer_rules() {
        assert_eq!(parse_or_default(None, 2), 2);
        assert_eq!(parse_or_default(Some("abc"), 2), 2);
        assert_eq!(parse_or_default(Some("0"), 2), 2);
        assert_eq!(parse_or_default(Some(" 3 "), 2), 3);
        assert_eq!(parse_or_default(Some("-1"), 2), -1);
    }

    #[test]
    fn parse_or_default_reads_leading_integer() {
        assert_eq!(parse_or_default(Some("1.5"), 2), 1);
        assert_eq!(parse_or_default(Some("2abc"), 1), 2);
        assert_eq!(parse_or_default(Some(" 3"), 2), 3);
        assert_eq!(parse_or_default(Some("+4"), 2), 4);
        assert_eq!(parse_or_default(Some("-2.9"), 2), -2);
        assert_eq!(parse_or_default(Some("0.5"), 2), 2);
        assert_eq!(parse_or_default(Some("0x10"), 2), 16);
        assert_eq!(parse_or_default(Some("-"), 2), 2);
        assert_eq!(parse_or_default(Some("a1"), 2), 2);
        assert_eq!(parse_or_default(Some("99999999999999999999"), 2), i64::MAX);
    }

    #[test]
    fn list_with_fractional_limit_uses_its_integer_part() {
        let page = service()
            .list(&query(None, Some("2abc"), Some("1.5")))
            .unwrap();

        assert_eq!(page.page, 2);
        assert_eq!(page.products.len(), 1);
        assert_eq!(page.products[0].name, "Smartphone");
    }

    #[test]
    fn page_bounds_clamp_negative_and_overflowing_ranges() {
        assert_eq!(page_bounds(1, 2, 3), (0, 2));
        assert_eq!(page_bounds(2, 2, 3), (2, 3));
        assert_eq!(page_bounds(5, 2, 3), (3, 3));
        assert_eq!(page_bounds(-1, 2, 3), (0, 0));
        assert_eq!(page_bounds(2, -2, 3), (0, 0));
    }

    #[test]
    fn list_filters_by_category_case_insensitively() {
        let page = service()
            .list(&query(Some("ELECTRONICS"), None, Some("10")))
            .unwrap();

        assert_eq!(page.total_products, 2);
        assert!(page.products.iter().all(|p| p.in_category("electronics")));
    }

    #[test]
    fn list_second_page_of_electronics() {
        let page = service()
            .list(&query(Some("electronics"), Some("2"), Some("1")))
            .unwrap();

        assert_eq!(page.page, 2);
        assert_eq!(page.total_products, 2);
        assert_eq!(page.products.len(), 1);
        assert_eq!(page.products[0].name, "Smartphone");
    }

    #[test]
    fn list_defaults_to_first_two_products() {
        let page = service().list(&ListQuery::default()).unwrap();
        assert_eq!(page.page, 1);
        assert_eq!(page.total_products, 3);
        assert_eq!(page.products.len(), 2);
    }

    #[test]
    fn search_requires_a_name() {
        let service = service();
        assert!(matches!(service.search(None), Err(CoreError::BadRequest(_))));
        assert!(matches!(service.search(Some("")), Err(CoreError::BadRequest(_))));
    }

    #[test]
    fn search_matches_substring_case_insensitively() {
        let results = service().search(Some("lap")).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "Laptop");

        assert!(service().search(Some("tablet")).unwrap().is_empty());
    }

    #[test]
    fn stats_counts_sum_to_total() {
        let stats = service().stats().unwrap();
        assert_eq!(stats.total_products, 3);
        assert_eq!(stats.stats["electronics"], 2);
        assert_eq!(stats.stats["kitchen"], 1);
        assert_eq!(stats.stats.values().sum::<usize>(), stats.total_products);
    }

    #[test]
    fn create_defaults_in_stock_and_assigns_fresh_id() {
        let service = service();
        let product = service.create(mouse()).unwrap();

        assert!(product.in_stock);
        assert!(Uuid::parse_str(&product.id).is_ok());
        assert_eq!(service.store().len().unwrap(), 4);
        assert_eq!(service.get(&product.id).unwrap(), product);
    }

    #[test]
    fn create_and_update_store_names_as_given() {
        let service = service();
        let product = service
            .create(CreateProductRequest {
                name: Some(" Mouse ".to_string()),
                ..mouse()
            })
            .unwrap();
        assert_eq!(product.name, " Mouse ");
        assert_eq!(service.get(&product.id).unwrap().name, " Mouse ");

        let updated = service
            .update(
                &product.id,
                ProductPatch {
                    category: Some(" Peripherals".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.category, " Peripherals");
    }

    #[test]
    fn create_rejects_missing_or_zero_price() {
        let service = service();
        let missing = CreateProductRequest {
            price: None,
            ..mouse()
        };
        let zero = CreateProductRequest {
            price: Some(0.0),
            ..mouse()
        };
        let blank_name = CreateProductRequest {
            name: Some("  ".to_string()),
            ..mouse()
        };

        for request in [missing, zero, blank_name] {
            assert_eq!(
                service.create(request),
                Err(CoreError::BadRequest(REQUIRED_FIELDS_MESSAGE.to_string()))
            );
        }
        assert_eq!(service.store().len().unwrap(), 3);
    }

    #[test]
    fn update_distinguishes_present_from_omitted_fields() {
        let service = service();
        let updated = service
            .update(
                "1",
                ProductPatch {
                    description: Some(String::new()),
                    in_stock: Some(false),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.description.as_deref(), Some(""));
        assert!(!updated.in_stock);
        assert_eq!(updated.name, "Laptop");
        assert_eq!(updated.price, 1200.0);
    }

    #[test]
    fn update_rejects_invalid_values_without_touching_the_store() {
        let service = service();
        let err = service
            .update(
                "1",
                ProductPatch {
                    price: Some(0.0),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert_eq!(
            err,
            CoreError::BadRequest("Price must be a positive number".to_string())
        );

        let err = service
            .update(
                "1",
                ProductPatch {
                    name: Some(" ".to_string()),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert_eq!(err, CoreError::BadRequest("name must not be empty".to_string()));
        assert_eq!(service.get("1").unwrap().name, "Laptop");
    }

    #[test]
    fn update_and_delete_report_unknown_ids() {
        let service = service();
        assert!(matches!(
            service.update("404", ProductPatch::default()),
            Err(CoreError::NotFound(_))
        ));
        assert!(matches!(service.delete("404"), Err(CoreError::NotFound(_))));
        assert_eq!(service.store().len().unwrap(), 3);
    }

    #[test]
    fn mutations_are_visible_to_queries() {
        let service = service();
        let created = service.create(mouse()).unwrap();

        assert_eq!(service.stats().unwrap().stats["electronics"], 3);
        assert_eq!(service.search(Some("mou")).unwrap(), vec![created.clone()]);

        service.delete(&created.id).unwrap();
        assert_eq!(service.stats().unwrap().total_products, 3);
    }
}
