//! 内存产品目录
//!
//! 进程内唯一的产品集合，所有处理器通过同一个 `CatalogStore` 读写。

use std::sync::{Arc, PoisonError, RwLock};

use super::model::{Product, ProductPatch};
use crate::core::error::CoreError;

#[derive(Clone, Default)]
pub struct CatalogStore {
    products: Arc<RwLock<Vec<Product>>>,
}

fn poisoned<T>(_: PoisonError<T>) -> CoreError {
    CoreError::InternalServerError("catalog lock poisoned".to_string())
}

impl CatalogStore {
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            products: Arc::new(RwLock::new(products)),
        }
    }

    pub fn seeded() -> Self {
        Self::new(Product::seed())
    }

    /// 当前全部产品的副本，保持插入顺序
    pub fn snapshot(&self) -> Result<Vec<Product>, CoreError> {
        Ok(self.products.read().map_err(poisoned)?.clone())
    }

    pub fn len(&self) -> Result<usize, CoreError> {
        Ok(self.products.read().map_err(poisoned)?.len())
    }

    pub fn is_empty(&self) -> Result<bool, CoreError> {
        Ok(self.len()? == 0)
    }

    pub fn find(&self, id: &str) -> Result<Option<Product>, CoreError> {
        let products = self.products.read().map_err(poisoned)?;
        Ok(products.iter().find(|p| p.id == id).cloned())
    }

    pub fn insert(&self, product: Product) -> Result<(), CoreError> {
        self.products.write().map_err(poisoned)?.push(product);
        Ok(())
    }

    /// 在一次写锁内完成查找和修改，读者看不到半更新的记录
    pub fn update(&self, id: &str, patch: ProductPatch) -> Result<Option<Product>, CoreError> {
        let mut products = self.products.write().map_err(poisoned)?;
        Ok(products.iter_mut().find(|p| p.id == id).map(|product| {
            product.apply(patch);
            product.clone()
        }))
    }

    pub fn remove(&self, id: &str) -> Result<Option<Product>, CoreError> {
        let mut products = self.products.write().map_err(poisoned)?;
        Ok(products
            .iter()
            .position(|p| p.id == id)
            .map(|index| products.remove(index)))
    }
}
