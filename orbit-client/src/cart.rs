//! 购物车
//!
//! 行以 `(id, size)` 唯一；每次变更后整体写回 [`Storage`]。
//! 金额只用于展示，下单时由服务端重新计价。

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::models::{MAX_LINE_QUANTITY, OrderCreate, OrderItemInput};
use shared::money::{OrderTotals, PricedLine, compute_totals, to_f64};

use crate::storage::Storage;
use crate::ClientResult;

/// 存储键
pub const CART_STORAGE_KEY: &str = "orbit-cart";

/// 购物车行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Menu item id
    pub id: i64,
    pub name: String,
    /// Unit price shown when the item was added
    pub price: f64,
    pub quantity: i32,
    pub size: Option<String>,
    pub image: Option<String>,
}

impl CartItem {
    fn is_line(&self, id: i64, size: Option<&str>) -> bool {
        self.id == id && self.size.as_deref() == size
    }
}

pub struct CartStore<S: Storage> {
    items: Vec<CartItem>,
    storage: S,
}

impl<S: Storage> CartStore<S> {
    /// 从存储恢复购物车；内容损坏时从空车开始
    pub fn load(storage: S) -> ClientResult<Self> {
        let items = match storage.load(CART_STORAGE_KEY)? {
            Some(json) => serde_json::from_str(&json).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Discarding unreadable cart");
                Vec::new()
            }),
            None => Vec::new(),
        };
        Ok(Self { items, storage })
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// 添加商品；同 `(id, size)` 累加数量，单行上限 [`MAX_LINE_QUANTITY`]
    pub fn add(&mut self, item: CartItem) -> ClientResult<()> {
        let quantity = item.quantity.clamp(1, MAX_LINE_QUANTITY);
        match self
            .items
            .iter_mut()
            .find(|line| line.is_line(item.id, item.size.as_deref()))
        {
            Some(line) => {
                line.quantity = line.quantity.saturating_add(quantity).min(MAX_LINE_QUANTITY)
            }
            None => self.items.push(CartItem { quantity, ..item }),
        }
        self.persist()
    }

    /// 数量减一；数量为 1 时移除该行
    pub fn decrement(&mut self, id: i64, size: Option<&str>) -> ClientResult<()> {
        let Some(index) = self.position(id, size) else {
            return Ok(());
        };
        if self.items[index].quantity <= 1 {
            self.items.remove(index);
        } else {
            self.items[index].quantity -= 1;
        }
        self.persist()
    }

    pub fn remove(&mut self, id: i64, size: Option<&str>) -> ClientResult<()> {
        let before = self.items.len();
        self.items.retain(|line| !line.is_line(id, size));
        if self.items.len() == before {
            return Ok(());
        }
        self.persist()
    }

    /// 设置数量；`quantity <= 0` 移除该行，超过上限按上限计
    pub fn set_quantity(&mut self, id: i64, size: Option<&str>, quantity: i32) -> ClientResult<()> {
        let Some(index) = self.position(id, size) else {
            return Ok(());
        };
        if quantity <= 0 {
            self.items.remove(index);
        } else {
            self.items[index].quantity = quantity.min(MAX_LINE_QUANTITY);
        }
        self.persist()
    }

    pub fn clear(&mut self) -> ClientResult<()> {
        self.items.clear();
        self.storage.remove(CART_STORAGE_KEY)
    }

    /// 商品小计 (未含税)
    pub fn total(&self) -> f64 {
        to_f64(self.priced_lines().iter().map(PricedLine::line_total).sum::<Decimal>())
    }

    /// 小计、税额与合计；`tax_rate` 为百分比
    pub fn totals(&self, tax_rate: f64) -> OrderTotals {
        compute_totals(&self.priced_lines(), tax_rate)
    }

    /// 商品件数
    pub fn item_count(&self) -> i32 {
        self.items.iter().map(|line| line.quantity).sum()
    }

    /// 构造下单请求；价格仅作提示
    pub fn to_order_request(
        &self,
        customer_name: impl Into<String>,
        customer_email: Option<String>,
    ) -> OrderCreate {
        OrderCreate {
            items: self
                .items
                .iter()
                .map(|line| OrderItemInput {
                    menu_item_id: line.id,
                    quantity: line.quantity,
                    size: line.size.clone(),
                    price: Some(line.price),
                })
                .collect(),
            customer_name: customer_name.into(),
            customer_email,
            notes: None,
        }
    }

    fn position(&self, id: i64, size: Option<&str>) -> Option<usize> {
        self.items.iter().position(|line| line.is_line(id, size))
    }

    fn priced_lines(&self) -> Vec<PricedLine> {
        self.items
            .iter()
            .map(|line| PricedLine::new(line.price, line.quantity))
            .collect()
    }

    fn persist(&self) -> ClientResult<()> {
        let json = serde_json::to_string(&self.items)?;
        self.storage.save(CART_STORAGE_KEY, &json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use std::sync::Arc;

    fn latte(size: Option<&str>, quantity: i32) -> CartItem {
        CartItem {
            id: 1,
            name: "Latte".into(),
            price: 6.50,
            quantity,
            size: size.map(Into::into),
            image: None,
        }
    }

    fn muffin() -> CartItem {
        CartItem {
            id: 2,
            name: "Blueberry Muffin".into(),
            price: 3.00,
            quantity: 1,
            size: None,
            image: Some("/api/uploads/menu/2-muffin.png".into()),
        }
    }

    #[test]
    fn test_totals_for_reference_cart() {
        let mut cart = CartStore::load(MemoryStorage::new()).unwrap();
        cart.add(latte(None, 2)).unwrap();
        cart.add(muffin()).unwrap();

        assert_eq!(cart.total(), 16.00);
        assert_eq!(cart.item_count(), 3);
        let totals = cart.totals(8.0);
        assert_eq!(totals.subtotal, 16.00);
        assert_eq!(totals.tax, 1.28);
        assert_eq!(totals.total, 17.28);
    }

    #[test]
    fn test_add_merges_same_line() {
        let mut cart = CartStore::load(MemoryStorage::new()).unwrap();
        cart.add(latte(Some("LG"), 1)).unwrap();
        cart.add(latte(Some("LG"), 2)).unwrap();
        cart.add(latte(None, 1)).unwrap();

        assert_eq!(cart.items().len(), 2);
        assert_eq!(cart.items()[0].quantity, 3);
        assert_eq!(cart.item_count(), 4);
    }

    #[test]
    fn test_line_quantity_capped() {
        let mut cart = CartStore::load(MemoryStorage::new()).unwrap();
        cart.add(latte(None, 60)).unwrap();
        cart.add(latte(None, 60)).unwrap();
        assert_eq!(cart.items()[0].quantity, MAX_LINE_QUANTITY);
        cart.add(latte(None, i32::MAX)).unwrap();
        assert_eq!(cart.items()[0].quantity, MAX_LINE_QUANTITY);

        cart.set_quantity(1, None, 500).unwrap();
        assert_eq!(cart.items()[0].quantity, MAX_LINE_QUANTITY);

        let request = cart.to_order_request("Ada", None);
        assert_eq!(request.items[0].quantity, MAX_LINE_QUANTITY);
    }

    #[test]
    fn test_decrement_removes_last_unit() {
        let mut cart = CartStore::load(MemoryStorage::new()).unwrap();
        cart.add(latte(None, 2)).unwrap();

        cart.decrement(1, None).unwrap();
        assert_eq!(cart.items()[0].quantity, 1);
        cart.decrement(1, None).unwrap();
        assert!(cart.is_empty());

        // Unknown line is a no-op
        cart.decrement(1, None).unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_and_remove() {
        let mut cart = CartStore::load(MemoryStorage::new()).unwrap();
        cart.add(latte(Some("LG"), 1)).unwrap();
        cart.add(muffin()).unwrap();

        cart.set_quantity(1, Some("LG"), 5).unwrap();
        assert_eq!(cart.items()[0].quantity, 5);
        cart.set_quantity(1, Some("LG"), 0).unwrap();
        assert_eq!(cart.items().len(), 1);

        cart.remove(2, None).unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_persisted_across_loads() {
        let storage = Arc::new(MemoryStorage::new());
        let mut cart = CartStore::load(storage.clone()).unwrap();
        cart.add(latte(Some("LG"), 2)).unwrap();

        let restored = CartStore::load(storage.clone()).unwrap();
        assert_eq!(restored.items(), cart.items());

        cart.clear().unwrap();
        assert_eq!(storage.load(CART_STORAGE_KEY).unwrap(), None);
    }

    #[test]
    fn test_corrupt_storage_starts_empty() {
        let storage = MemoryStorage::new();
        storage.save(CART_STORAGE_KEY, "{not json").unwrap();
        let cart = CartStore::load(storage).unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_order_request_carries_price_hints() {
        let mut cart = CartStore::load(MemoryStorage::new()).unwrap();
        cart.add(latte(Some("LG"), 2)).unwrap();

        let request = cart.to_order_request("Ada", Some("ada@example.com".into()));
        assert_eq!(request.customer_name, "Ada");
        assert_eq!(request.items.len(), 1);
        assert_eq!(request.items[0].menu_item_id, 1);
        assert_eq!(request.items[0].quantity, 2);
        assert_eq!(request.items[0].size.as_deref(), Some("LG"));
        assert_eq!(request.items[0].price, Some(6.50));
    }
}
