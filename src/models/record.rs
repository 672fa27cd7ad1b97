use bigdecimal::{BigDecimal, Zero};
use serde::Serialize;

/// 明细行 (一行表格中的商品)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineItemRecord {
    pub item_name: String,
    pub quantity: BigDecimal,
    pub unit_price: BigDecimal,
}

impl LineItemRecord {
    pub fn new(item_name: impl Into<String>, quantity: BigDecimal, unit_price: BigDecimal) -> Self {
        Self {
            item_name: item_name.into(),
            quantity,
            unit_price,
        }
    }

    /// 行金额 = 数量 × 单价
    pub fn line_total(&self) -> BigDecimal {
        &self.quantity * &self.unit_price
    }
}

/// 发票抬头，取自分组的第一行，之后不再修改
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvoiceHeader {
    pub invoice_number: String,
    pub customer_name: String,
    pub address: String,
    pub phone: String,
    /// 空字符串表示未填写，渲染时使用生成日期
    pub date: String,
    pub tax_percent: BigDecimal,
    pub discount_percent: BigDecimal,
}

impl InvoiceHeader {
    pub fn new(invoice_number: impl Into<String>) -> Self {
        Self {
            invoice_number: invoice_number.into(),
            customer_name: String::new(),
            address: String::new(),
            phone: String::new(),
            date: String::new(),
            tax_percent: BigDecimal::zero(),
            discount_percent: BigDecimal::zero(),
        }
    }
}

/// 读取阶段的输出元素：明细 + 当时生效的抬头
///
/// `header_row` 是开启该发票的抬头所在行号，聚合时按它做位置分组，
/// 因此两组抬头内容完全相同也不会被合并。
/// 抬头行没有商品时 `item` 为 `None`，发票照样成立 (零金额)。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRecord {
    pub header_row: usize,
    pub header: InvoiceHeader,
    pub item: Option<LineItemRecord>,
}
