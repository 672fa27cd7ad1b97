//! 版面：发票 + 配置 → 按页排列的文字、分隔线和 logo。
//!
//! 这里只计算坐标 (毫米，原点在页面左下角)，不做任何 I/O；
//! 真正的 PDF 绘制在 [`super::pdf`]。

use bigdecimal::{BigDecimal, Zero};
use chrono::NaiveDateTime;
use std::path::PathBuf;

use crate::config::AppConfig;
use crate::models::amount::{format_money, format_percent, format_quantity};
use crate::models::Invoice;

/// Letter 纸张
pub const PAGE_WIDTH: f32 = 215.9;
pub const PAGE_HEIGHT: f32 = 279.4;
pub const MARGIN: f32 = 19.05;
pub const LOGO_SIZE: f32 = 38.1;

const CONTENT_RIGHT: f32 = PAGE_WIDTH - MARGIN;
const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;
const PT_TO_MM: f32 = 0.3528;

/// 明细表列：名称左对齐，其余右对齐到列的右边界
const COL_ITEM_X: f32 = MARGIN + 2.0;
const COL_QTY_RIGHT: f32 = MARGIN + 115.0;
const COL_PRICE_RIGHT: f32 = MARGIN + 145.0;
const COL_TOTAL_RIGHT: f32 = CONTENT_RIGHT - 2.0;
const ITEM_NAME_MAX_CHARS: usize = 55;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStyle {
    Regular,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const DARK: Rgb = Rgb(0x2C, 0x3E, 0x50);
    pub const GREY: Rgb = Rgb(0x7F, 0x8C, 0x8D);
    pub const SLATE: Rgb = Rgb(0x34, 0x49, 0x5E);
    pub const ACCENT: Rgb = Rgb(0xE7, 0x4C, 0x3C);
    pub const GREEN: Rgb = Rgb(0x27, 0xAE, 0x60);
    pub const RULE: Rgb = Rgb(0xBD, 0xC3, 0xC7);
    pub const FOOTER: Rgb = Rgb(0x95, 0xA5, 0xA6);
    pub const BLACK: Rgb = Rgb(0, 0, 0);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Text {
        text: String,
        x: f32,
        y: f32,
        size: f32,
        style: FontStyle,
        color: Rgb,
    },
    Rule {
        x1: f32,
        x2: f32,
        y: f32,
        thickness: f32,
        color: Rgb,
    },
    Logo {
        path: PathBuf,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub ops: Vec<Op>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub title: String,
    pub pages: Vec<Page>,
}

impl Layout {
    /// 所有文字，按绘制顺序
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.pages.iter().flat_map(|p| &p.ops).filter_map(|op| match op {
            Op::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().any(|t| t.contains(needle))
    }
}

/// Helvetica 字宽的粗略估计 (单位 em)，用于右对齐和居中
fn char_width(c: char, style: FontStyle) -> f32 {
    let base = match c {
        ' ' | '.' | ',' | ':' | ';' | '!' | '|' | 'i' | 'j' | 'l' | '\'' => 0.278,
        'f' | 't' | 'r' | '(' | ')' | '-' | '/' => 0.333,
        'm' | 'M' | 'W' | 'w' | '%' => 0.833,
        c if c.is_ascii_digit() => 0.556,
        c if c.is_ascii_uppercase() => 0.667,
        _ => 0.556,
    };
    match style {
        FontStyle::Regular => base,
        FontStyle::Bold => base * 1.05,
    }
}

pub fn text_width(text: &str, size: f32, style: FontStyle) -> f32 {
    text.chars().map(|c| char_width(c, style)).sum::<f32>() * size * PT_TO_MM
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    out.push_str("...");
    out
}

/// 逐行排版，空间不足时换页
struct Composer {
    pages: Vec<Page>,
    y: f32,
}

impl Composer {
    fn new() -> Self {
        Self {
            pages: vec![Page::default()],
            y: PAGE_HEIGHT - MARGIN,
        }
    }

    fn push(&mut self, op: Op) {
        if let Some(page) = self.pages.last_mut() {
            page.ops.push(op);
        }
    }

    /// 剩余高度不足 `height` 时换页，返回是否换页
    fn ensure(&mut self, height: f32) -> bool {
        if self.y - height < MARGIN {
            self.pages.push(Page::default());
            self.y = PAGE_HEIGHT - MARGIN;
            true
        } else {
            false
        }
    }

    fn down(&mut self, dy: f32) {
        self.y -= dy;
    }

    fn text_at(&mut self, text: &str, x: f32, align: Align, size: f32, style: FontStyle, color: Rgb) {
        let width = text_width(text, size, style);
        let x = match align {
            Align::Left => x,
            Align::Center => x - width / 2.0,
            Align::Right => x - width,
        };
        self.push(Op::Text {
            text: text.to_string(),
            x,
            y: self.y,
            size,
            style,
            color,
        });
    }

    /// 新起一行文字：先下移一个行高再写
    fn line(&mut self, text: &str, align: Align, size: f32, style: FontStyle, color: Rgb) {
        let height = size * PT_TO_MM * 1.4;
        self.ensure(height);
        self.down(height);
        let x = match align {
            Align::Left => MARGIN,
            Align::Center => PAGE_WIDTH / 2.0,
            Align::Right => CONTENT_RIGHT,
        };
        self.text_at(text, x, align, size, style, color);
    }

    fn rule(&mut self, x1: f32, x2: f32, thickness: f32, color: Rgb) {
        self.push(Op::Rule {
            x1,
            x2,
            y: self.y,
            thickness,
            color,
        });
    }

    fn finish(self) -> Vec<Page> {
        self.pages
    }
}

/// 发票版面
pub fn layout_invoice(invoice: &Invoice, config: &AppConfig, generated_at: NaiveDateTime) -> Layout {
    let mut c = Composer::new();
    let header = &invoice.header;
    let symbol = config.currency_symbol.as_str();

    // 1. logo + 公司信息 (居中)
    if let Some(path) = config.logo() {
        c.down(LOGO_SIZE);
        c.push(Op::Logo {
            path: path.to_path_buf(),
            x: MARGIN,
            y: c.y,
            width: LOGO_SIZE,
            height: LOGO_SIZE,
        });
        c.down(5.0);
    }

    c.line(&config.company_name, Align::Center, 24.0, FontStyle::Bold, Rgb::DARK);
    c.down(2.0);
    for line in config.company_address_lines() {
        c.line(line, Align::Center, 10.0, FontStyle::Regular, Rgb::GREY);
    }
    if !config.company_phone.is_empty() {
        c.line(&format!("Phone: {}", config.company_phone), Align::Center, 10.0, FontStyle::Regular, Rgb::GREY);
    }
    if !config.company_email.is_empty() {
        c.line(&format!("Email: {}", config.company_email), Align::Center, 10.0, FontStyle::Regular, Rgb::GREY);
    }
    if !config.company_website.is_empty() {
        c.line(&format!("Web: {}", config.company_website), Align::Center, 10.0, FontStyle::Regular, Rgb::GREY);
    }

    // 2. 标题、发票号、日期
    c.down(8.0);
    c.line("INVOICE", Align::Right, 28.0, FontStyle::Bold, Rgb::ACCENT);
    c.down(3.0);
    let date = if header.date.is_empty() {
        generated_at.format("%Y-%m-%d").to_string()
    } else {
        header.date.clone()
    };
    c.line("Invoice Number:", Align::Left, 10.0, FontStyle::Bold, Rgb::DARK);
    c.text_at(&invoice.header.invoice_number, MARGIN + 35.0, Align::Left, 10.0, FontStyle::Bold, Rgb::DARK);
    c.text_at("Date:", MARGIN + 110.0, Align::Left, 10.0, FontStyle::Bold, Rgb::DARK);
    c.text_at(&date, MARGIN + 123.0, Align::Left, 10.0, FontStyle::Bold, Rgb::DARK);

    // 3. 客户信息
    c.down(8.0);
    c.line("Bill To:", Align::Left, 12.0, FontStyle::Bold, Rgb::SLATE);
    c.line(&header.customer_name, Align::Left, 10.0, FontStyle::Bold, Rgb::BLACK);
    if !header.address.is_empty() {
        c.line(&header.address, Align::Left, 10.0, FontStyle::Regular, Rgb::BLACK);
    }
    if !header.phone.is_empty() {
        c.line(&format!("Phone: {}", header.phone), Align::Left, 10.0, FontStyle::Regular, Rgb::BLACK);
    }

    // 4. 明细表
    c.down(8.0);
    table_header(&mut c);
    for item in &invoice.items {
        if c.ensure(7.0) {
            table_header(&mut c);
        }
        c.down(7.0);
        let name = truncate(&item.item_name, ITEM_NAME_MAX_CHARS);
        c.text_at(&name, COL_ITEM_X, Align::Left, 10.0, FontStyle::Regular, Rgb::BLACK);
        c.text_at(&format_quantity(&item.quantity), COL_QTY_RIGHT, Align::Right, 10.0, FontStyle::Regular, Rgb::BLACK);
        c.text_at(&format_money(symbol, &item.unit_price), COL_PRICE_RIGHT, Align::Right, 10.0, FontStyle::Regular, Rgb::BLACK);
        c.text_at(&format_money(symbol, &item.line_total()), COL_TOTAL_RIGHT, Align::Right, 10.0, FontStyle::Regular, Rgb::BLACK);
        c.down(2.5);
        c.rule(MARGIN, CONTENT_RIGHT, 0.3, Rgb::RULE);
    }

    // 5. 汇总
    let totals = invoice.totals();
    let mut rows: Vec<(String, String)> = vec![("Subtotal:".to_string(), format_money(symbol, &totals.subtotal))];
    if header.discount_percent > BigDecimal::zero() {
        rows.push((
            format!("Discount ({}%):", format_percent(&header.discount_percent)),
            format!("-{}", format_money(symbol, &totals.discount_amount)),
        ));
        rows.push((
            "Subtotal after Discount:".to_string(),
            format_money(symbol, &totals.taxable_amount),
        ));
    }
    if header.tax_percent > BigDecimal::zero() {
        rows.push((
            format!("Tax ({}%):", format_percent(&header.tax_percent)),
            format_money(symbol, &totals.tax_amount),
        ));
    }

    c.down(6.0);
    if c.ensure(7.0 * (rows.len() as f32 + 2.0)) {
        c.down(2.0);
    }
    let label_right = CONTENT_RIGHT - 45.0;
    for (label, value) in &rows {
        c.down(6.0);
        c.text_at(label, label_right, Align::Right, 10.0, FontStyle::Regular, Rgb::BLACK);
        c.text_at(value, CONTENT_RIGHT, Align::Right, 10.0, FontStyle::Regular, Rgb::BLACK);
    }
    c.down(3.0);
    c.rule(MARGIN + CONTENT_WIDTH / 2.0, CONTENT_RIGHT, 0.8, Rgb::SLATE);
    c.down(6.0);
    c.text_at("Total Amount Due:", label_right, Align::Right, 12.0, FontStyle::Bold, Rgb::ACCENT);
    c.text_at(&format_money(symbol, &totals.total), CONTENT_RIGHT, Align::Right, 12.0, FontStyle::Bold, Rgb::ACCENT);

    // 6. 致谢与页脚
    c.down(14.0);
    c.line(&config.thank_you_note, Align::Center, 11.0, FontStyle::Regular, Rgb::GREEN);
    c.down(2.0);
    c.line(
        &format!(
            "This invoice was generated automatically on {}",
            generated_at.format("%Y-%m-%d %H:%M:%S")
        ),
        Align::Center,
        8.0,
        FontStyle::Regular,
        Rgb::FOOTER,
    );

    Layout {
        title: format!("Invoice {}", invoice.header.invoice_number),
        pages: c.finish(),
    }
}

fn table_header(c: &mut Composer) {
    c.ensure(14.0);
    c.down(6.0);
    c.text_at("Item", COL_ITEM_X, Align::Left, 11.0, FontStyle::Bold, Rgb::SLATE);
    c.text_at("Quantity", COL_QTY_RIGHT, Align::Right, 11.0, FontStyle::Bold, Rgb::SLATE);
    c.text_at("Price", COL_PRICE_RIGHT, Align::Right, 11.0, FontStyle::Bold, Rgb::SLATE);
    c.text_at("Total", COL_TOTAL_RIGHT, Align::Right, 11.0, FontStyle::Bold, Rgb::SLATE);
    c.down(2.5);
    c.rule(MARGIN, CONTENT_RIGHT, 1.0, Rgb::SLATE);
}
