use bigdecimal::BigDecimal;
use std::str::FromStr;

/// 0.01，百分比换算系数 (用乘法避免十进制除法)
fn hundredth() -> BigDecimal {
    BigDecimal::new(1.into(), 2)
}

/// amount × percent / 100，不做舍入
pub fn percent_of(amount: &BigDecimal, percent: &BigDecimal) -> BigDecimal {
    amount * percent * hundredth()
}

/// 金额显示：保留两位小数，四舍五入 (远离零)
pub fn round_money(value: &BigDecimal) -> BigDecimal {
    value.round(2).with_scale(2)
}

/// `$1302.00`
pub fn format_money(symbol: &str, value: &BigDecimal) -> String {
    format!("{}{}", symbol, round_money(value))
}

pub fn format_quantity(value: &BigDecimal) -> String {
    round_money(value).to_string()
}

/// 百分比显示保留一位小数：`8.5`、`10.0`
pub fn format_percent(value: &BigDecimal) -> String {
    value.round(1).with_scale(1).to_string()
}

/// 表格里的浮点数经最短往返字符串转为十进制，避免 0.1 变成二进制展开
pub fn decimal_from_f64(value: f64) -> Option<BigDecimal> {
    if !value.is_finite() {
        return None;
    }
    BigDecimal::from_str(&value.to_string()).ok()
}

/// 解析文本数字，允许首尾空白和末尾的 `%`
pub fn parse_decimal(text: &str) -> Option<BigDecimal> {
    let trimmed = text.trim();
    let trimmed = trimmed.strip_suffix('%').unwrap_or(trimmed).trim_end();
    if trimmed.is_empty() {
        return None;
    }
    BigDecimal::from_str(trimmed).ok()
}
