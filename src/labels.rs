use crate::format::format_axis_value;

/// Display strings used in chart legends, tooltips and the info bars.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Labels {
    pub highest_suffix: String,
    pub lowest_suffix: String,
    pub set_total: String,
    pub set_summary: String,
    pub price_axis: String,
    pub data_source: String,
    pub search_results: String,
    pub sell: String,
    pub buy: String,
    pub middle: String,
    /// Appended to a multiplier to title a scaled summary block.
    pub scaled_suffix: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            highest_suffix: " (highest)".into(),
            lowest_suffix: " (lowest)".into(),
            set_total: "Set total".into(),
            set_summary: "Total".into(),
            price_axis: "Price".into(),
            data_source: "Data source: Serenity".into(),
            search_results: "Search results".into(),
            sell: "Sell".into(),
            buy: "Buy".into(),
            middle: "Middle".into(),
            scaled_suffix: " units".into(),
        }
    }
}

impl Labels {
    /// Strings of the Chinese-language site.
    pub fn zh_cn() -> Self {
        Self {
            highest_suffix: " (最高价)".into(),
            lowest_suffix: " (最低价)".into(),
            set_total: "一套总价".into(),
            set_summary: "总价".into(),
            price_axis: "价格".into(),
            data_source: "数据来源：宁静".into(),
            search_results: "搜索结果".into(),
            sell: "卖单".into(),
            buy: "买单".into(),
            middle: "中位".into(),
            scaled_suffix: "个".into(),
        }
    }

    pub fn highest_name(&self, item: &str) -> String {
        format!("{}{}", item, self.highest_suffix)
    }

    pub fn lowest_name(&self, item: &str) -> String {
        format!("{}{}", item, self.lowest_suffix)
    }

    /// Title of a block showing prices times `multiplier`, e.g. `"500 units"`.
    pub fn scaled_name(&self, multiplier: f64) -> String {
        format!("{}{}", format_axis_value(multiplier), self.scaled_suffix)
    }
}
