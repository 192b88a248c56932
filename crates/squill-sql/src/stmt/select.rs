use squill_core::stmt::{FilterNode, OrderSpec, Page};

/// `SELECT <columns> FROM <table> [WHERE ...] [ORDER BY ...] [LIMIT ...]
/// [OFFSET ...]`
///
/// Always selects the table's full column set, in field-map order.
#[derive(Debug, Clone)]
pub struct Select {
    pub table: String,
    pub filter: Option<FilterNode>,
    pub order: OrderSpec,
    pub page: Page,
}

impl Select {
    pub fn new(table: impl Into<String>) -> Select {
        Select {
            table: table.into(),
            filter: None,
            order: OrderSpec::new(),
            page: Page::ALL,
        }
    }

    pub fn filter(mut self, filter: Option<FilterNode>) -> Select {
        self.filter = filter;
        self
    }

    pub fn order(mut self, order: OrderSpec) -> Select {
        self.order = order;
        self
    }

    pub fn page(mut self, page: Page) -> Select {
        self.page = page;
        self
    }
}
