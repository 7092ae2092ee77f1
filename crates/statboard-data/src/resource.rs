use serde::{Deserialize, Serialize};

/// The four statistics resources the dashboard shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Incomes,
    Orders,
    Sales,
    Stocks,
}

impl ResourceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::Incomes => "incomes",
            ResourceKind::Orders => "orders",
            ResourceKind::Sales => "sales",
            ResourceKind::Stocks => "stocks",
        }
    }

    pub fn descriptor(self) -> &'static ResourceDescriptor {
        match self {
            ResourceKind::Incomes => &INCOMES,
            ResourceKind::Orders => &ORDERS,
            ResourceKind::Sales => &SALES,
            ResourceKind::Stocks => &STOCKS,
        }
    }
}

/// How a resource is scoped in time: a `dateFrom`/`dateTo` pair, or a single
/// `dateFrom` snapshot day (stocks).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateMode {
    Range,
    SingleDay,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// Case-insensitive substring match. Text columns also feed the
    /// unique-value index.
    Text,
    /// Record value must parse as a number and be >= the filter value.
    Threshold,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub kind: ColumnKind,
}

impl ColumnSpec {
    pub const fn text(name: &'static str) -> Self {
        Self {
            name,
            kind: ColumnKind::Text,
        }
    }

    pub const fn threshold(name: &'static str) -> Self {
        Self {
            name,
            kind: ColumnKind::Threshold,
        }
    }
}

/// Static description of one resource: where it lives on the API and which
/// columns are filterable. Controllers are generic over these.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResourceDescriptor {
    pub kind: ResourceKind,
    pub path: &'static str,
    pub date_mode: DateMode,
    pub columns: &'static [ColumnSpec],
}

impl ResourceDescriptor {
    pub fn column(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|column| column.name == name)
    }

    pub fn text_columns(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.columns
            .iter()
            .filter(|column| column.kind == ColumnKind::Text)
            .map(|column| column.name)
    }
}

pub const INCOMES: ResourceDescriptor = ResourceDescriptor {
    kind: ResourceKind::Incomes,
    path: "/api/incomes",
    date_mode: DateMode::Range,
    columns: &[
        ColumnSpec::text("supplier_article"),
        ColumnSpec::text("warehouse_name"),
        ColumnSpec::threshold("quantity"),
    ],
};

pub const ORDERS: ResourceDescriptor = ResourceDescriptor {
    kind: ResourceKind::Orders,
    path: "/api/orders",
    date_mode: DateMode::Range,
    columns: &[
        ColumnSpec::text("supplier_article"),
        ColumnSpec::text("warehouse_name"),
        ColumnSpec::text("brand"),
        ColumnSpec::threshold("discount_percent"),
    ],
};

pub const SALES: ResourceDescriptor = ResourceDescriptor {
    kind: ResourceKind::Sales,
    path: "/api/sales",
    date_mode: DateMode::Range,
    columns: &[
        ColumnSpec::text("supplier_article"),
        ColumnSpec::text("warehouse_name"),
        ColumnSpec::text("brand"),
        ColumnSpec::threshold("discount_percent"),
    ],
};

pub const STOCKS: ResourceDescriptor = ResourceDescriptor {
    kind: ResourceKind::Stocks,
    path: "/api/stocks",
    date_mode: DateMode::SingleDay,
    columns: &[
        ColumnSpec::text("supplier_article"),
        ColumnSpec::text("warehouse_name"),
        ColumnSpec::text("brand"),
        ColumnSpec::threshold("quantity"),
    ],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_resolves_its_own_descriptor() {
        for kind in [
            ResourceKind::Incomes,
            ResourceKind::Orders,
            ResourceKind::Sales,
            ResourceKind::Stocks,
        ] {
            let descriptor = kind.descriptor();
            assert_eq!(descriptor.kind, kind);
            assert_eq!(descriptor.path, format!("/api/{}", kind.as_str()));
        }
    }

    #[test]
    fn stocks_is_the_only_single_day_resource() {
        assert_eq!(STOCKS.date_mode, DateMode::SingleDay);
        for descriptor in [&INCOMES, &ORDERS, &SALES] {
            assert_eq!(descriptor.date_mode, DateMode::Range);
        }
    }

    #[test]
    fn text_columns_skip_thresholds() {
        let columns: Vec<_> = ORDERS.text_columns().collect();
        assert_eq!(columns, vec!["supplier_article", "warehouse_name", "brand"]);
        assert_eq!(
            ORDERS.column("discount_percent").map(|c| c.kind),
            Some(ColumnKind::Threshold)
        );
        assert!(ORDERS.column("nonexistent").is_none());
    }

    #[test]
    fn incomes_filters_quantity_not_brand() {
        assert!(INCOMES.column("brand").is_none());
        assert_eq!(
            INCOMES.column("quantity").map(|c| c.kind),
            Some(ColumnKind::Threshold)
        );
    }
}
