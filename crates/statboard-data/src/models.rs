use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One row of a resource page. Row shapes differ per resource and drift with
/// the upstream API, so rows stay generic JSON objects and the filter layer
/// reads them through the typed accessors below.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(pub Map<String, Value>);

impl Record {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// String view of a field. Missing fields and non-string values are
    /// `None`, so an active text filter never matches them.
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Value::as_str)
    }

    /// Numeric view of a field: JSON numbers as-is, numeric strings parsed
    /// after trimming. Anything else is `None`.
    pub fn get_f64(&self, field: &str) -> Option<f64> {
        match self.0.get(field)? {
            Value::Number(number) => number.as_f64(),
            Value::String(text) => text.trim().parse::<f64>().ok(),
            _ => None,
        }
    }
}

impl From<Map<String, Value>> for Record {
    fn from(map: Map<String, Value>) -> Self {
        Record(map)
    }
}

/// Raw `{ data, meta }` body as the statistics API sends it. Both halves are
/// optional on the wire; `PageResult` applies the defaults.
#[derive(Clone, Debug, Default, Deserialize)]
pub(crate) struct PageEnvelope {
    #[serde(default)]
    pub data: Option<Vec<Record>>,
    #[serde(default)]
    pub meta: Option<PageMeta>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub(crate) struct PageMeta {
    #[serde(default)]
    pub last_page: Option<u32>,
    #[serde(default)]
    pub total: Option<u64>,
}

/// Decoded page of a resource.
///
/// `items` is `None` when the response carried no `data` array at all. The
/// record list treats that the same as an empty page, but the unique-value
/// index keeps its previous contents in that case.
#[derive(Clone, Debug, PartialEq)]
pub struct PageResult {
    pub items: Option<Vec<Record>>,
    pub total_pages: u32,
    pub total_items: u64,
}

impl Default for PageResult {
    fn default() -> Self {
        Self {
            items: None,
            total_pages: 1,
            total_items: 0,
        }
    }
}

impl PageResult {
    pub fn from_json(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice::<PageEnvelope>(bytes).map(Into::into)
    }

    pub fn records(&self) -> &[Record] {
        self.items.as_deref().unwrap_or_default()
    }
}

impl From<PageEnvelope> for PageResult {
    fn from(envelope: PageEnvelope) -> Self {
        let meta = envelope.meta.unwrap_or_default();
        Self {
            items: envelope.data,
            // A missing or zero last_page both collapse to a single page.
            total_pages: meta.last_page.filter(|last| *last >= 1).unwrap_or(1),
            total_items: meta.total.unwrap_or(0),
        }
    }
}
