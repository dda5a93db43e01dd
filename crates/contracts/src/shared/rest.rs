//! Query-string protocol of the structured data backend
//!
//! `GET /api/rest/{table}?status=eq.open&order=created_at.desc`
//! Every non-reserved key is an equality filter written as `eq.<value>`;
//! `order` names one column, optionally suffixed with `.desc` or `.asc`.

pub const REST_PREFIX: &str = "/api/rest";
pub const FUNCTIONS_PREFIX: &str = "/api/functions";

const ORDER_KEY: &str = "order";
const EQ_PREFIX: &str = "eq.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub column: String,
    pub descending: bool,
}

/// Select-all or select-by-equality with an optional ordering
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectQuery {
    pub filters: Vec<(String, String)>,
    pub order: Option<Order>,
}

impl SelectQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn eq(mut self, column: &str, value: &str) -> Self {
        self.filters.push((column.to_string(), value.to_string()));
        self
    }

    pub fn order_by(mut self, column: &str, descending: bool) -> Self {
        self.order = Some(Order {
            column: column.to_string(),
            descending,
        });
        self
    }

    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs: Vec<(String, String)> = self
            .filters
            .iter()
            .map(|(column, value)| (column.clone(), format!("{}{}", EQ_PREFIX, value)))
            .collect();
        if let Some(order) = &self.order {
            let direction = if order.descending { ".desc" } else { "" };
            pairs.push((ORDER_KEY.to_string(), format!("{}{}", order.column, direction)));
        }
        pairs
    }

    pub fn from_query_pairs(pairs: &[(String, String)]) -> Result<Self, String> {
        let mut query = Self::default();
        for (key, value) in pairs {
            if key == ORDER_KEY {
                let (column, descending) = match value.rsplit_once('.') {
                    Some((column, "desc")) => (column, true),
                    Some((column, "asc")) => (column, false),
                    _ => (value.as_str(), false),
                };
                query.order = Some(Order {
                    column: column.to_string(),
                    descending,
                });
            } else {
                let operand = value
                    .strip_prefix(EQ_PREFIX)
                    .ok_or_else(|| format!("Unsupported filter on '{}': {}", key, value))?;
                query.filters.push((key.clone(), operand.to_string()));
            }
        }
        Ok(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn pairs_encode_filters_and_order() {
        let query = SelectQuery::all()
            .eq("entity_id", "e1")
            .order_by("display_order", false);
        assert_eq!(
            query.to_query_pairs(),
            vec![
                ("entity_id".to_string(), "eq.e1".to_string()),
                ("order".to_string(), "display_order".to_string()),
            ]
        );
        assert_eq!(SelectQuery::from_query_pairs(&query.to_query_pairs()).unwrap(), query);
    }

    #[test]
    fn descending_order_and_values_with_dots() {
        let pairs = vec![
            ("site".to_string(), "eq.acme.com".to_string()),
            ("order".to_string(), "created_at.desc".to_string()),
        ];
        let query = SelectQuery::from_query_pairs(&pairs).unwrap();
        assert_eq!(query.filters, vec![("site".to_string(), "acme.com".to_string())]);
        assert_eq!(
            query.order,
            Some(Order { column: "created_at".into(), descending: true })
        );
    }

    #[test]
    fn unknown_operators_are_rejected() {
        let pairs = vec![("amount".to_string(), "gt.5".to_string())];
        assert!(SelectQuery::from_query_pairs(&pairs).is_err());
    }
}
