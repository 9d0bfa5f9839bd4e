//! Parameterized SELECT construction over the store's tables.
//!
//! Values, including JSON paths into stored documents, are always bound as `?`
//! parameters. Builder methods return `&mut Self` for chaining.
//!
//! # Example
//!
//! ```rust
//! use mtg_ingest::SqlBuilder;
//! let (sql, params) = SqlBuilder::new("cards")
//!     .where_eq("set_code", "mh3")
//!     .where_json_contains("document", "oracle_text", "draw a card")
//!     .order_by(&["name ASC"])
//!     .limit(10)
//!     .build();
//! assert_eq!(params.len(), 3);
//! ```

pub struct SqlBuilder {
    select_cols: Vec<String>,
    from_table: String,
    where_clauses: Vec<String>,
    params: Vec<String>,
    group_by_cols: Vec<String>,
    order_by_cols: Vec<String>,
    limit_val: Option<usize>,
    offset_val: Option<usize>,
}

impl SqlBuilder {
    pub fn new(table: &str) -> Self {
        Self {
            select_cols: vec!["*".to_string()],
            from_table: table.to_string(),
            where_clauses: Vec::new(),
            params: Vec::new(),
            group_by_cols: Vec::new(),
            order_by_cols: Vec::new(),
            limit_val: None,
            offset_val: None,
        }
    }

    /// Replace the default `*` projection.
    pub fn select(&mut self, cols: &[&str]) -> &mut Self {
        self.select_cols = cols.iter().map(|c| c.to_string()).collect();
        self
    }

    /// `{column} = ?`
    pub fn where_eq(&mut self, column: &str, value: &str) -> &mut Self {
        self.where_clauses.push(format!("{} = ?", column));
        self.params.push(value.to_string());
        self
    }

    /// Case-insensitive substring match: `LOWER({column}) LIKE LOWER(?)`
    /// with the value wrapped in `%`.
    pub fn where_contains(&mut self, column: &str, value: &str) -> &mut Self {
        self.where_clauses
            .push(format!("LOWER({}) LIKE LOWER(?)", column));
        self.params.push(format!("%{}%", value));
        self
    }

    /// Equality on a string field of a JSON document column.
    ///
    /// `path` is a dotted key path below the document root, e.g. `"format"`
    /// or `"createdByUser.userName"`.
    pub fn where_json_eq(&mut self, column: &str, path: &str, value: &str) -> &mut Self {
        self.where_clauses
            .push(format!("json_extract_string({}, ?) = ?", column));
        self.params.push(json_path(path));
        self.params.push(value.to_string());
        self
    }

    /// Case-insensitive substring match on a string field of a JSON document.
    pub fn where_json_contains(&mut self, column: &str, path: &str, value: &str) -> &mut Self {
        self.where_clauses.push(format!(
            "LOWER(json_extract_string({}, ?)) LIKE LOWER(?)",
            column
        ));
        self.params.push(json_path(path));
        self.params.push(format!("%{}%", value));
        self
    }

    /// `{column} IN (?, ...)`; an empty list matches nothing.
    pub fn where_in(&mut self, column: &str, values: &[&str]) -> &mut Self {
        if values.is_empty() {
            self.where_clauses.push("FALSE".to_string());
            return self;
        }
        let placeholders: Vec<&str> = values.iter().map(|_| "?").collect();
        self.where_clauses
            .push(format!("{} IN ({})", column, placeholders.join(", ")));
        self.params.extend(values.iter().map(|v| v.to_string()));
        self
    }

    pub fn group_by(&mut self, cols: &[&str]) -> &mut Self {
        self.group_by_cols.extend(cols.iter().map(|c| c.to_string()));
        self
    }

    /// ORDER BY clauses such as `"name ASC"`.
    pub fn order_by(&mut self, clauses: &[&str]) -> &mut Self {
        self.order_by_cols.extend(clauses.iter().map(|c| c.to_string()));
        self
    }

    pub fn limit(&mut self, n: usize) -> &mut Self {
        self.limit_val = Some(n);
        self
    }

    pub fn offset(&mut self, n: usize) -> &mut Self {
        self.offset_val = Some(n);
        self
    }

    /// Render `(sql, params)`.
    pub fn build(&self) -> (String, Vec<String>) {
        let mut parts = vec![
            format!("SELECT {}", self.select_cols.join(", ")),
            format!("FROM {}", self.from_table),
        ];
        if !self.where_clauses.is_empty() {
            parts.push(format!("WHERE {}", self.where_clauses.join(" AND ")));
        }
        if !self.group_by_cols.is_empty() {
            parts.push(format!("GROUP BY {}", self.group_by_cols.join(", ")));
        }
        if !self.order_by_cols.is_empty() {
            parts.push(format!("ORDER BY {}", self.order_by_cols.join(", ")));
        }
        if let Some(n) = self.limit_val {
            parts.push(format!("LIMIT {}", n));
        }
        if let Some(n) = self.offset_val {
            parts.push(format!("OFFSET {}", n));
        }
        (parts.join("\n"), self.params.clone())
    }
}

fn json_path(path: &str) -> String {
    format!("$.{}", path.trim_start_matches("$.").trim_start_matches('.'))
}
